//! Grid search over candidate instants.

pub mod cache;
pub mod evaluate;
pub mod grid;
pub mod legacy;
pub mod orchestrator;
pub mod result;
pub mod topic;
pub mod workers;

pub use cache::{ChartCache, ChartKey, ChartSnapshot, SearchSession};
pub use evaluate::{apply_contextual, evaluate_batch, moon_filter_masks, BatchInput};
pub use grid::InstantGrid;
pub use orchestrator::{SearchOrchestrator, SearchRequest, Strategy};
pub use result::{compare_rank, rank, CandidateResult, Flag};
pub use topic::{lookup_topic, resolve_topic, topic_house, valid_topics, Topic};
pub use workers::WorkerStrategy;
