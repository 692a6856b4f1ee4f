pub mod aspects;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod natal;
pub mod normalize;
pub mod scoring;
pub mod search;
pub mod western;

pub use config::{EngineConfig, FailurePolicy, SccBasis, TopicPolicy};
pub use ephemeris::{Body, EphemerisProvider, GeoLocation, MeanMotionEphemeris};
pub use error::{EngineError, EvalError};
pub use houses::{EqualHouses, HouseProvider, HouseSystem};
pub use natal::{NatalPoint, NatalReference};
pub use normalize::{ContextualNormalizer, SccSummary};
pub use search::{CandidateResult, Flag, SearchOrchestrator, SearchRequest, Strategy};

#[cfg(feature = "swiss")]
pub use ephemeris::SwissEphemerisAdapter;
