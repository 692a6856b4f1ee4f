//! Error taxonomy for the search engine.
//!
//! Provider failures ([`EphemerisError`](crate::ephemeris::EphemerisError)) are
//! absorbed by the batch adapters. Everything that reaches the caller is an
//! [`EngineError`]: either a configuration problem rejected up front, or an
//! invariant violation that would otherwise corrupt the batch.

use crate::ephemeris::Body;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by [`SearchOrchestrator::find`](crate::search::SearchOrchestrator::find).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Invalid step: {minutes} minutes (must be > 0)")]
    InvalidStep { minutes: i64 },
    #[error("Unknown topic: {topic}. Valid topics: {valid:?}")]
    UnknownTopic { topic: String, valid: Vec<String> },
    #[error("Invalid natal reference: {message}")]
    InvalidNatal { message: String },
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("Invariant violated: {message}")]
    Invariant { message: String },
}

impl EngineError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        EngineError::Invariant {
            message: message.into(),
        }
    }
}

/// Failure of a single scoring rule over a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Rule {rule} needs {body:?} but it is missing from the batch")]
    MissingBody { rule: String, body: Body },
    #[error("Rule {rule} produced {actual} values for a batch of {expected}")]
    ShapeMismatch {
        rule: String,
        expected: usize,
        actual: usize,
    },
}
