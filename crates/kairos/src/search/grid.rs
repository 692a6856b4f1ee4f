use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};

/// Strictly increasing candidate instants `start + k * step`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstantGrid {
    instants: Vec<DateTime<Utc>>,
    step_minutes: i64,
}

fn validate(start: DateTime<Utc>, end: DateTime<Utc>, step_minutes: i64) -> Result<(), EngineError> {
    if step_minutes <= 0 {
        return Err(EngineError::InvalidStep {
            minutes: step_minutes,
        });
    }
    if start >= end {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(())
}

impl InstantGrid {
    /// End-exclusive grid of `floor((end - start) / step)` instants.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step_minutes: i64) -> Result<Self, EngineError> {
        validate(start, end, step_minutes)?;
        let count = (end - start).num_minutes() / step_minutes;
        Self::build(start, count, step_minutes)
    }

    /// Grid that also includes `end` when it falls on a step.
    pub fn inclusive(start: DateTime<Utc>, end: DateTime<Utc>, step_minutes: i64) -> Result<Self, EngineError> {
        validate(start, end, step_minutes)?;
        let count = (end - start).num_minutes() / step_minutes + 1;
        Self::build(start, count, step_minutes)
    }

    fn build(start: DateTime<Utc>, count: i64, step_minutes: i64) -> Result<Self, EngineError> {
        let mut instants = Vec::with_capacity(count.max(0) as usize);
        for k in 0..count {
            let offset = k
                .checked_mul(step_minutes)
                .and_then(Duration::try_minutes)
                .ok_or_else(|| EngineError::invariant("grid offset overflows"))?;
            let t = start
                .checked_add_signed(offset)
                .ok_or_else(|| EngineError::invariant("grid instant out of range"))?;
            instants.push(t);
        }
        if instants.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EngineError::invariant("grid is not strictly increasing"));
        }
        Ok(Self {
            instants,
            step_minutes,
        })
    }

    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    pub fn step_minutes(&self) -> i64 {
        self.step_minutes
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }
}
