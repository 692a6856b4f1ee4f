use crate::aspects::RulerTrack;
use crate::config::ScoringConfig;
use crate::ephemeris::{Body, PositionBatch};
use crate::error::EvalError;
use crate::houses::HouseBatch;
use crate::natal::NatalReference;

/// Which gathered ruler a ruler-group rule is scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerRole {
    Ascendant,
    Topic,
}

impl RulerRole {
    pub fn prefix(self) -> &'static str {
        match self {
            RulerRole::Ascendant => "ruler_asc",
            RulerRole::Topic => "ruler_topic",
        }
    }
}

/// Everything a rule may read. Built once per batch.
pub struct ScoringContext<'a> {
    pub positions: &'a PositionBatch,
    pub houses: &'a HouseBatch,
    pub asc_ruler: &'a RulerTrack,
    pub topic_ruler: &'a RulerTrack,
    /// House (1..=12) the topic maps to.
    pub topic_house: u8,
    pub natal: Option<&'a NatalReference>,
    pub config: &'a ScoringConfig,
}

impl<'a> ScoringContext<'a> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Longitudes of `body`, or a `MissingBody` error naming `rule`.
    pub fn longitudes(&self, rule: &str, body: Body) -> Result<&'a [f64], EvalError> {
        self.positions
            .longitudes(body)
            .ok_or_else(|| EvalError::MissingBody {
                rule: rule.to_string(),
                body,
            })
    }

    pub fn ruler(&self, role: RulerRole) -> &'a RulerTrack {
        match role {
            RulerRole::Ascendant => self.asc_ruler,
            RulerRole::Topic => self.topic_ruler,
        }
    }

    /// Fail with `ShapeMismatch` unless `actual` matches the batch.
    pub fn check_len(&self, rule: &str, actual: usize) -> Result<(), EvalError> {
        if actual != self.len() {
            return Err(EvalError::ShapeMismatch {
                rule: rule.to_string(),
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }
}

/// Abbreviated body name used in natal and combination component names.
pub(crate) fn short_body(body: Body) -> &'static str {
    match body {
        Body::Sun => "sun",
        Body::Moon => "moon",
        Body::Mercury => "mer",
        Body::Venus => "ven",
        Body::Mars => "mar",
        Body::Jupiter => "jup",
        Body::Saturn => "sat",
        Body::Uranus => "ura",
        Body::Neptune => "nep",
        Body::Pluto => "plu",
        Body::MeanNode => "mnode",
        Body::TrueNode => "tnode",
    }
}
