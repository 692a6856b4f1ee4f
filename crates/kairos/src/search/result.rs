use crate::ephemeris::Body;
use crate::normalize::{ContextualScore, HybridScore};
use crate::scoring::ScoreGroup;
use crate::western::signs::Sign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Why a candidate was rejected, or a note attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    MoonForbiddenSign,
    MoonPhase,
    MoonVoidOfCourse,
    TopicRulerDebility,
    TopicRulerRetrograde,
    MaleficOnAngle,
    NatalHardAspect,
    NatalAscHouse,
    HouseFailure,
    RuleFailed,
    /// Informational: a benefic touches a natal angle.
    NatalBeneficSupport,
    /// Informational: a body was zero-filled for this batch.
    EphemerisDegraded,
}

impl Flag {
    pub fn is_rejection(self) -> bool {
        !matches!(self, Flag::NatalBeneficSupport | Flag::EphemerisDegraded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub instant: DateTime<Utc>,
    pub is_valid: bool,
    pub flags: Vec<Flag>,
    pub moon_sign: Sign,
    pub asc_sign: Sign,
    pub asc_ruler: Body,
    pub topic_ruler: Body,
    pub score_total: f64,
    pub score_general: f64,
    pub score_natal: f64,
    pub score_positive: f64,
    pub score_negative: f64,
    pub groups: BTreeMap<ScoreGroup, f64>,
    pub hybrid: HybridScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual: Option<ContextualScore>,
    /// Non-zero components only.
    pub components: BTreeMap<String, f64>,
}

impl CandidateResult {
    pub fn scc(&self) -> f64 {
        self.contextual.as_ref().map_or(0.0, |c| c.scc)
    }

    pub fn group(&self, group: ScoreGroup) -> f64 {
        self.groups.get(&group).copied().unwrap_or(0.0)
    }

    /// Instant truncated to the minute, used for deduplication.
    pub fn minute_key(&self) -> i64 {
        self.instant.timestamp().div_euclid(60)
    }
}

/// Best first: contextual score, then total.
pub fn compare_rank(a: &CandidateResult, b: &CandidateResult) -> Ordering {
    b.scc()
        .total_cmp(&a.scc())
        .then_with(|| b.score_total.total_cmp(&a.score_total))
}

pub fn rank(results: &mut [CandidateResult]) {
    results.sort_by(compare_rank);
}
