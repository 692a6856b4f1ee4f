//! Rule-based scoring over a whole batch.
//!
//! Every rule is a pure function of the [`ScoringContext`] that returns one
//! named component array, or an [`EvalError`]. The [`ScoreBoard`] collects the
//! results, zero-fills failures and aggregates per group.

pub mod combinations;
pub mod context;
pub mod moon;
pub mod natal;
pub mod ruler;

pub use context::{RulerRole, ScoringContext};

use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreGroup {
    Moon,
    RulerAsc,
    RulerTopic,
    Natal,
    Combinations,
}

impl ScoreGroup {
    pub const ALL: [ScoreGroup; 5] = [
        ScoreGroup::Moon,
        ScoreGroup::RulerAsc,
        ScoreGroup::RulerTopic,
        ScoreGroup::Natal,
        ScoreGroup::Combinations,
    ];
}

/// Signed per-instant contribution of one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: String,
    pub group: ScoreGroup,
    pub values: Vec<f64>,
}

impl ScoreComponent {
    pub fn new(name: impl Into<String>, group: ScoreGroup, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            group,
            values,
        }
    }

    /// `points` where the mask holds, zero elsewhere.
    pub fn from_mask(name: impl Into<String>, group: ScoreGroup, mask: &[bool], points: f64) -> Self {
        let values = mask.iter().map(|&m| if m { points } else { 0.0 }).collect();
        Self::new(name, group, values)
    }

    /// Sum of `points` over several masks.
    pub fn from_masks(
        name: impl Into<String>,
        group: ScoreGroup,
        len: usize,
        masks: &[(Vec<bool>, f64)],
    ) -> Self {
        let mut values = vec![0.0; len];
        for (mask, points) in masks {
            for (v, &m) in values.iter_mut().zip(mask) {
                if m {
                    *v += points;
                }
            }
        }
        Self::new(name, group, values)
    }
}

pub type RuleResult = Result<ScoreComponent, EvalError>;

/// All components of one batch, plus the rules that failed.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    len: usize,
    components: Vec<ScoreComponent>,
    failures: Vec<EvalError>,
}

impl ScoreBoard {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            components: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record a rule outcome. Failures and wrong-length components contribute
    /// nothing and are kept for the failure policy.
    pub fn push(&mut self, result: RuleResult) {
        match result {
            Ok(component) if component.values.len() == self.len => self.components.push(component),
            Ok(component) => {
                let err = EvalError::ShapeMismatch {
                    rule: component.name,
                    expected: self.len,
                    actual: component.values.len(),
                };
                log::warn!("Scoring rule discarded: {}", err);
                self.failures.push(err);
            }
            Err(err) => {
                log::warn!("Scoring rule failed, contributing zero: {}", err);
                self.failures.push(err);
            }
        }
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = RuleResult>) {
        for result in results {
            self.push(result);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn components(&self) -> &[ScoreComponent] {
        &self.components
    }

    pub fn failures(&self) -> &[EvalError] {
        &self.failures
    }

    pub fn component(&self, name: &str) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    fn sum_where(&self, f: impl Fn(&ScoreComponent) -> bool, map: impl Fn(f64) -> f64) -> Vec<f64> {
        let mut out = vec![0.0; self.len];
        for c in self.components.iter().filter(|c| f(c)) {
            for (o, &v) in out.iter_mut().zip(&c.values) {
                *o += map(v);
            }
        }
        out
    }

    pub fn group_total(&self, group: ScoreGroup) -> Vec<f64> {
        self.sum_where(|c| c.group == group, |v| v)
    }

    pub fn total(&self) -> Vec<f64> {
        self.sum_where(|_| true, |v| v)
    }

    pub fn positive(&self) -> Vec<f64> {
        self.sum_where(|_| true, |v| v.max(0.0))
    }

    pub fn negative(&self) -> Vec<f64> {
        self.sum_where(|_| true, |v| v.min(0.0))
    }

    /// Non-zero components at instant `index`.
    pub fn nonzero_at(&self, index: usize) -> BTreeMap<String, f64> {
        self.components
            .iter()
            .filter_map(|c| {
                let v = *c.values.get(index)?;
                (v.abs() > 1e-3).then(|| (c.name.clone(), v))
            })
            .collect()
    }
}

/// Run every rule group and collect the results.
pub fn score_batch(ctx: &ScoringContext<'_>) -> ScoreBoard {
    let mut board = ScoreBoard::new(ctx.len());
    board.extend(moon::rules(ctx));
    board.extend(ruler::rules(ctx, RulerRole::Ascendant));
    board.extend(ruler::rules(ctx, RulerRole::Topic));
    board.extend(natal::rules(ctx));
    board.extend(combinations::rules(ctx));
    log::debug!(
        "Scored {} instants: {} components, {} failed rules",
        board.len(),
        board.components().len(),
        board.failures().len()
    );
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::Body;

    #[test]
    fn test_board_aggregates_groups_and_signs() {
        let mut board = ScoreBoard::new(2);
        board.push(Ok(ScoreComponent::new("a", ScoreGroup::Moon, vec![1.0, 0.0])));
        board.push(Ok(ScoreComponent::new("b", ScoreGroup::Natal, vec![-2.0, 0.5])));
        board.push(Ok(ScoreComponent::new("c", ScoreGroup::Moon, vec![0.5, 0.5])));

        assert_eq!(board.group_total(ScoreGroup::Moon), vec![1.5, 0.5]);
        assert_eq!(board.total(), vec![-0.5, 1.0]);
        assert_eq!(board.positive(), vec![1.5, 1.0]);
        assert_eq!(board.negative(), vec![-2.0, 0.0]);

        let at0 = board.nonzero_at(0);
        assert_eq!(at0.len(), 3);
        let at1 = board.nonzero_at(1);
        assert!(!at1.contains_key("a"));
    }

    #[test]
    fn test_failures_contribute_zero() {
        let mut board = ScoreBoard::new(2);
        board.push(Err(EvalError::MissingBody {
            rule: "moon_waxing".to_string(),
            body: Body::Moon,
        }));
        board.push(Ok(ScoreComponent::new("short", ScoreGroup::Moon, vec![1.0])));
        assert_eq!(board.failures().len(), 2);
        assert!(board.components().is_empty());
        assert_eq!(board.total(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_from_masks_sums_points() {
        let c = ScoreComponent::from_masks(
            "x",
            ScoreGroup::Moon,
            3,
            &[(vec![true, false, true], 2.0), (vec![true, true, false], 1.0)],
        );
        assert_eq!(c.values, vec![3.0, 1.0, 2.0]);
    }
}
