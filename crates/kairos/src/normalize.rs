//! Contextual normalization of raw scores.
//!
//! Two scales are produced per candidate:
//! - the contextual score (SCC): an absolute position in a fixed range blended
//!   with a percentile against the other candidates of the same search;
//! - the hybrid score: sky-only and natal-only points mapped independently to
//!   0-100 and mixed, with a star label.

use crate::config::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Linear map of `[min, max]` to 0-100, clamped.
pub fn absolute_pct(value: f64, min: f64, max: f64) -> f64 {
    if value <= min {
        0.0
    } else if value >= max {
        100.0
    } else {
        (value - min) / (max - min) * 100.0
    }
}

/// Percentile of `value` within `sorted` (ascending), interpolating between
/// neighbours.
pub fn percentile_rank(value: f64, sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    for (i, &v) in sorted.iter().enumerate() {
        if value <= v {
            if i == 0 {
                return 0.0;
            }
            if value == v {
                return i as f64 / n * 100.0;
            }
            let prev = sorted[i - 1];
            if v != prev {
                let frac = (value - prev) / (v - prev);
                return ((i - 1) as f64 + frac) / n * 100.0;
            }
            return i as f64 / n * 100.0;
        }
    }
    100.0
}

/// Fixed percentile estimate used when there is no usable reference batch.
pub fn ladder_pct(value: f64) -> f64 {
    if value >= 3.0 {
        95.0
    } else if value >= 2.0 {
        85.0
    } else if value >= 1.0 {
        70.0
    } else if value >= 0.0 {
        50.0
    } else if value >= -2.0 {
        30.0
    } else {
        10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SccCategory {
    Exceptional,
    AboveAverage,
    Average,
    BelowAverage,
    Limited,
}

impl SccCategory {
    pub fn from_score(scc: f64) -> Self {
        if scc >= 75.0 {
            SccCategory::Exceptional
        } else if scc >= 65.0 {
            SccCategory::AboveAverage
        } else if scc >= 50.0 {
            SccCategory::Average
        } else if scc >= 40.0 {
            SccCategory::BelowAverage
        } else {
            SccCategory::Limited
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SccCategory::Exceptional => "Exceptional rooting, among the best of the period",
            SccCategory::AboveAverage => "Rooting above the period average",
            SccCategory::Average => "Average rooting for the period",
            SccCategory::BelowAverage => "Rooting below the period average",
            SccCategory::Limited => "Limited rooting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualScore {
    pub scc: f64,
    pub absolute_pct: f64,
    pub relative_pct: f64,
    pub recommended: bool,
    pub category: SccCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            QualityLabel::Excellent
        } else if score >= 60.0 {
            QualityLabel::VeryGood
        } else if score >= 40.0 {
            QualityLabel::Good
        } else if score >= 20.0 {
            QualityLabel::Fair
        } else {
            QualityLabel::Poor
        }
    }

    pub fn stars(self) -> u8 {
        match self {
            QualityLabel::Excellent => 5,
            QualityLabel::VeryGood => 4,
            QualityLabel::Good => 3,
            QualityLabel::Fair => 2,
            QualityLabel::Poor => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridScore {
    pub score: f64,
    pub general_pct: f64,
    pub natal_pct: f64,
    pub label: QualityLabel,
    pub stars: u8,
}

/// Stateless scorer; the reference batch is passed per call.
#[derive(Debug, Clone, Default)]
pub struct ContextualNormalizer {
    config: NormalizerConfig,
}

impl ContextualNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Contextual score of `value` against `reference` (any order).
    pub fn contextual(&self, value: f64, reference: &[f64]) -> ContextualScore {
        let mut sorted = reference.to_vec();
        sorted.sort_by(f64::total_cmp);
        self.contextual_sorted(value, &sorted)
    }

    /// As [`contextual`](Self::contextual) with an already ascending reference.
    pub fn contextual_sorted(&self, value: f64, sorted: &[f64]) -> ContextualScore {
        let c = &self.config;
        let absolute = absolute_pct(value, c.absolute_min, c.absolute_max);
        let relative = if sorted.len() > 1 {
            percentile_rank(value, sorted)
        } else {
            ladder_pct(value)
        };
        let scc = absolute * c.absolute_weight + relative * c.relative_weight;
        let recommended = scc >= c.threshold;
        let reason = if recommended {
            None
        } else if absolute < c.low_absolute {
            Some("absolute rooting very low".to_string())
        } else {
            Some("below threshold".to_string())
        };
        ContextualScore {
            scc: round1(scc),
            absolute_pct: round1(absolute),
            relative_pct: round1(relative),
            recommended,
            category: SccCategory::from_score(scc),
            reason,
        }
    }

    /// Contextual scores of a whole batch, each against all the others.
    pub fn contextual_batch(&self, values: &[f64]) -> Vec<ContextualScore> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        values
            .iter()
            .map(|&v| self.contextual_sorted(v, &sorted))
            .collect()
    }

    /// Hybrid 0-100 score from the instant total and its natal share.
    pub fn hybrid(&self, total: f64, natal: f64) -> HybridScore {
        let c = &self.config;
        let general = total - natal;
        let general_pct = (general / c.hybrid_general_max * 100.0).clamp(0.0, 100.0);
        let natal_pct = (natal / c.hybrid_natal_max * 100.0).clamp(0.0, 100.0);
        let score = general_pct * c.hybrid_general_weight + natal_pct * c.hybrid_natal_weight;
        let label = QualityLabel::from_score(score);
        HybridScore {
            score: round1(score),
            general_pct: round1(general_pct),
            natal_pct: round1(natal_pct),
            label,
            stars: label.stars(),
        }
    }
}

/// Period-level digest of contextual scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SccSummary {
    pub count: usize,
    pub recommended: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub categories: BTreeMap<SccCategory, usize>,
}

impl SccSummary {
    pub fn from_scores<'a>(scores: impl IntoIterator<Item = &'a ContextualScore>) -> Option<Self> {
        let mut count = 0usize;
        let mut recommended = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut categories = BTreeMap::new();
        for s in scores {
            count += 1;
            if s.recommended {
                recommended += 1;
            }
            sum += s.scc;
            max = max.max(s.scc);
            min = min.min(s.scc);
            *categories.entry(s.category).or_insert(0) += 1;
        }
        (count > 0).then(|| SccSummary {
            count,
            recommended,
            mean: round1(sum / count as f64),
            max,
            min,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_is_identity_on_percent_range() {
        for v in [0.0, 12.5, 50.0, 99.9, 100.0] {
            assert!((absolute_pct(v, 0.0, 100.0) - v).abs() < 1e-9);
        }
        assert_eq!(absolute_pct(-7.0, -6.0, 10.0), 0.0);
        assert_eq!(absolute_pct(2.0, -6.0, 10.0), 50.0);
        assert_eq!(absolute_pct(11.0, -6.0, 10.0), 100.0);
    }

    #[test]
    fn test_percentile_rank_is_monotonic() {
        let sorted = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let mut last = -1.0;
        for i in 0..50 {
            let x = i as f64 * 0.1;
            let p = percentile_rank(x, &sorted);
            assert!(p >= last, "{} -> {} after {}", x, p, last);
            last = p;
        }
        assert_eq!(percentile_rank(0.5, &sorted), 0.0);
        assert!((percentile_rank(2.0, &sorted) - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(percentile_rank(3.5, &sorted), 100.0);
        // halfway between 1 and 2
        assert!((percentile_rank(1.5, &sorted) - 50.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ladder_used_without_reference() {
        let n = ContextualNormalizer::default();
        let s = n.contextual(3.0, &[]);
        assert_eq!(s.relative_pct, 95.0);
        assert_eq!(s.absolute_pct, 56.3);
        // 0.8 * 56.25 + 0.2 * 95
        assert_eq!(s.scc, 64.0);
        assert_eq!(s.category, SccCategory::Average);
        assert!(s.recommended);
        assert_eq!(n.contextual(-3.0, &[1.0]).relative_pct, 10.0);
    }

    #[test]
    fn test_not_recommended_reasons() {
        let n = ContextualNormalizer::default();
        let low = n.contextual(-5.0, &[]);
        assert!(!low.recommended);
        assert_eq!(low.reason.as_deref(), Some("absolute rooting very low"));
        assert_eq!(low.category, SccCategory::Limited);

        // absolute 37.5, relative 0 -> scc 30
        let mid = n.contextual(0.0, &[1.0, 2.0]);
        assert!(!mid.recommended);
        assert_eq!(mid.reason.as_deref(), Some("below threshold"));
    }

    #[test]
    fn test_hybrid_bands() {
        let n = ContextualNormalizer::default();
        let h = n.hybrid(30.0, 10.0);
        // general 20/30 -> 66.7, natal 100
        assert_eq!(h.general_pct, 66.7);
        assert_eq!(h.natal_pct, 100.0);
        assert_eq!(h.score, 76.7);
        assert_eq!(h.label, QualityLabel::VeryGood);
        assert_eq!(h.stars, 4);
        assert_eq!(n.hybrid(-5.0, -5.0).label, QualityLabel::Poor);
        assert_eq!(n.hybrid(40.0, 10.0).stars, 5);
    }

    #[test]
    fn test_summary() {
        let n = ContextualNormalizer::default();
        let scores = n.contextual_batch(&[1.0, 2.0, 3.0]);
        let summary = SccSummary::from_scores(&scores).unwrap();
        assert_eq!(summary.count, 3);
        assert!(summary.max >= summary.min);
        assert_eq!(summary.categories.values().sum::<usize>(), 3);
        assert!(SccSummary::from_scores(&[]).is_none());
    }
}
