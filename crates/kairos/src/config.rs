//! Engine configuration.
//!
//! Every orb, point value, house set and threshold the rules use lives here so
//! deployments can retune the rule set without code changes. All sections
//! deserialize with defaults, so a partial TOML/JSON document is valid.

use crate::aspects::Aspect;
use crate::ephemeris::Body;
use crate::error::EngineError;
use crate::houses::HouseSystem;
use crate::search::topic::topic_house;
use crate::search::workers::WorkerStrategy;
use crate::western::signs::Sign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub house_system: HouseSystem,
    pub filters: FilterConfig,
    pub scoring: ScoringConfig,
    pub normalizer: NormalizerConfig,
    pub search: SearchConfig,
}

/// Orb per major aspect, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectOrbs {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
}

impl Default for AspectOrbs {
    fn default() -> Self {
        Self {
            conjunction: 8.0,
            sextile: 6.0,
            square: 8.0,
            trine: 8.0,
            opposition: 8.0,
        }
    }
}

impl AspectOrbs {
    pub fn orb(&self, aspect: Aspect) -> f64 {
        match aspect {
            Aspect::Conjunction => self.conjunction,
            Aspect::Sextile => self.sextile,
            Aspect::Square => self.square,
            Aspect::Trine => self.trine,
            Aspect::Opposition => self.opposition,
        }
    }

    /// `(aspect, orb)` pairs for a subset of aspects.
    pub fn pairs(&self, aspects: &[Aspect]) -> Vec<(Aspect, f64)> {
        aspects.iter().map(|&a| (a, self.orb(a))).collect()
    }

    fn values(&self) -> [f64; 5] {
        [
            self.conjunction,
            self.sextile,
            self.square,
            self.trine,
            self.opposition,
        ]
    }
}

/// Orbs for the flowing aspects the scoring rules reward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftOrbs {
    pub conjunction: f64,
    pub sextile: f64,
    pub trine: f64,
}

impl Default for SoftOrbs {
    fn default() -> Self {
        Self {
            conjunction: 8.0,
            sextile: 6.0,
            trine: 6.0,
        }
    }
}

impl SoftOrbs {
    pub fn pairs(&self) -> [(Aspect, f64); 3] {
        [
            (Aspect::Conjunction, self.conjunction),
            (Aspect::Sextile, self.sextile),
            (Aspect::Trine, self.trine),
        ]
    }
}

/// Boundary conditions. A candidate hitting any enabled filter is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub moon_forbidden_signs: Vec<Sign>,
    pub phase_orb: f64,
    pub void_of_course: bool,
    pub voc_bodies: Vec<Body>,
    /// Reject when the topic ruler is in detriment/fall or retrograde.
    pub topic_ruler_condition: bool,
    pub malefics: Vec<Body>,
    /// Malefic conjunction orb to Asc, MC, Desc and IC.
    pub malefic_angle_orb: f64,
    pub natal_hard_aspects: bool,
    pub natal_lights: Vec<Body>,
    pub natal_orbs: AspectOrbs,
    pub benefics: Vec<Body>,
    /// Natal houses the transiting Ascendant must not fall in.
    pub natal_reject_houses: Vec<u8>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            moon_forbidden_signs: vec![Sign::Scorpio, Sign::Capricorn],
            phase_orb: 8.0,
            void_of_course: true,
            voc_bodies: crate::aspects::VOC_BODIES.to_vec(),
            topic_ruler_condition: true,
            malefics: vec![Body::Mars, Body::Saturn],
            malefic_angle_orb: 5.0,
            natal_hard_aspects: true,
            natal_lights: vec![Body::Sun, Body::Moon],
            natal_orbs: AspectOrbs::default(),
            benefics: vec![Body::Venus, Body::Jupiter],
            natal_reject_houses: vec![8, 12],
        }
    }
}

/// What happens to the batch when a scoring rule returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Treat the failed component as zero and log a warning.
    #[default]
    Zero,
    /// Reject every instant with the `rule_failed` flag.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub moon: MoonRules,
    pub ruler: RulerRules,
    pub natal: NatalRules,
    pub combinations: CombinationRules,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonRules {
    pub favorable_signs: Vec<Sign>,
    pub sign_points: f64,
    pub waxing_points: f64,
    pub benefics: Vec<Body>,
    pub benefic_aspect_points: f64,
    pub sun_aspect_points: f64,
    pub favorable_houses: Vec<u8>,
    pub house_points: f64,
    pub ruler_aspect_points: f64,
    pub orbs: SoftOrbs,
}

impl Default for MoonRules {
    fn default() -> Self {
        Self {
            favorable_signs: vec![Sign::Cancer, Sign::Taurus],
            sign_points: 1.0,
            waxing_points: 1.0,
            benefics: vec![Body::Jupiter, Body::Venus],
            benefic_aspect_points: 1.0,
            sun_aspect_points: 1.0,
            favorable_houses: vec![5, 9, 10, 11],
            house_points: 1.0,
            ruler_aspect_points: 2.0,
            orbs: SoftOrbs::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerRules {
    pub domicile_points: f64,
    pub exaltation_points: f64,
    pub triplicity_points: f64,
    pub term_points: f64,
    pub direct_points: f64,
    pub not_combust_points: f64,
    pub combust_orb: f64,
    pub favorable_houses: Vec<u8>,
    pub house_points: f64,
    pub benefics: Vec<Body>,
    pub benefic_aspect_points: f64,
    pub orbs: SoftOrbs,
}

impl Default for RulerRules {
    fn default() -> Self {
        Self {
            domicile_points: 1.0,
            exaltation_points: 1.0,
            triplicity_points: 0.5,
            term_points: 0.5,
            direct_points: 1.0,
            not_combust_points: 1.0,
            combust_orb: 17.0,
            favorable_houses: vec![1, 10, 11, 9, 5],
            house_points: 1.0,
            benefics: vec![Body::Jupiter, Body::Venus],
            benefic_aspect_points: 1.0,
            orbs: SoftOrbs::default(),
        }
    }
}

/// Points for conjunction, trine and sextile, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPoints {
    pub conjunction: f64,
    pub trine: f64,
    pub sextile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatalRules {
    pub orb: f64,
    pub asc_malefics: Vec<Body>,
    pub asc_malefic_points: f64,
    pub asc_supports: Vec<Body>,
    pub asc_support_points: AspectPoints,
    pub asc_natal_asc_points: AspectPoints,
    pub mc_supports: Vec<Body>,
    pub mc_conjunction_points: f64,
    /// Natal house of the transiting Ascendant that costs `house_points`.
    pub penalized_house: u8,
    pub house_points: f64,
}

impl Default for NatalRules {
    fn default() -> Self {
        Self {
            orb: 5.0,
            asc_malefics: vec![Body::Saturn, Body::Mars],
            asc_malefic_points: -2.0,
            asc_supports: vec![Body::Sun, Body::Moon, Body::Venus, Body::Jupiter],
            asc_support_points: AspectPoints {
                conjunction: 2.0,
                trine: 1.0,
                sextile: 1.0,
            },
            asc_natal_asc_points: AspectPoints {
                conjunction: 2.0,
                trine: 1.0,
                sextile: 1.0,
            },
            mc_supports: vec![Body::Sun, Body::Moon, Body::Venus, Body::Jupiter],
            mc_conjunction_points: 1.0,
            penalized_house: 6,
            house_points: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinationRules {
    pub rulers_aspect_points: f64,
    pub orbs: SoftOrbs,
    pub topic_benefics: Vec<Body>,
    pub topic_benefic_points: f64,
    pub malefic_points: f64,
}

impl Default for CombinationRules {
    fn default() -> Self {
        Self {
            rulers_aspect_points: 2.0,
            orbs: SoftOrbs::default(),
            topic_benefics: vec![Body::Sun, Body::Jupiter, Body::Moon],
            topic_benefic_points: 2.0,
            malefic_points: -1.0,
        }
    }
}

/// Input to the contextual score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SccBasis {
    /// Natal group score.
    #[default]
    Rooting,
    /// Instant total.
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub absolute_min: f64,
    pub absolute_max: f64,
    pub absolute_weight: f64,
    pub relative_weight: f64,
    pub threshold: f64,
    pub low_absolute: f64,
    pub hybrid_general_max: f64,
    pub hybrid_natal_max: f64,
    pub hybrid_general_weight: f64,
    pub hybrid_natal_weight: f64,
    pub basis: SccBasis,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            absolute_min: -6.0,
            absolute_max: 10.0,
            absolute_weight: 0.8,
            relative_weight: 0.2,
            threshold: 40.0,
            low_absolute: 30.0,
            hybrid_general_max: 30.0,
            hybrid_natal_max: 10.0,
            hybrid_general_weight: 0.7,
            hybrid_natal_weight: 0.3,
            basis: SccBasis::Rooting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicPolicy {
    /// Unknown topics use `default_topic` with a warning.
    #[default]
    Fallback,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_topic: String,
    pub topic_policy: TopicPolicy,
    pub max_results: usize,
    pub coarse_step_minutes: i64,
    pub phase1: WorkerStrategy,
    pub phase2: WorkerStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_topic: "trabajo".to_string(),
            topic_policy: TopicPolicy::Fallback,
            max_results: 25,
            coarse_step_minutes: 30,
            phase1: WorkerStrategy::Partitioned { workers: 0 },
            phase2: WorkerStrategy::Queue { workers: 4 },
        }
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        message: message.into(),
    }
}

fn check_orb(name: &str, orb: f64) -> Result<(), EngineError> {
    if !orb.is_finite() || !(0.0..=180.0).contains(&orb) {
        return Err(invalid(format!("{} must be within 0..=180, got {}", name, orb)));
    }
    Ok(())
}

fn check_houses(name: &str, houses: &[u8]) -> Result<(), EngineError> {
    if let Some(h) = houses.iter().find(|h| !(1..=12).contains(*h)) {
        return Err(invalid(format!("{} contains house {} (must be 1..=12)", name, h)));
    }
    Ok(())
}

impl EngineConfig {
    /// Reject values no rule can work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        let f = &self.filters;
        check_orb("filters.phase_orb", f.phase_orb)?;
        check_orb("filters.malefic_angle_orb", f.malefic_angle_orb)?;
        for orb in f.natal_orbs.values() {
            check_orb("filters.natal_orbs", orb)?;
        }
        check_houses("filters.natal_reject_houses", &f.natal_reject_houses)?;

        let s = &self.scoring;
        for (name, orbs) in [
            ("scoring.moon.orbs", s.moon.orbs),
            ("scoring.ruler.orbs", s.ruler.orbs),
            ("scoring.combinations.orbs", s.combinations.orbs),
        ] {
            for (_, orb) in orbs.pairs() {
                check_orb(name, orb)?;
            }
        }
        check_orb("scoring.ruler.combust_orb", s.ruler.combust_orb)?;
        check_orb("scoring.natal.orb", s.natal.orb)?;
        check_houses("scoring.moon.favorable_houses", &s.moon.favorable_houses)?;
        check_houses("scoring.ruler.favorable_houses", &s.ruler.favorable_houses)?;
        check_houses("scoring.natal.penalized_house", &[s.natal.penalized_house])?;

        let n = &self.normalizer;
        if !(n.absolute_max > n.absolute_min) {
            return Err(invalid(format!(
                "normalizer.absolute_max ({}) must exceed absolute_min ({})",
                n.absolute_max, n.absolute_min
            )));
        }
        let weights = [
            n.absolute_weight,
            n.relative_weight,
            n.hybrid_general_weight,
            n.hybrid_natal_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("normalizer weights must be finite and non-negative"));
        }
        if !(n.hybrid_general_max > 0.0 && n.hybrid_natal_max > 0.0) {
            return Err(invalid("normalizer hybrid maxima must be positive"));
        }

        let search = &self.search;
        if search.max_results == 0 {
            return Err(invalid("search.max_results must be > 0"));
        }
        if search.coarse_step_minutes <= 0 {
            return Err(invalid(format!(
                "search.coarse_step_minutes must be > 0, got {}",
                search.coarse_step_minutes
            )));
        }
        if let WorkerStrategy::Queue { workers: 0 } = search.phase2 {
            return Err(invalid("search.phase2 queue needs at least one worker"));
        }
        if let WorkerStrategy::Queue { workers: 0 } = search.phase1 {
            return Err(invalid("search.phase1 queue needs at least one worker"));
        }
        if topic_house(&search.default_topic).is_none() {
            return Err(invalid(format!(
                "search.default_topic '{}' is not a known topic",
                search.default_topic
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.filters.natal_orbs.orb(Aspect::Sextile), 6.0);
        assert_eq!(config.scoring.ruler.triplicity_points, 0.5);
        assert_eq!(config.search.max_results, 25);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"filters": {"phase_orb": 6.0}, "normalizer": {"basis": "total"}}"#,
        )
        .unwrap();
        assert_eq!(config.filters.phase_orb, 6.0);
        assert!(config.filters.void_of_course);
        assert_eq!(config.normalizer.basis, SccBasis::Total);
        assert_eq!(config.normalizer.threshold, 40.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.filters.phase_orb = -1.0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig { .. })));

        let mut config = EngineConfig::default();
        config.scoring.moon.favorable_houses.push(13);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.normalizer.absolute_max = -6.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.search.default_topic = "astrology".to_string();
        assert!(config.validate().is_err());
    }
}
