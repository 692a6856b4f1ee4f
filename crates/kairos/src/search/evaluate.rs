//! Filter, score and assemble one batch of instants.
//!
//! Both strategies end up here: the vectorized path passes the whole grid,
//! the coarse-to-fine path passes one-row snapshots.

use crate::aspects::{
    exact_aspect_mask, gather_ruler, phase_mask, void_of_course_mask, Aspect, RulerTrack,
};
use crate::config::{EngineConfig, FailurePolicy, FilterConfig, SccBasis};
use crate::ephemeris::{Body, PositionBatch};
use crate::error::EngineError;
use crate::houses::HouseBatch;
use crate::natal::{benefic_angle_mask, hard_aspect_mask, natal_house_mask, NatalReference};
use crate::normalize::ContextualNormalizer;
use crate::scoring::{score_batch, ScoreGroup, ScoringContext};
use crate::search::result::{CandidateResult, Flag};
use crate::western::dignities::debility_mask_for;
use crate::western::signs::{sign_mask, Sign};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Everything one batch evaluation reads.
pub struct BatchInput<'a> {
    pub instants: &'a [DateTime<Utc>],
    pub positions: &'a PositionBatch,
    pub houses: &'a HouseBatch,
    pub natal: Option<&'a NatalReference>,
    pub topic_house: u8,
    pub config: &'a EngineConfig,
}

fn required<'a>(positions: &'a PositionBatch, body: Body) -> Result<&'a [f64], EngineError> {
    positions
        .longitudes(body)
        .ok_or_else(|| EngineError::invariant(format!("{} missing from position batch", body)))
}

/// Forbidden sign, phase and void-of-course masks. These are the only checks
/// the coarse pass runs.
pub fn moon_filter_masks(
    positions: &PositionBatch,
    filters: &FilterConfig,
) -> Result<Vec<(Flag, Vec<bool>)>, EngineError> {
    let sun = required(positions, Body::Sun)?;
    let moon = required(positions, Body::Moon)?;

    let mut masks = vec![
        (Flag::MoonForbiddenSign, sign_mask(moon, &filters.moon_forbidden_signs)),
        (Flag::MoonPhase, phase_mask(sun, moon, filters.phase_orb)),
    ];
    if filters.void_of_course {
        masks.push((
            Flag::MoonVoidOfCourse,
            void_of_course_mask(moon, positions, &filters.voc_bodies),
        ));
    }
    Ok(masks)
}

fn or_all(masks: impl IntoIterator<Item = Vec<bool>>, len: usize) -> Vec<bool> {
    let mut out = vec![false; len];
    for mask in masks {
        for (o, m) in out.iter_mut().zip(mask) {
            *o |= m;
        }
    }
    out
}

fn malefic_angle_mask(
    positions: &PositionBatch,
    houses: &HouseBatch,
    filters: &FilterConfig,
) -> Vec<bool> {
    let angles = [
        houses.ascendants(),
        houses.midheavens(),
        houses.descendants(),
        houses.imum_coeli(),
    ];
    let mut hits = Vec::new();
    for &malefic in &filters.malefics {
        let Some(lons) = positions.longitudes(malefic) else {
            log::debug!("Malefic {} not in batch; angle check skipped", malefic);
            continue;
        };
        for angle in &angles {
            hits.push(exact_aspect_mask(
                lons,
                angle,
                Aspect::Conjunction.angle(),
                filters.malefic_angle_orb,
            ));
        }
    }
    or_all(hits, houses.len())
}

fn topic_ruler_masks(ruler: &RulerTrack, filters: &FilterConfig) -> Vec<(Flag, Vec<bool>)> {
    if !filters.topic_ruler_condition {
        return Vec::new();
    }
    vec![
        (
            Flag::TopicRulerDebility,
            debility_mask_for(&ruler.ids, &ruler.longitudes),
        ),
        (
            Flag::TopicRulerRetrograde,
            ruler.speeds.iter().map(|&s| s < 0.0).collect(),
        ),
    ]
}

/// Evaluate a batch and return one row per instant, in input order.
///
/// Rows carry scores whether or not they pass the filters. The contextual
/// score is left empty; it depends on which rows the caller accepts.
pub fn evaluate_batch(input: &BatchInput<'_>) -> Result<Vec<CandidateResult>, EngineError> {
    let n = input.instants.len();
    if input.positions.len() != n || input.houses.len() != n {
        return Err(EngineError::invariant(format!(
            "batch shape mismatch: {} instants, {} position rows, {} house rows",
            n,
            input.positions.len(),
            input.houses.len()
        )));
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    let config = input.config;
    let filters = &config.filters;
    let moon = required(input.positions, Body::Moon)?;

    let ascendants = input.houses.ascendants();
    let topic_cusps = input.houses.cusp_column(input.topic_house);
    let asc_ruler = gather_ruler(&ascendants, input.positions)
        .map_err(|e| EngineError::invariant(e.to_string()))?;
    let topic_ruler = gather_ruler(&topic_cusps, input.positions)
        .map_err(|e| EngineError::invariant(e.to_string()))?;

    let mut rejections = moon_filter_masks(input.positions, filters)?;
    rejections.extend(topic_ruler_masks(&topic_ruler, filters));
    rejections.push((
        Flag::MaleficOnAngle,
        malefic_angle_mask(input.positions, input.houses, filters),
    ));
    let mut notes = Vec::new();
    if let Some(natal) = input.natal {
        if filters.natal_hard_aspects {
            rejections.push((
                Flag::NatalHardAspect,
                hard_aspect_mask(
                    input.positions,
                    natal,
                    &filters.malefics,
                    &filters.natal_lights,
                    &filters.natal_orbs,
                ),
            ));
        }
        rejections.push((
            Flag::NatalAscHouse,
            natal_house_mask(&ascendants, natal, &filters.natal_reject_houses),
        ));
        notes.push((
            Flag::NatalBeneficSupport,
            benefic_angle_mask(input.positions, natal, &filters.benefics, &filters.natal_orbs),
        ));
    }
    rejections.push((Flag::HouseFailure, input.houses.failed().to_vec()));

    let degraded = input.positions.degraded_bodies();
    if !degraded.is_empty() {
        log::warn!("Batch of {} instants uses zero-filled bodies: {:?}", n, degraded);
        notes.push((Flag::EphemerisDegraded, vec![true; n]));
    }

    let ctx = ScoringContext {
        positions: input.positions,
        houses: input.houses,
        asc_ruler: &asc_ruler,
        topic_ruler: &topic_ruler,
        topic_house: input.topic_house,
        natal: input.natal,
        config: &config.scoring,
    };
    let board = score_batch(&ctx);
    let rule_failed =
        config.scoring.failure_policy == FailurePolicy::Reject && !board.failures().is_empty();
    if rule_failed {
        log::warn!(
            "{} scoring rules failed; rejecting all {} instants",
            board.failures().len(),
            n
        );
    }

    let total = board.total();
    let positive = board.positive();
    let negative = board.negative();
    let groups: Vec<(ScoreGroup, Vec<f64>)> = ScoreGroup::ALL
        .iter()
        .map(|&g| (g, board.group_total(g)))
        .collect();
    let normalizer = ContextualNormalizer::new(config.normalizer.clone());
    let house_failed = input.houses.failed();

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let mut flags: Vec<Flag> = rejections
            .iter()
            .chain(&notes)
            .filter(|(_, mask)| mask.get(i).copied().unwrap_or(false))
            .map(|(flag, _)| *flag)
            .collect();
        if rule_failed {
            flags.push(Flag::RuleFailed);
        }
        flags.sort();

        // Zero cusps put every body in every house; a failed row scores nothing.
        let scored = !house_failed.get(i).copied().unwrap_or(false);
        let pick = |values: &[f64]| if scored { values[i] } else { 0.0 };
        let group_map: BTreeMap<ScoreGroup, f64> =
            groups.iter().map(|(g, values)| (*g, pick(values))).collect();
        let natal_score = group_map.get(&ScoreGroup::Natal).copied().unwrap_or(0.0);
        let row_total = pick(&total);

        rows.push(CandidateResult {
            instant: input.instants[i],
            is_valid: !flags.iter().any(|f| f.is_rejection()),
            flags,
            moon_sign: Sign::of(moon[i]),
            asc_sign: Sign::of(ascendants[i]),
            asc_ruler: asc_ruler.ids[i],
            topic_ruler: topic_ruler.ids[i],
            score_total: row_total,
            score_general: row_total - natal_score,
            score_natal: natal_score,
            score_positive: pick(&positive),
            score_negative: pick(&negative),
            groups: group_map,
            hybrid: normalizer.hybrid(row_total, natal_score),
            contextual: None,
            components: if scored { board.nonzero_at(i) } else { BTreeMap::new() },
        });
    }
    Ok(rows)
}

/// Value the contextual score is computed from.
pub fn scc_input(row: &CandidateResult, basis: SccBasis) -> f64 {
    match basis {
        SccBasis::Rooting => row.score_natal,
        SccBasis::Total => row.score_total,
    }
}

/// Attach contextual scores to every row, using the valid rows as reference.
pub fn apply_contextual(rows: &mut [CandidateResult], normalizer: &ContextualNormalizer) {
    let basis = normalizer.config().basis;
    let mut reference: Vec<f64> = rows
        .iter()
        .filter(|r| r.is_valid)
        .map(|r| scc_input(r, basis))
        .collect();
    reference.sort_by(f64::total_cmp);
    for row in rows.iter_mut() {
        let value = scc_input(row, basis);
        row.contextual = Some(normalizer.contextual_sorted(value, &reference));
    }
}
