//! Coarse-to-fine search.
//!
//! Phase 1 screens every coarse instant with the critical Moon checks only.
//! Survivors are cached in the session and re-evaluated with the full rule
//! set in phase 2. Slower than the vectorized path; kept as a reference that
//! exercises the same rules one instant at a time.

use crate::config::FilterConfig;
use crate::ephemeris::{Body, EphemerisProvider};
use crate::error::EngineError;
use crate::houses::HouseProvider;
use crate::normalize::ContextualNormalizer;
use crate::search::cache::{ChartSnapshot, SearchSession};
use crate::search::evaluate::{apply_contextual, evaluate_batch, moon_filter_masks, BatchInput};
use crate::search::grid::InstantGrid;
use crate::search::orchestrator::{SearchOrchestrator, SearchRequest};
use crate::search::result::{rank, CandidateResult};
use crate::search::topic::Topic;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Phase 1 verdict. Anything that cannot be evaluated passes.
fn passes_critical(snapshot: &ChartSnapshot, filters: &FilterConfig) -> bool {
    if snapshot.is_degraded(&[Body::Sun, Body::Moon]) {
        log::debug!("{}: Sun/Moon unavailable, passing", snapshot.instant);
        return true;
    }
    match moon_filter_masks(&snapshot.positions, filters) {
        Ok(masks) => !masks
            .iter()
            .any(|(_, mask)| mask.first().copied().unwrap_or(false)),
        Err(e) => {
            log::warn!("{}: critical checks failed ({}), passing", snapshot.instant, e);
            true
        }
    }
}

pub(crate) fn coarse_to_fine<E: EphemerisProvider, H: HouseProvider>(
    orchestrator: &SearchOrchestrator<E, H>,
    request: &SearchRequest,
    topic: Topic,
) -> Result<Vec<CandidateResult>, EngineError> {
    let config = orchestrator.config();
    let grid = InstantGrid::inclusive(request.start, request.end, config.search.coarse_step_minutes)?;
    log::info!(
        "Phase 1: {} instants every {} min ({} workers)",
        grid.len(),
        grid.step_minutes(),
        config.search.phase1.workers()
    );

    let screened = config.search.phase1.run(grid.instants().to_vec(), |instant| {
        let snapshot = orchestrator.snapshot(instant, request.location);
        let pass = passes_critical(&snapshot, &config.filters);
        (snapshot, pass)
    });

    let mut session = SearchSession::new(request.location);
    let mut survivors = Vec::new();
    for (snapshot, pass) in screened {
        if pass {
            survivors.push(snapshot.instant);
            session.store(snapshot);
        }
    }
    log::info!(
        "Phase 2: {} survivors ({} workers)",
        survivors.len(),
        config.search.phase2.workers()
    );

    let session = &session;
    let evaluated = config.search.phase2.run(survivors, |instant| {
        let Some(snapshot) = session.lookup(instant) else {
            log::error!("{}: missing from session cache", instant);
            return None;
        };
        let result = evaluate_batch(&BatchInput {
            instants: std::slice::from_ref(&snapshot.instant),
            positions: &snapshot.positions,
            houses: &snapshot.houses,
            natal: request.natal.as_ref(),
            topic_house: topic.house,
            config,
        });
        match result {
            Ok(mut rows) => rows.pop(),
            Err(e) => {
                log::warn!("{}: evaluation failed: {}", instant, e);
                None
            }
        }
    });

    let rows: Vec<CandidateResult> = evaluated.into_iter().flatten().collect();
    let ranked = finalize(
        rows,
        orchestrator.normalizer(),
        config.search.max_results,
    );
    log::info!("Coarse-to-fine search returned {} candidates", ranked.len());
    Ok(ranked)
}

/// Post-processing of phase 2 output, which arrives in completion order.
pub fn finalize(
    mut rows: Vec<CandidateResult>,
    normalizer: &ContextualNormalizer,
    max_results: usize,
) -> Vec<CandidateResult> {
    rows.sort_by_key(|r| r.instant);
    rows.retain(|r| r.is_valid);
    apply_contextual(&mut rows, normalizer);

    let mut by_minute: BTreeMap<i64, CandidateResult> = BTreeMap::new();
    for row in rows {
        match by_minute.entry(row.minute_key()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if row.score_total > slot.get().score_total {
                    slot.insert(row);
                }
            }
        }
    }

    let mut out: Vec<CandidateResult> = by_minute.into_values().collect();
    rank(&mut out);
    out.truncate(max_results);
    out
}
