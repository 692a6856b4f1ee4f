use crate::config::EngineConfig;
use crate::ephemeris::{Body, EphemerisAdapter, EphemerisProvider, GeoLocation};
use crate::error::EngineError;
use crate::houses::{HouseCalculator, HouseProvider};
use crate::natal::NatalReference;
use crate::normalize::ContextualNormalizer;
use crate::search::cache::ChartSnapshot;
use crate::search::evaluate::{apply_contextual, evaluate_batch, BatchInput};
use crate::search::grid::InstantGrid;
use crate::search::legacy;
use crate::search::result::CandidateResult;
use crate::search::topic::{resolve_topic, Topic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How `find` walks the date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One batch over the whole grid.
    #[default]
    Vectorized,
    /// Per-instant two-phase search with worker pools.
    CoarseToFine,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: GeoLocation,
    pub natal: Option<NatalReference>,
    pub topic: String,
    pub step_minutes: i64,
    /// Keep rejected rows (vectorized strategy only).
    pub return_all: bool,
    pub strategy: Strategy,
}

impl SearchRequest {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, location: GeoLocation) -> Self {
        Self {
            start,
            end,
            location,
            natal: None,
            topic: "trabajo".to_string(),
            step_minutes: 60,
            return_all: false,
            strategy: Strategy::Vectorized,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_step(mut self, minutes: i64) -> Self {
        self.step_minutes = minutes;
        self
    }

    pub fn with_natal(mut self, natal: NatalReference) -> Self {
        self.natal = Some(natal);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_return_all(mut self, return_all: bool) -> Self {
        self.return_all = return_all;
        self
    }
}

/// Every body some enabled rule reads.
fn required_bodies(config: &EngineConfig) -> Vec<Body> {
    let f = &config.filters;
    let s = &config.scoring;
    let mut bodies: BTreeSet<Body> = Body::REQUIRED.into_iter().collect();
    for set in [
        &f.voc_bodies,
        &f.malefics,
        &f.benefics,
        &s.moon.benefics,
        &s.ruler.benefics,
        &s.natal.asc_malefics,
        &s.natal.asc_supports,
        &s.natal.mc_supports,
        &s.combinations.topic_benefics,
    ] {
        bodies.extend(set.iter().copied());
    }
    bodies.into_iter().collect()
}

/// Entry point of the engine: owns the providers and the validated config.
pub struct SearchOrchestrator<E, H> {
    ephemeris: EphemerisAdapter<E>,
    houses: HouseCalculator<H>,
    config: EngineConfig,
    normalizer: ContextualNormalizer,
    bodies: Vec<Body>,
}

impl<E: EphemerisProvider, H: HouseProvider> SearchOrchestrator<E, H> {
    pub fn new(ephemeris: E, houses: H, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let bodies = required_bodies(&config);
        log::debug!("Search bodies: {:?}", bodies);
        Ok(Self {
            ephemeris: EphemerisAdapter::new(ephemeris),
            houses: HouseCalculator::new(houses, config.house_system),
            normalizer: ContextualNormalizer::new(config.normalizer.clone()),
            config,
            bodies,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &ContextualNormalizer {
        &self.normalizer
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Search `request` with the strategy it names.
    pub fn find(&self, request: &SearchRequest) -> Result<Vec<CandidateResult>, EngineError> {
        let topic = resolve_topic(&request.topic, &self.config.search)?;
        match request.strategy {
            Strategy::Vectorized => self.find_vectorized(request, topic),
            Strategy::CoarseToFine => legacy::coarse_to_fine(self, request, topic),
        }
    }

    fn find_vectorized(
        &self,
        request: &SearchRequest,
        topic: Topic,
    ) -> Result<Vec<CandidateResult>, EngineError> {
        let grid = InstantGrid::new(request.start, request.end, request.step_minutes)?;
        log::info!(
            "Analyzing {} instants every {} min for '{}' (house {})",
            grid.len(),
            grid.step_minutes(),
            topic.key,
            topic.house
        );

        let positions = self.ephemeris.calc_positions(grid.instants(), &self.bodies);
        let houses = self.houses.calc_houses(grid.instants(), request.location);
        let mut rows = evaluate_batch(&BatchInput {
            instants: grid.instants(),
            positions: &positions,
            houses: &houses,
            natal: request.natal.as_ref(),
            topic_house: topic.house,
            config: &self.config,
        })?;
        apply_contextual(&mut rows, &self.normalizer);

        let accepted = rows.iter().filter(|r| r.is_valid).count();
        log::info!("{} of {} instants pass the filters", accepted, rows.len());
        if !request.return_all {
            rows.retain(|r| r.is_valid);
        }
        Ok(rows)
    }

    /// Positions and houses of one instant as one-row batches.
    pub fn snapshot(&self, instant: DateTime<Utc>, location: GeoLocation) -> ChartSnapshot {
        ChartSnapshot {
            instant,
            positions: self.ephemeris.calc_positions(&[instant], &self.bodies),
            houses: self.houses.calc_houses(&[instant], location),
        }
    }
}
