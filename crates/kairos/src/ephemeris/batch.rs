use crate::ephemeris::provider::{datetime_to_julian_day, EphemerisProvider};
use crate::ephemeris::types::{Body, BodyTrack, PositionBatch};
use chrono::{DateTime, Utc};

/// Batched position retrieval over an instant grid.
///
/// A body that fails at any instant is replaced by a zero-filled track so the
/// batch keeps its shape; the failure is logged and visible through
/// [`PositionBatch::degraded_bodies`].
pub struct EphemerisAdapter<P> {
    provider: P,
}

impl<P: EphemerisProvider> EphemerisAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Positions of `bodies` at every instant.
    pub fn calc_positions(&self, instants: &[DateTime<Utc>], bodies: &[Body]) -> PositionBatch {
        let jds: Vec<f64> = instants.iter().map(|t| datetime_to_julian_day(*t)).collect();
        self.calc_positions_jd(&jds, bodies)
    }

    /// Same as [`calc_positions`](Self::calc_positions) for pre-converted Julian Days.
    pub fn calc_positions_jd(&self, jds: &[f64], bodies: &[Body]) -> PositionBatch {
        let mut batch = PositionBatch::new(jds.len());
        for &body in bodies {
            let track = match self.calc_track(jds, body) {
                Ok(track) => track,
                Err(e) => {
                    log::error!("Ephemeris failure for {}: {} (zero-filled)", body, e);
                    BodyTrack::zeroed(jds.len())
                }
            };
            // calc_track always yields jds.len() rows
            let inserted = batch.insert(body, track);
            debug_assert!(inserted.is_ok(), "track length for {} differs from batch", body);
        }
        batch
    }

    fn calc_track(
        &self,
        jds: &[f64],
        body: Body,
    ) -> Result<BodyTrack, crate::ephemeris::EphemerisError> {
        let mut rows = Vec::with_capacity(jds.len());
        for &jd in jds {
            let mut row = self.provider.position(jd, body)?;
            row[0] = row[0].rem_euclid(360.0);
            rows.push(row);
        }
        Ok(BodyTrack::from_rows(rows))
    }
}
