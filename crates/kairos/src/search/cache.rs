//! Session-scoped chart cache.
//!
//! A [`SearchSession`] owns one [`ChartCache`] for the lifetime of a single
//! coarse-to-fine search. The cache is filled between the two phases and only
//! read while phase 2 workers run, so it needs no locking.

use crate::ephemeris::{Body, GeoLocation, PositionBatch};
use crate::houses::{HouseBatch, HouseFrame};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// (instant, latitude, longitude) with the coordinates compared bitwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartKey {
    timestamp: i64,
    lat_bits: u64,
    lon_bits: u64,
}

impl ChartKey {
    pub fn new(instant: DateTime<Utc>, location: GeoLocation) -> Self {
        Self {
            timestamp: instant.timestamp(),
            lat_bits: location.lat.to_bits(),
            lon_bits: location.lon.to_bits(),
        }
    }
}

/// Positions and houses of a single instant, stored as one-row batches so the
/// batch rules can evaluate it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    pub instant: DateTime<Utc>,
    pub positions: PositionBatch,
    pub houses: HouseBatch,
}

impl ChartSnapshot {
    pub fn longitude(&self, body: Body) -> Option<f64> {
        self.positions.longitudes(body)?.first().copied()
    }

    pub fn frame(&self) -> Option<HouseFrame> {
        if self.houses.failed().first().copied().unwrap_or(true) {
            return None;
        }
        self.houses.frame_at(0)
    }

    /// True if any of `bodies` had to be zero-filled.
    pub fn is_degraded(&self, bodies: &[Body]) -> bool {
        bodies
            .iter()
            .any(|b| self.positions.get(*b).map_or(true, |t| t.is_degraded()))
    }
}

#[derive(Debug, Default)]
pub struct ChartCache {
    entries: HashMap<ChartKey, ChartSnapshot>,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ChartKey) -> Option<&ChartSnapshot> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: ChartKey, snapshot: ChartSnapshot) {
        self.entries.insert(key, snapshot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One search's worth of state. Dropped when the search returns.
#[derive(Debug)]
pub struct SearchSession {
    location: GeoLocation,
    cache: ChartCache,
}

impl SearchSession {
    pub fn new(location: GeoLocation) -> Self {
        Self {
            location,
            cache: ChartCache::new(),
        }
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn key(&self, instant: DateTime<Utc>) -> ChartKey {
        ChartKey::new(instant, self.location)
    }

    pub fn store(&mut self, snapshot: ChartSnapshot) {
        let key = self.key(snapshot.instant);
        self.cache.insert(key, snapshot);
    }

    pub fn lookup(&self, instant: DateTime<Utc>) -> Option<&ChartSnapshot> {
        self.cache.get(&self.key(instant))
    }

    pub fn cache(&self) -> &ChartCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::BodyTrack;
    use chrono::TimeZone;

    fn snapshot(instant: DateTime<Utc>, moon: f64) -> ChartSnapshot {
        let mut positions = PositionBatch::new(1);
        positions
            .insert(Body::Moon, BodyTrack::from_rows(vec![[moon, 0.0, 1.0, 13.0, 0.0, 0.0]]))
            .unwrap();
        ChartSnapshot {
            instant,
            positions,
            houses: HouseBatch::from_frames(&[HouseFrame::zeroed()], vec![true]),
        }
    }

    #[test]
    fn test_session_keys_by_instant_and_location() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut session = SearchSession::new(GeoLocation { lat: 40.4, lon: -3.7 });
        session.store(snapshot(t, 42.0));

        assert_eq!(session.lookup(t).and_then(|s| s.longitude(Body::Moon)), Some(42.0));
        assert!(session.lookup(t + chrono::Duration::minutes(1)).is_none());
        let other = ChartKey::new(t, GeoLocation { lat: 40.4, lon: -3.8 });
        assert!(session.cache().get(&other).is_none());
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_snapshot_views() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let snap = snapshot(t, 10.0);
        assert!(snap.frame().is_none());
        assert!(!snap.is_degraded(&[Body::Moon]));
        assert!(snap.is_degraded(&[Body::Sun]));
    }
}
