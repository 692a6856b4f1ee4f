//! Batched house cusps and angles for a fixed location.
//!
//! House geometry is not vectorizable at the primitive level, so the
//! [`HouseCalculator`] loops over instants and assembles fixed-shape arrays.
//! A failed instant gets a zero row and a `failed` flag; its neighbours are
//! never touched.

pub mod equal;

pub use equal::EqualHouses;

use crate::ephemeris::{datetime_to_julian_day, EphemerisError, GeoLocation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    WholeSign,
    Koch,
    Equal,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
}

/// House system mapping
const HOUSE_SYSTEMS: &[(HouseSystem, &str, u8)] = &[
    (HouseSystem::Placidus, "placidus", b'P'),
    (HouseSystem::WholeSign, "whole_sign", b'W'),
    (HouseSystem::Koch, "koch", b'K'),
    (HouseSystem::Equal, "equal", b'E'),
    (HouseSystem::Regiomontanus, "regiomontanus", b'R'),
    (HouseSystem::Campanus, "campanus", b'C'),
    (HouseSystem::Alcabitius, "alcabitius", b'A'),
    (HouseSystem::Morinus, "morinus", b'M'),
];

impl HouseSystem {
    /// Swiss Ephemeris house system byte.
    pub fn code(self) -> u8 {
        HOUSE_SYSTEMS
            .iter()
            .find(|(s, _, _)| *s == self)
            .map(|(_, _, b)| *b)
            .unwrap_or(b'P')
    }

    pub fn name(self) -> &'static str {
        HOUSE_SYSTEMS
            .iter()
            .find(|(s, _, _)| *s == self)
            .map(|(_, n, _)| *n)
            .unwrap_or("placidus")
    }
}

impl FromStr for HouseSystem {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        HOUSE_SYSTEMS
            .iter()
            .find(|(_, name, code)| *name == lower || (lower.len() == 1 && lower.as_bytes()[0].to_ascii_uppercase() == *code))
            .map(|(system, _, _)| *system)
            .ok_or_else(|| EphemerisError::InvalidHouseSystem {
                system: s.to_string(),
                valid: HOUSE_SYSTEMS.iter().map(|(_, name, _)| name.to_string()).collect(),
            })
    }
}

/// Cusps and angles at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseFrame {
    /// Cusp 1..12 longitudes
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

impl HouseFrame {
    pub fn zeroed() -> Self {
        Self {
            cusps: [0.0; 12],
            ascendant: 0.0,
            midheaven: 0.0,
        }
    }

    pub fn descendant(&self) -> f64 {
        (self.ascendant + 180.0).rem_euclid(360.0)
    }

    pub fn imum_coeli(&self) -> f64 {
        (self.midheaven + 180.0).rem_euclid(360.0)
    }
}

/// External house-geometry primitive.
pub trait HouseProvider: Send + Sync {
    fn houses(
        &self,
        jd: f64,
        location: GeoLocation,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError>;
}

impl<P: HouseProvider + ?Sized> HouseProvider for &P {
    fn houses(
        &self,
        jd: f64,
        location: GeoLocation,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError> {
        (**self).houses(jd, location, system)
    }
}

impl<P: HouseProvider + ?Sized> HouseProvider for Box<P> {
    fn houses(
        &self,
        jd: f64,
        location: GeoLocation,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError> {
        (**self).houses(jd, location, system)
    }
}

/// N x 12 cusps, N x 2 angles (Asc, MC) and a per-instant failure mask.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HouseBatch {
    cusps: Vec<[f64; 12]>,
    angles: Vec<[f64; 2]>,
    failed: Vec<bool>,
}

impl HouseBatch {
    pub fn from_frames(frames: &[HouseFrame], failed: Vec<bool>) -> Self {
        debug_assert_eq!(frames.len(), failed.len());
        Self {
            cusps: frames.iter().map(|f| f.cusps).collect(),
            angles: frames.iter().map(|f| [f.ascendant, f.midheaven]).collect(),
            failed,
        }
    }

    pub fn len(&self) -> usize {
        self.cusps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cusps.is_empty()
    }

    pub fn cusps(&self) -> &[[f64; 12]] {
        &self.cusps
    }

    pub fn angles(&self) -> &[[f64; 2]] {
        &self.angles
    }

    /// True where the provider failed and the row holds fallback zeros.
    pub fn failed(&self) -> &[bool] {
        &self.failed
    }

    pub fn frame_at(&self, index: usize) -> Option<HouseFrame> {
        let cusps = *self.cusps.get(index)?;
        let [ascendant, midheaven] = *self.angles.get(index)?;
        Some(HouseFrame {
            cusps,
            ascendant,
            midheaven,
        })
    }

    /// Cusp longitudes of `house` (1..=12) at every instant.
    pub fn cusp_column(&self, house: u8) -> Vec<f64> {
        let idx = (house.clamp(1, 12) - 1) as usize;
        self.cusps.iter().map(|c| c[idx]).collect()
    }

    pub fn ascendants(&self) -> Vec<f64> {
        self.angles.iter().map(|a| a[0]).collect()
    }

    pub fn midheavens(&self) -> Vec<f64> {
        self.angles.iter().map(|a| a[1]).collect()
    }

    pub fn descendants(&self) -> Vec<f64> {
        self.angles.iter().map(|a| (a[0] + 180.0).rem_euclid(360.0)).collect()
    }

    pub fn imum_coeli(&self) -> Vec<f64> {
        self.angles.iter().map(|a| (a[1] + 180.0).rem_euclid(360.0)).collect()
    }
}

/// Batches a [`HouseProvider`] over an instant grid.
pub struct HouseCalculator<P> {
    provider: P,
    system: HouseSystem,
}

impl<P: HouseProvider> HouseCalculator<P> {
    pub fn new(provider: P, system: HouseSystem) -> Self {
        Self { provider, system }
    }

    pub fn system(&self) -> HouseSystem {
        self.system
    }

    pub fn calc_houses(&self, instants: &[DateTime<Utc>], location: GeoLocation) -> HouseBatch {
        let jds: Vec<f64> = instants.iter().map(|t| datetime_to_julian_day(*t)).collect();
        self.calc_houses_jd(&jds, location)
    }

    pub fn calc_houses_jd(&self, jds: &[f64], location: GeoLocation) -> HouseBatch {
        let mut frames = Vec::with_capacity(jds.len());
        let mut failed = Vec::with_capacity(jds.len());
        for &jd in jds {
            match self.calc_frame(jd, location) {
                Ok(frame) => {
                    frames.push(frame);
                    failed.push(false);
                }
                Err(e) => {
                    log::error!("House calculation failed at JD {:.5}: {}", jd, e);
                    frames.push(HouseFrame::zeroed());
                    failed.push(true);
                }
            }
        }
        HouseBatch::from_frames(&frames, failed)
    }

    /// One instant, for per-instant callers such as the coarse-to-fine search.
    pub fn calc_frame(&self, jd: f64, location: GeoLocation) -> Result<HouseFrame, EphemerisError> {
        self.provider.houses(jd, location, self.system)
    }
}

fn in_sector(lon: f64, start: f64, end: f64) -> bool {
    if start < end {
        lon >= start && lon < end
    } else {
        lon >= start || lon < end
    }
}

/// House number (1..=12) containing `lon`.
pub fn house_of(lon: f64, cusps: &[f64; 12]) -> u8 {
    let lon = lon.rem_euclid(360.0);
    (0..12)
        .find(|&i| in_sector(lon, cusps[i], cusps[(i + 1) % 12]))
        .map(|i| i as u8 + 1)
        .unwrap_or(1)
}

/// True where `lons[k]` lies inside `house` (1..=12) of row k.
pub fn in_house_mask(lons: &[f64], cusps: &[[f64; 12]], house: u8) -> Vec<bool> {
    let idx = (house.clamp(1, 12) - 1) as usize;
    let next = (idx + 1) % 12;
    lons.iter()
        .zip(cusps)
        .map(|(&lon, c)| in_sector(lon.rem_euclid(360.0), c[idx], c[next]))
        .collect()
}

/// True where `lons[k]` lies in any of `houses`.
pub fn in_houses_mask(lons: &[f64], cusps: &[[f64; 12]], houses: &[u8]) -> Vec<bool> {
    let mut mask = vec![false; lons.len()];
    for &house in houses {
        for (m, hit) in mask.iter_mut().zip(in_house_mask(lons, cusps, house)) {
            *m |= hit;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_cusps(asc: f64) -> [f64; 12] {
        std::array::from_fn(|i| (asc + 30.0 * i as f64).rem_euclid(360.0))
    }

    #[test]
    fn test_house_system_parsing() {
        assert_eq!("placidus".parse::<HouseSystem>(), Ok(HouseSystem::Placidus));
        assert_eq!("W".parse::<HouseSystem>(), Ok(HouseSystem::WholeSign));
        assert!(matches!(
            "topocentric".parse::<HouseSystem>(),
            Err(EphemerisError::InvalidHouseSystem { .. })
        ));
        assert_eq!(HouseSystem::default().code(), b'P');
    }

    #[test]
    fn test_house_of_handles_wrap() {
        let cusps = equal_cusps(350.0);
        assert_eq!(house_of(355.0, &cusps), 1);
        assert_eq!(house_of(5.0, &cusps), 1);
        assert_eq!(house_of(20.0, &cusps), 2);
        assert_eq!(house_of(349.0, &cusps), 12);
    }

    #[test]
    fn test_in_house_mask_rows() {
        let cusps = vec![equal_cusps(0.0), equal_cusps(90.0)];
        let mask = in_house_mask(&[275.0, 275.0], &cusps, 10);
        assert_eq!(mask, vec![true, false]);
        let any = in_houses_mask(&[275.0, 275.0], &cusps, &[10, 7]);
        assert_eq!(any, vec![true, true]);
    }

    struct FailsAt(f64);

    impl HouseProvider for FailsAt {
        fn houses(&self, jd: f64, _: GeoLocation, _: HouseSystem) -> Result<HouseFrame, EphemerisError> {
            if jd == self.0 {
                return Err(EphemerisError::HouseCalculationFailed {
                    jd,
                    message: "polar latitude".to_string(),
                });
            }
            Ok(HouseFrame {
                cusps: equal_cusps(jd),
                ascendant: jd,
                midheaven: (jd + 270.0) % 360.0,
            })
        }
    }

    #[test]
    fn test_failed_instant_keeps_neighbours() {
        let calc = HouseCalculator::new(FailsAt(2.0), HouseSystem::Placidus);
        let batch = calc.calc_houses_jd(&[1.0, 2.0, 3.0], GeoLocation { lat: 0.0, lon: 0.0 });
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.failed(), &[false, true, false]);
        assert_eq!(batch.cusps()[1], [0.0; 12]);
        assert_eq!(batch.ascendants(), vec![1.0, 0.0, 3.0]);
        assert_eq!(batch.cusps()[2], equal_cusps(3.0));
        assert_eq!(batch.descendants()[0], 181.0);
    }
}
