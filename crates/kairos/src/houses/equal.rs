use crate::ephemeris::{EphemerisError, GeoLocation, JD_J2000};
use crate::houses::{HouseFrame, HouseProvider, HouseSystem};

/// Equal houses from a mean-sidereal-time Ascendant.
///
/// The MC is taken as the local sidereal angle and the Ascendant 90 degrees
/// ahead of it, ignoring obliquity and latitude. Pairs with
/// [`MeanMotionEphemeris`](crate::ephemeris::MeanMotionEphemeris) for offline runs;
/// the requested house system is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualHouses;

impl HouseProvider for EqualHouses {
    fn houses(
        &self,
        jd: f64,
        location: GeoLocation,
        _system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError> {
        if !jd.is_finite() || !location.lat.is_finite() || !location.lon.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                jd,
                message: "non-finite input".to_string(),
            });
        }
        let gmst = 280.460_618_37 + 360.985_647_366_29 * (jd - JD_J2000);
        let midheaven = (gmst + location.lon).rem_euclid(360.0);
        let ascendant = (midheaven + 90.0).rem_euclid(360.0);
        let cusps = std::array::from_fn(|i| (ascendant + 30.0 * i as f64).rem_euclid(360.0));
        Ok(HouseFrame {
            cusps,
            ascendant,
            midheaven,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascendant_turns_once_a_sidereal_day() {
        let loc = GeoLocation { lat: 40.0, lon: -3.7 };
        let a = EqualHouses.houses(JD_J2000, loc, HouseSystem::Equal).unwrap();
        let b = EqualHouses
            .houses(JD_J2000 + 0.997_269_566, loc, HouseSystem::Equal)
            .unwrap();
        let d = (a.ascendant - b.ascendant).abs();
        assert!(d.min(360.0 - d) < 0.01);
        assert!((a.cusps[0] - a.ascendant).abs() < 1e-9);
        assert!((a.cusps[6] - a.descendant()).abs() < 1e-9);
    }
}
