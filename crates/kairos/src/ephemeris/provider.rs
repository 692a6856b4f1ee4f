use crate::ephemeris::types::{Body, PositionRow};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian Day of J2000.0.
pub const JD_J2000: f64 = 2_451_545.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Failed to calculate position for {body} at JD {jd}: {message}")]
    CalculationFailed { body: Body, jd: f64, message: String },
    #[error("House calculation failed at JD {jd}: {message}")]
    HouseCalculationFailed { jd: f64, message: String },
}

/// Source of raw body positions.
///
/// Implementations answer one (instant, body) query at a time; batching and
/// failure absorption live in [`EphemerisAdapter`](crate::ephemeris::EphemerisAdapter).
pub trait EphemerisProvider: Send + Sync {
    /// Position row for `body` at Julian Day (UT) `jd`.
    fn position(&self, jd: f64, body: Body) -> Result<PositionRow, EphemerisError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position(&self, jd: f64, body: Body) -> Result<PositionRow, EphemerisError> {
        (**self).position(jd, body)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Box<P> {
    fn position(&self, jd: f64, body: Body) -> Result<PositionRow, EphemerisError> {
        (**self).position(jd, body)
    }
}

/// Convert UTC datetime to Julian Day (UT)
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    JD_UNIX_EPOCH + dt.timestamp_millis() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_of_j2000() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((datetime_to_julian_day(dt) - JD_J2000).abs() < 1e-9);
    }

    #[test]
    fn test_julian_day_advances_by_fraction() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let delta = datetime_to_julian_day(b) - datetime_to_julian_day(a);
        assert!((delta - 0.25).abs() < 1e-9);
    }
}
