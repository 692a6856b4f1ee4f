//! Deterministic mean-motion ephemeris.
//!
//! Each body advances at a constant daily rate from its J2000.0 mean longitude.
//! Good enough for offline demos, benches and tests that need reproducible
//! sky geometry; not a substitute for Swiss Ephemeris output.

use crate::ephemeris::provider::{EphemerisError, EphemerisProvider, JD_J2000};
use crate::ephemeris::types::{Body, PositionRow};
use std::collections::BTreeMap;

/// Longitude at epoch (deg) and mean daily motion (deg/day).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElement {
    pub longitude: f64,
    pub daily_motion: f64,
}

const DEFAULT_ELEMENTS: &[(Body, f64, f64)] = &[
    (Body::Sun, 280.460, 0.985_647_36),
    (Body::Moon, 218.316, 13.176_396_48),
    (Body::Mercury, 252.251, 4.092_334_45),
    (Body::Venus, 181.980, 1.602_130_34),
    (Body::Mars, 355.433, 0.524_020_68),
    (Body::Jupiter, 34.351, 0.083_085_29),
    (Body::Saturn, 50.077, 0.033_444_14),
    (Body::Uranus, 314.055, 0.011_730_53),
    (Body::Neptune, 304.349, 0.005_981_03),
    (Body::Pluto, 238.929, 0.003_968_05),
    (Body::MeanNode, 125.044, -0.052_953_77),
    (Body::TrueNode, 125.044, -0.052_953_77),
];

#[derive(Debug, Clone)]
pub struct MeanMotionEphemeris {
    epoch_jd: f64,
    elements: BTreeMap<Body, MeanElement>,
}

impl MeanMotionEphemeris {
    pub fn new() -> Self {
        let elements = DEFAULT_ELEMENTS
            .iter()
            .map(|(body, longitude, daily_motion)| {
                (
                    *body,
                    MeanElement {
                        longitude: *longitude,
                        daily_motion: *daily_motion,
                    },
                )
            })
            .collect();
        Self {
            epoch_jd: JD_J2000,
            elements,
        }
    }

    /// Model with no bodies; add them with [`with_body`](Self::with_body).
    pub fn empty(epoch_jd: f64) -> Self {
        Self {
            epoch_jd,
            elements: BTreeMap::new(),
        }
    }

    pub fn with_epoch(mut self, epoch_jd: f64) -> Self {
        self.epoch_jd = epoch_jd;
        self
    }

    /// Override (or add) a body: longitude at the epoch and daily motion.
    pub fn with_body(mut self, body: Body, longitude: f64, daily_motion: f64) -> Self {
        self.elements.insert(
            body,
            MeanElement {
                longitude,
                daily_motion,
            },
        );
        self
    }

    pub fn element(&self, body: Body) -> Option<MeanElement> {
        self.elements.get(&body).copied()
    }
}

impl Default for MeanMotionEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisProvider for MeanMotionEphemeris {
    fn position(&self, jd: f64, body: Body) -> Result<PositionRow, EphemerisError> {
        let element = self
            .elements
            .get(&body)
            .ok_or_else(|| EphemerisError::CalculationFailed {
                body,
                jd,
                message: "Body not modelled by mean-motion ephemeris".to_string(),
            })?;
        let lon = (element.longitude + element.daily_motion * (jd - self.epoch_jd)).rem_euclid(360.0);
        Ok([lon, 0.0, 1.0, element.daily_motion, 0.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_epoch() {
        let eph = MeanMotionEphemeris::new();
        let row = eph.position(JD_J2000, Body::Sun).unwrap();
        assert!((row[0] - 280.46).abs() < 1e-9);
        assert!(row[3] > 0.0);
    }

    #[test]
    fn test_node_moves_backwards() {
        let eph = MeanMotionEphemeris::new();
        let row = eph.position(JD_J2000 + 1.0, Body::MeanNode).unwrap();
        assert!(row[3] < 0.0);
        assert!(row[0] < 125.044);
    }

    #[test]
    fn test_unmodelled_body_fails() {
        let eph = MeanMotionEphemeris::empty(0.0).with_body(Body::Moon, 0.0, 13.0);
        assert!(eph.position(1.0, Body::Sun).is_err());
        let row = eph.position(1.0, Body::Moon).unwrap();
        assert!((row[0] - 13.0).abs() < 1e-12);
    }
}
