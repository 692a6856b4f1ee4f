//! Fixed reference chart and transit-to-natal masks.
//!
//! A [`NatalReference`] is validated once and then only read. The masks in
//! this module are boundary conditions: the orchestrator turns them into
//! rejections or flags, never into points.

use crate::aspects::{exact_aspect_mask_to, Aspect};
use crate::config::AspectOrbs;
use crate::ephemeris::{Body, PositionBatch};
use crate::error::EngineError;
use crate::houses::house_of;
use crate::western::signs::Sign;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Key of a natal longitude: a body or one of the two angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NatalPoint {
    Body(Body),
    Ascendant,
    Midheaven,
}

impl fmt::Display for NatalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatalPoint::Body(b) => f.write_str(b.name()),
            NatalPoint::Ascendant => f.write_str("asc"),
            NatalPoint::Midheaven => f.write_str("mc"),
        }
    }
}

impl FromStr for NatalPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascendant" => Ok(NatalPoint::Ascendant),
            "mc" | "midheaven" => Ok(NatalPoint::Midheaven),
            other => other
                .parse::<Body>()
                .map(NatalPoint::Body)
                .map_err(|_| format!("Unknown natal point: {}", s)),
        }
    }
}

impl TryFrom<String> for NatalPoint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NatalPoint> for String {
    fn from(point: NatalPoint) -> Self {
        point.to_string()
    }
}

/// Natal chart as supplied in JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NatalChartInput {
    pub points: BTreeMap<NatalPoint, f64>,
    #[serde(default)]
    pub cusps: Option<Vec<f64>>,
}

/// Immutable natal longitudes, wrapped into [0, 360).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NatalReference {
    points: BTreeMap<NatalPoint, f64>,
    cusps: Option<[f64; 12]>,
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidNatal {
        message: message.into(),
    }
}

impl NatalReference {
    pub fn new(
        points: BTreeMap<NatalPoint, f64>,
        cusps: Option<[f64; 12]>,
    ) -> Result<Self, EngineError> {
        if let Some((point, lon)) = points.iter().find(|(_, l)| !l.is_finite()) {
            return Err(invalid(format!("{} has non-finite longitude {}", point, lon)));
        }
        if let Some(c) = cusps {
            if c.iter().any(|l| !l.is_finite()) {
                return Err(invalid("natal cusps must be finite"));
            }
        }
        Ok(Self {
            points: points
                .into_iter()
                .map(|(p, l)| (p, l.rem_euclid(360.0)))
                .collect(),
            cusps: cusps.map(|c| c.map(|l| l.rem_euclid(360.0))),
        })
    }

    pub fn from_input(input: NatalChartInput) -> Result<Self, EngineError> {
        let cusps = match input.cusps {
            None => None,
            Some(v) => {
                let len = v.len();
                let arr: [f64; 12] = v
                    .try_into()
                    .map_err(|_| invalid(format!("expected 12 natal cusps, got {}", len)))?;
                Some(arr)
            }
        };
        Self::new(input.points, cusps)
    }

    /// Parse `{"points": {"sun": 12.5, "asc": 100.0, ...}, "cusps": [...]}`.
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        let input: NatalChartInput =
            serde_json::from_str(text).map_err(|e| invalid(format!("bad natal JSON: {}", e)))?;
        Self::from_input(input)
    }

    pub fn get(&self, point: NatalPoint) -> Option<f64> {
        self.points.get(&point).copied()
    }

    pub fn body(&self, body: Body) -> Option<f64> {
        self.get(NatalPoint::Body(body))
    }

    pub fn ascendant(&self) -> Option<f64> {
        self.get(NatalPoint::Ascendant)
    }

    pub fn midheaven(&self) -> Option<f64> {
        self.get(NatalPoint::Midheaven)
    }

    pub fn ascendant_sign(&self) -> Option<Sign> {
        self.ascendant().map(Sign::of)
    }

    pub fn cusps(&self) -> Option<&[f64; 12]> {
        self.cusps.as_ref()
    }

    pub fn points(&self) -> impl Iterator<Item = (NatalPoint, f64)> + '_ {
        self.points.iter().map(|(p, l)| (*p, *l))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn or_into(mask: &mut [bool], hits: Vec<bool>) {
    for (m, h) in mask.iter_mut().zip(hits) {
        *m |= h;
    }
}

/// Transiting malefics in conjunction, square or opposition to natal lights.
pub fn hard_aspect_mask(
    positions: &PositionBatch,
    natal: &NatalReference,
    malefics: &[Body],
    lights: &[Body],
    orbs: &AspectOrbs,
) -> Vec<bool> {
    let mut mask = vec![false; positions.len()];
    for &malefic in malefics {
        let Some(lons) = positions.longitudes(malefic) else {
            continue;
        };
        for natal_lon in lights.iter().filter_map(|l| natal.body(*l)) {
            for aspect in Aspect::HARD {
                or_into(
                    &mut mask,
                    exact_aspect_mask_to(lons, natal_lon, aspect.angle(), orbs.orb(aspect)),
                );
            }
        }
    }
    mask
}

/// Transiting benefics in conjunction, sextile or trine to the natal Asc or MC.
pub fn benefic_angle_mask(
    positions: &PositionBatch,
    natal: &NatalReference,
    benefics: &[Body],
    orbs: &AspectOrbs,
) -> Vec<bool> {
    let mut mask = vec![false; positions.len()];
    let angles: Vec<f64> = [natal.ascendant(), natal.midheaven()]
        .into_iter()
        .flatten()
        .collect();
    for &benefic in benefics {
        let Some(lons) = positions.longitudes(benefic) else {
            continue;
        };
        for &angle_lon in &angles {
            for aspect in Aspect::SOFT {
                or_into(
                    &mut mask,
                    exact_aspect_mask_to(lons, angle_lon, aspect.angle(), orbs.orb(aspect)),
                );
            }
        }
    }
    mask
}

/// True where a transiting point falls in any of the given natal houses.
/// All false when the reference carries no cusps.
pub fn natal_house_mask(points: &[f64], natal: &NatalReference, houses: &[u8]) -> Vec<bool> {
    match natal.cusps() {
        Some(cusps) => points
            .iter()
            .map(|&p| houses.contains(&house_of(p, cusps)))
            .collect(),
        None => vec![false; points.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::BodyTrack;

    fn track(lons: &[f64]) -> BodyTrack {
        BodyTrack::from_rows(lons.iter().map(|&l| [l, 0.0, 1.0, 0.03, 0.0, 0.0]).collect())
    }

    fn natal_sun_aries() -> NatalReference {
        let mut points = BTreeMap::new();
        points.insert(NatalPoint::Body(Body::Sun), 0.0);
        NatalReference::new(points, None).unwrap()
    }

    #[test]
    fn test_saturn_sweep_over_natal_sun() {
        let natal = natal_sun_aries();
        let lons: Vec<f64> = (0..=300).map(|i| 345.0 + i as f64 * 0.1).collect();
        let mut positions = PositionBatch::new(lons.len());
        positions.insert(Body::Saturn, track(&lons)).unwrap();

        let mask = hard_aspect_mask(
            &positions,
            &natal,
            &[Body::Saturn],
            &[Body::Sun, Body::Moon],
            &AspectOrbs::default(),
        );
        for (lon, hit) in lons.iter().zip(&mask) {
            let sep = crate::aspects::separation(*lon, 0.0);
            assert_eq!(*hit, sep <= 8.0, "lon {}", lon);
        }
    }

    #[test]
    fn test_hard_orb_boundary() {
        let natal = natal_sun_aries();
        let mut positions = PositionBatch::new(4);
        positions
            .insert(Body::Saturn, track(&[8.0, 8.01, 352.0, 351.99]))
            .unwrap();
        let mask = hard_aspect_mask(
            &positions,
            &natal,
            &[Body::Saturn],
            &[Body::Sun],
            &AspectOrbs::default(),
        );
        assert_eq!(mask, vec![true, false, true, false]);
    }

    #[test]
    fn test_benefic_mask_needs_angles() {
        let mut points = BTreeMap::new();
        points.insert(NatalPoint::Ascendant, 100.0);
        let natal = NatalReference::new(points, None).unwrap();
        let mut positions = PositionBatch::new(3);
        positions
            .insert(Body::Venus, track(&[102.0, 160.0, 190.0]))
            .unwrap();
        let mask = benefic_angle_mask(&positions, &natal, &[Body::Venus], &AspectOrbs::default());
        assert_eq!(mask, vec![true, true, false]);
        let empty = benefic_angle_mask(
            &positions,
            &natal_sun_aries(),
            &[Body::Venus],
            &AspectOrbs::default(),
        );
        assert_eq!(empty, vec![false; 3]);
    }

    #[test]
    fn test_from_json() {
        let natal = NatalReference::from_json_str(
            r#"{"points": {"sun": 370.0, "Saturn": 280.5, "asc": 15.0, "mc": 285.0}}"#,
        )
        .unwrap();
        assert_eq!(natal.body(Body::Sun), Some(10.0));
        assert_eq!(natal.body(Body::Saturn), Some(280.5));
        assert_eq!(natal.ascendant_sign(), Some(Sign::Aries));
        assert!(natal.cusps().is_none());

        let bad = NatalReference::from_json_str(r#"{"points": {"vulcan": 1.0}}"#);
        assert!(matches!(bad, Err(EngineError::InvalidNatal { .. })));
        let short = NatalReference::from_json_str(r#"{"points": {}, "cusps": [0.0, 30.0]}"#);
        assert!(matches!(short, Err(EngineError::InvalidNatal { .. })));
    }

    #[test]
    fn test_natal_house_mask() {
        let cusps: [f64; 12] = std::array::from_fn(|i| 30.0 * i as f64);
        let natal = NatalReference::new(BTreeMap::new(), Some(cusps)).unwrap();
        // house 8 spans 210..240, house 12 spans 330..360
        let mask = natal_house_mask(&[215.0, 335.0, 100.0], &natal, &[8, 12]);
        assert_eq!(mask, vec![true, true, false]);
        let none = natal_house_mask(&[215.0], &natal_sun_aries(), &[8, 12]);
        assert_eq!(none, vec![false]);
    }
}
