//! Dignity and debility masks over longitude arrays.
//!
//! The fixed-body masks answer "is this body strong/weak here" for one body.
//! The `*_for` variants take a per-instant body array, as produced by the
//! ruler gather, and evaluate each instant against its own body.

use crate::ephemeris::Body;
use crate::western::rulers::{
    detriments_of, exaltation_of, fall_of, ruler_of, term_ruler, triplicity_rulers,
};
use crate::western::signs::Sign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DignityType {
    Rulership,
    Exaltation,
    Detriment,
    Fall,
}

/// Essential dignity or debility of `body` at `longitude`, if any.
pub fn dignity_of(body: Body, longitude: f64) -> Option<DignityType> {
    let sign = Sign::of(longitude);
    if ruler_of(sign) == body {
        Some(DignityType::Rulership)
    } else if exaltation_of(body) == Some(sign) {
        Some(DignityType::Exaltation)
    } else if detriments_of(body).contains(&sign) {
        Some(DignityType::Detriment)
    } else if fall_of(body) == Some(sign) {
        Some(DignityType::Fall)
    } else {
        None
    }
}

/// True where `body` is in a sign it rules or is exalted in.
pub fn dignity_mask(body: Body, longitudes: &[f64]) -> Vec<bool> {
    longitudes
        .iter()
        .map(|&l| {
            matches!(
                dignity_of(body, l),
                Some(DignityType::Rulership | DignityType::Exaltation)
            )
        })
        .collect()
}

/// True where `body` is in its detriment or fall.
pub fn debility_mask(body: Body, longitudes: &[f64]) -> Vec<bool> {
    longitudes
        .iter()
        .map(|&l| {
            let sign = Sign::of(l);
            detriments_of(body).contains(&sign) || fall_of(body) == Some(sign)
        })
        .collect()
}

/// Per-instant domicile check for a varying body.
pub fn domicile_mask_for(bodies: &[Body], longitudes: &[f64]) -> Vec<bool> {
    bodies
        .iter()
        .zip(longitudes)
        .map(|(&b, &l)| ruler_of(Sign::of(l)) == b)
        .collect()
}

/// Per-instant exaltation check for a varying body.
pub fn exaltation_mask_for(bodies: &[Body], longitudes: &[f64]) -> Vec<bool> {
    bodies
        .iter()
        .zip(longitudes)
        .map(|(&b, &l)| exaltation_of(b) == Some(Sign::of(l)))
        .collect()
}

/// Per-instant detriment-or-fall check for a varying body.
pub fn debility_mask_for(bodies: &[Body], longitudes: &[f64]) -> Vec<bool> {
    bodies
        .iter()
        .zip(longitudes)
        .map(|(&b, &l)| {
            let sign = Sign::of(l);
            detriments_of(b).contains(&sign) || fall_of(b) == Some(sign)
        })
        .collect()
}

/// Per-instant check that the body is one of its sign's triplicity rulers.
pub fn triplicity_mask_for(bodies: &[Body], longitudes: &[f64]) -> Vec<bool> {
    bodies
        .iter()
        .zip(longitudes)
        .map(|(&b, &l)| triplicity_rulers(Sign::of(l)).contains(&b))
        .collect()
}

/// Per-instant check that the body rules the term it occupies.
pub fn term_mask_for(bodies: &[Body], longitudes: &[f64]) -> Vec<bool> {
    bodies
        .iter()
        .zip(longitudes)
        .map(|(&b, &l)| {
            let l = l.rem_euclid(360.0);
            term_ruler(Sign::of(l), l % 30.0) == b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dignity_and_debility_are_exclusive() {
        let lons: Vec<f64> = (0..720).map(|i| i as f64 * 0.5).collect();
        for body in Body::TRADITIONAL {
            let good = dignity_mask(body, &lons);
            let bad = debility_mask(body, &lons);
            assert!(good.iter().zip(&bad).all(|(g, b)| !(*g && *b)), "{:?}", body);
        }
    }

    #[test]
    fn test_dignity_of_examples() {
        assert_eq!(dignity_of(Body::Sun, 135.0), Some(DignityType::Rulership));
        assert_eq!(dignity_of(Body::Sun, 15.0), Some(DignityType::Exaltation));
        assert_eq!(dignity_of(Body::Moon, 280.0), Some(DignityType::Detriment));
        assert_eq!(dignity_of(Body::Venus, 160.0), Some(DignityType::Fall));
        assert_eq!(dignity_of(Body::Jupiter, 60.0), Some(DignityType::Detriment));
        assert_eq!(dignity_of(Body::Mercury, 100.0), None);
    }

    #[test]
    fn test_varying_body_masks() {
        let bodies = [Body::Mars, Body::Venus, Body::Saturn];
        let lons = [10.0, 355.0, 185.0];
        assert_eq!(domicile_mask_for(&bodies, &lons), vec![true, false, false]);
        assert_eq!(exaltation_mask_for(&bodies, &lons), vec![false, true, true]);
        // Aries 10: Venus term; Pisces 25: Mars term; Libra 5: Saturn term
        assert_eq!(term_mask_for(&bodies, &lons), vec![false, false, true]);
        // Aries fire: Sun/Jupiter/Saturn; Pisces water: Venus/Mars/Moon; Libra air: Saturn first
        assert_eq!(triplicity_mask_for(&bodies, &lons), vec![false, true, true]);
        // Mars in Aries, Venus in Pisces, Saturn in Libra: all dignified
        assert_eq!(debility_mask_for(&bodies, &lons), vec![false, false, false]);
        assert_eq!(
            debility_mask_for(&[Body::Mars, Body::Saturn], &[200.0, 10.0]),
            vec![true, true]
        );
    }
}
