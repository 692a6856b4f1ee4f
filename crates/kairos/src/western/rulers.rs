//! Static essential-dignity tables.
//!
//! Traditional rulerships, exaltations, Dorothean triplicities and Egyptian
//! terms. Detriment and fall are derived from rulership and exaltation by
//! taking the opposite sign.

use crate::ephemeris::Body;
use crate::western::signs::{Element, Sign};
use lazy_static::lazy_static;
use std::collections::BTreeMap;

// Traditional rulerships, Aries..Pisces
const TRADITIONAL_RULERS: [Body; 12] = [
    Body::Mars,    // Aries
    Body::Venus,   // Taurus
    Body::Mercury, // Gemini
    Body::Moon,    // Cancer
    Body::Sun,     // Leo
    Body::Mercury, // Virgo
    Body::Venus,   // Libra
    Body::Mars,    // Scorpio
    Body::Jupiter, // Sagittarius
    Body::Saturn,  // Capricorn
    Body::Saturn,  // Aquarius
    Body::Jupiter, // Pisces
];

const EXALTATIONS: &[(Body, Sign)] = &[
    (Body::Sun, Sign::Aries),
    (Body::Moon, Sign::Taurus),
    (Body::Mercury, Sign::Virgo),
    (Body::Venus, Sign::Pisces),
    (Body::Mars, Sign::Capricorn),
    (Body::Jupiter, Sign::Cancer),
    (Body::Saturn, Sign::Libra),
];

/// Term bounds: (upper degree, ruler), five per sign.
type TermTable = [(f64, Body); 5];

const TERMS: [TermTable; 12] = {
    use Body::*;
    [
        [(6.0, Jupiter), (12.0, Venus), (20.0, Mercury), (25.0, Mars), (30.0, Saturn)],
        [(8.0, Venus), (14.0, Mercury), (22.0, Jupiter), (27.0, Saturn), (30.0, Mars)],
        [(6.0, Mercury), (12.0, Jupiter), (17.0, Venus), (24.0, Mars), (30.0, Saturn)],
        [(7.0, Mars), (13.0, Venus), (19.0, Mercury), (26.0, Jupiter), (30.0, Saturn)],
        [(6.0, Jupiter), (11.0, Venus), (18.0, Saturn), (24.0, Mercury), (30.0, Mars)],
        [(7.0, Mercury), (17.0, Venus), (21.0, Jupiter), (28.0, Mars), (30.0, Saturn)],
        [(6.0, Saturn), (14.0, Venus), (21.0, Jupiter), (28.0, Mercury), (30.0, Mars)],
        [(7.0, Mars), (11.0, Venus), (19.0, Mercury), (24.0, Jupiter), (30.0, Saturn)],
        [(12.0, Jupiter), (17.0, Venus), (21.0, Mercury), (26.0, Saturn), (30.0, Mars)],
        [(7.0, Mercury), (14.0, Jupiter), (22.0, Venus), (26.0, Saturn), (30.0, Mars)],
        [(7.0, Mercury), (13.0, Venus), (20.0, Jupiter), (25.0, Mars), (30.0, Saturn)],
        [(12.0, Venus), (16.0, Jupiter), (19.0, Mercury), (28.0, Mars), (30.0, Saturn)],
    ]
};

lazy_static! {
    static ref DETRIMENTS: BTreeMap<Body, Vec<Sign>> = {
        let mut map: BTreeMap<Body, Vec<Sign>> = BTreeMap::new();
        for sign in Sign::ALL {
            map.entry(ruler_of(sign)).or_default().push(sign.opposite());
        }
        map
    };
    static ref FALLS: BTreeMap<Body, Sign> = EXALTATIONS
        .iter()
        .map(|(body, sign)| (*body, sign.opposite()))
        .collect();
}

/// Traditional ruler of a sign.
pub fn ruler_of(sign: Sign) -> Body {
    TRADITIONAL_RULERS[sign as usize]
}

/// Signs a body rules (empty for outer planets and nodes).
pub fn signs_ruled_by(body: Body) -> Vec<Sign> {
    Sign::ALL
        .iter()
        .copied()
        .filter(|s| ruler_of(*s) == body)
        .collect()
}

/// Sign a body is exalted in.
pub fn exaltation_of(body: Body) -> Option<Sign> {
    EXALTATIONS
        .iter()
        .find(|(b, _)| *b == body)
        .map(|(_, s)| *s)
}

/// Body exalted in a sign, if any.
pub fn exalted_in(sign: Sign) -> Option<Body> {
    EXALTATIONS
        .iter()
        .find(|(_, s)| *s == sign)
        .map(|(b, _)| *b)
}

/// Signs opposite the ones a body rules.
pub fn detriments_of(body: Body) -> &'static [Sign] {
    DETRIMENTS.get(&body).map(|v| v.as_slice()).unwrap_or(&[])
}

/// Sign opposite a body's exaltation.
pub fn fall_of(body: Body) -> Option<Sign> {
    FALLS.get(&body).copied()
}

/// Triplicity rulers of a sign's element, in order.
pub fn triplicity_rulers(sign: Sign) -> [Body; 3] {
    match sign.element() {
        Element::Fire => [Body::Sun, Body::Jupiter, Body::Saturn],
        Element::Earth => [Body::Venus, Body::Moon, Body::Mars],
        Element::Air => [Body::Saturn, Body::Mercury, Body::Jupiter],
        Element::Water => [Body::Venus, Body::Mars, Body::Moon],
    }
}

/// Egyptian term ruler at `degree` (0..30) within `sign`.
pub fn term_ruler(sign: Sign, degree: f64) -> Body {
    let degree = degree.clamp(0.0, 30.0);
    let terms = &TERMS[sign as usize];
    terms
        .iter()
        .find(|(upper, _)| degree < *upper)
        .map(|(_, ruler)| *ruler)
        .unwrap_or(terms[4].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruler_of_traditional() {
        assert_eq!(ruler_of(Sign::Aries), Body::Mars);
        assert_eq!(ruler_of(Sign::Cancer), Body::Moon);
        assert_eq!(ruler_of(Sign::Leo), Body::Sun);
        assert_eq!(ruler_of(Sign::Scorpio), Body::Mars);
        assert_eq!(ruler_of(Sign::Aquarius), Body::Saturn);
        assert_eq!(ruler_of(Sign::Pisces), Body::Jupiter);
    }

    #[test]
    fn test_detriment_and_fall() {
        assert_eq!(detriments_of(Body::Mars), &[Sign::Libra, Sign::Taurus]);
        assert_eq!(detriments_of(Body::Sun), &[Sign::Aquarius]);
        assert!(detriments_of(Body::Pluto).is_empty());
        assert_eq!(fall_of(Body::Saturn), Some(Sign::Aries));
        assert_eq!(fall_of(Body::Moon), Some(Sign::Scorpio));
        assert_eq!(fall_of(Body::MeanNode), None);
        assert_eq!(exalted_in(Sign::Cancer), Some(Body::Jupiter));
        assert_eq!(exalted_in(Sign::Gemini), None);
    }

    #[test]
    fn test_term_boundaries() {
        assert_eq!(term_ruler(Sign::Aries, 0.0), Body::Jupiter);
        assert_eq!(term_ruler(Sign::Aries, 5.999), Body::Jupiter);
        assert_eq!(term_ruler(Sign::Aries, 6.0), Body::Venus);
        assert_eq!(term_ruler(Sign::Aries, 29.99), Body::Saturn);
        assert_eq!(term_ruler(Sign::Sagittarius, 11.0), Body::Jupiter);
        assert_eq!(term_ruler(Sign::Libra, 3.0), Body::Saturn);
    }

    #[test]
    fn test_triplicities() {
        assert_eq!(triplicity_rulers(Sign::Virgo), [Body::Venus, Body::Moon, Body::Mars]);
        assert_eq!(triplicity_rulers(Sign::Scorpio), [Body::Venus, Body::Mars, Body::Moon]);
    }
}
