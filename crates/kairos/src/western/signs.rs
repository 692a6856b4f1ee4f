//! Zodiac signs as fixed 30 degree sectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

const SIGN_NAMES: [&str; 12] = [
    "aries",
    "taurus",
    "gemini",
    "cancer",
    "leo",
    "virgo",
    "libra",
    "scorpio",
    "sagittarius",
    "capricorn",
    "aquarius",
    "pisces",
];

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn from_index(index: u8) -> Sign {
        Sign::ALL[(index % 12) as usize]
    }

    /// Sign containing an ecliptic longitude.
    pub fn of(longitude: f64) -> Sign {
        Sign::from_index(sign_index(longitude))
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        SIGN_NAMES[self as usize]
    }

    pub fn opposite(self) -> Sign {
        Sign::from_index(self.index() + 6)
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SIGN_NAMES
            .iter()
            .position(|n| *n == lower)
            .map(|i| Sign::ALL[i])
            .ok_or_else(|| format!("Unknown sign: {}", s))
    }
}

/// Sign index (0-11) of a longitude; any real input wraps into range.
pub fn sign_index(longitude: f64) -> u8 {
    let normalized = longitude.rem_euclid(360.0);
    ((normalized / 30.0).floor() as u8) % 12
}

/// Per-instant sign indices.
pub fn sign_indices(longitudes: &[f64]) -> Vec<u8> {
    longitudes.iter().map(|&l| sign_index(l)).collect()
}

/// True where the longitude falls in any of `signs`.
pub fn sign_mask(longitudes: &[f64], signs: &[Sign]) -> Vec<bool> {
    longitudes
        .iter()
        .map(|&l| signs.contains(&Sign::of(l)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_index_wraps() {
        for lon in [-725.0, -30.0, -0.5, 0.0, 29.999, 30.0, 359.99, 360.0, 390.0, 1e6] {
            let idx = sign_index(lon);
            assert!(idx < 12);
            assert_eq!(idx, sign_index(lon.rem_euclid(360.0)));
        }
        assert_eq!(sign_index(-0.5), 11);
        assert_eq!(sign_index(390.0), 1);
    }

    #[test]
    fn test_elements_and_opposites() {
        assert_eq!(Sign::Leo.element(), Element::Fire);
        assert_eq!(Sign::Capricorn.element(), Element::Earth);
        assert_eq!(Sign::Aquarius.element(), Element::Air);
        assert_eq!(Sign::Pisces.element(), Element::Water);
        assert_eq!(Sign::Aries.opposite(), Sign::Libra);
        assert_eq!("Scorpio".parse::<Sign>(), Ok(Sign::Scorpio));
    }
}
