//! Aspect geometry over longitude arrays.

pub mod calculator;
pub mod gather;
pub mod voc;

pub use calculator::{
    any_aspect_mask, exact_aspect_mask, exact_aspect_mask_to, find_aspect, is_applying,
    phase_mask, separation, separations, waxing_mask,
};
pub use gather::{gather_ruler, RulerTrack};
pub use voc::{void_of_course_mask, VOC_ANGLES, VOC_BODIES};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Conjunction,
        Aspect::Sextile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Opposition,
    ];

    pub const HARD: [Aspect; 3] = [Aspect::Conjunction, Aspect::Square, Aspect::Opposition];

    pub const SOFT: [Aspect; 3] = [Aspect::Conjunction, Aspect::Sextile, Aspect::Trine];

    /// Canonical angle in degrees.
    pub fn angle(self) -> f64 {
        match self {
            Aspect::Conjunction => 0.0,
            Aspect::Sextile => 60.0,
            Aspect::Square => 90.0,
            Aspect::Trine => 120.0,
            Aspect::Opposition => 180.0,
        }
    }

    /// Short form used in component names.
    pub fn short_name(self) -> &'static str {
        match self {
            Aspect::Conjunction => "conj",
            Aspect::Sextile => "sext",
            Aspect::Square => "square",
            Aspect::Trine => "trine",
            Aspect::Opposition => "opp",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aspect::Conjunction => "conjunction",
            Aspect::Sextile => "sextile",
            Aspect::Square => "square",
            Aspect::Trine => "trine",
            Aspect::Opposition => "opposition",
        };
        f.write_str(name)
    }
}
