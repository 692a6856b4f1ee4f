//! Void-of-course Moon approximation.
//!
//! The Moon is void when it makes no further major aspect before leaving its
//! sign. The other bodies are treated as stationary over that window, so only
//! the Moon's forward distance to each aspect point is compared against its
//! distance to the next ingress. Fast-moving Mercury or Venus near a sign
//! boundary can therefore be misjudged; this is accepted.

use crate::ephemeris::{Body, PositionBatch};

/// Bodies the Moon must still reach for it not to be void.
pub const VOC_BODIES: [Body; 6] = [
    Body::Sun,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
];

pub const VOC_ANGLES: [f64; 5] = [0.0, 60.0, 90.0, 120.0, 180.0];

/// True where the Moon perfects no aspect to `targets` before its next ingress.
///
/// Targets missing from the batch are ignored.
pub fn void_of_course_mask(moon: &[f64], positions: &PositionBatch, targets: &[Body]) -> Vec<bool> {
    let tracks: Vec<&[f64]> = targets
        .iter()
        .filter_map(|b| positions.longitudes(*b))
        .filter(|lons| lons.len() == moon.len())
        .collect();

    moon.iter()
        .enumerate()
        .map(|(i, &m)| {
            let m = m.rem_euclid(360.0);
            let to_ingress = ((m / 30.0).floor() + 1.0) * 30.0 - m;
            let reaches_aspect = tracks.iter().any(|lons| {
                let p = lons[i];
                VOC_ANGLES.iter().any(|&asp| {
                    [p + asp, p - asp]
                        .iter()
                        .any(|&point| (point - m).rem_euclid(360.0) < to_ingress)
                })
            });
            !reaches_aspect
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::BodyTrack;

    fn single(body: Body, lon: f64) -> PositionBatch {
        let mut batch = PositionBatch::new(1);
        batch
            .insert(body, BodyTrack::from_rows(vec![[lon, 0.0, 1.0, 0.0, 0.0, 0.0]]))
            .unwrap();
        batch
    }

    #[test]
    fn test_aspect_ahead_in_sign_is_not_void() {
        // Moon 25 Aries, Sun 28 Gemini: sextile point at 28 Aries is 3 degrees ahead
        let positions = single(Body::Sun, 88.0);
        assert_eq!(void_of_course_mask(&[25.0], &positions, &VOC_BODIES), vec![false]);
    }

    #[test]
    fn test_no_aspect_before_ingress_is_void() {
        // Moon 28 Aries; Sun at 15 Gemini puts every aspect point at x5 degrees
        let positions = single(Body::Sun, 75.0);
        assert_eq!(void_of_course_mask(&[28.0], &positions, &VOC_BODIES), vec![true]);
    }

    #[test]
    fn test_without_targets_moon_is_void() {
        let positions = PositionBatch::new(2);
        assert_eq!(
            void_of_course_mask(&[10.0, 200.0], &positions, &VOC_BODIES),
            vec![true, true]
        );
    }
}
