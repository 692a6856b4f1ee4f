use crate::aspects::Aspect;

/// Minimal angular separation, 0..=180.
pub fn separation(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Element-wise [`separation`] of two aligned arrays.
pub fn separations(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| separation(x, y)).collect()
}

/// True where `|sep(a, b) - angle| <= orb`.
pub fn exact_aspect_mask(a: &[f64], b: &[f64], angle: f64, orb: f64) -> Vec<bool> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (separation(x, y) - angle).abs() <= orb)
        .collect()
}

/// [`exact_aspect_mask`] against a fixed point, e.g. a natal longitude.
pub fn exact_aspect_mask_to(a: &[f64], point: f64, angle: f64, orb: f64) -> Vec<bool> {
    a.iter()
        .map(|&x| (separation(x, point) - angle).abs() <= orb)
        .collect()
}

/// True where any of the `(aspect, orb)` pairs is within orb.
pub fn any_aspect_mask(a: &[f64], b: &[f64], aspects: &[(Aspect, f64)]) -> Vec<bool> {
    let mut mask = vec![false; a.len()];
    for &(aspect, orb) in aspects {
        for (m, hit) in mask.iter_mut().zip(exact_aspect_mask(a, b, aspect.angle(), orb)) {
            *m |= hit;
        }
    }
    mask
}

/// New or full Moon within `orb`.
pub fn phase_mask(sun: &[f64], moon: &[f64], orb: f64) -> Vec<bool> {
    sun.iter()
        .zip(moon)
        .map(|(&s, &m)| {
            let sep = separation(s, m);
            sep <= orb || (sep - 180.0).abs() <= orb
        })
        .collect()
}

/// Forward Sun-to-Moon elongation strictly between 0 and 180.
pub fn waxing_mask(sun: &[f64], moon: &[f64]) -> Vec<bool> {
    sun.iter()
        .zip(moon)
        .map(|(&s, &m)| {
            let elong = (m - s).rem_euclid(360.0);
            elong > 0.0 && elong < 180.0
        })
        .collect()
}

/// First aspect within orb between two longitudes, checked in `orbs` order,
/// with its distance from exact.
pub fn find_aspect(lon1: f64, lon2: f64, orbs: &[(Aspect, f64)]) -> Option<(Aspect, f64)> {
    let sep = separation(lon1, lon2);
    orbs.iter().find_map(|&(aspect, orb)| {
        let off = (sep - aspect.angle()).abs();
        (off <= orb).then_some((aspect, off))
    })
}

/// Whether the pair is closing in on `aspect`, projecting both bodies a short
/// step forward at their current speeds.
pub fn is_applying(lon1: f64, lon2: f64, speed1: f64, speed2: f64, aspect: Aspect) -> bool {
    let relative_speed = speed1 - speed2;
    let current = (separation(lon1, lon2) - aspect.angle()).abs();
    if relative_speed.abs() < 0.01 {
        return current < 0.5;
    }
    let step = 0.1;
    let future = (separation(lon1 + speed1 * step, lon2 + speed2 * step) - aspect.angle()).abs();
    future < current
}
