//! Gather-by-mask ruler resolution.
//!
//! "Which body rules the sign this point is in" changes per instant. Instead
//! of dispatching per instant, loop the 12 signs once, mask the instants whose
//! point falls in that sign, and copy the ruler's columns into the output.

use crate::ephemeris::{Body, PositionBatch};
use crate::error::EvalError;
use crate::western::rulers::ruler_of;
use crate::western::signs::{sign_index, Sign};

/// Per-instant ruler id, longitude and speed.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTrack {
    pub ids: Vec<Body>,
    pub longitudes: Vec<f64>,
    pub speeds: Vec<f64>,
}

impl RulerTrack {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolve the traditional ruler of the sign each point falls in.
pub fn gather_ruler(points: &[f64], positions: &PositionBatch) -> Result<RulerTrack, EvalError> {
    let n = points.len();
    if positions.len() != n {
        return Err(EvalError::ShapeMismatch {
            rule: "gather_ruler".to_string(),
            expected: positions.len(),
            actual: n,
        });
    }
    let signs: Vec<u8> = points.iter().map(|&p| sign_index(p)).collect();
    let mut track = RulerTrack {
        ids: vec![Body::Sun; n],
        longitudes: vec![0.0; n],
        speeds: vec![0.0; n],
    };

    for sign in Sign::ALL {
        let ruler = ruler_of(sign);
        let hits: Vec<usize> = signs
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == sign.index())
            .map(|(i, _)| i)
            .collect();
        if hits.is_empty() {
            continue;
        }
        let track_of = positions.get(ruler).ok_or_else(|| EvalError::MissingBody {
            rule: "gather_ruler".to_string(),
            body: ruler,
        })?;
        let (lons, speeds) = (track_of.longitudes(), track_of.speeds());
        for i in hits {
            track.ids[i] = ruler;
            track.longitudes[i] = lons[i];
            track.speeds[i] = speeds[i];
        }
    }
    Ok(track)
}
