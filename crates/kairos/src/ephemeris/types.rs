use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Column indices of a position row.
pub const COL_LON: usize = 0;
pub const COL_LAT: usize = 1;
pub const COL_DIST: usize = 2;
pub const COL_SPEED_LON: usize = 3;
pub const COL_SPEED_LAT: usize = 4;
pub const COL_SPEED_DIST: usize = 5;

/// One position row: [lon, lat, dist, speed_lon, speed_lat, speed_dist]
pub type PositionRow = [f64; 6];

/// Tracked celestial bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
    TrueNode,
}

// Swiss Ephemeris body codes
const BODY_TABLE: &[(Body, &str, i32)] = &[
    (Body::Sun, "sun", 0),
    (Body::Moon, "moon", 1),
    (Body::Mercury, "mercury", 2),
    (Body::Venus, "venus", 3),
    (Body::Mars, "mars", 4),
    (Body::Jupiter, "jupiter", 5),
    (Body::Saturn, "saturn", 6),
    (Body::Uranus, "uranus", 7),
    (Body::Neptune, "neptune", 8),
    (Body::Pluto, "pluto", 9),
    (Body::MeanNode, "mean_node", 10),
    (Body::TrueNode, "true_node", 11),
];

impl Body {
    /// The seven traditional bodies, Sun through Saturn.
    pub const TRADITIONAL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    /// Bodies every search requests from the ephemeris.
    pub const REQUIRED: [Body; 8] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::MeanNode,
    ];

    pub fn name(self) -> &'static str {
        BODY_TABLE
            .iter()
            .find(|(body, _, _)| *body == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn swe_code(self) -> i32 {
        BODY_TABLE
            .iter()
            .find(|(body, _, _)| *body == self)
            .map(|(_, _, code)| *code)
            .unwrap_or(-1)
    }

    pub fn from_name(name: &str) -> Option<Body> {
        let lower = name.trim().to_lowercase();
        BODY_TABLE
            .iter()
            .find(|(_, n, _)| *n == lower)
            .map(|(body, _, _)| *body)
    }

    pub fn valid_names() -> Vec<String> {
        BODY_TABLE.iter().map(|(_, n, _)| n.to_string()).collect()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::from_name(s).ok_or_else(|| {
            format!("Unknown body: {}. Valid bodies: {:?}", s, Body::valid_names())
        })
    }
}

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// N x 6 positions of one body, with the longitude and speed columns split out.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTrack {
    rows: Vec<PositionRow>,
    longitudes: Vec<f64>,
    speeds: Vec<f64>,
    degraded: bool,
}

impl BodyTrack {
    pub fn from_rows(rows: Vec<PositionRow>) -> Self {
        let longitudes = rows.iter().map(|r| r[COL_LON]).collect();
        let speeds = rows.iter().map(|r| r[COL_SPEED_LON]).collect();
        Self {
            rows,
            longitudes,
            speeds,
            degraded: false,
        }
    }

    /// Zero-filled stand-in for a body the provider could not compute.
    pub fn zeroed(len: usize) -> Self {
        Self {
            rows: vec![[0.0; 6]; len],
            longitudes: vec![0.0; len],
            speeds: vec![0.0; len],
            degraded: true,
        }
    }

    pub fn rows(&self) -> &[PositionRow] {
        &self.rows
    }

    /// Column 0 view.
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Column 3 view.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Positions for a set of bodies over the same N instants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBatch {
    len: usize,
    tracks: BTreeMap<Body, BodyTrack>,
}

impl PositionBatch {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            tracks: BTreeMap::new(),
        }
    }

    /// Add a track. Returns the track back if its length does not match the batch.
    pub fn insert(&mut self, body: Body, track: BodyTrack) -> Result<(), BodyTrack> {
        if track.len() != self.len {
            return Err(track);
        }
        self.tracks.insert(body, track);
        Ok(())
    }

    pub fn get(&self, body: Body) -> Option<&BodyTrack> {
        self.tracks.get(&body)
    }

    pub fn longitudes(&self, body: Body) -> Option<&[f64]> {
        self.tracks.get(&body).map(|t| t.longitudes())
    }

    pub fn speeds(&self, body: Body) -> Option<&[f64]> {
        self.tracks.get(&body).map(|t| t.speeds())
    }

    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.tracks.keys().copied()
    }

    pub fn degraded_bodies(&self) -> Vec<Body> {
        self.tracks
            .iter()
            .filter(|(_, t)| t.is_degraded())
            .map(|(b, _)| *b)
            .collect()
    }

    /// Row of every body at instant `index`.
    pub fn row_at(&self, index: usize) -> BTreeMap<Body, PositionRow> {
        self.tracks
            .iter()
            .filter_map(|(b, t)| t.rows().get(index).map(|r| (*b, *r)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
