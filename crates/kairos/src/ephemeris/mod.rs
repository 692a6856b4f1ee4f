pub mod batch;
pub mod mean_motion;
pub mod provider;
pub mod types;

#[cfg(feature = "swiss")]
pub mod adapter;

pub use batch::EphemerisAdapter;
pub use mean_motion::{MeanElement, MeanMotionEphemeris};
pub use provider::{datetime_to_julian_day, EphemerisError, EphemerisProvider, JD_J2000};
pub use types::{Body, BodyTrack, GeoLocation, PositionBatch, PositionRow};

#[cfg(feature = "swiss")]
pub use adapter::SwissEphemerisAdapter;
