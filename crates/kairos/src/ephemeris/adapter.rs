use crate::ephemeris::provider::{EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{Body, GeoLocation, PositionRow};
use crate::houses::{HouseFrame, HouseProvider, HouseSystem};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};
use swisseph::{AscMc, Cusp};

// FLG_SWIEPH = 2, FLG_SPEED = 256
const FLAGS: i32 = 2 | 256;

/// Swiss Ephemeris adapter implementation
///
/// The C library keeps global state, so calls are serialized through an
/// internal lock; worker pools can still share one adapter by reference.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    call_lock: Mutex<()>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        let adapter = Self {
            ephemeris_path: path,
            call_lock: Mutex::new(()),
        };
        {
            let _guard = adapter.call_lock.lock().unwrap_or_else(|e| e.into_inner());
            set_ephe_path(&adapter.ephemeris_path.to_string_lossy());
        }
        log::info!("Swiss Ephemeris data path: {}", adapter.ephemeris_path.display());
        Ok(adapter)
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn position(&self, jd: f64, body: Body) -> Result<PositionRow, EphemerisError> {
        let code = body.swe_code();
        if code < 0 {
            return Err(EphemerisError::CalculationFailed {
                body,
                jd,
                message: format!("No Swiss Ephemeris code for {}", body),
            });
        }

        let _guard = self.call_lock.lock().unwrap_or_else(|e| e.into_inner());
        let result = calc_ut(jd, code as u32, FLAGS as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body,
                jd,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok([out[0] % 360.0, out[1], out[2], out[3], out[4], out[5]])
    }
}

impl HouseProvider for SwissEphemerisAdapter {
    fn houses(
        &self,
        jd: f64,
        location: GeoLocation,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError> {
        let _guard = self.call_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (c, a) = houses_ex(jd, FLAGS, location.lat, location.lon, system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let values = [
            cusps.first,
            cusps.second,
            cusps.third,
            cusps.fourth,
            cusps.fifth,
            cusps.sixth,
            cusps.seventh,
            cusps.eighth,
            cusps.ninth,
            cusps.tenth,
            cusps.eleventh,
            cusps.twelfth,
        ];
        if values.iter().chain([&ascmc.ascendant, &ascmc.mc]).any(|v| !v.is_finite()) {
            return Err(EphemerisError::HouseCalculationFailed {
                jd,
                message: format!("non-finite output for system {}", system.name()),
            });
        }

        Ok(HouseFrame {
            cusps: values.map(|v| v.rem_euclid(360.0)),
            ascendant: ascmc.ascendant.rem_euclid(360.0),
            midheaven: ascmc.mc.rem_euclid(360.0),
        })
    }
}
