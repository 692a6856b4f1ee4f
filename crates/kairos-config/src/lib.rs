use kairos::EngineConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PATHS: [&str; 2] = ["configs/kairos.toml", "../../configs/kairos.toml"];

/// Where the Swiss Ephemeris data files live, if configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EphemerisSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
}

/// Try the common relative paths for `configs/kairos.toml`, from the
/// workspace root or from a crate directory.
pub fn read_config_toml_text() -> anyhow::Result<String> {
    for p in &DEFAULT_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load kairos.toml from {:?}", DEFAULT_PATHS);
}

fn read_text(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    match path {
        Some(p) => fs::read_to_string(p)
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", p.display())),
        None => Ok(read_config_toml_text().ok()),
    }
}

/// Parse and validate an engine configuration. Missing sections and keys take
/// their defaults.
pub fn parse_engine_config(text: &str) -> anyhow::Result<EngineConfig> {
    let config: EngineConfig =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse kairos.toml: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("kairos.toml rejected: {e}"))?;
    Ok(config)
}

/// Load the engine configuration from `path`, or from the default locations.
///
/// An explicit path must exist. With no path and no file at the default
/// locations the built-in defaults are used.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match read_text(path)? {
        Some(text) => parse_engine_config(&text),
        None => Ok(EngineConfig::default()),
    }
}

pub fn load_ephemeris_settings(path: Option<&Path>) -> anyhow::Result<EphemerisSettings> {
    let Some(text) = read_text(path)? else {
        return Ok(EphemerisSettings::default());
    };
    let root: RootConfigToml = toml::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse [ephemeris] in kairos.toml: {e}"))?;
    Ok(EphemerisSettings {
        path: root.ephemeris.path,
    })
}
