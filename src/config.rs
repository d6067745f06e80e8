//! Runtime settings with defaults, optionally overridden by a JSON file.

use crate::sphere::LatLng;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// File looked up in the working directory
pub const CONFIG_FILE: &str = "tui-globe.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Root of `countries.json`, `coastline.json` and `country/<CODE>.json`
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    /// Upper bound on the globe radius in canvas units
    pub max_radius: f64,
    /// Horizontal space kept free on each side of the globe
    pub viewport_margin: f64,
    pub rotation_duration_ms: u64,
    pub default_focus: LatLng,
    /// Install a new highlight only once the globe has finished turning.
    /// When false it is installed as soon as the rotation starts.
    pub install_after_rotation: bool,
    pub session_size: usize,
    pub max_chances: u32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_file: PathBuf::from("tui-globe.log"),
            max_radius: 100.0,
            viewport_margin: 24.0,
            rotation_duration_ms: 1500,
            default_focus: LatLng::default(),
            install_after_rotation: true,
            session_size: 20,
            max_chances: 3,
        }
    }
}

impl GlobeConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let config: GlobeConfig =
            simd_json::serde::from_slice(&mut bytes).with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn rotation_duration(&self) -> Duration {
        Duration::from_millis(self.rotation_duration_ms)
    }

    /// Globe radius that fits a viewport `width` units wide
    pub fn radius_for_width(&self, width: f64) -> f64 {
        ((width - 2.0 * self.viewport_margin) / 2.0).min(self.max_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobeConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, GlobeConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_radius": 40.0, "default_focus": {{"lat": 10.0, "lng": 20.0}}}}"#).unwrap();
        let config = GlobeConfig::load(file.path()).unwrap();
        assert_eq!(config.max_radius, 40.0);
        assert_eq!(config.default_focus, LatLng::new(10.0, 20.0));
        assert_eq!(config.rotation_duration(), Duration::from_millis(1500));
        assert!(config.install_after_rotation);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(GlobeConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_radius_for_width() {
        let config = GlobeConfig::default();
        assert_eq!(config.radius_for_width(148.0), 50.0);
        assert_eq!(config.radius_for_width(1000.0), 100.0);
    }
}
