//! Render configuration.

use std::path::{Path, PathBuf};

use apt_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Render settings, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub size_x: usize,
    /// Image height in pixels
    pub size_y: usize,
    /// Field of view `[vertical, horizontal]` in radians
    pub fov: [f64; 2],
    /// Sub-pixel grid `[vertical, horizontal]`
    pub subpix: [u32; 2],
    /// Maximum bounces per ray
    pub max_bounces: u32,
    /// Gamma applied when writing images
    pub gamma: f64,
    /// Camera up vector
    pub up: Vec3,
    /// Seed for the per-pixel random streams
    pub seed: u64,
    /// Write the image every this many passes, 0 to only write at the end
    pub write_interval: u32,
    /// Output image path
    pub filename: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size_x: 600,
            size_y: 400,
            fov: [0.93084, 1.3963],
            subpix: [1, 1],
            max_bounces: 8,
            gamma: 1.0,
            up: Vec3::Z,
            seed: 0,
            write_interval: 0,
            filename: PathBuf::from("images/default.png"),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded render config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn with_size(mut self, size_x: usize, size_y: usize) -> Self {
        self.size_x = size_x;
        self.size_y = size_y;
        self
    }

    pub fn with_fov(mut self, fov: [f64; 2]) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_subpix(mut self, subpix: [u32; 2]) -> Self {
        self.subpix = subpix;
        self
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_write_interval(mut self, write_interval: u32) -> Self {
        self.write_interval = write_interval;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = filename.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json_str(
            r#"{ "size_x": 64, "size_y": 32, "subpix": [2, 3], "up": [0.0, 1.0, 0.0] }"#,
        )
        .unwrap();

        assert_eq!(config.size_x, 64);
        assert_eq!(config.size_y, 32);
        assert_eq!(config.subpix, [2, 3]);
        assert_eq!(config.up, Vec3::Y);
        assert_eq!(config.max_bounces, RenderConfig::default().max_bounces);
        assert_eq!(config.filename, PathBuf::from("images/default.png"));
    }

    #[test]
    fn test_invalid_json() {
        let err = RenderConfig::from_json_str("{ \"size_x\": -1 }").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_builder_and_file_round_trip() {
        let config = RenderConfig::new()
            .with_size(8, 4)
            .with_fov([1.0, 2.0])
            .with_max_bounces(3)
            .with_gamma(2.2)
            .with_seed(17)
            .with_write_interval(5)
            .with_filename("out/test.png");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(RenderConfig::from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = RenderConfig::from_path("/nonexistent/render.json").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
