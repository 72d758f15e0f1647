// THEORY:
// Every number the tracker depends on lives here: the size of the patch sampled
// around a selection, the two ratio thresholds that separate a deliberate gesture
// from jitter, and the knobs of the color detector. The defaults are empirical.

use crate::error::{TrackingError, TrackingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable behavior for a `TrackingSession` and its detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Half-extent of the patch sampled around a selection, in pixels.
    pub sample_half_extent: u32,
    /// Relative horizontal displacement above which a move counts as Left/Right.
    pub horizontal_threshold: f64,
    /// Relative area change above which a move counts as Forward/Backward.
    pub area_threshold: f64,
    /// Width of the rendered detection-range swatch.
    pub swatch_width: u32,
    /// Height of the rendered detection-range swatch.
    pub swatch_height: u32,
    /// Per-channel tolerance around the target color (hue, saturation, value, 4th).
    pub color_radius: [f64; 4],
    /// Contours smaller than this fraction of the largest one are discarded.
    pub min_contour_area_ratio: f64,
    /// Block size used to shrink the frame before thresholding.
    pub downsample_factor: u32,
    /// Capacity of the bounded notification channel.
    pub notification_capacity: usize,
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "scooby_vision=debug,warn").
    pub level: String,
    /// Emit structured JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            sample_half_extent: 4,
            horizontal_threshold: 0.5,
            area_threshold: 0.5,
            swatch_width: 200,
            swatch_height: 64,
            color_radius: [25.0, 50.0, 50.0, 0.0],
            min_contour_area_ratio: 0.1,
            downsample_factor: 4,
            notification_capacity: 16,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TrackingConfig {
    /// Reads and validates a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> TrackingResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TrackingError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `from_json_file`, but falls back to defaults when the file is unusable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default tracking config, {:?} unusable: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> TrackingResult<()> {
        if !(self.horizontal_threshold.is_finite() && self.horizontal_threshold > 0.0) {
            return Err(TrackingError::config(format!(
                "horizontal_threshold must be a positive number, got {}",
                self.horizontal_threshold
            )));
        }
        if !(self.area_threshold.is_finite() && self.area_threshold > 0.0) {
            return Err(TrackingError::config(format!(
                "area_threshold must be a positive number, got {}",
                self.area_threshold
            )));
        }
        if !(self.min_contour_area_ratio.is_finite() && self.min_contour_area_ratio >= 0.0) {
            return Err(TrackingError::config(format!(
                "min_contour_area_ratio must be a non-negative number, got {}",
                self.min_contour_area_ratio
            )));
        }
        if let Some(radius) = self
            .color_radius
            .iter()
            .find(|r| !(r.is_finite() && **r >= 0.0))
        {
            return Err(TrackingError::config(format!(
                "color_radius entries must be non-negative numbers, got {}",
                radius
            )));
        }
        if self.swatch_width == 0 || self.swatch_height == 0 {
            return Err(TrackingError::config("swatch size must be non-zero"));
        }
        if self.downsample_factor == 0 {
            return Err(TrackingError::config("downsample_factor must be at least 1"));
        }
        if self.sample_half_extent == 0 {
            return Err(TrackingError::config("sample_half_extent must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let config = TrackingConfig::default();
        assert_eq!(config.sample_half_extent, 4);
        assert_eq!(config.horizontal_threshold, 0.5);
        assert_eq!(config.area_threshold, 0.5);
        assert_eq!((config.swatch_width, config.swatch_height), (200, 64));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: TrackingConfig =
            serde_json::from_str(r#"{ "horizontal_threshold": 0.3, "logging": { "json": true } }"#)
                .unwrap();
        assert_eq!(config.horizontal_threshold, 0.3);
        assert_eq!(config.area_threshold, 0.5);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_zero_downsample() {
        let config = TrackingConfig {
            downsample_factor: 0,
            ..TrackingConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackingError::Config { .. })));
    }

    #[test]
    fn rejects_non_finite_detector_knobs() {
        let bad_ratio = TrackingConfig {
            min_contour_area_ratio: f64::NAN,
            ..TrackingConfig::default()
        };
        assert!(matches!(bad_ratio.validate(), Err(TrackingError::Config { .. })));

        let bad_radius = TrackingConfig {
            color_radius: [25.0, f64::NAN, 50.0, 0.0],
            ..TrackingConfig::default()
        };
        assert!(matches!(bad_radius.validate(), Err(TrackingError::Config { .. })));

        let negative_radius = TrackingConfig {
            color_radius: [-1.0, 50.0, 50.0, 0.0],
            ..TrackingConfig::default()
        };
        assert!(negative_radius.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = TrackingConfig::load_or_default("/nonexistent/scooby.json");
        assert_eq!(config, TrackingConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("scooby_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "area_threshold": 0.75 }"#).unwrap();
        let config = TrackingConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.area_threshold, 0.75);
    }
}
