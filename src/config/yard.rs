//! Viewport configuration loaded from `yard.toml`
//!
//! Every section has defaults, so an empty or missing file yields a working
//! viewport. Environment variables override file values for quick
//! experiments without editing the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::camera::ZoomLimits;
use crate::app::state::CameraAnimator;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct YardConfig {
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
    pub yard: YardSection,
}

/// Zoom bounds and animation tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Zoom used when focusing a selected container
    pub focus_zoom: f64,
    /// Fraction of the remaining distance covered per animation tick
    pub damping: f64,
    /// Share of the starting gap under which zoom and both offsets count as arrived
    pub epsilon: f64,
}

/// Pointer, wheel and keyboard tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Max pointer travel in screen pixels for a press to count as a click
    pub click_threshold: f64,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    /// Multiplier for the zoom buttons and +/- keys
    pub button_zoom_step: f64,
    /// Arrow-key pan distance in screen pixels
    pub pan_step: f64,
    /// Share of the canvas the layout fills after fit-to-view
    pub fit_padding: f64,
}

/// Surface and text settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// TrueType font for labels; text is skipped when unset
    pub font: Option<PathBuf>,
    /// Where the demo binary writes its frame
    pub output: PathBuf,
    /// Depth offset of the double-drawn boxes, in world units
    pub depth: f64,
}

/// Which yard to show and how locations name its stacks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct YardSection {
    pub layout: String,
    pub location_prefix: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZoomLimits::DEFAULT.min,
            zoom_max: ZoomLimits::DEFAULT.max,
            focus_zoom: 3.0,
            damping: CameraAnimator::DEFAULT_DAMPING,
            epsilon: CameraAnimator::DEFAULT_EPSILON,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_threshold: 3.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            button_zoom_step: 1.2,
            pan_step: 40.0,
            fit_padding: 0.9,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            font: None,
            output: PathBuf::from("yard.png"),
            depth: 3.0,
        }
    }
}

impl Default for YardSection {
    fn default() -> Self {
        Self {
            layout: "default".to_string(),
            location_prefix: "S".to_string(),
        }
    }
}

impl CameraConfig {
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.zoom_min,
            max: self.zoom_max,
        }
    }

    pub fn animator(&self) -> CameraAnimator {
        CameraAnimator::new(self.damping, self.epsilon)
    }
}

impl YardConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: YardConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `yard.toml` from the current directory, falling back to defaults
    pub fn load_or_default() -> Self {
        match Self::load_from_file("yard.toml") {
            Ok(config) => config,
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(e) => {
                log::warn!("ignoring yard.toml: {}", e);
                Self::default()
            }
        }
    }

    /// Environment variables take precedence over file values
    pub fn merge_with_env(&mut self) {
        if let Ok(layout) = std::env::var("YARD_LAYOUT") {
            self.yard.layout = layout;
        }
        if let Ok(font) = std::env::var("YARD_FONT") {
            self.render.font = Some(PathBuf::from(font));
        }
        if let Ok(output) = std::env::var("YARD_OUTPUT") {
            self.render.output = PathBuf::from(output);
        }
    }

    /// Defaults, then `yard.toml`, then environment overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Rejects values that would break the camera invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.zoom_min > 0.0 && camera.zoom_min.is_finite()) {
            return Err(invalid("camera.zoom_min", "must be positive"));
        }
        if !(camera.zoom_max >= camera.zoom_min && camera.zoom_max.is_finite()) {
            return Err(invalid("camera.zoom_max", "must not be below zoom_min"));
        }
        if !(camera.damping > 0.0 && camera.damping <= 1.0) {
            return Err(invalid("camera.damping", "must be in (0, 1]"));
        }
        if !(camera.epsilon > 0.0 && camera.epsilon < 1.0) {
            return Err(invalid("camera.epsilon", "must be in (0, 1)"));
        }
        if !(camera.focus_zoom > 0.0 && camera.focus_zoom.is_finite()) {
            return Err(invalid("camera.focus_zoom", "must be positive"));
        }

        let input = &self.input;
        for (field, value) in [
            ("input.wheel_zoom_in", input.wheel_zoom_in),
            ("input.wheel_zoom_out", input.wheel_zoom_out),
            ("input.button_zoom_step", input.button_zoom_step),
            ("input.fit_padding", input.fit_padding),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(field, "must be a positive factor"));
            }
        }
        for (field, value) in [
            ("input.click_threshold", input.click_threshold),
            ("input.pan_step", input.pan_step),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(invalid("render", "surface size must be non-zero"));
        }
        if !(self.render.depth >= 0.0 && self.render.depth.is_finite()) {
            return Err(invalid("render.depth", "must be a non-negative number"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = YardConfig::default();
        assert_eq!(config.camera.zoom_limits(), ZoomLimits { min: 0.3, max: 5.0 });
        assert_eq!(config.camera.focus_zoom, 3.0);
        assert_eq!(config.input.wheel_zoom_out, 0.9);
        assert_eq!(config.yard.layout, "default");
        assert!(config.render.font.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: YardConfig = toml::from_str(
            r#"
            [camera]
            focus_zoom = 2.5

            [yard]
            layout = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.focus_zoom, 2.5);
        assert_eq!(config.camera.zoom_max, 5.0);
        assert_eq!(config.yard.layout, "compact");
        assert_eq!(config.yard.location_prefix, "S");
    }

    #[test]
    fn toml_serialization_round_trips() {
        let config = YardConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: YardConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validation_rejects_broken_camera() {
        let mut config = YardConfig::default();
        config.camera.zoom_min = 6.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.zoom_max", .. })
        ));

        let mut config = YardConfig::default();
        config.camera.damping = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.damping", .. })
        ));

        let mut config = YardConfig::default();
        config.input.wheel_zoom_out = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_nan_and_infinite_values() {
        let cases: [(&str, fn(&mut YardConfig)); 5] = [
            ("input.click_threshold", |c| c.input.click_threshold = f64::NAN),
            ("input.pan_step", |c| c.input.pan_step = f64::INFINITY),
            ("camera.focus_zoom", |c| c.camera.focus_zoom = f64::NAN),
            ("camera.epsilon", |c| c.camera.epsilon = 1.5),
            ("render.depth", |c| c.render.depth = f64::NAN),
        ];

        for (expected, break_it) in cases {
            let mut config = YardConfig::default();
            break_it(&mut config);
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{} accepted: {:?}", expected, other),
            }
        }

        let mut config = YardConfig::default();
        config.input.click_threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = YardConfig::load_from_file("definitely/not/here/yard.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_or_default_never_panics() {
        let config = YardConfig::load_or_default();
        assert!(config.validate().is_ok());
    }
}
