//! Configuration module for yard-viewport
//!
//! Tuning for the camera, input handling and rendering lives here so the
//! rest of the crate can take plain values.

pub mod yard;

pub use yard::{CameraConfig, ConfigError, InputConfig, RenderConfig, YardConfig, YardSection};
