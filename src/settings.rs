//! Game settings
//!
//! Host-tunable knobs, loadable from a JSON file. Missing fields fall back to
//! their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_FRAME_DT, VIEWPORT_WIDTH};

/// Why a settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("viewport width must be positive, got {0}")]
    ViewportWidth(f32),
    #[error("max frame step must be in (0, 0.1] seconds, got {0}")]
    MaxFrameDt(f32),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field width used for horizontal clamping
    pub viewport_width: f32,
    /// Largest step a single host frame may advance the world (seconds)
    pub max_frame_dt: f32,

    // === Interruptions ===
    /// Show workplace chat popups mid-level
    pub notifications: bool,
    /// Upper bound on popups per level (the level number is the other bound)
    pub notification_cap: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            max_frame_dt: MAX_FRAME_DT,
            notifications: true,
            notification_cap: 5,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.viewport_width.is_nan() || self.viewport_width <= 0.0 {
            return Err(SettingsError::ViewportWidth(self.viewport_width));
        }
        if !(self.max_frame_dt > 0.0 && self.max_frame_dt <= 0.1) {
            return Err(SettingsError::MaxFrameDt(self.max_frame_dt));
        }
        Ok(())
    }
}
