//! Engine settings persistence.
//!
//! Tunable thresholds for the selector, navigator and interaction
//! translator, stored as JSON in the platform config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::navigation::ResolutionMode;
use crate::state::{
    DEFAULT_HIGH_RES_RATIO, DEFAULT_LARGE_EXPORT_THRESHOLD, DEFAULT_NAVIGATION_OVERLAP,
    DEFAULT_TARGET_POINTS, MAX_NAVIGATION_OVERLAP, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

/// Errors while reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Settings file version for migration support
    pub version: u32,
    /// Point budget handed to the sampling selector
    pub target_points: usize,
    /// Window/total span ratio below which finer rates are offered
    pub high_res_ratio: f64,
    /// Estimated export size that triggers a confirmation
    pub large_export_threshold: u64,
    /// Fraction of the window kept visible across a navigation step
    pub navigation_overlap: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Mode selected when a chart opens
    pub default_mode: ResolutionMode,
    /// Anchor default windows at the newest data instead of the oldest
    pub anchor_to_latest: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            version: 1,
            target_points: DEFAULT_TARGET_POINTS,
            high_res_ratio: DEFAULT_HIGH_RES_RATIO,
            large_export_threshold: DEFAULT_LARGE_EXPORT_THRESHOLD,
            navigation_overlap: DEFAULT_NAVIGATION_OVERLAP,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            default_mode: ResolutionMode::default(),
            anchor_to_latest: true,
        }
    }
}

impl EngineSettings {
    /// Get the config directory path for WellView
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("WellView"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("WellView"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("wellview"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::get_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and sanitize settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings.sanitized())
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.target_points == 0 {
            self.target_points = defaults.target_points;
        }
        if !(self.high_res_ratio.is_finite() && self.high_res_ratio > 0.0) {
            self.high_res_ratio = defaults.high_res_ratio;
        }
        if self.large_export_threshold == 0 {
            self.large_export_threshold = defaults.large_export_threshold;
        }
        if !(0.0..=MAX_NAVIGATION_OVERLAP).contains(&self.navigation_overlap) {
            self.navigation_overlap = defaults.navigation_overlap;
        }
        if !(self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0) {
            self.zoom_in_factor = defaults.zoom_in_factor;
        }
        if !(self.zoom_out_factor.is_finite() && self.zoom_out_factor > 1.0) {
            self.zoom_out_factor = defaults.zoom_out_factor;
        }

        self
    }
}
