//! Configuration management for the playalong settings core
//!
//! This module provides runtime configuration loading from JSON files, so the
//! calibration loop parameters and file locations can be changed without
//! recompilation. A missing or malformed file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calibration::CalibrationSetup;
use crate::error::SettingsError;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Reference loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Tempo of the reference loop
    pub bpm: f64,
    /// Playback-to-beat alignment offset in seconds
    pub music_offset_secs: f64,
    /// Loop length in beats
    pub duration_beats: f64,
    /// Largest offset judged as a hit; calibration taps may be up to twice this
    pub max_offset_secs: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        let setup = CalibrationSetup::default();
        Self {
            bpm: setup.bpm,
            music_offset_secs: setup.music_offset_secs,
            duration_beats: setup.loop_beats,
            max_offset_secs: setup.max_offset_secs,
        }
    }
}

impl CalibrationConfig {
    pub fn to_setup(&self) -> CalibrationSetup {
        CalibrationSetup {
            bpm: self.bpm,
            music_offset_secs: self.music_offset_secs,
            loop_beats: self.duration_beats,
            max_offset_secs: self.max_offset_secs,
        }
    }
}

/// Preference store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("playalong_prefs.json"),
        }
    }
}

/// Telemetry collector sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Number of recent events kept for snapshots
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file doesn't exist or
    /// the JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check every value is usable
    ///
    /// # Errors
    /// `InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.calibration.to_setup().validate()?;
        if self.preferences.path.as_os_str().is_empty() {
            return Err(SettingsError::InvalidConfig {
                field: "preferences.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.calibration.bpm, 125.0);
        assert_eq!(config.calibration.music_offset_secs, 0.126);
        assert_eq!(config.calibration.duration_beats, 32.0);
        assert_eq!(config.calibration.max_offset_secs, 0.075);
        assert_eq!(config.preferences.path, PathBuf::from("playalong_prefs.json"));
        assert_eq!(config.telemetry.history_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.calibration.bpm, config.calibration.bpm);
        assert_eq!(parsed.preferences.path, config.preferences.path);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "calibration": { "bpm": 140.0 } }"#).unwrap();

        assert_eq!(parsed.calibration.bpm, 140.0);
        assert_eq!(parsed.calibration.duration_beats, 32.0);
        assert_eq!(parsed.telemetry.channel_capacity, 256);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/playalong_config.json");
        assert_eq!(config.calibration.bpm, 125.0);
    }

    #[test]
    fn test_validate_rejects_zero_bpm() {
        let mut config = AppConfig::default();
        config.calibration.bpm = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_to_setup_maps_fields() {
        let config = CalibrationConfig {
            bpm: 90.0,
            music_offset_secs: 0.2,
            duration_beats: 16.0,
            max_offset_secs: 0.05,
        };
        let setup = config.to_setup();
        assert_eq!(setup.bpm, 90.0);
        assert_eq!(setup.music_offset_secs, 0.2);
        assert_eq!(setup.loop_beats, 16.0);
        assert_eq!(setup.max_offset_secs, 0.05);
    }
}
