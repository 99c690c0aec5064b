// Settings error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Settings error code constants
///
/// Error code range: 3001-3004
pub struct SettingsErrorCodes {}

impl SettingsErrorCodes {
    /// Reading or writing the preference file failed
    pub const PREFERENCES_IO: i32 = 3001;

    /// The preference file exists but is not a flat JSON object
    pub const PREFERENCES_PARSE: i32 = 3002;

    /// A configuration value is out of range
    pub const INVALID_CONFIG: i32 = 3003;

    /// A stored control mapping could not be decoded
    pub const INVALID_CONTROLS: i32 = 3004;
}

/// Log a settings error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_settings_error(err: &SettingsError, context: &str) {
    error!(
        "Settings error in {}: code={}, component=PlayalongSettings, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Settings-related errors
///
/// Error code range: 3001-3004
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Reading or writing the preference file failed
    PreferencesIo { path: String, reason: String },

    /// The preference file could not be parsed
    PreferencesParse { path: String, reason: String },

    /// A configuration value is out of range
    InvalidConfig { field: String, reason: String },

    /// A stored control mapping could not be decoded
    InvalidControls { reason: String },
}

impl ErrorCode for SettingsError {
    fn code(&self) -> i32 {
        match self {
            SettingsError::PreferencesIo { .. } => SettingsErrorCodes::PREFERENCES_IO,
            SettingsError::PreferencesParse { .. } => SettingsErrorCodes::PREFERENCES_PARSE,
            SettingsError::InvalidConfig { .. } => SettingsErrorCodes::INVALID_CONFIG,
            SettingsError::InvalidControls { .. } => SettingsErrorCodes::INVALID_CONTROLS,
        }
    }

    fn message(&self) -> String {
        match self {
            SettingsError::PreferencesIo { path, reason } => {
                format!("Preference file I/O failed for {}: {}", path, reason)
            }
            SettingsError::PreferencesParse { path, reason } => {
                format!("Preference file {} is not valid JSON: {}", path, reason)
            }
            SettingsError::InvalidConfig { field, reason } => {
                format!("Invalid config value for {}: {}", field, reason)
            }
            SettingsError::InvalidControls { reason } => {
                format!("Invalid control mapping: {}", reason)
            }
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SettingsError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_codes() {
        assert_eq!(
            SettingsError::PreferencesIo {
                path: "prefs.json".to_string(),
                reason: "denied".to_string()
            }
            .code(),
            SettingsErrorCodes::PREFERENCES_IO
        );
        assert_eq!(
            SettingsError::PreferencesParse {
                path: "prefs.json".to_string(),
                reason: "eof".to_string()
            }
            .code(),
            SettingsErrorCodes::PREFERENCES_PARSE
        );
        assert_eq!(
            SettingsError::InvalidConfig {
                field: "bpm".to_string(),
                reason: "zero".to_string()
            }
            .code(),
            SettingsErrorCodes::INVALID_CONFIG
        );
        assert_eq!(
            SettingsError::InvalidControls {
                reason: "bad".to_string()
            }
            .code(),
            SettingsErrorCodes::INVALID_CONTROLS
        );
    }

    #[test]
    fn test_settings_error_messages() {
        let err = SettingsError::InvalidConfig {
            field: "calibration.bpm".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.message(),
            "Invalid config value for calibration.bpm: must be positive"
        );

        let err = SettingsError::PreferencesIo {
            path: "/tmp/p.json".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.message().contains("/tmp/p.json"));
        assert!(err.message().contains("permission denied"));
    }

    #[test]
    fn test_settings_error_display() {
        let err = SettingsError::InvalidControls {
            reason: "missing button_a".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("SettingsError"));
        assert!(display.contains(&err.code().to_string()));
        assert!(display.contains("missing button_a"));
    }
}
