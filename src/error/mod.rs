// Error types for the playalong settings core
//
// This module defines the error taxonomy for preference persistence,
// configuration validation and control-mapping parsing. Calibration itself
// never fails: rejected taps are a normal outcome, not an error.

mod settings;

pub use settings::{log_settings_error, SettingsError, SettingsErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers (CLI, telemetry) can report them
/// consistently.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
