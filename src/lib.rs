// Playalong Settings Core
// Input latency calibration, sound-effect toggles and control presets for the
// playalong settings screen, independent of any UI framework

// Module declarations
pub mod audio;
pub mod calibration;
pub mod config;
pub mod controls;
pub mod error;
pub mod preferences;
pub mod session;
pub mod sfx;
pub mod telemetry;
pub mod tempo;

// Re-exports for convenience
pub use calibration::{CalibrationSetup, CalibrationTracker, InputDevice, SampleOutcome};
pub use error::{ErrorCode, SettingsError};
pub use session::{PointerButton, SessionSummary, SettingsSession};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, falling back to `default_filter`. Safe to call more
/// than once; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("warn");
        init_logging("debug");
    }
}
