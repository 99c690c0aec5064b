// Calibration module - input latency measurement against a metronome loop
//
// This module provides two main components:
// 1. CalibrationSetup: Fixed reference track parameters (tempo, alignment, loop, gate)
// 2. CalibrationTracker: Running mean of tap offsets for one input device
//
// The calibration workflow:
// 1. Load one tracker per InputDevice from the preference store
// 2. While the reference loop plays, fire_input() on every tap
// 3. persist() both trackers when the settings screen closes

pub mod setup;
pub mod tracker;

pub use setup::{
    nearest_beat_offset, CalibrationSetup, InputDevice, CALIBRATION_BPM,
    CALIBRATION_DURATION_BEATS, CALIBRATION_MUSIC_OFFSET_SECS, MAX_OFFSET_SECS,
};
pub use tracker::{CalibrationTracker, SampleOutcome};
