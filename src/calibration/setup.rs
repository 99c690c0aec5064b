// CalibrationSetup - fixed reference track parameters
//
// The calibration track is a metronome loop. Every parameter that ties a
// playback position to a beat lives here so trackers can be built without
// reaching for globals.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::preferences::keys;
use crate::tempo::{beats_to_seconds, seconds_to_beats};

/// Tempo of the calibration loop
pub const CALIBRATION_BPM: f64 = 125.0;

/// Delay between the start of playback and the first beat of the loop
pub const CALIBRATION_MUSIC_OFFSET_SECS: f64 = 0.126;

/// Length of the calibration loop
pub const CALIBRATION_DURATION_BEATS: f64 = 32.0;

/// Largest timing offset the playalong judge accepts as a hit
pub const MAX_OFFSET_SECS: f64 = 0.075;

/// Reference track parameters used to turn a playback position into an offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSetup {
    /// Tempo of the reference track
    pub bpm: f64,
    /// Playback-to-beat alignment offset in seconds
    pub music_offset_secs: f64,
    /// Loop length in beats
    pub loop_beats: f64,
    /// Acceptance gate is twice this value
    pub max_offset_secs: f64,
}

impl Default for CalibrationSetup {
    fn default() -> Self {
        Self {
            bpm: CALIBRATION_BPM,
            music_offset_secs: CALIBRATION_MUSIC_OFFSET_SECS,
            loop_beats: CALIBRATION_DURATION_BEATS,
            max_offset_secs: MAX_OFFSET_SECS,
        }
    }
}

impl CalibrationSetup {
    /// Check every parameter is finite and in range
    ///
    /// # Errors
    /// `InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field: &str, reason: &str| SettingsError::InvalidConfig {
            field: format!("calibration.{}", field),
            reason: reason.to_string(),
        };

        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(invalid("bpm", "must be a positive number"));
        }
        if !self.music_offset_secs.is_finite() {
            return Err(invalid("music_offset_secs", "must be finite"));
        }
        if !self.loop_beats.is_finite() || self.loop_beats <= 0.0 {
            return Err(invalid("loop_beats", "must be a positive number"));
        }
        if !self.max_offset_secs.is_finite() || self.max_offset_secs < 0.0 {
            return Err(invalid("max_offset_secs", "must be zero or positive"));
        }
        Ok(())
    }

    /// Widest offset (seconds, inclusive) a calibration tap may have
    pub fn acceptance_window_secs(&self) -> f64 {
        self.max_offset_secs * 2.0
    }

    /// Loop length in seconds
    pub fn loop_duration_secs(&self) -> f64 {
        beats_to_seconds(self.loop_beats, self.bpm)
    }

    /// Beat phase of a playback position within the current loop
    ///
    /// Uses a truncating remainder, so positions before the alignment offset
    /// produce a negative phase.
    pub fn beat_phase(&self, position_secs: f64) -> f64 {
        let corrected = position_secs - self.music_offset_secs;
        seconds_to_beats(corrected, self.bpm) % self.loop_beats
    }

    /// Signed distance in seconds from `position_secs` to the nearest beat
    ///
    /// Positive means the tap landed after the beat.
    pub fn offset_from_nearest_beat(&self, position_secs: f64) -> f64 {
        let offset_beats = nearest_beat_offset(self.beat_phase(position_secs));
        beats_to_seconds(offset_beats, self.bpm)
    }
}

/// Signed fractional distance from `beat_phase` to its nearest whole beat
///
/// Result lies in `[-0.5, 0.5]`. Half beats round away from zero, so
/// `2.5` yields `-0.5` and `-2.5` yields `0.5`.
#[inline]
pub fn nearest_beat_offset(beat_phase: f64) -> f64 {
    beat_phase - beat_phase.round()
}

/// Input device being calibrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputDevice {
    Keyboard,
    Mouse,
}

impl InputDevice {
    pub const ALL: [InputDevice; 2] = [InputDevice::Keyboard, InputDevice::Mouse];

    /// Preference key the device's calibration is stored under
    pub fn preference_key(&self) -> &'static str {
        match self {
            InputDevice::Keyboard => keys::CALIBRATION_KEY,
            InputDevice::Mouse => keys::CALIBRATION_MOUSE,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InputDevice::Keyboard => "keyboard",
            InputDevice::Mouse => "mouse",
        }
    }
}
