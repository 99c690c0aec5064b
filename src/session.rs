// SettingsSession: headless controller for the playalong settings screen
//
// Owns one CalibrationTracker per input device plus the sound-effect toggles
// and control presets, and wires them to the injected collaborators:
// - ReferenceTrack: the looping calibration metronome
// - PreferenceStore: durable settings
// - SoundPlayer: sfx previews
// - AnalyticsSink: usage events, including the final exit event
//
// A GUI layer forwards its input events here and reads labels back for
// display. The session itself never renders anything.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::audio::{ReferenceTrack, SoundPlayer};
use crate::calibration::{CalibrationSetup, CalibrationTracker, InputDevice, SampleOutcome};
use crate::controls::{ControlsCycler, PlayalongControls, PlayalongInput};
use crate::error::{log_settings_error, SettingsError};
use crate::preferences::PreferenceStore;
use crate::sfx::{SfxSetting, SfxSettings};
use crate::telemetry::{AnalyticsSink, MetricEvent};

/// Pointer buttons the calibration area distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Values reported when the session closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub key_calibration: f64,
    pub mouse_calibration: f64,
    pub sfx: BTreeMap<String, bool>,
    pub controls_preset: String,
}

/// Playalong settings screen state
pub struct SettingsSession<T, S, P, K> {
    track: T,
    store: S,
    player: P,
    sink: K,
    key_calibration: CalibrationTracker,
    mouse_calibration: CalibrationTracker,
    sfx: SfxSettings,
    controls: PlayalongControls,
    cycler: ControlsCycler,
    pressed: BTreeSet<PlayalongInput>,
    closed: bool,
}

impl<T, S, P, K> SettingsSession<T, S, P, K>
where
    T: ReferenceTrack,
    S: PreferenceStore,
    P: SoundPlayer,
    K: AnalyticsSink,
{
    /// Open the screen, loading calibrations, sfx toggles and controls
    ///
    /// # Errors
    /// `InvalidConfig` if `setup` is unusable
    pub fn open(
        setup: CalibrationSetup,
        store: S,
        track: T,
        player: P,
        sink: K,
    ) -> Result<Self, SettingsError> {
        setup
            .validate()
            .inspect_err(|err| log_settings_error(err, "open_session"))?;

        let key_calibration =
            CalibrationTracker::load(InputDevice::Keyboard.preference_key(), setup, &store);
        let mouse_calibration =
            CalibrationTracker::load(InputDevice::Mouse.preference_key(), setup, &store);
        let sfx = SfxSettings::load(&store);
        let controls = PlayalongControls::load(&store);
        let cycler = ControlsCycler::new(&controls);

        tracing::info!(
            key_calibration = key_calibration.calibration(),
            mouse_calibration = mouse_calibration.calibration(),
            controls = cycler.current_name(),
            "playalong settings opened"
        );

        Ok(Self {
            track,
            store,
            player,
            sink,
            key_calibration,
            mouse_calibration,
            sfx,
            controls,
            cycler,
            pressed: BTreeSet::new(),
            closed: false,
        })
    }

    // ========================================================================
    // CALIBRATION
    // ========================================================================

    /// Start the reference loop if stopped, otherwise stop it
    ///
    /// Returns whether the loop is playing afterwards.
    pub fn toggle_playback(&mut self) -> bool {
        if self.track.is_playing() {
            self.track.stop();
        } else {
            self.track.play_looping();
        }
        self.track.is_playing()
    }

    pub fn is_playing(&self) -> bool {
        self.track.is_playing()
    }

    /// Keyboard press; taps the keyboard tracker when it is button A
    pub fn on_key_pressed(&mut self, key: &str) -> Option<SampleOutcome> {
        if !self.track.is_playing()
            || self.controls.input_for_key(key) != Some(PlayalongInput::ButtonA)
        {
            return None;
        }
        Some(self.fire(InputDevice::Keyboard))
    }

    /// Pointer press; taps the mouse tracker on a left click over the
    /// calibration area
    pub fn on_pointer_pressed(
        &mut self,
        over_calibration_area: bool,
        button: PointerButton,
    ) -> Option<SampleOutcome> {
        if !self.track.is_playing() || !over_calibration_area || button != PointerButton::Left {
            return None;
        }
        Some(self.fire(InputDevice::Mouse))
    }

    /// Zero one device's calibration (persisted on close)
    pub fn reset(&mut self, device: InputDevice) {
        self.tracker_mut(device).reset();
        self.sink.track(MetricEvent::CalibrationReset { device });
    }

    pub fn tracker(&self, device: InputDevice) -> &CalibrationTracker {
        match device {
            InputDevice::Keyboard => &self.key_calibration,
            InputDevice::Mouse => &self.mouse_calibration,
        }
    }

    /// Calibration formatted for display with five decimal places
    pub fn calibration_label(&self, device: InputDevice) -> String {
        format!("{:.5}", self.tracker(device).calibration())
    }

    fn tracker_mut(&mut self, device: InputDevice) -> &mut CalibrationTracker {
        match device {
            InputDevice::Keyboard => &mut self.key_calibration,
            InputDevice::Mouse => &mut self.mouse_calibration,
        }
    }

    fn fire(&mut self, device: InputDevice) -> SampleOutcome {
        let position = self.track.position_secs();
        let outcome = self.tracker_mut(device).fire_input(position);
        self.sink.track(MetricEvent::CalibrationSample {
            device,
            offset_secs: outcome.offset_secs(),
            accepted: outcome.is_accepted(),
        });
        outcome
    }

    // ========================================================================
    // SOUND EFFECTS
    // ========================================================================

    /// Flip a sound-effect toggle; persisted immediately
    pub fn toggle_sfx(&mut self, setting: SfxSetting) -> Result<bool, SettingsError> {
        let enabled = self
            .sfx
            .toggle(setting, &mut self.store, &mut self.player)
            .inspect_err(|err| log_settings_error(err, "toggle_sfx"))?;
        self.sink.track(MetricEvent::SfxToggled {
            key: setting.preference_key().to_string(),
            enabled,
        });
        Ok(enabled)
    }

    pub fn sfx(&self) -> &SfxSettings {
        &self.sfx
    }

    // ========================================================================
    // CONTROLS
    // ========================================================================

    /// Move to the next (`dir > 0`) or previous (`dir < 0`) preset and
    /// persist it
    ///
    /// Returns the name of the selected preset.
    pub fn cycle_controls(&mut self, dir: i32) -> Result<String, SettingsError> {
        self.controls = self.cycler.cycle(dir).clone();
        self.controls
            .persist(&mut self.store)
            .inspect_err(|err| log_settings_error(err, "cycle_controls"))?;

        let preset = self.cycler.current_name().to_string();
        self.sink.track(MetricEvent::ControlsChanged {
            preset: preset.clone(),
        });
        Ok(preset)
    }

    pub fn controls(&self) -> &PlayalongControls {
        &self.controls
    }

    /// Text of the preset button, e.g. `Controls: Default`
    pub fn controls_button_label(&self) -> String {
        self.cycler.label()
    }

    /// Mapping rendered with the currently held inputs highlighted
    pub fn controls_label(&self) -> String {
        self.controls.to_input_string(&self.pressed)
    }

    /// Update the set of held inputs from the keys currently down
    ///
    /// Returns the new controls label only when the set changed.
    pub fn update_held_keys<'a, I>(&mut self, held_keys: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pressed: BTreeSet<PlayalongInput> = held_keys
            .into_iter()
            .filter_map(|key| self.controls.input_for_key(key))
            .collect();

        if pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        Some(self.controls_label())
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Close the screen: stop the loop, persist both calibrations, and send
    /// the exit analytics event
    ///
    /// Calling it again after a successful close only returns the summary.
    pub fn close(&mut self) -> Result<SessionSummary, SettingsError> {
        let summary = self.summary();
        if self.closed {
            return Ok(summary);
        }

        self.track.stop();
        self.key_calibration
            .persist(&mut self.store)
            .inspect_err(|err| log_settings_error(err, "close_session"))?;
        self.mouse_calibration
            .persist(&mut self.store)
            .inspect_err(|err| log_settings_error(err, "close_session"))?;

        self.sink.track(MetricEvent::SettingsExited {
            key_calibration: summary.key_calibration,
            mouse_calibration: summary.mouse_calibration,
            sfx: summary.sfx.clone(),
        });
        self.closed = true;

        tracing::info!(
            key_calibration = summary.key_calibration,
            mouse_calibration = summary.mouse_calibration,
            "playalong settings closed"
        );
        Ok(summary)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            key_calibration: self.key_calibration.calibration(),
            mouse_calibration: self.mouse_calibration.calibration(),
            sfx: self.sfx.snapshot(),
            controls_preset: self.cycler.current_name().to_string(),
        }
    }

    pub fn track(&self) -> &T {
        &self.track
    }

    pub fn track_mut(&mut self) -> &mut T {
        &mut self.track
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Give back the preference store, e.g. to inspect what was written
    pub fn into_store(self) -> S {
        self.store
    }
}
