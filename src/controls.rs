//! Controls - playalong key mappings and preset cycling
//!
//! A [`PlayalongControls`] binds each [`PlayalongInput`] to a key name. The
//! settings screen lets the player cycle through a fixed table of standard
//! presets; a mapping that matches none of them is kept at the front of the
//! list under the name "Custom" so it is never lost by cycling.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{log_settings_error, SettingsError};
use crate::preferences::{keys, PreferenceStore};

/// Display name of a mapping that matches no standard preset
pub const CUSTOM_PRESET_NAME: &str = "Custom";

/// Logical playalong inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayalongInput {
    ButtonA,
    ButtonB,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl PlayalongInput {
    /// Rendering order of the controls label
    pub const ALL: [PlayalongInput; 6] = [
        PlayalongInput::ButtonA,
        PlayalongInput::ButtonB,
        PlayalongInput::DpadUp,
        PlayalongInput::DpadDown,
        PlayalongInput::DpadLeft,
        PlayalongInput::DpadRight,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            PlayalongInput::ButtonA => "A",
            PlayalongInput::ButtonB => "B",
            PlayalongInput::DpadUp => "↑",
            PlayalongInput::DpadDown => "↓",
            PlayalongInput::DpadLeft => "←",
            PlayalongInput::DpadRight => "→",
        }
    }
}

/// Key binding for every playalong input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayalongControls {
    pub button_a: String,
    pub button_b: String,
    pub button_left: String,
    pub button_right: String,
    pub button_up: String,
    pub button_down: String,
}

impl PlayalongControls {
    fn from_keys(a: &str, b: &str, up: &str, down: &str, left: &str, right: &str) -> Self {
        Self {
            button_a: a.to_string(),
            button_b: b.to_string(),
            button_left: left.to_string(),
            button_right: right.to_string(),
            button_up: up.to_string(),
            button_down: down.to_string(),
        }
    }

    /// Key bound to `input`
    pub fn key_for(&self, input: PlayalongInput) -> &str {
        match input {
            PlayalongInput::ButtonA => &self.button_a,
            PlayalongInput::ButtonB => &self.button_b,
            PlayalongInput::DpadUp => &self.button_up,
            PlayalongInput::DpadDown => &self.button_down,
            PlayalongInput::DpadLeft => &self.button_left,
            PlayalongInput::DpadRight => &self.button_right,
        }
    }

    /// Input bound to `key`, first match in rendering order
    pub fn input_for_key(&self, key: &str) -> Option<PlayalongInput> {
        PlayalongInput::ALL
            .into_iter()
            .find(|input| self.key_for(*input).eq_ignore_ascii_case(key))
    }

    /// Render the mapping, wrapping pressed inputs in brackets
    ///
    /// e.g. `A: J  [B: K]  ↑: W  ↓: S  ←: A  →: D`
    pub fn to_input_string(&self, pressed: &BTreeSet<PlayalongInput>) -> String {
        PlayalongInput::ALL
            .iter()
            .map(|input| {
                let entry = format!("{}: {}", input.glyph(), self.key_for(*input));
                if pressed.contains(input) {
                    format!("[{}]", entry)
                } else {
                    entry
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Load the stored mapping, falling back to the default preset
    ///
    /// An undecodable stored value is logged and ignored.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        match store.get_string(keys::CONTROLS) {
            Some(json) => Self::from_json(&json).unwrap_or_else(|err| {
                log_settings_error(&err, "load_controls");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Store the mapping and flush
    pub fn persist<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), SettingsError> {
        let json = serde_json::to_string(self).map_err(|err| SettingsError::InvalidControls {
            reason: err.to_string(),
        })?;
        store.put_string(keys::CONTROLS, &json);
        store.flush()
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|err| SettingsError::InvalidControls {
            reason: err.to_string(),
        })
    }
}

impl Default for PlayalongControls {
    fn default() -> Self {
        standard_presets()
            .into_iter()
            .next()
            .map(|(_, controls)| controls)
            .unwrap_or_else(|| Self::from_keys("J", "K", "W", "S", "A", "D"))
    }
}

/// Standard presets in cycling order; the first one is the default
pub fn standard_presets() -> Vec<(&'static str, PlayalongControls)> {
    vec![
        (
            "Default",
            PlayalongControls::from_keys("J", "K", "W", "S", "A", "D"),
        ),
        (
            "Arrow keys",
            PlayalongControls::from_keys("Z", "X", "Up", "Down", "Left", "Right"),
        ),
        (
            "IJKL",
            PlayalongControls::from_keys("A", "S", "I", "K", "J", "L"),
        ),
        (
            "Numpad",
            PlayalongControls::from_keys("Space", "Enter", "Numpad8", "Numpad2", "Numpad4", "Numpad6"),
        ),
    ]
}

/// Cycles the active mapping through the preset list
#[derive(Debug, Clone)]
pub struct ControlsCycler {
    presets: Vec<(String, PlayalongControls)>,
    index: usize,
}

impl ControlsCycler {
    /// Build the preset list around the player's current mapping
    pub fn new(current: &PlayalongControls) -> Self {
        let standard = standard_presets();
        let is_custom = !standard.iter().any(|(_, controls)| controls == current);

        let mut presets: Vec<(String, PlayalongControls)> = Vec::with_capacity(standard.len() + 1);
        if is_custom {
            presets.push((CUSTOM_PRESET_NAME.to_string(), current.clone()));
        }
        presets.extend(
            standard
                .into_iter()
                .map(|(name, controls)| (name.to_string(), controls)),
        );

        let index = presets
            .iter()
            .position(|(_, controls)| controls == current)
            .unwrap_or(0);

        Self { presets, index }
    }

    /// Step by the sign of `dir`, wrapping at both ends
    pub fn cycle(&mut self, dir: i32) -> &PlayalongControls {
        let len = self.presets.len();
        self.index = match dir.signum() {
            1 => (self.index + 1) % len,
            -1 => (self.index + len - 1) % len,
            _ => self.index,
        };
        self.current()
    }

    pub fn current(&self) -> &PlayalongControls {
        &self.presets[self.index].1
    }

    pub fn current_name(&self) -> &str {
        &self.presets[self.index].0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Names in cycling order
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Text of the preset button
    pub fn label(&self) -> String {
        format!("Controls: {}", self.current_name())
    }
}
