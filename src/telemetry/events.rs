//! Analytics event types emitted by the playalong settings screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calibration::InputDevice;

/// Events describing what the player did on the settings screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    CalibrationSample {
        device: InputDevice,
        offset_secs: f64,
        accepted: bool,
    },
    CalibrationReset {
        device: InputDevice,
    },
    ControlsChanged {
        preset: String,
    },
    SfxToggled {
        key: String,
        enabled: bool,
    },
    /// Final event sent once when the screen closes
    SettingsExited {
        key_calibration: f64,
        mouse_calibration: f64,
        sfx: BTreeMap<String, bool>,
    },
}

impl MetricEvent {
    /// Human-readable analytics event name
    pub fn name(&self) -> &'static str {
        match self {
            MetricEvent::CalibrationSample { .. } => "Playalong Calibration Sample",
            MetricEvent::CalibrationReset { .. } => "Playalong Calibration Reset",
            MetricEvent::ControlsChanged { .. } => "Playalong Controls Changed",
            MetricEvent::SfxToggled { .. } => "Playalong SFX Toggled",
            MetricEvent::SettingsExited { .. } => "Exit Playalong Settings",
        }
    }
}
