//! Sound-effect toggles for playalong judgement feedback
//!
//! Each toggle is persisted the moment it changes. Turning one on plays a
//! preview of the sound so the player knows what they enabled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::audio::SoundPlayer;
use crate::error::SettingsError;
use crate::preferences::{keys, PreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SfxSetting {
    /// Played when a perfect run is broken
    PerfectFail,
    /// Played when the monster goal is failed
    MonsterFail,
    /// Played when the monster goal is aced
    MonsterAce,
}

impl SfxSetting {
    pub const ALL: [SfxSetting; 3] = [
        SfxSetting::PerfectFail,
        SfxSetting::MonsterFail,
        SfxSetting::MonsterAce,
    ];

    pub fn preference_key(&self) -> &'static str {
        match self {
            SfxSetting::PerfectFail => keys::SFX_PERFECT_FAIL,
            SfxSetting::MonsterFail => keys::SFX_MONSTER_FAIL,
            SfxSetting::MonsterAce => keys::SFX_MONSTER_ACE,
        }
    }

    /// Sound played as a preview when the toggle is switched on
    pub fn sound_id(&self) -> &'static str {
        match self {
            SfxSetting::PerfectFail => "playalong_sfx_perfect_fail",
            SfxSetting::MonsterFail => "playalong_sfx_monster_fail",
            SfxSetting::MonsterAce => "playalong_sfx_monster_ace",
        }
    }

    pub fn preview_volume(&self) -> f32 {
        match self {
            SfxSetting::PerfectFail | SfxSetting::MonsterFail => 0.5,
            SfxSetting::MonsterAce => 1.0,
        }
    }
}

/// Current state of every sound-effect toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfxSettings {
    enabled: BTreeMap<SfxSetting, bool>,
}

impl SfxSettings {
    /// Read every toggle; missing ones default to enabled
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        let enabled = SfxSetting::ALL
            .into_iter()
            .map(|setting| (setting, store.get_bool(setting.preference_key(), true)))
            .collect();
        Self { enabled }
    }

    pub fn is_enabled(&self, setting: SfxSetting) -> bool {
        self.enabled.get(&setting).copied().unwrap_or(true)
    }

    /// Flip one toggle, persist it immediately, and preview it if now enabled
    ///
    /// Returns the new value.
    pub fn toggle<S, P>(
        &mut self,
        setting: SfxSetting,
        store: &mut S,
        player: &mut P,
    ) -> Result<bool, SettingsError>
    where
        S: PreferenceStore + ?Sized,
        P: SoundPlayer + ?Sized,
    {
        let enabled = !self.is_enabled(setting);
        store.put_bool(setting.preference_key(), enabled);
        store.flush()?;
        self.enabled.insert(setting, enabled);

        if enabled {
            player.play(setting.sound_id(), setting.preview_volume());
        }
        Ok(enabled)
    }

    /// Preference key → enabled, for analytics and reporting
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        SfxSetting::ALL
            .into_iter()
            .map(|setting| (setting.preference_key().to_string(), self.is_enabled(setting)))
            .collect()
    }
}
