//! Preferences - durable key-value storage for playalong settings
//!
//! The settings core never talks to a concrete storage backend. It reads and
//! writes through [`PreferenceStore`], which mirrors the getter/putter/flush
//! shape of a typical game preferences file. Two implementations ship with
//! the crate:
//! - [`JsonPreferences`]: a flat JSON object on disk
//! - [`MemoryPreferences`]: an in-memory map used by tests and dry runs

mod json;
mod memory;

pub use json::JsonPreferences;
pub use memory::MemoryPreferences;

use crate::error::SettingsError;

/// Preference keys used by the playalong settings screen.
pub mod keys {
    pub const CALIBRATION_KEY: &str = "playalong_calibration_key";
    pub const CALIBRATION_MOUSE: &str = "playalong_calibration_mouse";
    pub const SFX_PERFECT_FAIL: &str = "playalong_sfx_perfect_fail";
    pub const SFX_MONSTER_FAIL: &str = "playalong_sfx_monster_fail";
    pub const SFX_MONSTER_ACE: &str = "playalong_sfx_monster_ace";
    pub const CONTROLS: &str = "playalong_controls";
}

/// Key-value preference store with explicit durability.
///
/// `put_*` calls may be buffered; nothing is guaranteed durable until
/// [`PreferenceStore::flush`] returns `Ok`. Getters return `default` when the
/// key is absent or holds a value of another type.
pub trait PreferenceStore {
    fn get_float(&self, key: &str, default: f64) -> f64;
    fn put_float(&mut self, key: &str, value: f64);

    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn put_bool(&mut self, key: &str, value: bool);

    fn get_string(&self, key: &str) -> Option<String>;
    fn put_string(&mut self, key: &str, value: &str);

    /// Make every pending write durable
    fn flush(&mut self) -> Result<(), SettingsError>;
}
