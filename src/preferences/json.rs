// JsonPreferences - flat JSON object persisted to a single file
//
// Writes are buffered in memory and written out on flush(). The file is
// written to a temporary sibling first and then renamed over the original so
// a crash mid-write never leaves a truncated preference file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::PreferenceStore;
use crate::error::{log_settings_error, SettingsError};

/// File-backed preference store
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    values: Map<String, Value>,
    dirty: bool,
}

impl JsonPreferences {
    /// Open the preference file at `path`
    ///
    /// A missing file yields an empty store (it is created on first flush).
    ///
    /// # Errors
    /// - `PreferencesIo` if the file exists but cannot be read
    /// - `PreferencesParse` if the contents are not a JSON object
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Map::new(),
            Ok(contents) => Self::parse(&path, &contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!(
                    "[Preferences] {:?} not found, starting with empty preferences",
                    path
                );
                Map::new()
            }
            Err(err) => {
                let err = SettingsError::PreferencesIo {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                };
                log_settings_error(&err, "open_preferences");
                return Err(err);
            }
        };

        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(path: &Path, contents: &str) -> Result<Map<String, Value>, SettingsError> {
        let parsed = match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(SettingsError::PreferencesParse {
                path: path.display().to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
            Err(err) => Err(SettingsError::PreferencesParse {
                path: path.display().to_string(),
                reason: err.to_string(),
            }),
        };
        parsed.inspect_err(|err| log_settings_error(err, "open_preferences"))
    }

    fn io_error(&self, err: std::io::Error) -> SettingsError {
        SettingsError::PreferencesIo {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }

    fn put(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }
}

impl PreferenceStore for JsonPreferences {
    fn get_float(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    fn put_float(&mut self, key: &str, value: f64) {
        self.put(key, Value::from(value));
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, Value::Bool(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.put(key, Value::String(value.to_string()));
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_string_pretty(&self.values).map_err(|err| {
            SettingsError::PreferencesIo {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            }
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)
            .and_then(|_| {
                fs::rename(&tmp, &self.path).inspect_err(|_| {
                    let _ = fs::remove_file(&tmp);
                })
            })
            .map_err(|err| self.io_error(err))
            .inspect_err(|err| log_settings_error(err, "flush_preferences"))?;

        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "preferences flushed");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "playalong-prefs-{}-{}-{}.json",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_path("missing");
        let prefs = JsonPreferences::open(&path).unwrap();

        assert_eq!(prefs.get_float("anything", 0.25), 0.25);
        assert!(prefs.get_bool("anything", true));
        assert!(prefs.get_string("anything").is_none());
        assert!(!path.exists(), "open must not create the file");
    }

    #[test]
    fn test_flush_without_writes_leaves_disk_untouched() {
        let path = temp_path("clean");
        let mut prefs = JsonPreferences::open(&path).unwrap();
        prefs.flush().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_flush_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let mut prefs = JsonPreferences::open(&path).unwrap();
        prefs.put_float("calibration", -0.0125);
        prefs.put_bool("sfx", false);
        prefs.put_string("controls", "{\"button_a\":\"J\"}");
        prefs.flush().unwrap();
        assert_eq!(prefs.path(), path.as_path());

        let reopened = JsonPreferences::open(&path).unwrap();
        assert!((reopened.get_float("calibration", 0.0) + 0.0125).abs() < 1e-12);
        assert!(!reopened.get_bool("sfx", true));
        assert_eq!(
            reopened.get_string("controls").as_deref(),
            Some("{\"button_a\":\"J\"}")
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_type_mismatch_falls_back_to_default() {
        let path = temp_path("mismatch");
        let mut prefs = JsonPreferences::open(&path).unwrap();
        prefs.put_string("calibration", "not a number");
        prefs.put_float("flag", 1.0);

        assert_eq!(prefs.get_float("calibration", 0.5), 0.5);
        assert!(prefs.get_bool("flag", true));
        assert!(prefs.get_string("flag").is_none());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonPreferences::open(&path).unwrap_err();
        assert!(matches!(err, SettingsError::PreferencesParse { .. }));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_non_object_json_is_parse_error() {
        let path = temp_path("array");
        fs::write(&path, "[1, 2, 3]").unwrap();

        match JsonPreferences::open(&path).unwrap_err() {
            SettingsError::PreferencesParse { reason, .. } => {
                assert!(reason.contains("array"), "unexpected reason: {}", reason);
            }
            e => panic!("Expected PreferencesParse error, got: {:?}", e),
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_flush_creates_parent_directories() {
        let dir = temp_path("nested-dir");
        let path = dir.join("deeper").join("prefs.json");
        let mut prefs = JsonPreferences::open(&path).unwrap();
        prefs.put_bool("created", true);
        prefs.flush().unwrap();

        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let path = temp_path("rename-fails");
        let mut prefs = JsonPreferences::open(&path).unwrap();
        prefs.put_bool("sfx", true);

        // A non-empty directory at the target makes the rename fail
        fs::create_dir_all(path.join("occupied")).unwrap();

        let err = prefs.flush().unwrap_err();
        assert!(matches!(err, SettingsError::PreferencesIo { .. }));

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists(), "temp file left behind");

        let _ = fs::remove_dir_all(&path);
    }
}
