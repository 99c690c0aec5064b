// MemoryPreferences - volatile preference store
//
// Used by tests and by CLI dry runs. Counts flushes so callers can check the
// "flush immediately" contract of persist operations.

use std::collections::HashMap;

use super::PreferenceStore;
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Float(f64),
    Bool(bool),
    Text(String),
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, Stored>,
    pending_writes: usize,
    flush_count: usize,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flush() calls
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Writes made since the last flush
    pub fn pending_writes(&self) -> usize {
        self.pending_writes
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn put(&mut self, key: &str, value: Stored) {
        self.values.insert(key.to_string(), value);
        self.pending_writes += 1;
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_float(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(Stored::Float(value)) => *value,
            _ => default,
        }
    }

    fn put_float(&mut self, key: &str, value: f64) {
        self.put(key, Stored::Float(value));
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(Stored::Bool(value)) => *value,
            _ => default,
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, Stored::Bool(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(Stored::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.put(key, Stored::Text(value.to_string()));
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        self.pending_writes = 0;
        self.flush_count += 1;
        Ok(())
    }
}
