//! Durable key-value preferences backing the session store.
//!
//! The trait mirrors what the session layer actually needs from the
//! platform: typed get-with-default, set, and remove. Setters never
//! fail the caller; a preference write that cannot be persisted is
//! logged and dropped, because losing session persistence must not
//! crash the UI.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::APP_NAME;

/// Preferences file name inside the app's config directory
const PREFS_FILE: &str = "preferences.json";

/// Durable, process-surviving key → string/bool/i64 storage.
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_string(&self, key: &str, value: &str);

    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn set_bool(&self, key: &str, value: bool);

    fn get_i64(&self, key: &str, default: i64) -> i64;
    fn set_i64(&self, key: &str, value: i64);

    /// Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

/// JSON-file-backed preferences, written through on every mutation.
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl FilePreferences {
    /// Open the per-user preferences file under the platform config dir.
    pub fn open_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Self::open(config_dir.join(APP_NAME).join(PREFS_FILE))
    }

    /// Open (or create) a preferences file at an explicit path.
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    // A corrupt file loses its contents rather than the app
                    warn!(error = %e, path = %path.display(), "Corrupt preferences file, starting empty");
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_value(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Value) {
        let mut values = self.lock();
        values.insert(key.to_string(), value);
        self.persist(&values);
    }

    fn persist(&self, values: &Map<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, "Failed to create preferences directory");
                return;
            }
        }
        let contents = match serde_json::to_string_pretty(values) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to serialize preferences");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, contents) {
            warn!(error = %e, path = %self.path.display(), "Failed to write preferences");
        }
    }
}

impl KeyValueStore for FilePreferences {
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get_value(key) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }

    fn set_string(&self, key: &str, value: &str) {
        self.set_value(key, Value::String(value.to_string()));
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_value(key) {
            Some(Value::Bool(b)) => b,
            _ => default,
        }
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set_value(key, Value::Bool(value));
    }

    fn get_i64(&self, key: &str, default: i64) -> i64 {
        match self.get_value(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            _ => default,
        }
    }

    fn set_i64(&self, key: &str, value: i64) {
        self.set_value(key, Value::Number(value.into()));
    }

    fn remove(&self, key: &str) {
        let mut values = self.lock();
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

/// In-memory preferences for tests and hosts that manage durability
/// themselves.
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<Map<String, Value>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryPreferences {
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.lock().get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    fn set_string(&self, key: &str, value: &str) {
        self.lock()
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.lock().get(key) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.lock().insert(key.to_string(), Value::Bool(value));
    }

    fn get_i64(&self, key: &str, default: i64) -> i64 {
        match self.lock().get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            _ => default,
        }
    }

    fn set_i64(&self, key: &str, value: i64) {
        self.lock().insert(key.to_string(), Value::Number(value.into()));
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let prefs = MemoryPreferences::new();
        prefs.set_string("Token", "abc");
        prefs.set_bool("IsLoggedIn", true);
        prefs.set_i64("UserId", 42);

        assert_eq!(prefs.get_string("Token", ""), "abc");
        assert!(prefs.get_bool("IsLoggedIn", false));
        assert_eq!(prefs.get_i64("UserId", 0), 42);
    }

    #[test]
    fn test_defaults_for_missing_and_mistyped_keys() {
        let prefs = MemoryPreferences::new();
        prefs.set_string("UserId", "not a number");

        assert_eq!(prefs.get_string("missing", "fallback"), "fallback");
        assert!(!prefs.get_bool("missing", false));
        assert_eq!(prefs.get_i64("UserId", 7), 7);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let prefs = MemoryPreferences::new();
        prefs.set_string("Token", "abc");
        prefs.remove("Token");
        prefs.remove("Token");
        assert_eq!(prefs.get_string("Token", ""), "");
    }

    fn temp_prefs_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("serviflex-prefs-{}-{}.json", tag, std::process::id()))
    }

    #[test]
    fn test_file_preferences_survive_reopen() {
        let path = temp_prefs_path("reopen");
        let _ = std::fs::remove_file(&path);

        {
            let prefs = FilePreferences::open(path.clone()).unwrap();
            prefs.set_string("SessionId", "s-1");
            prefs.set_bool("IsLoggedIn", true);
        }

        let reopened = FilePreferences::open(path.clone()).unwrap();
        assert_eq!(reopened.get_string("SessionId", ""), "s-1");
        assert!(reopened.get_bool("IsLoggedIn", false));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_preferences_corrupt_file_starts_empty() {
        let path = temp_prefs_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let prefs = FilePreferences::open(path.clone()).unwrap();
        assert_eq!(prefs.get_string("Token", "default"), "default");

        let _ = std::fs::remove_file(&path);
    }
}
