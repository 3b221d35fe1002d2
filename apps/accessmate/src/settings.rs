//! Persisted user settings.
//!
//! A small JSON object under `.accessmate/settings.json`. Unknown keys are
//! kept on write. A missing or unreadable store reads as defaults.

use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_DIR: &str = ".accessmate";
pub const SETTINGS_FILE: &str = "settings.json";
pub const AUTO_FIX_KEY: &str = "accessMateAutoFix";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store rooted at `root/.accessmate/settings.json`.
    pub fn open(root: &Path) -> Self {
        Self::at(root.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt settings store");
                Map::new()
            }
        }
    }

    fn write(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(map)? + "\n";
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "wrote settings");
        Ok(())
    }

    pub fn auto_fix(&self) -> bool {
        self.read()
            .get(AUTO_FIX_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_auto_fix(&self, enabled: bool) -> Result<()> {
        let mut map = self.read();
        map.insert(AUTO_FIX_KEY.to_string(), Value::Bool(enabled));
        self.write(&map)
    }

    /// Flip the auto-fix flag and return the new value.
    pub fn toggle_auto_fix(&self) -> Result<bool> {
        let next = !self.auto_fix();
        self.set_auto_fix(next)?;
        Ok(next)
    }
}
