//! Best-effort preference persistence.
//!
//! Two string preferences (the last successfully resolved handles) and one
//! JSON aggregate snapshot, under fixed keys in a single file. Reads are
//! defensive: a missing file or malformed JSON counts as absent. Writes
//! are never surfaced as errors; the page must work without them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

pub const USER_KEY: &str = "portfolio.github.user";
pub const ORG_KEY: &str = "portfolio.github.org";
pub const SNAPSHOT_KEY: &str = "portfolio.github.snapshot";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "portfolio.github.user", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "portfolio.github.org", default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(rename = "portfolio.github.snapshot", default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
}

pub struct PrefStore {
    path: PathBuf,
    // Serializes read-modify-write cycles so concurrent updates cannot
    // overwrite each other's halves.
    lock: Mutex<()>,
}

impl PrefStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Atomic read-modify-write: loads the current preferences, applies the
    /// closure and saves the result under the lock.
    pub fn update(&self, apply: impl FnOnce(&mut Preferences)) {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut preferences = self.load();
        apply(&mut preferences);
        self.save(&preferences);
    }

    pub fn load(&self) -> Preferences {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Preferences::default();
        };
        match serde_json::from_str(&raw) {
            Ok(preferences) => preferences,
            Err(error) => {
                debug!(%error, path = %self.path.display(), "ignoring malformed preferences");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) {
        let body = match serde_json::to_string_pretty(preferences) {
            Ok(body) => body,
            Err(error) => {
                debug!(%error, "could not serialize preferences");
                return;
            }
        };
        if let Err(error) = fs::write(&self.path, body) {
            debug!(%error, path = %self.path.display(), "could not persist preferences");
        }
    }
}
