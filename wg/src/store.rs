//! Client-local key-value store
//!
//! Holds the few pieces of state that survive between runs: the current
//! itinerary, the trip it was planned for, and an optional bearer token.
//! Values are JSON; callers never see how they are laid out on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Key for the live itinerary snapshot
pub const ITINERARY_KEY: &str = "currentItinerary";

/// Key for the trip request the itinerary was planned from
pub const TRIP_KEY: &str = "currentTripData";

/// Key for the bearer token attached to backend calls
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Get/set capability over JSON values
pub trait KeyValueStore: Send + Sync {
    /// Current value for `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing what was there
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Drop `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a typed value
///
/// A value that no longer decodes is logged and treated as absent.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    debug!(%key, "load: called");
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(%key, error = %e, "load: stored value does not decode, ignoring");
            None
        }
    }
}

/// Encode and store a typed value
pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    debug!(%key, "save: called");
    let encoded = serde_json::to_value(value).context(format!("Failed to encode value for {}", key))?;
    store.set(key, encoded)
}

/// Bearer token, if one is stored as a non-empty string
pub fn auth_token(store: &dyn KeyValueStore) -> Option<String> {
    match store.get(AUTH_TOKEN_KEY)? {
        Value::String(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
        _ => None,
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| eyre::eyre!("Store lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| eyre::eyre!("Store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// The file is read once on open and rewritten on every change through a
/// temp file and rename, so a crash never leaves half a file behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read store file")?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).context(format!("Failed to parse store file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), keys = entries.len(), "Opened key-value store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        debug!(path = %self.path.display(), "flush: called");
        let content = serde_json::to_string_pretty(entries).context("Failed to encode store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).context("Failed to write store file")?;
        fs::rename(&tmp, &self.path).context("Failed to replace store file")?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| eyre::eyre!("Store lock poisoned"))?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| eyre::eyre!("Store lock poisoned"))?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
