//! Small persistence interface for settings, favorites and alert history.
//!
//! Values are JSON documents addressed by key. Writes replace the whole
//! document; there is no expiry.

pub mod alerts;
pub mod favorites;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_]*$").expect("valid regex"));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store value could not be encoded: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("update of '{0}' did not run")]
    UpdateSkipped(String),
}

/// Rewrites the document under a key; receives `None` when it is absent.
pub type Apply<'a> = dyn FnMut(Option<Value>) -> Result<Value, StoreError> + 'a;

/// Raw key/value backend.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn clear(&self, key: &str) -> Result<(), StoreError>;
    /// Read, rewrite and store one document while holding the write lock,
    /// so concurrent updates of the same key cannot overwrite each other.
    fn update(&self, key: &str, apply: &mut Apply<'_>) -> Result<(), StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if KEY_PATTERN.is_match(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        check_key(key)?;
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        check_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, apply: &mut Apply<'_>) -> Result<(), StoreError> {
        check_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let next = apply(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}

/// One `<key>.json` file per key under a root directory.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(path = %root.display(), "opened json store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn read(path: &Path) -> Result<Option<Value>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write(path: &Path, value: &Value) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        check_key(key)?;
        Self::read(&self.path_for(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        check_key(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        Self::write(&self.path_for(key), &value)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn update(&self, key: &str, apply: &mut Apply<'_>) -> Result<(), StoreError> {
        check_key(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let path = self.path_for(key);
        let current = match Self::read(&path) {
            Err(StoreError::Serde(err)) => {
                warn!(key, %err, "replacing unreadable stored value");
                None
            }
            other => other?,
        };
        Self::write(&path, &apply(current)?)
    }
}

/// Decode a raw document, falling back to `T::default()` when it is missing
/// or no longer matches the expected shape.
fn decode<T: DeserializeOwned + Default>(key: &str, raw: Option<Value>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };
    serde_json::from_value(raw).unwrap_or_else(|err| {
        warn!(key, %err, "discarding malformed stored value");
        T::default()
    })
}

/// Prefixes every key with `<namespace>_` and adds typed accessors.
#[derive(Clone)]
pub struct Namespace {
    prefix: String,
    inner: Arc<dyn KeyValueStore>,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn KeyValueStore>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }

    pub fn get(&self, name: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(&self.key(name))
    }

    pub fn set(&self, name: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(&self.key(name), value)
    }

    pub fn clear(&self, name: &str) -> Result<(), StoreError> {
        self.inner.clear(&self.key(name))
    }

    /// Decode a stored document. Missing, unparsable and wrongly shaped
    /// documents all read as `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let key = self.key(name);
        let raw = match self.inner.get(&key) {
            Err(StoreError::Serde(err)) => {
                warn!(key = %key, %err, "stored value is not valid JSON");
                None
            }
            other => other?,
        };
        Ok(decode(&key, raw))
    }

    /// Apply `change` to the decoded document and store the result as one
    /// atomic step with respect to other updates of the same key.
    pub fn update<T, R, F>(&self, name: &str, change: F) -> Result<R, StoreError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let key = self.key(name);
        let mut change = Some(change);
        let mut output = None;
        self.inner.update(&key, &mut |raw| {
            let mut doc: T = decode(&key, raw);
            if let Some(change) = change.take() {
                output = Some(change(&mut doc));
            }
            Ok(serde_json::to_value(&doc)?)
        })?;
        output.ok_or(StoreError::UpdateSkipped(key))
    }

    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        self.set(name, serde_json::to_value(value)?)
    }
}
