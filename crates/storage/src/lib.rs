use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{debug, warn};

use shared::domain::DEFAULT_DISPLAY_NAME;

pub const TOKEN_KEY: &str = "token";
pub const USER_NAME_KEY: &str = "user_name";

/// Synchronous string key-value store backing the client session.
///
/// Reads of a missing key return `None`. Backends never surface write
/// failures to callers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

fn lock_entries(
    entries: &Mutex<BTreeMap<String, String>>,
) -> MutexGuard<'_, BTreeMap<String, String>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock_entries(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock_entries(&self.entries).remove(key);
    }
}

/// Key-value store persisted as a flat JSON object on disk.
///
/// Every mutation rewrites the file through a sibling temp file and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory '{}' for session file",
                    parent.display()
                )
            })?;
        }

        let entries = match fs::read(&path) {
            Ok(raw) => match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        "session file is not a JSON string map, starting empty: {err}"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read session file '{}'", path.display()))
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "session file opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        if let Err(err) = write_atomically(&self.path, entries) {
            warn!(path = %self.path.display(), "failed to persist session file: {err:#}");
        }
    }
}

fn write_atomically(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let serialized = serde_json::to_vec_pretty(entries).context("serialize session entries")?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, serialized)
        .with_context(|| format!("failed to write '{}'", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!(
            "failed to move '{}' into place at '{}'",
            tmp.display(),
            path.display()
        )
    })?;
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = lock_entries(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = lock_entries(&self.entries);
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

/// Authentication token and display name of the signed-in user.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Arc::new(JsonFileStore::open(path)?)))
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn set_display_name(&self, name: &str) {
        self.store.set(USER_NAME_KEY, name);
    }

    pub fn get_display_name(&self) -> Option<String> {
        self.store.get(USER_NAME_KEY)
    }

    pub fn display_name_or_default(&self) -> String {
        self.get_display_name()
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    /// Drops the token and display name together.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_NAME_KEY);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.has_token())
            .field("display_name", &self.get_display_name())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
