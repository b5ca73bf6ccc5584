//! Key/value persistence for client preferences

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;
use tracing::{debug, info};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "timer-dashboard";
/// File holding the client namespace, kept apart from other app settings
pub const CLIENT_FILE: &str = "client.json";

/// Keys understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    LastMode,
    ServerEndpoint,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastMode => "lastMode",
            Self::ServerEndpoint => "serverEndpoint",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no configuration directory is available on this platform")]
    NoConfigDir,
}

/// Synchronous get/set contract; reads observe every completed write
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: ConfigKey) -> Option<String>;
    fn set(&self, key: ConfigKey, value: &str) -> Result<(), StoreError>;
}

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: Mutex<Entries>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String> {
        lock(&self.entries).get(key.as_str()).cloned()
    }

    fn set(&self, key: ConfigKey, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// The file is read once at open; every `set` rewrites it through a
/// temporary sibling and a rename so a crash never leaves half a file.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileConfigStore {
    /// Open the store at its platform default location
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_path()?)
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Entries::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}, starting empty", path.display());
                Entries::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        info!("Loaded {} preference(s) from {}", entries.len(), path.display());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String> {
        lock(&self.entries).get(key.as_str()).cloned()
    }

    fn set(&self, key: ConfigKey, value: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        let previous = entries.insert(key.as_str().to_string(), value.to_string());

        if let Err(e) = self.persist(&entries) {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => entries.insert(key.as_str().to_string(), old),
                None => entries.remove(key.as_str()),
            };
            return Err(e);
        }

        debug!("Saved {} = {}", key.as_str(), value);
        Ok(())
    }
}

/// `<config dir>/timer-dashboard/client.json`
pub fn default_path() -> Result<PathBuf, StoreError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CLIENT_FILE))
        .ok_or(StoreError::NoConfigDir)
}
