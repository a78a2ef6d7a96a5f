//! Persisted login state.
//!
//! The API key lives under a single storage key as JSON (`null` when logged
//! out). Unreadable content is reset to `null` rather than reported.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const API_KEY_STORAGE_KEY: &str = "apiKey";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub api_key_id: i64,
    pub creation_time: i64,
    pub creator_user_id: i64,
    pub key: String,
    pub duration: i64,
}

/// String key/value persistence.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }
}

/// One JSON file per key inside `base_dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read: {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        write_atomic(&self.path_for(key), value)
    }
}

fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    std::fs::write(&tmp_path, contents)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

pub type SharedSession = Session<Arc<dyn Storage>>;

/// The current API key, mirrored into a [`Storage`].
pub struct Session<S> {
    storage: S,
    api_key: RwLock<Option<ApiKey>>,
}

impl<S: Storage> Session<S> {
    /// Reads any stored key. Corrupted content is overwritten with `null`.
    pub fn init(storage: S) -> anyhow::Result<Self> {
        let api_key = match storage.get(API_KEY_STORAGE_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_str::<Option<ApiKey>>(&raw) {
                Ok(api_key) => api_key,
                Err(err) => {
                    tracing::warn!(?err, "discarding unreadable stored api key");
                    storage
                        .set(API_KEY_STORAGE_KEY, "null")
                        .context("reset stored api key")?;
                    None
                }
            },
        };

        Ok(Self {
            storage,
            api_key: RwLock::new(api_key),
        })
    }

    pub fn api_key(&self) -> Option<ApiKey> {
        match self.api_key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_api_key(&self, api_key: Option<ApiKey>) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&api_key).context("serialize api key")?;
        self.storage
            .set(API_KEY_STORAGE_KEY, &raw)
            .context("store api key")?;
        match self.api_key.write() {
            Ok(mut guard) => *guard = api_key,
            Err(poisoned) => *poisoned.into_inner() = api_key,
        }
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.set_api_key(None)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
