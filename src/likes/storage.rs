//! Key-value storage backends
//!
//! Provides in-memory storage and file-based storage with atomic writes.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// String key-value storage, the shape of browser local storage
#[async_trait]
pub trait KeyValueStorage: Send + Sync + Debug {
    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete a value
    async fn remove(&self, key: &str) -> Result<()>;

    /// Write several values together.
    ///
    /// Backends that can persist them in one step should, so a failure
    /// leaves either all or none of them written.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value).await?;
        }
        Ok(())
    }
}

/// Process-local storage, lost on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        self.values.write().await.extend(entries);
        Ok(())
    }
}

/// Storage persisted as one JSON object in a file.
///
/// Values are cached in memory; every write rewrites the file through a
/// temporary file and a rename. The cache only changes once the file has
/// been written.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Path to the storage file
    path: PathBuf,
    /// Current values (cached)
    values: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileStorage {
    /// Open storage at `path`, loading existing values if present
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                Error::storage(format!("Failed to read {}: {e}", path.display()))
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    Error::storage(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Arc::new(RwLock::new(values)),
        })
    }

    /// Get the storage file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(values)
            .map_err(|e| Error::storage(format!("Failed to serialize storage: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::storage(format!("Failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::storage(format!("Failed to write storage file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::storage(format!("Failed to rename storage file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.set_many(vec![(key.to_string(), value)]).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        if !values.contains_key(key) {
            return Ok(());
        }

        let mut next = values.clone();
        next.remove(key);
        self.save(&next).await?;
        *values = next;
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let mut values = self.values.write().await;
        let mut next = values.clone();
        next.extend(entries);
        self.save(&next).await?;
        *values = next;
        Ok(())
    }
}
