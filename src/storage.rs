use crate::errors::StorageError;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs;
use tracing::error;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const ADMIN_PASSWORD_KEY: &str = "admin_password";

/// String key-value persistence for credentials.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>>;
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>>;
}

/// Durable store: a JSON object on disk that survives restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> BTreeMap<String, String> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(values) => values,
                Err(err) => {
                    error!("failed to parse store file {}: {err}", self.path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read store file {}: {err}", self.path.display());
                BTreeMap::new()
            }
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.read_all().await.remove(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all().await;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.read_all().await;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

/// Process-lifetime store, the equivalent of a browser tab's session storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut values)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.with_values(|values| values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_values(|values| values.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_values(|values| values.remove(key));
        Ok(())
    }
}
