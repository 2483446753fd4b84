use super::KeyValueStore;
use crate::errors::FetchError;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Local JSON file holding every cache entry. The whole map is rewritten on
/// each `set`, which is fine for the handful of keys the client uses.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, String> = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened cache file {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FetchError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), FetchError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        let raw = serde_json::to_string(&*entries)
            .map_err(|e| FetchError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}
