use crate::config::{CacheBackend, Config};
use crate::errors::FetchError;
use crate::repositories::{FileStore, KeyValueStore, MemoryStore, MongoStore};
use log::info;
use mongodb::{Client, Database};
use std::sync::Arc;

pub async fn connect_to_database(mongo_uri: &str, db_name: &str) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(mongo_uri).await?;
    info!("Connected to MongoDB, using database {}", db_name);
    Ok(client.database(db_name))
}

/// Opens the key-value backend selected by `CACHE_BACKEND`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, FetchError> {
    match config.cache_backend {
        CacheBackend::Memory => {
            info!("Using in-memory cache");
            Ok(Arc::new(MemoryStore::new()))
        }
        CacheBackend::File => {
            info!("Using cache file {}", config.cache_path.display());
            Ok(Arc::new(FileStore::open(&config.cache_path).await?))
        }
        CacheBackend::Mongo => {
            let uri = config
                .mongo_uri
                .as_deref()
                .ok_or_else(|| FetchError::Storage("MONGO_URI must be set".to_string()))?;
            let db = connect_to_database(uri, &config.db_name).await?;
            Ok(Arc::new(MongoStore::new(db)))
        }
    }
}
