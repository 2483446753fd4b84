use super::KeyValueStore;
use crate::errors::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "cache_entries";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryDocument {
    pub key: String,
    pub value: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

pub async fn get_cache_entry(
    db: &Database,
    key: &str,
) -> Result<Option<CacheEntryDocument>, mongodb::error::Error> {
    let collection: Collection<CacheEntryDocument> = db.collection(COLLECTION);
    collection.find_one(doc! { "key": key }).await
}

pub async fn save_cache_entry(
    db: &Database,
    key: &str,
    value: &str,
) -> Result<(), mongodb::error::Error> {
    let collection: Collection<CacheEntryDocument> = db.collection(COLLECTION);
    let filter = doc! { "key": key };
    let update = doc! {
        "$set": {
            "key": key,
            "value": value,
            "updated_at": Utc::now().timestamp_millis(),
        }
    };
    collection.update_one(filter, update).upsert(true).await?;
    Ok(())
}

/// Cache entries kept in MongoDB, one document per key.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for MongoStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FetchError> {
        Ok(get_cache_entry(&self.db, key).await?.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), FetchError> {
        save_cache_entry(&self.db, key, &value).await?;
        Ok(())
    }
}
