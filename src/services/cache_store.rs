use crate::errors::FetchError;
use crate::repositories::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Storage keys of one cached record: the encoded payload and its capture
/// timestamp live under separate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub payload: String,
    pub timestamp: String,
}

impl CacheKey {
    pub fn validators() -> Self {
        Self {
            payload: "cached_validators".to_string(),
            timestamp: "cached_validators_timestamp".to_string(),
        }
    }

    pub fn validator_details(pubkey: &str) -> Self {
        Self {
            payload: format!("validator_details_{}", pubkey),
            timestamp: format!("validator_details_timestamp_{}", pubkey),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub payload: String,
    pub captured_at: DateTime<Utc>,
}

impl CachedEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.captured_at);
        match age.to_std() {
            Ok(age) => age < ttl,
            // captured "in the future": clock moved backwards
            Err(_) => true,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    clock: Clock,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the cached value only while it is fresh and decodable.
    /// Backend failures are logged and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = match self.entry(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read for {} failed: {}", key.payload, e);
                return None;
            }
        };

        if !entry.is_fresh((self.clock)(), self.ttl) {
            debug!("Cache entry {} expired", key.payload);
            return None;
        }

        match entry.decode() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache entry {} could not be decoded: {}", key.payload, e);
                None
            }
        }
    }

    pub async fn put<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<(), FetchError> {
        let payload = serde_json::to_string(value).map_err(|e| FetchError::Storage(e.to_string()))?;
        self.store.set(&key.payload, payload).await?;
        self.store
            .set(&key.timestamp, (self.clock)().to_rfc3339())
            .await?;
        debug!("Cached {}", key.payload);
        Ok(())
    }

    async fn entry(&self, key: &CacheKey) -> Result<Option<CachedEntry>, FetchError> {
        let Some(payload) = self.store.get(&key.payload).await? else {
            return Ok(None);
        };
        let Some(raw_timestamp) = self.store.get(&key.timestamp).await? else {
            return Ok(None);
        };
        let captured_at = DateTime::parse_from_rfc3339(&raw_timestamp)
            .map_err(|e| FetchError::Storage(format!("bad timestamp for {}: {}", key.payload, e)))?
            .with_timezone(&Utc);

        Ok(Some(CachedEntry {
            payload,
            captured_at,
        }))
    }
}
