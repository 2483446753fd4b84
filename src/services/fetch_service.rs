//! One fetch-with-cache lifecycle shared by every explorer screen.
//!
//! A [`Resource`] says where its data comes from and how it is cached; the
//! [`FetchService`] owns the published state and enforces the lifecycle:
//! single in-flight guard, optional cache short-circuit, request, publish,
//! cache write.

use crate::errors::FetchError;
use crate::services::api_client::ApiClient;
use crate::services::cache_store::{CacheKey, CacheStore};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// A fresh cache entry answers `fetch` without touching the network.
    ReadThrough,
    /// The cache only seeds the initial state; `fetch` always refreshes.
    WarmStart,
    Disabled,
}

#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Key: Send + Sync;
    type Output: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    const NAME: &'static str;

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::Disabled
    }

    fn cache_key(&self, _key: &Self::Key) -> Option<CacheKey> {
        None
    }

    async fn request(&self, api: &ApiClient, key: &Self::Key) -> Result<Self::Output, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

pub struct FetchService<R: Resource> {
    resource: R,
    api: ApiClient,
    cache: CacheStore,
    state: watch::Sender<FetchState<R::Output>>,
    in_flight: AtomicBool,
    cancel: watch::Sender<u64>,
}

impl<R: Resource> FetchService<R> {
    pub fn new(resource: R, api: ApiClient, cache: CacheStore) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        let (cancel, _) = watch::channel(0);
        Self {
            resource,
            api,
            cache,
            state,
            in_flight: AtomicBool::new(false),
            cancel,
        }
    }

    pub fn snapshot(&self) -> FetchState<R::Output> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<R::Output>> {
        self.state.subscribe()
    }

    /// Seeds `data` from a fresh cache entry for warm-start resources.
    /// Returns whether anything was loaded.
    pub async fn warm(&self, key: &R::Key) -> bool {
        if self.resource.cache_policy() != CachePolicy::WarmStart {
            return false;
        }
        let Some(cache_key) = self.resource.cache_key(key) else {
            return false;
        };
        match self.cache.get::<R::Output>(&cache_key).await {
            Some(value) => {
                debug!("{}: warm start from cache", R::NAME);
                self.state.send_modify(|state| state.data = Some(value));
                true
            }
            None => false,
        }
    }

    /// Abandons the request currently in flight, if any. The aborted fetch
    /// keeps the previous `data` and reports no error.
    pub fn cancel(&self) {
        self.cancel.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    pub async fn fetch(&self, key: &R::Key) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("{}: fetch already in flight, ignoring", R::NAME);
            return;
        }
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            state: &self.state,
        };
        let mut cancelled = self.cancel.subscribe();

        let policy = self.resource.cache_policy();
        let cache_key = match policy {
            CachePolicy::Disabled => None,
            _ => self.resource.cache_key(key),
        };

        if policy == CachePolicy::ReadThrough {
            if let Some(cache_key) = &cache_key {
                if let Some(value) = self.cache.get::<R::Output>(cache_key).await {
                    debug!("{}: served from cache", R::NAME);
                    self.state.send_modify(|state| state.data = Some(value));
                    return;
                }
            }
        }

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = tokio::select! {
            result = self.resource.request(&self.api, key) => result,
            _ = cancelled.changed() => Err(FetchError::Cancelled),
        };

        match result {
            Ok(value) => {
                if let Some(cache_key) = &cache_key {
                    if let Err(e) = self.cache.put(cache_key, &value).await {
                        warn!("{}: could not write cache: {}", R::NAME, e);
                    }
                }
                info!("{}: fetch succeeded", R::NAME);
                self.state.send_modify(|state| state.data = Some(value));
            }
            Err(e) if e.is_cancelled() => {
                info!("{}: request was cancelled", R::NAME);
            }
            Err(e) => {
                error!("{}: network or decoding error: {}", R::NAME, e);
                self.state.send_modify(|state| state.error = Some(e));
            }
        }
    }
}

/// Clears the loading flag and the in-flight claim however `fetch` exits,
/// including when its future is dropped mid-request.
struct InFlightGuard<'a, T> {
    in_flight: &'a AtomicBool,
    state: &'a watch::Sender<FetchState<T>>,
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, ValidatorDetail};
    use crate::repositories::MemoryStore;
    use crate::services::api_client::testing::{test_config, ScriptedTransport};
    use crate::services::resources::{DelegatorsResource, ValidatorDetailResource, ValidatorsResource};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const DETAIL_URL: &str = "https://beach.test/v1/validator/Node1";
    const ALL_URL: &str = "https://beach.test/v1/validators/all";
    const TOP_URL: &str = "https://beach.test/v1/validators/top";

    fn service<R: Resource>(resource: R, transport: Arc<ScriptedTransport>) -> FetchService<R> {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()), Duration::from_secs(300));
        FetchService::new(resource, ApiClient::new(&test_config(), transport), cache)
    }

    fn validator_json(pubkey: &str, stake: u64) -> serde_json::Value {
        json!({
            "activatedStake": stake,
            "commission": 5.0,
            "votePubkey": pubkey,
            "delegatorCount": 3,
            "moniker": "",
            "version": "1.18.22",
            "lastVote": 100
        })
    }

    async fn wait_until_loading<T: Clone>(rx: &mut watch::Receiver<FetchState<T>>) {
        rx.wait_for(|state| state.is_loading).await.unwrap();
    }

    #[tokio::test]
    async fn success_publishes_data_and_clears_loading() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(DETAIL_URL, &fixtures::details_response_json("Beach Node"));
        let service = service(ValidatorDetailResource, transport.clone());

        service.fetch(&"Node1".to_string()).await;

        let state = service.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.data.map(|d| d.moniker), Some("Beach Node".to_string()));
    }

    #[tokio::test]
    async fn read_through_cache_hit_skips_network() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(DETAIL_URL, &fixtures::details_response_json("Beach Node"));
        let service = service(ValidatorDetailResource, transport.clone());
        let key = "Node1".to_string();

        service.fetch(&key).await;
        service.fetch(&key).await;

        assert_eq!(transport.request_count(), 1);
        assert!(service.snapshot().data.is_some());
    }

    #[tokio::test]
    async fn server_error_keeps_previous_data() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(ALL_URL, &json!([validator_json("A", 10)]));
        transport.respond_json(TOP_URL, &json!([validator_json("A", 10)]));
        transport.respond(ALL_URL, 500, "internal error");
        transport.respond_json(TOP_URL, &json!([validator_json("A", 10)]));
        let service = service(ValidatorsResource, transport.clone());

        service.fetch(&()).await;
        let before = service.snapshot().data;
        assert!(before.is_some());

        service.fetch(&()).await;
        let state = service.snapshot();
        assert_eq!(
            state.error,
            Some(FetchError::Status {
                code: 500,
                url: ALL_URL.to_string()
            })
        );
        assert_eq!(state.data, before);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn invalid_body_never_populates_data() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut body = fixtures::details_response_json("Beach Node");
        body["validator"].as_object_mut().unwrap().remove("moniker");
        transport.respond_json(DETAIL_URL, &body);
        let service = service(ValidatorDetailResource, transport);

        service.fetch(&"Node1".to_string()).await;

        let state = service.snapshot();
        assert!(matches!(state.error, Some(FetchError::Decode { .. })));
        assert_eq!(state.data, None::<ValidatorDetail>);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_untouched() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(ALL_URL, &json!([validator_json("A", 10)]));
        transport.respond_json(TOP_URL, &json!([validator_json("A", 10)]));
        transport.respond_json(ALL_URL, &json!([validator_json("B", 20)]));
        transport.respond(TOP_URL, 200, "{");
        let cache = CacheStore::new(Arc::new(MemoryStore::new()), Duration::from_secs(300));
        let api = ApiClient::new(&test_config(), transport);
        let first = FetchService::new(ValidatorsResource, api.clone(), cache.clone());

        first.fetch(&()).await;
        first.fetch(&()).await;
        assert!(first.snapshot().error.is_some());

        let second = FetchService::new(ValidatorsResource, api, cache);
        assert!(second.warm(&()).await);
        let warmed = second.snapshot().data.unwrap();
        assert_eq!(warmed.all_validators[0].vote_pubkey, "A");
    }

    #[tokio::test]
    async fn concurrent_fetch_is_a_no_op() {
        let transport = Arc::new(ScriptedTransport::gated());
        transport.respond_json(DETAIL_URL, &fixtures::details_response_json("Beach Node"));
        let service = Arc::new(service(ValidatorDetailResource, transport.clone()));
        let mut rx = service.subscribe();

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.fetch(&"Node1".to_string()).await })
        };
        wait_until_loading(&mut rx).await;
        let during = service.snapshot();

        service.fetch(&"Node1".to_string()).await;
        assert_eq!(service.snapshot(), during);
        assert_eq!(transport.request_count(), 1);

        transport.release(1);
        first.await.unwrap();
        assert!(service.snapshot().data.is_some());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn cancel_mid_flight_is_benign() {
        let transport = Arc::new(ScriptedTransport::gated());
        let service = Arc::new(service(DelegatorsResource, transport.clone()));
        let mut rx = service.subscribe();

        let task = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.fetch(&"Vote1".to_string()).await })
        };
        wait_until_loading(&mut rx).await;
        service.cancel();
        task.await.unwrap();

        assert_eq!(service.snapshot(), FetchState::default());
    }

    #[tokio::test]
    async fn cancelled_refresh_keeps_previous_data() {
        let transport = Arc::new(ScriptedTransport::gated());
        let url = "https://beach.test/v1/validators/Vote1";
        transport.respond_json(url, &fixtures::details_response_json("Beach Node"));
        transport.respond_json(url, &fixtures::details_response_json("Beach Node"));
        let service = Arc::new(service(DelegatorsResource, transport.clone()));
        let key = "Vote1".to_string();

        transport.release(1);
        service.fetch(&key).await;
        let before = service.snapshot();
        assert_eq!(before.data.as_ref().map(Vec::len), Some(2));

        let mut rx = service.subscribe();
        let task = {
            let service = Arc::clone(&service);
            let key = key.clone();
            tokio::spawn(async move { service.fetch(&key).await })
        };
        wait_until_loading(&mut rx).await;
        service.cancel();
        task.await.unwrap();

        let after = service.snapshot();
        assert_eq!(after.data, before.data);
        assert!(!after.is_loading);
        assert_eq!(after.error, None);
        assert_eq!(transport.request_count(), 2);

        transport.release(1);
        service.fetch(&key).await;
        assert_eq!(service.snapshot().data.map(|d| d.len()), Some(2));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn dropped_fetch_clears_loading_and_guard() {
        let transport = Arc::new(ScriptedTransport::gated());
        transport.respond_json(
            "https://beach.test/v1/validators/Vote1",
            &fixtures::details_response_json("Beach Node"),
        );
        let service = Arc::new(service(DelegatorsResource, transport.clone()));
        let mut rx = service.subscribe();

        let task = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.fetch(&"Vote1".to_string()).await })
        };
        wait_until_loading(&mut rx).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(service.snapshot(), FetchState::default());

        transport.release(1);
        service.fetch(&"Vote1".to_string()).await;
        assert_eq!(service.snapshot().data.map(|d| d.len()), Some(2));
    }

    #[tokio::test]
    async fn transport_cancellation_is_swallowed() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(DETAIL_URL, FetchError::Cancelled);
        let service = service(ValidatorDetailResource, transport);

        service.fetch(&"Node1".to_string()).await;

        assert_eq!(service.snapshot(), FetchState::default());
    }
}
