use crate::errors::FetchError;
use crate::models::{EpochSlots, StakeAccount, ValidatorDetail, ValidatorDetailsResponse, ValidatorSummary, ValidatorsSnapshot};
use crate::services::api_client::ApiClient;
use crate::services::cache_store::CacheKey;
use crate::services::fetch_service::{CachePolicy, FetchService, Resource};
use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashSet;

pub type ValidatorsService = FetchService<ValidatorsResource>;
pub type ValidatorDetailService = FetchService<ValidatorDetailResource>;
pub type DelegatorsService = FetchService<DelegatorsResource>;
pub type SlotsService = FetchService<SlotsResource>;

/// `/validators/all` for network statistics plus `/validators/top` for the list.
pub struct ValidatorsResource;

#[async_trait]
impl Resource for ValidatorsResource {
    type Key = ();
    type Output = ValidatorsSnapshot;

    const NAME: &'static str = "validators";

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::WarmStart
    }

    fn cache_key(&self, _key: &()) -> Option<CacheKey> {
        Some(CacheKey::validators())
    }

    async fn request(&self, api: &ApiClient, _key: &()) -> Result<ValidatorsSnapshot, FetchError> {
        let (all_validators, top_validators) = futures::try_join!(
            api.get_json::<Vec<ValidatorSummary>>(&["validators", "all"]),
            api.get_json::<Vec<ValidatorSummary>>(&["validators", "top"]),
        )?;
        warn_on_duplicate_ids("validators/all", &all_validators);
        warn_on_duplicate_ids("validators/top", &top_validators);
        info!(
            "Fetched {} validators ({} in top list)",
            all_validators.len(),
            top_validators.len()
        );

        Ok(ValidatorsSnapshot {
            all_validators,
            top_validators,
        })
    }
}

pub struct ValidatorDetailResource;

#[async_trait]
impl Resource for ValidatorDetailResource {
    type Key = String;
    type Output = ValidatorDetail;

    const NAME: &'static str = "validator details";

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::ReadThrough
    }

    fn cache_key(&self, pubkey: &String) -> Option<CacheKey> {
        Some(CacheKey::validator_details(pubkey))
    }

    async fn request(&self, api: &ApiClient, pubkey: &String) -> Result<ValidatorDetail, FetchError> {
        let response: ValidatorDetailsResponse = api.get_json(&["validator", pubkey.as_str()]).await?;
        info!(
            "Successfully decoded validator details for {}",
            response.validator.moniker
        );
        Ok(response.validator)
    }
}

/// Stake accounts delegating to a vote account.
pub struct DelegatorsResource;

#[async_trait]
impl Resource for DelegatorsResource {
    type Key = String;
    type Output = Vec<StakeAccount>;

    const NAME: &'static str = "delegators";

    async fn request(&self, api: &ApiClient, vote_pubkey: &String) -> Result<Vec<StakeAccount>, FetchError> {
        let response: ValidatorDetailsResponse =
            api.get_json(&["validators", vote_pubkey.as_str()]).await?;
        Ok(response.validator.delegating_stake_accounts)
    }
}

/// Proposed slots of a validator, grouped by epoch.
pub struct SlotsResource;

#[async_trait]
impl Resource for SlotsResource {
    type Key = String;
    type Output = EpochSlots;

    const NAME: &'static str = "slots";

    async fn request(&self, api: &ApiClient, pubkey: &String) -> Result<EpochSlots, FetchError> {
        let response: ValidatorDetailsResponse = api.get_json(&["validator", pubkey.as_str()]).await?;
        Ok(response.slots)
    }
}

fn warn_on_duplicate_ids(source: &str, validators: &[ValidatorSummary]) {
    let mut seen = HashSet::with_capacity(validators.len());
    for validator in validators {
        if validator.id().is_empty() {
            warn!("{} returned a validator without a vote pubkey", source);
        } else if !seen.insert(validator.id()) {
            warn!("{} returned duplicate validator {}", source, validator.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::repositories::MemoryStore;
    use crate::services::api_client::testing::{test_config, ScriptedTransport};
    use crate::services::cache_store::CacheStore;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn api(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(&test_config(), transport)
    }

    #[tokio::test]
    async fn validators_list_needs_both_requests() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json("https://beach.test/v1/validators/all", &json!([]));
        transport.respond("https://beach.test/v1/validators/top", 503, "");

        let err = ValidatorsResource
            .request(&api(transport.clone()), &())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 503, .. }));
    }

    #[tokio::test]
    async fn delegators_come_from_vote_account_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            "https://beach.test/v1/validators/Vote1",
            &fixtures::details_response_json("Beach Node"),
        );

        let accounts = DelegatorsResource
            .request(&api(transport), &"Vote1".to_string())
            .await
            .unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].voter(), "Vote111111111111111111111111111111111111111");
    }

    #[tokio::test]
    async fn slots_come_from_node_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            "https://beach.test/v1/validator/Node1",
            &fixtures::details_response_json("Beach Node"),
        );

        let slots = SlotsResource
            .request(&api(transport), &"Node1".to_string())
            .await
            .unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1][0].absolute_slot, 280432008);
    }

    #[tokio::test]
    async fn pubkey_is_sent_as_one_encoded_segment() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            "https://beach.test/v1/validator/Node1%2Fslots%3Fx",
            &fixtures::details_response_json("Beach Node"),
        );

        let detail = ValidatorDetailResource
            .request(&api(transport.clone()), &"Node1/slots?x".to_string())
            .await
            .unwrap();
        assert_eq!(detail.moniker, "Beach Node");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn dot_segment_pubkey_is_refused_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = DelegatorsResource
            .request(&api(transport.clone()), &"..".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InvalidPath("..".to_string()));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn delegators_and_slots_are_never_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..2 {
            transport.respond_json(
                "https://beach.test/v1/validator/Node1",
                &fixtures::details_response_json("Beach Node"),
            );
        }
        let cache = CacheStore::new(Arc::new(MemoryStore::new()), Duration::from_secs(300));
        let service: SlotsService = FetchService::new(SlotsResource, api(transport.clone()), cache);

        service.fetch(&"Node1".to_string()).await;
        service.fetch(&"Node1".to_string()).await;

        assert_eq!(transport.request_count(), 2);
        assert!(!service.warm(&"Node1".to_string()).await);
    }
}
