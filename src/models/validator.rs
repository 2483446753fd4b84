use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    pub activated_stake: u64,
    pub commission: f64,
    pub vote_pubkey: String,
    pub delegator_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ll: Option<Vec<f64>>,
    pub moniker: String,
    pub version: String,
    pub last_vote: u64,
    #[serde(rename = "pictureURL", default)]
    pub picture_url: Option<String>,
}

impl ValidatorSummary {
    pub fn id(&self) -> &str {
        &self.vote_pubkey
    }
}

/// Both validator sets returned by a single list refresh. This is also the
/// payload persisted under the validators list cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorsSnapshot {
    pub all_validators: Vec<ValidatorSummary>,
    pub top_validators: Vec<ValidatorSummary>,
}

impl ValidatorsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.all_validators.is_empty() || self.top_validators.is_empty()
    }
}
