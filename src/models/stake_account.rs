use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeAccount {
    pub pubkey: String,
    pub lamports: u64,
    pub data: StakeAccountData,
}

impl StakeAccount {
    pub fn id(&self) -> &str {
        &self.pubkey
    }

    pub fn voter(&self) -> &str {
        &self.data.stake.delegation.voter_pubkey
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeAccountData {
    pub state: i64,
    pub meta: StakeAccountMeta,
    #[serde(default)]
    pub lockup: Option<Lockup>,
    pub stake: Stake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeAccountMeta {
    pub rent_exempt_reserve: u64,
    pub authorized: Authorized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorized {
    pub staker: String,
    pub withdrawer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lockup {
    pub unix_timestamp: i64,
    pub epoch: i64,
    pub custodian: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stake {
    pub delegation: Delegation,
    pub credits_observed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    pub voter_pubkey: String,
    pub stake: u64,
    pub activation_epoch: u64,
    pub warmup_cooldown_rate: f64,
}
