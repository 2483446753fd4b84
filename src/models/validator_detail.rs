use crate::models::{Block, EpochSlots, HistoricData, StakeAccount};
use serde::{Deserialize, Serialize};

/// Envelope returned by both `/validator/{pubkey}` and `/validators/{pubkey}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDetailsResponse {
    pub validator: ValidatorDetail,
    pub slots: EpochSlots,
    pub historic: Vec<HistoricData>,
    pub latest_blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDetail {
    pub activated_stake: u64,
    pub stake_percentage: String,
    pub commission: f64,
    pub epoch_credits: Vec<Vec<i64>>,
    pub epoch_vote_account: bool,
    pub last_vote: u64,
    pub node_pubkey: String,
    pub root_slot: u64,
    pub vote_pubkey: String,
    pub block_production: BlockProduction,
    pub delegating_stake_accounts: Vec<StakeAccount>,
    pub delegator_count: u64,
    pub location: Location,
    pub moniker: String,
    pub website: String,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
    pub version: String,
    pub details: String,
    pub asn: Asn,
}

impl ValidatorDetail {
    /// `[epoch, credits]` pairs; rows with fewer than two columns are skipped.
    pub fn epoch_credit_pairs(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.epoch_credits
            .iter()
            .filter_map(|row| match row.as_slice() {
                [epoch, credits, ..] => Some((*epoch, *credits)),
                _ => None,
            })
    }

    pub fn skip_rate(&self) -> Option<f64> {
        self.block_production.skip_rate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProduction {
    pub leader_slots: u64,
    pub skipped_slots: u64,
}

impl BlockProduction {
    pub fn skip_rate(&self) -> Option<f64> {
        if self.leader_slots == 0 {
            return None;
        }
        Some(self.skipped_slots as f64 / self.leader_slots as f64 * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asn {
    pub code: u64,
    pub organization: String,
}
