use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub blocknumber: u64,
    pub blocktime: BlockTime,
    pub metrics: BlockMetrics,
    pub proposer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTime {
    pub absolute: i64,
    pub relative: i64,
}

// Field names follow the API, including its spelling of `sucessfultxs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetrics {
    pub txcount: u64,
    pub failedtxs: u64,
    pub totalfees: u64,
    pub instructions: u64,
    pub sucessfultxs: u64,
    pub innerinstructions: u64,
    pub totalvaluemoved: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricData {
    pub stake: u64,
    pub delegators: u64,
    pub timestamp: String,
}
