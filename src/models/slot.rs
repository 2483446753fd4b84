use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub relative_slot: u64,
    pub absolute_slot: u64,
    pub confirmed_block: bool,
}

/// Proposed slots grouped by epoch, oldest epoch first.
pub type EpochSlots = Vec<Vec<Slot>>;
