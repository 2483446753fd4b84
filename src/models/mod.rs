mod block;
mod slot;
mod stake_account;
mod validator;
mod validator_detail;

#[cfg(test)]
pub(crate) use validator_detail::fixtures;

pub use block::{Block, HistoricData};
pub use slot::{EpochSlots, Slot};
pub use stake_account::StakeAccount;
pub use validator::{ValidatorSummary, ValidatorsSnapshot};
pub use validator_detail::{ValidatorDetail, ValidatorDetailsResponse};
