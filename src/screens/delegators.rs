use super::{body_for, ScreenView};
use crate::models::StakeAccount;
use crate::services::fetch_service::FetchState;
use crate::utils::helpers::{format_sol, shorten_pubkey};
use std::fmt::{self, Write};

pub fn present(_pubkey: &String, state: &FetchState<Vec<StakeAccount>>) -> ScreenView {
    ScreenView {
        title: "Delegators".to_string(),
        body: body_for(
            state,
            "Error loading delegators",
            Vec::is_empty,
            ("No delegators found", None),
            |out, accounts| render(out, accounts),
        ),
    }
}

fn render(out: &mut String, accounts: &[StakeAccount]) -> fmt::Result {
    for account in accounts {
        writeln!(
            out,
            "{:<14} Stake: {:>20} SOL  (since epoch {})",
            shorten_pubkey(account.id()),
            format_sol(account.lamports),
            account.data.stake.delegation.activation_epoch
        )?;
    }
    Ok(())
}
