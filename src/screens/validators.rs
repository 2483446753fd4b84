use super::{body_for, ScreenView};
use crate::models::{ValidatorSummary, ValidatorsSnapshot};
use crate::services::fetch_service::FetchState;
use crate::utils::helpers::{format_commission, format_sol, shorten_pubkey, LAMPORTS_PER_SOL};
use crate::utils::network_stats::{superminority_count, total_stake};
use std::fmt::{self, Write};

pub fn present(_key: &(), state: &FetchState<ValidatorsSnapshot>) -> ScreenView {
    ScreenView {
        title: "Validators".to_string(),
        body: body_for(
            state,
            "Error loading validators",
            ValidatorsSnapshot::is_empty,
            ("No validators found", None),
            render,
        ),
    }
}

fn render(out: &mut String, snapshot: &ValidatorsSnapshot) -> fmt::Result {
    let total_sol = total_stake(&snapshot.all_validators) / LAMPORTS_PER_SOL as u128;

    writeln!(out, "Network Statistics")?;
    writeln!(
        out,
        "  Total Validators: {}   Superminority: {}   Total Stake: {} SOL",
        snapshot.all_validators.len(),
        superminority_count(&snapshot.all_validators),
        total_sol
    )?;
    writeln!(out)?;

    for validator in &snapshot.top_validators {
        writeln!(
            out,
            "{:<32} {:>20} SOL {:>7}%",
            display_name(validator),
            format_sol(validator.activated_stake),
            format_commission(validator.commission)
        )?;
    }
    Ok(())
}

fn display_name(validator: &ValidatorSummary) -> String {
    if validator.moniker.is_empty() {
        shorten_pubkey(&validator.vote_pubkey)
    } else {
        validator.moniker.clone()
    }
}
