use super::{body_for, ScreenView};
use crate::models::ValidatorDetail;
use crate::services::fetch_service::FetchState;
use crate::utils::helpers::{format_commission, format_sol, shorten_pubkey};
use std::fmt::{self, Write};

pub fn present(pubkey: &String, state: &FetchState<ValidatorDetail>) -> ScreenView {
    let title = match &state.data {
        Some(detail) if !detail.moniker.is_empty() => detail.moniker.clone(),
        _ => shorten_pubkey(pubkey),
    };

    ScreenView {
        title,
        body: body_for(
            state,
            "Error loading validator details",
            |_| false,
            (
                "No validator details available",
                Some("Please try again later"),
            ),
            |out, detail| render(out, pubkey, detail),
        ),
    }
}

fn render(out: &mut String, pubkey: &str, detail: &ValidatorDetail) -> fmt::Result {
    writeln!(out, "{}", detail.moniker)?;
    if !detail.website.is_empty() {
        writeln!(out, "{}", detail.website)?;
    }
    writeln!(out)?;
    writeln!(out, "Stake:        {} SOL ({}%)", format_sol(detail.activated_stake), detail.stake_percentage)?;
    writeln!(out, "Commission:   {}%", format_commission(detail.commission))?;
    writeln!(out, "Version:      {}", detail.version)?;
    writeln!(out, "Vote account: {}", detail.vote_pubkey)?;
    writeln!(out, "Identity:     {}", detail.node_pubkey)?;
    writeln!(out, "Last vote:    {}", detail.last_vote)?;
    writeln!(out, "Root slot:    {}", detail.root_slot)?;
    match detail.skip_rate() {
        Some(rate) => writeln!(
            out,
            "Skip rate:    {:.2}% ({} of {} leader slots)",
            rate, detail.block_production.skipped_slots, detail.block_production.leader_slots
        )?,
        None => writeln!(out, "Skip rate:    n/a")?,
    }
    if let Some((epoch, credits)) = detail.epoch_credit_pairs().last() {
        writeln!(out, "Credits:      {} in epoch {}", credits, epoch)?;
    }
    writeln!(out, "Location:     {}", detail.location.country)?;
    writeln!(out, "ASN:          {} ({})", detail.asn.organization, detail.asn.code)?;

    if !detail.details.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", detail.details)?;
    }

    writeln!(out)?;
    writeln!(out, "Delegators ({}): solana-beach delegators {}", detail.delegator_count, pubkey)?;
    writeln!(out, "Proposed Slots:  solana-beach slots {}", pubkey)
}
