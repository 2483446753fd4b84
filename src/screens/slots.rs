use super::{body_for, ScreenView};
use crate::models::{EpochSlots, Slot};
use crate::services::fetch_service::FetchState;
use std::fmt::{self, Write};

pub fn present(_pubkey: &String, state: &FetchState<EpochSlots>) -> ScreenView {
    ScreenView {
        title: "Proposed Slots".to_string(),
        body: body_for(
            state,
            "Error loading slots",
            |epochs| epochs.iter().all(Vec::is_empty),
            ("No slots found", None),
            render,
        ),
    }
}

fn render(out: &mut String, epochs: &EpochSlots) -> fmt::Result {
    for (index, slots) in epochs.iter().enumerate() {
        writeln!(out, "Epoch {}", index + 1)?;
        for slot in slots {
            writeln!(
                out,
                "  Slot {:<8} {:<10} Absolute Slot: {}",
                slot.relative_slot,
                status(slot),
                slot.absolute_slot
            )?;
        }
    }
    Ok(())
}

fn status(slot: &Slot) -> &'static str {
    if slot.confirmed_block {
        "Confirmed"
    } else {
        "Skipped"
    }
}
