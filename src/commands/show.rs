use anyhow::Result;
use juhannus_core::ledger::SortOrder;
use juhannus_core::lifecycle::{render_texts, select_event};
use juhannus_core::store::EventStore;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{Render, voting_state};

pub fn run(ctx: &Context, year: Option<i32>, order: SortOrder) -> Result<()> {
    let events = ctx.store.events()?;

    if events.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    let event = select_event(&events, year)?;
    let (header, body) = render_texts(&ctx.store, &ctx.schedule, event)?;
    let open = event.is_voting_open(&ctx.schedule, &ctx.now(), None);

    println!("{}", event.render());
    println!("{}", header.bold());
    println!();
    println!("{body}");
    println!();
    println!(
        "{}  (deadline {})",
        voting_state(open),
        event.voting_deadline(&ctx.schedule, None).render()
    );
    println!();

    let participants = ctx.ledger().list_visible(event.year, order)?;
    if participants.is_empty() {
        println!("   {}", "No votes yet".dimmed());
    }
    for participant in &participants {
        println!("   {}", participant.render());
    }

    Ok(())
}
