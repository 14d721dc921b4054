use anyhow::Result;
use juhannus_core::ledger::Submission;
use juhannus_core::lifecycle::select_event;
use juhannus_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{Context, actor};

pub fn run(ctx: &Context, year: Option<i32>, name: &str, vote: i64, staff: bool) -> Result<()> {
    let events = ctx.store.events()?;
    let event = select_event(&events, year)?;

    let submission = ctx
        .ledger()
        .submit(event, name, vote, &ctx.now(), actor(staff))?;

    // Late public votes vanish without complaint; the voter sees the same reply
    println!("{}", format!("  Vote received for {event}").green());
    if let Submission::Accepted(participant) = submission {
        println!("  {}", participant.id.to_string().dimmed());
    }

    Ok(())
}
