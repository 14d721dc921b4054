use anyhow::Result;
use juhannus_core::store::EventStore;
use juhannus_core::{Event, TextBlock};
use owo_colors::OwoColorize;

use super::Context;

pub fn run(ctx: &Context, year: i32, header: String, body: String) -> Result<()> {
    if ctx.store.event(year)?.is_some() {
        anyhow::bail!("An event for {year} already exists");
    }

    let header = TextBlock::new(year.to_string(), header);
    let body = TextBlock::new(year.to_string(), body);
    ctx.store.put_text(&header)?;
    ctx.store.put_text(&body)?;

    let event = Event::new(year, header.id, body.id);
    if !ctx.store.insert_event_if_absent(&event)? {
        anyhow::bail!("An event for {year} already exists");
    }

    println!("{}", format!("  Created: {event}").green());
    Ok(())
}
