use anyhow::Result;
use juhannus_core::lifecycle::event_years;
use juhannus_core::store::EventStore;
use owo_colors::OwoColorize;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let years = event_years(&ctx.store.events()?);

    let Some(latest) = years.last().copied() else {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    };

    for year in years {
        if year == latest {
            println!("{} {}", year.bold(), "(latest)".dimmed());
        } else {
            println!("{year}");
        }
    }

    Ok(())
}
