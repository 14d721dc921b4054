use anyhow::Result;
use chrono::Datelike;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{Render, voting_state};

pub fn run(ctx: &Context, year: Option<i32>) -> Result<()> {
    let now = ctx.now();
    let year = year.unwrap_or_else(|| now.year());
    let schedule = &ctx.schedule;

    println!("{}", format!("Midsummer {year}").bold());
    println!("   Saturday       {}", schedule.midsummer_saturday(year).render());
    println!("   Voting closes  {}", schedule.voting_deadline(year).render());
    println!("   Results due    {}", schedule.results_deadline(year).render());
    println!("   {}", voting_state(schedule.is_voting_open(year, &now)));

    Ok(())
}
