use anyhow::Result;
use juhannus_core::lifecycle::{self, set_result};
use owo_colors::OwoColorize;

use super::{Context, actor};
use crate::render::Render;

pub fn run(ctx: &Context, year: i32, value: Option<u32>, is_final: bool, staff: bool) -> Result<()> {
    let event = set_result(&ctx.store, year, value, is_final, actor(staff))?;
    println!("{}", event.render());
    Ok(())
}

pub fn delete_event(ctx: &Context, year: i32, staff: bool) -> Result<()> {
    lifecycle::delete_event(&ctx.store, year, actor(staff))?;
    println!("{}", format!("  Deleted: Midsummer {year}").red());
    Ok(())
}
