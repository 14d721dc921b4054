use anyhow::Result;
use juhannus_core::JuhannusError;
use juhannus_core::store::ParticipantStore;
use owo_colors::OwoColorize;
use uuid::Uuid;

use super::{Context, actor};
use crate::render::Render;

pub fn modify(
    ctx: &Context,
    id: Uuid,
    name: Option<String>,
    vote: Option<i64>,
    staff: bool,
) -> Result<()> {
    let actor = actor(staff);
    if !actor.is_privileged() {
        return Err(JuhannusError::Unauthorized.into());
    }

    let current = ctx
        .store
        .participant(id)?
        .ok_or(JuhannusError::ParticipantNotFound(id))?;

    let name = name.unwrap_or(current.name);
    let vote = vote.unwrap_or_else(|| i64::from(current.vote));

    let participant = ctx.ledger().modify(id, &name, vote, actor)?;
    println!("{}", "  Modified:".yellow());
    println!("   {}", participant.render());
    Ok(())
}

pub fn delete(ctx: &Context, id: Uuid, staff: bool) -> Result<()> {
    ctx.ledger().delete(id, actor(staff))?;
    println!("{}", format!("  Deleted: {id}").red());
    Ok(())
}

pub fn visibility(ctx: &Context, id: Uuid, visible: bool, staff: bool) -> Result<()> {
    let participant = ctx.ledger().set_visible(id, visible, actor(staff))?;
    let state = if visible { "visible" } else { "hidden" };
    println!("  {} is now {state}", participant.name.bold());
    Ok(())
}
