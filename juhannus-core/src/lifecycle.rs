//! Yearly rollover and event selection.
//!
//! There is no scheduler. Callers run [`ensure_current_year_event`] on every
//! request; the first one made during midsummer week creates that year's
//! event by copying the texts of the latest earlier event.

use chrono::{DateTime, Datelike, TimeZone};

use crate::clock::Clock;
use crate::error::{JuhannusError, JuhannusResult};
use crate::event::Event;
use crate::ledger::Actor;
use crate::schedule::Schedule;
use crate::store::EventStore;

/// Outcome of a rollover check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollover {
    /// There are no events at all, so there is nothing to copy texts from.
    NoEvents,
    /// Today is not in this year's midsummer week.
    NotMidsummerWeek,
    /// This year's event already exists.
    Exists,
    /// This year's event should be created (planning only).
    Needed(Event),
    /// This call created this year's event.
    Created(Event),
}

/// Decide whether `now` calls for a new event, without touching storage.
pub fn plan_rollover<T: TimeZone>(
    events: &[Event],
    now: &DateTime<T>,
    schedule: &Schedule,
) -> Rollover {
    if events.is_empty() {
        return Rollover::NoEvents;
    }

    if !schedule.is_midsummer_week(now) {
        return Rollover::NotMidsummerWeek;
    }

    let year = now.with_timezone(&schedule.tz()).year();
    if events.iter().any(|e| e.year == year) {
        return Rollover::Exists;
    }

    let template = events
        .iter()
        .filter(|e| e.year < year)
        .max_by_key(|e| e.year)
        .or_else(|| events.iter().max_by_key(|e| e.year));

    match template {
        Some(previous) => Rollover::Needed(previous.successor(year)),
        None => Rollover::NoEvents,
    }
}

/// Create this year's event if today is in midsummer week and it is missing.
///
/// Safe to call from concurrent requests: the store's insert-if-absent keeps
/// at most one event per year, and losers of the race report `Exists`.
pub fn ensure_current_year_event<S, C>(
    store: &S,
    schedule: &Schedule,
    clock: &C,
) -> JuhannusResult<Rollover>
where
    S: EventStore + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now();
    let events = store.events()?;

    match plan_rollover(&events, &now, schedule) {
        Rollover::Needed(event) => {
            if store.insert_event_if_absent(&event)? {
                tracing::info!(year = event.year, "created midsummer event");
                Ok(Rollover::Created(event))
            } else {
                Ok(Rollover::Exists)
            }
        }
        other => Ok(other),
    }
}

/// The event for `year`, or the most recent one when `year` is `None`.
pub fn select_event(events: &[Event], year: Option<i32>) -> JuhannusResult<&Event> {
    if events.is_empty() {
        return Err(JuhannusError::NoEvents);
    }

    match year {
        Some(year) => events
            .iter()
            .find(|e| e.year == year)
            .ok_or(JuhannusError::EventNotFound(year)),
        None => events
            .iter()
            .max_by_key(|e| e.year)
            .ok_or(JuhannusError::NoEvents),
    }
}

/// Years of all events, ascending.
pub fn event_years(events: &[Event]) -> Vec<i32> {
    let mut years: Vec<_> = events.iter().map(|e| e.year).collect();
    years.sort_unstable();
    years
}

/// Record the announced result for `year`. Staff only.
pub fn set_result<S: EventStore + ?Sized>(
    store: &S,
    year: i32,
    result: Option<u32>,
    is_final: bool,
    actor: Actor,
) -> JuhannusResult<Event> {
    if !actor.is_privileged() {
        return Err(JuhannusError::Unauthorized);
    }

    let mut event = store.event(year)?.ok_or(JuhannusError::EventNotFound(year))?;
    event.result = result;
    event.is_final = is_final;
    store.update_event(&event)?;
    tracing::info!(year, ?result, is_final, "event result updated");

    Ok(event)
}

/// Delete the event for `year` and all of its participants. Staff only.
pub fn delete_event<S: EventStore + ?Sized>(store: &S, year: i32, actor: Actor) -> JuhannusResult<()> {
    if !actor.is_privileged() {
        return Err(JuhannusError::Unauthorized);
    }

    store.delete_event(year)?;
    tracing::info!(year, "event deleted");
    Ok(())
}

/// Header and body of `event`, rendered for its year.
pub fn render_texts<S: EventStore + ?Sized>(
    store: &S,
    schedule: &Schedule,
    event: &Event,
) -> JuhannusResult<(String, String)> {
    let header = store
        .text(event.header_id)?
        .ok_or(JuhannusError::TextNotFound(event.header_id))?;
    let body = store
        .text(event.body_id)?
        .ok_or(JuhannusError::TextNotFound(event.body_id))?;

    Ok((
        event.render_text(schedule, &header.text),
        event.render_text(schedule, &body.text),
    ))
}
