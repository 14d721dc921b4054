//! Events, their text blocks, and participants.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::Schedule;
use crate::template::render_text;

/// Reusable titled text, attached to events as header or body copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: Uuid,
    pub title: String,
    pub text: String,
}

impl TextBlock {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        TextBlock {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One year's midsummer vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub year: i32,
    pub header_id: Uuid,
    pub body_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<u32>,
    #[serde(default)]
    pub is_final: bool,
}

impl Event {
    pub fn new(year: i32, header_id: Uuid, body_id: Uuid) -> Self {
        Event {
            year,
            header_id,
            body_id,
            result: None,
            is_final: false,
        }
    }

    /// A new event for `year` reusing this event's header and body.
    pub fn successor(&self, year: i32) -> Self {
        Event::new(year, self.header_id, self.body_id)
    }

    // =========================================================================
    // Deadlines. `year` overrides the event's own year for what-if queries.
    // =========================================================================

    pub fn midsummer_saturday(&self, schedule: &Schedule, year: Option<i32>) -> DateTime<Tz> {
        schedule.midsummer_saturday(year.unwrap_or(self.year))
    }

    pub fn voting_deadline(&self, schedule: &Schedule, year: Option<i32>) -> DateTime<Tz> {
        schedule.voting_deadline(year.unwrap_or(self.year))
    }

    pub fn results_deadline(&self, schedule: &Schedule, year: Option<i32>) -> DateTime<Tz> {
        schedule.results_deadline(year.unwrap_or(self.year))
    }

    pub fn is_voting_open<T: TimeZone>(
        &self,
        schedule: &Schedule,
        now: &DateTime<T>,
        year: Option<i32>,
    ) -> bool {
        schedule.is_voting_open(year.unwrap_or(self.year), now)
    }

    /// Substitute this event's year and deadlines into `template`.
    pub fn render_text(&self, schedule: &Schedule, template: &str) -> String {
        render_text(template, self.year, schedule)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Midsummer {}", self.year)
    }
}

/// A single named vote on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub vote: u8,
    /// Year of the owning event.
    pub event: i32,
    pub created: DateTime<Utc>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Participant {
    /// Built by the ledger after validation; `vote` must already be in range.
    pub(crate) fn new<T: TimeZone>(event: i32, name: String, vote: u8, created: &DateTime<T>) -> Self {
        Participant {
            id: Uuid::new_v4(),
            name,
            vote,
            event,
            created: created.with_timezone(&Utc),
            visible: true,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
