//! Persistence seams for events, text blocks and participants.
//!
//! Stores take `&self` so one instance can be shared between concurrent
//! callers; implementations serialize access internally.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{JuhannusError, JuhannusResult};
use crate::event::{Event, Participant, TextBlock};
use crate::ledger::MAX_VOTE;

/// Stores refuse votes outside 0..=100 even if a caller skipped the ledger.
fn check_vote(participant: &Participant) -> JuhannusResult<()> {
    if i64::from(participant.vote) > MAX_VOTE {
        return Err(JuhannusError::InvalidVote(i64::from(participant.vote)));
    }
    Ok(())
}

pub trait EventStore {
    /// All events, oldest year first.
    fn events(&self) -> JuhannusResult<Vec<Event>>;

    fn event(&self, year: i32) -> JuhannusResult<Option<Event>>;

    /// Insert `event` unless one already exists for its year.
    /// Returns true if this call created it.
    fn insert_event_if_absent(&self, event: &Event) -> JuhannusResult<bool>;

    fn update_event(&self, event: &Event) -> JuhannusResult<()>;

    /// Remove an event together with all of its participants.
    fn delete_event(&self, year: i32) -> JuhannusResult<()>;

    fn text(&self, id: Uuid) -> JuhannusResult<Option<TextBlock>>;

    /// Insert or replace a text block.
    fn put_text(&self, block: &TextBlock) -> JuhannusResult<()>;
}

pub trait ParticipantStore {
    fn create_participant(&self, participant: &Participant) -> JuhannusResult<()>;

    fn update_participant(&self, participant: &Participant) -> JuhannusResult<()>;

    fn delete_participant(&self, id: Uuid) -> JuhannusResult<()>;

    fn participant(&self, id: Uuid) -> JuhannusResult<Option<Participant>>;

    /// Every participant of the event for `year`, hidden ones included.
    fn participants(&self, year: i32) -> JuhannusResult<Vec<Participant>>;
}

/// The whole persisted state. Shared by the in-memory and file stores.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct StoreData {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    texts: Vec<TextBlock>,
    #[serde(default)]
    participants: Vec<Participant>,
}

impl StoreData {
    fn events(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.year);
        events
    }

    fn event(&self, year: i32) -> Option<Event> {
        self.events.iter().find(|e| e.year == year).cloned()
    }

    fn insert_event_if_absent(&mut self, event: &Event) -> bool {
        if self.events.iter().any(|e| e.year == event.year) {
            return false;
        }
        self.events.push(event.clone());
        true
    }

    fn update_event(&mut self, event: &Event) -> JuhannusResult<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.year == event.year)
            .ok_or(JuhannusError::EventNotFound(event.year))?;
        *slot = event.clone();
        Ok(())
    }

    fn delete_event(&mut self, year: i32) -> JuhannusResult<()> {
        let before = self.events.len();
        self.events.retain(|e| e.year != year);
        if self.events.len() == before {
            return Err(JuhannusError::EventNotFound(year));
        }
        self.participants.retain(|p| p.event != year);
        Ok(())
    }

    fn text(&self, id: Uuid) -> Option<TextBlock> {
        self.texts.iter().find(|t| t.id == id).cloned()
    }

    fn put_text(&mut self, block: &TextBlock) {
        match self.texts.iter_mut().find(|t| t.id == block.id) {
            Some(slot) => *slot = block.clone(),
            None => self.texts.push(block.clone()),
        }
    }

    fn create_participant(&mut self, participant: &Participant) -> JuhannusResult<()> {
        check_vote(participant)?;
        if !self.events.iter().any(|e| e.year == participant.event) {
            return Err(JuhannusError::EventNotFound(participant.event));
        }
        if self.participants.iter().any(|p| p.id == participant.id) {
            return Err(JuhannusError::Storage(format!(
                "Participant {} already exists",
                participant.id
            )));
        }
        self.participants.push(participant.clone());
        Ok(())
    }

    fn update_participant(&mut self, participant: &Participant) -> JuhannusResult<()> {
        check_vote(participant)?;
        let slot = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant.id)
            .ok_or(JuhannusError::ParticipantNotFound(participant.id))?;
        *slot = participant.clone();
        Ok(())
    }

    fn delete_participant(&mut self, id: Uuid) -> JuhannusResult<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            return Err(JuhannusError::ParticipantNotFound(id));
        }
        Ok(())
    }

    fn participant(&self, id: Uuid) -> Option<Participant> {
        self.participants.iter().find(|p| p.id == id).cloned()
    }

    fn participants(&self, year: i32) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| p.event == year)
            .cloned()
            .collect()
    }
}
