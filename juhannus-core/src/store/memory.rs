//! In-process store.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::{EventStore, ParticipantStore, StoreData};
use crate::error::{JuhannusError, JuhannusResult};
use crate::event::{Event, Participant, TextBlock};

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> JuhannusResult<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|_| JuhannusError::Storage("Store lock poisoned".into()))
    }
}

impl EventStore for MemoryStore {
    fn events(&self) -> JuhannusResult<Vec<Event>> {
        Ok(self.lock()?.events())
    }

    fn event(&self, year: i32) -> JuhannusResult<Option<Event>> {
        Ok(self.lock()?.event(year))
    }

    fn insert_event_if_absent(&self, event: &Event) -> JuhannusResult<bool> {
        Ok(self.lock()?.insert_event_if_absent(event))
    }

    fn update_event(&self, event: &Event) -> JuhannusResult<()> {
        self.lock()?.update_event(event)
    }

    fn delete_event(&self, year: i32) -> JuhannusResult<()> {
        self.lock()?.delete_event(year)
    }

    fn text(&self, id: Uuid) -> JuhannusResult<Option<TextBlock>> {
        Ok(self.lock()?.text(id))
    }

    fn put_text(&self, block: &TextBlock) -> JuhannusResult<()> {
        self.lock()?.put_text(block);
        Ok(())
    }
}

impl ParticipantStore for MemoryStore {
    fn create_participant(&self, participant: &Participant) -> JuhannusResult<()> {
        self.lock()?.create_participant(participant)
    }

    fn update_participant(&self, participant: &Participant) -> JuhannusResult<()> {
        self.lock()?.update_participant(participant)
    }

    fn delete_participant(&self, id: Uuid) -> JuhannusResult<()> {
        self.lock()?.delete_participant(id)
    }

    fn participant(&self, id: Uuid) -> JuhannusResult<Option<Participant>> {
        Ok(self.lock()?.participant(id))
    }

    fn participants(&self, year: i32) -> JuhannusResult<Vec<Participant>> {
        Ok(self.lock()?.participants(year))
    }
}
