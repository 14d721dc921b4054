//! JSON file store.
//!
//! The whole state lives in one `juhannus.json` document. Every operation
//! takes a lock on a sidecar lock file (shared for reads, exclusive for
//! writes), so separate processes see each other's writes and an
//! insert-if-absent cannot race.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use uuid::Uuid;

use super::{EventStore, ParticipantStore, StoreData};
use crate::error::{JuhannusError, JuhannusResult};
use crate::event::{Event, Participant, TextBlock};

const DATA_FILE: &str = "juhannus.json";
const LOCK_FILE: &str = ".juhannus.lock";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

enum Access {
    Read,
    Write,
}

impl FileStore {
    /// Open (creating if needed) the store in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> JuhannusResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    fn lock(&self, access: &Access) -> JuhannusResult<File> {
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;

        match access {
            Access::Read => FileExt::lock_shared(&file)?,
            Access::Write => FileExt::lock_exclusive(&file)?,
        }

        Ok(file)
    }

    fn load(path: &Path) -> JuhannusResult<StoreData> {
        if !path.exists() {
            return Ok(StoreData::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| JuhannusError::Serialization(format!("{}: {e}", path.display())))
    }

    fn save(&self, data: &StoreData) -> JuhannusResult<()> {
        let path = self.path();
        let temp = self.dir.join(format!("{DATA_FILE}.tmp"));

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| JuhannusError::Serialization(e.to_string()))?;

        fs::write(&temp, content)?;
        fs::rename(&temp, &path)?;
        tracing::debug!(path = %path.display(), "store saved");
        Ok(())
    }

    fn read<R>(&self, f: impl FnOnce(&StoreData) -> R) -> JuhannusResult<R> {
        let _guard = self.lock(&Access::Read)?;
        let data = Self::load(&self.path())?;
        Ok(f(&data))
    }

    /// Load, apply `f`, and save only if `f` succeeded and reported a change.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut StoreData) -> JuhannusResult<(R, bool)>,
    ) -> JuhannusResult<R> {
        let _guard = self.lock(&Access::Write)?;
        let mut data = Self::load(&self.path())?;
        let (result, changed) = f(&mut data)?;
        if changed {
            self.save(&data)?;
        }
        Ok(result)
    }
}

impl EventStore for FileStore {
    fn events(&self) -> JuhannusResult<Vec<Event>> {
        self.read(StoreData::events)
    }

    fn event(&self, year: i32) -> JuhannusResult<Option<Event>> {
        self.read(|data| data.event(year))
    }

    fn insert_event_if_absent(&self, event: &Event) -> JuhannusResult<bool> {
        self.write(|data| {
            let inserted = data.insert_event_if_absent(event);
            Ok((inserted, inserted))
        })
    }

    fn update_event(&self, event: &Event) -> JuhannusResult<()> {
        self.write(|data| data.update_event(event).map(|()| ((), true)))
    }

    fn delete_event(&self, year: i32) -> JuhannusResult<()> {
        self.write(|data| data.delete_event(year).map(|()| ((), true)))
    }

    fn text(&self, id: Uuid) -> JuhannusResult<Option<TextBlock>> {
        self.read(|data| data.text(id))
    }

    fn put_text(&self, block: &TextBlock) -> JuhannusResult<()> {
        self.write(|data| {
            data.put_text(block);
            Ok(((), true))
        })
    }
}

impl ParticipantStore for FileStore {
    fn create_participant(&self, participant: &Participant) -> JuhannusResult<()> {
        self.write(|data| data.create_participant(participant).map(|()| ((), true)))
    }

    fn update_participant(&self, participant: &Participant) -> JuhannusResult<()> {
        self.write(|data| data.update_participant(participant).map(|()| ((), true)))
    }

    fn delete_participant(&self, id: Uuid) -> JuhannusResult<()> {
        self.write(|data| data.delete_participant(id).map(|()| ((), true)))
    }

    fn participant(&self, id: Uuid) -> JuhannusResult<Option<Participant>> {
        self.read(|data| data.participant(id))
    }

    fn participants(&self, year: i32) -> JuhannusResult<Vec<Participant>> {
        self.read(|data| data.participants(year))
    }
}
