pub mod deadlines;
pub mod events;
pub mod init;
pub mod participant;
pub mod result;
pub mod show;
pub mod vote;

use anyhow::{Context as _, Result};
use juhannus_core::Schedule;
use juhannus_core::clock::{Clock, SystemClock};
use juhannus_core::config::JuhannusConfig;
use juhannus_core::ledger::{Actor, Ledger};
use juhannus_core::lifecycle::{self, Rollover};
use juhannus_core::store::FileStore;
use owo_colors::OwoColorize;

/// Everything a command needs: store, schedule and clock.
pub struct Context {
    pub store: FileStore,
    pub schedule: Schedule,
    pub clock: SystemClock,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = JuhannusConfig::load().context("Failed to load configuration")?;
        let schedule = config.schedule()?;
        let store = FileStore::open(config.data_path())
            .with_context(|| format!("Failed to open {}", config.data_path().display()))?;

        Ok(Context {
            store,
            schedule,
            clock: SystemClock::new(schedule.tz()),
        })
    }

    pub fn ledger(&self) -> Ledger<'_, FileStore> {
        Ledger::new(&self.store, self.schedule)
    }

    pub fn now(&self) -> chrono::DateTime<chrono_tz::Tz> {
        self.clock.now()
    }

    /// Materialize this year's event if we're in midsummer week.
    pub fn rollover(&self) -> Result<()> {
        if let Rollover::Created(event) =
            lifecycle::ensure_current_year_event(&self.store, &self.schedule, &self.clock)?
        {
            eprintln!("{}", format!("  Created: {event}").green());
        }
        Ok(())
    }
}

pub fn actor(staff: bool) -> Actor {
    Actor::from_privileged(staff)
}
