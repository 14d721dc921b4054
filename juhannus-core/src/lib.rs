//! Rules engine for the yearly midsummer vote.
//!
//! - `schedule`: midsummer Saturday and the deadlines derived from it
//! - `lifecycle`: yearly rollover and event selection
//! - `template`: year substitution in header/body copy
//! - `ledger`: validating, storing and listing votes
//! - `store`: persistence traits with in-memory and JSON file backends

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod lifecycle;
pub mod schedule;
pub mod store;
pub mod template;

pub use error::{JuhannusError, JuhannusResult};
pub use event::{Event, Participant, TextBlock};
pub use schedule::Schedule;
