//! Time sources.
//!
//! Everything that needs "now" takes it from a [`Clock`] instead of reading
//! the wall clock itself, so tests and previews can pin the time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub trait Clock {
    /// Current instant, expressed in the configured zone.
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock in a fixed zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        SystemClock { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Tz> {
        (**self).now()
    }
}
