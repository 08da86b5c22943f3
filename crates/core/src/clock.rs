//! Source of "today" and "now" for age and deadline computations.
//!
//! Pure functions in this crate take dates as arguments; services that need
//! the current date ask a [`Clock`] so tests can pin time.

use chrono::Utc;

use crate::types::{Date, Timestamp};

/// Supplies the current date and timestamp (UTC).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn today(&self) -> Date {
        self.now().date_naive()
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: Timestamp,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self { at }
    }

    /// Midnight UTC on `date`.
    pub fn at_date(date: Date) -> Self {
        Self {
            at: date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn today(&self) -> Date {
        (**self).today()
    }
}
