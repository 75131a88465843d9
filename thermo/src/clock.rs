//! Injectable source of "today".
//!
//! Ingestion stamps each reading with the current day. Rather than reading
//! the wall clock directly, the [`Store`](crate::Store) asks a [`Clock`],
//! which lets tests pin or advance the date deterministically.

use chrono::Local;
use parking_lot::Mutex;

use crate::day::Day;

/// A capability that reports the current calendar day.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> Day;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Day::from(Local::now().date_naive())
    }
}

/// A manually controlled clock for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<Day>,
}

impl FixedClock {
    /// Creates a clock pinned to `today`.
    pub fn new(today: Day) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Moves the clock to `day`.
    pub fn set(&self, day: Day) {
        *self.today.lock() = day;
    }

    /// Moves the clock forward by `days`.
    ///
    /// The clock stays put if the result would overflow the calendar.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock();
        if let Some(next) = today.days_after(days) {
            *today = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Day {
        *self.today.lock()
    }
}
