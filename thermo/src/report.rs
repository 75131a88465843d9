//! Structured report records and the builder that packages them.
//!
//! Reports are returned as ordered sequences of [`ReportRecord`] values, never
//! as pre-formatted text; rendering is left to whatever presents them.
//!
//! # Example Usage
//!
//! ```rust
//! use thermo::{Day, ReadConsistency, ReportBuilder, ReportRecord, Store};
//!
//! let store = Store::new();
//! store.ingest_on("A", Day::parse("2024-03-08").unwrap(), 10);
//! store.ingest_on("A", Day::parse("2024-03-10").unwrap(), 30);
//!
//! let report = ReportBuilder::new(&store)
//!     .consistency(ReadConsistency::Snapshot)
//!     .weekly("2024-03-10");
//!
//! match &report.records[0] {
//!     ReportRecord::PerSensorWeek { sensor, stats } => {
//!         assert_eq!(sensor, "A");
//!         assert_eq!(stats.avg, 20);
//!     }
//!     other => panic!("unexpected record: {other:?}"),
//! }
//! ```

use std::fmt;

use serde::Serialize;

use crate::day::{Day, Window};
use crate::error::{ReportError, Result, ThermoError};
use crate::stats::Stats;
use crate::store::Store;
use crate::window;

/// One row of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportRecord {
    /// Statistics for one sensor on one day.
    PerSensorDay {
        /// Sensor name.
        sensor: String,
        /// Day the statistics cover.
        date: Day,
        /// Statistics over that day's readings.
        stats: Stats,
    },

    /// A sensor had no readings on a day.
    PerSensorMissing {
        /// Sensor name.
        sensor: String,
        /// Day without readings.
        date: Day,
    },

    /// Statistics across every sensor that reported on one day.
    CrossSensorDay {
        /// Day the statistics cover.
        date: Day,
        /// Count-weighted aggregate over the contributing sensors.
        stats: Stats,
    },

    /// Statistics for one sensor across the whole window.
    PerSensorWeek {
        /// Sensor name.
        sensor: String,
        /// Aggregate over the sensor's contributing days.
        stats: Stats,
    },

    /// A sensor had no readings anywhere in the window.
    PerSensorWeekMissing {
        /// Sensor name.
        sensor: String,
    },

    /// Statistics across every sensor and day in the window.
    CrossSensorWeek {
        /// Aggregate over all contributing buckets.
        stats: Stats,
    },

    /// No sensor has ever reported.
    StoreEmpty,

    /// The as-of date could not be parsed.
    InvalidDate {
        /// The text the caller supplied.
        input: String,
    },
}

impl ReportRecord {
    /// Converts a report-level abort into the single record that replaces the report.
    fn from_error(err: &ReportError) -> Self {
        match err.date_input() {
            Some(input) => Self::InvalidDate { input },
            None => Self::StoreEmpty,
        }
    }

    /// Returns true for records that abort a report.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::StoreEmpty | Self::InvalidDate { .. })
    }
}

/// Which grouping a report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Day-major cross-section.
    Daily,
    /// Sensor-major rollup.
    Weekly,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// How a report reads the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadConsistency {
    /// One read-lock cycle per bucket lookup. Rows of a report computed
    /// during concurrent ingestion may reflect different instants.
    #[default]
    PerLookup,
    /// Copy the store under one read lock first; every row reflects the
    /// same instant.
    Snapshot,
}

/// A complete report: its kind, the as-of text it was requested for, and
/// its records in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Daily or weekly grouping.
    pub kind: ReportKind,
    /// The as-of date exactly as the caller supplied it.
    pub as_of: String,
    /// Ordered records.
    pub records: Vec<ReportRecord>,
}

/// Assembles reports from a [`Store`].
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    store: &'a Store,
    consistency: ReadConsistency,
}

impl<'a> ReportBuilder<'a> {
    /// Creates a builder reading `store` with [`ReadConsistency::PerLookup`].
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            consistency: ReadConsistency::default(),
        }
    }

    /// Sets how the store is read.
    #[must_use]
    pub fn consistency(mut self, consistency: ReadConsistency) -> Self {
        self.consistency = consistency;
        self
    }

    /// Builds the daily cross-section report ending at `as_of`.
    ///
    /// An unparseable `as_of` yields a report holding only
    /// [`ReportRecord::InvalidDate`].
    pub fn daily(&self, as_of: &str) -> Report {
        self.package(ReportKind::Daily, as_of, self.try_daily(as_of))
    }

    /// Builds the weekly per-sensor report ending at `as_of`.
    ///
    /// A store without sensors yields only [`ReportRecord::StoreEmpty`],
    /// whatever `as_of` holds; otherwise an unparseable `as_of` yields only
    /// [`ReportRecord::InvalidDate`].
    pub fn weekly(&self, as_of: &str) -> Report {
        self.package(ReportKind::Weekly, as_of, self.try_weekly(as_of))
    }

    /// Like [`daily`](Self::daily), but surfaces report-level aborts as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Report`] if `as_of` is not a valid day.
    pub fn try_daily(&self, as_of: &str) -> Result<Vec<ReportRecord>> {
        let span = Window::ending_at(Day::parse(as_of)?)?;
        let records = match self.consistency {
            ReadConsistency::PerLookup => window::daily_cross_section(self.store, &span),
            ReadConsistency::Snapshot => {
                window::daily_cross_section(&self.store.snapshot(&span), &span)
            }
        };
        Ok(records)
    }

    /// Like [`weekly`](Self::weekly), but surfaces report-level aborts as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Report`] if the store has no sensors or `as_of`
    /// is not a valid day, checked in that order.
    pub fn try_weekly(&self, as_of: &str) -> Result<Vec<ReportRecord>> {
        if self.store.sensor_count() == 0 {
            return Err(ReportError::StoreEmpty.into());
        }

        let span = Window::ending_at(Day::parse(as_of)?)?;
        let records = match self.consistency {
            ReadConsistency::PerLookup => window::weekly_per_sensor(self.store, &span)?,
            ReadConsistency::Snapshot => {
                window::weekly_per_sensor(&self.store.snapshot(&span), &span)?
            }
        };
        Ok(records)
    }

    fn package(&self, kind: ReportKind, as_of: &str, outcome: Result<Vec<ReportRecord>>) -> Report {
        let records = match outcome {
            Ok(records) => records,
            Err(ThermoError::Report(err)) => {
                tracing::debug!(%kind, as_of, "report aborted: {err}");
                vec![ReportRecord::from_error(&err)]
            }
        };

        Report {
            kind,
            as_of: as_of.to_string(),
            records,
        }
    }
}

/// Computes the daily cross-section report for `as_of` with per-lookup reads.
pub fn compute_daily_report(store: &Store, as_of: &str) -> Vec<ReportRecord> {
    ReportBuilder::new(store).daily(as_of).records
}

/// Computes the weekly per-sensor report for `as_of` with per-lookup reads.
pub fn compute_weekly_report(store: &Store, as_of: &str) -> Vec<ReportRecord> {
    ReportBuilder::new(store).weekly(as_of).records
}
