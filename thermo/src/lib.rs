//! # thermo
//!
//! In-memory temperature store with trailing-window statistics.
//!
//! thermo ingests integer temperature readings from named sensors, files them
//! by calendar day, and answers minimum / maximum / average queries over the
//! eight days ending at an as-of date.
//!
//! **Status**: This crate is in early development. The API is not yet stable.
//!
//! ## Key Properties
//!
//! - One reader/writer lock over the whole store; ingestion is a single append
//! - Integer statistics: averages use truncating division
//! - Cross-sensor aggregates are weighted by reading count
//! - Reports are structured records, never pre-formatted text
//! - The ingestion date comes from an injectable [`Clock`]
//! - No persistence and no eviction; readings live as long as the store
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use thermo::{Day, FixedClock, ReportRecord, Store, compute_daily_report};
//!
//! let clock = Arc::new(FixedClock::new(Day::parse("2024-03-10").unwrap()));
//! let store = Store::with_clock(clock.clone());
//!
//! // Readings are filed under the clock's current day
//! store.ingest("A", 10);
//! store.ingest("B", 20);
//!
//! let records = compute_daily_report(&store, "2024-03-10");
//! assert!(records.contains(&ReportRecord::CrossSensorDay {
//!     date: Day::parse("2024-03-10").unwrap(),
//!     stats: thermo::Stats { min: 10, max: 20, avg: 15, count: 2, total: 30 },
//! }));
//! ```
//!
//! ## Architecture
//!
//! - [`Store`] — Owns the readings; ingestion and per-bucket lookups
//! - [`Stats`] / [`Accumulator`] — Point statistics and their running fold
//! - [`window`] — Daily cross-section and weekly per-sensor aggregation
//! - [`ReportBuilder`] — Parses the as-of date and packages records
//!
//! ## Modules
//!
//! - [`store`] — Store, snapshots and the [`StatsSource`] trait
//! - [`stats`] — Statistics over readings
//! - [`window`] — Eight-day window aggregation
//! - [`report`] — Report records and builder
//! - [`day`] — Calendar days and the report window
//! - [`clock`] — Injectable "today"
//! - [`error`] — Error types

pub mod clock;
pub mod day;
pub mod error;
pub mod report;
pub mod stats;
pub mod store;
pub mod window;

// Re-export primary API types at crate root for convenience.
pub use clock::{Clock, FixedClock, SystemClock};
pub use day::{DAY_FORMAT, Day, WINDOW_DAYS, Window};
pub use error::{LookupError, ReportError, Result, ThermoError};
pub use report::{
    ReadConsistency, Report, ReportBuilder, ReportKind, ReportRecord, compute_daily_report,
    compute_weekly_report,
};
pub use stats::{Accumulator, Stats, Temperature};
pub use store::{StatsSource, Store, StoreSnapshot};
