//! Error types for the thermo temperature store.

use thiserror::Error;

use crate::day::Day;

/// The main error type for all thermo operations.
///
/// Point-level misses ([`LookupError`]) are recovered inside report
/// generation as missing-data records and never reach this type.
/// [`ReportError`] values abort a whole report and are packaged into a single
/// record by the report builder.
#[derive(Error, Debug)]
pub enum ThermoError {
    /// Error that aborts report generation.
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

/// Errors that can occur when reading a single bucket.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The sensor is unknown, or it has no readings on that day.
    #[error("date {date} has no data for sensor: {sensor}")]
    NotFound {
        /// The sensor that was looked up.
        sensor: String,
        /// The day that was looked up.
        date: Day,
    },
}

/// Errors that abort an entire report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The as-of date does not parse against the `YYYY-MM-DD` format.
    #[error("invalid date: {input}")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
        /// The underlying chrono parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// The as-of date is not exactly `YYYY-MM-DD` wide.
    #[error("invalid date: {input}")]
    InvalidDateLength {
        /// The text that failed to parse.
        input: String,
    },

    /// The window ending at this date would fall off the supported calendar.
    #[error("invalid date: {date} is out of range")]
    DateOutOfRange {
        /// The as-of day.
        date: Day,
    },

    /// No sensor has ever been ingested.
    #[error("no data for any sensor")]
    StoreEmpty,
}

impl ReportError {
    /// Returns the caller-supplied text when this error is a date failure.
    pub fn date_input(&self) -> Option<String> {
        match self {
            Self::InvalidDate { input, .. } | Self::InvalidDateLength { input } => {
                Some(input.clone())
            }
            Self::DateOutOfRange { date } => Some(date.to_string()),
            Self::StoreEmpty => None,
        }
    }
}

/// Type alias for `Result<T, ThermoError>`.
pub type Result<T> = std::result::Result<T, ThermoError>;
