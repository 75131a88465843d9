//! Plain-text rendering of reports, one line per record.

use std::fmt;
use std::io::{self, Write};

use thermo::{Report, ReportRecord, Stats};

/// Displays one record against the as-of date of its report.
pub struct Line<'a> {
    record: &'a ReportRecord,
    as_of: &'a str,
}

impl<'a> Line<'a> {
    /// Wraps `record` for display; `as_of` names the week for missing sensors.
    pub fn new(record: &'a ReportRecord, as_of: &'a str) -> Self {
        Self { record, as_of }
    }
}

/// `min: X. max: Y avg: Z`
struct Summary<'a>(&'a Stats);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min: {}. max: {} avg: {}", self.0.min, self.0.max, self.0.avg)
    }
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            ReportRecord::PerSensorDay {
                sensor,
                date,
                stats,
            } => write!(f, "date {date} stats for sensor {sensor} are: {}", Summary(stats)),
            ReportRecord::PerSensorMissing { sensor, date } => {
                write!(f, "date {date} has no data for sensor: {sensor}")
            }
            ReportRecord::CrossSensorDay { date, stats } => {
                write!(f, "all sensors stats for {date} are: {}", Summary(stats))
            }
            ReportRecord::PerSensorWeek { sensor, stats } => {
                write!(f, "sensor {sensor} weekly stats is: {}", Summary(stats))
            }
            ReportRecord::PerSensorWeekMissing { sensor } => {
                write!(f, "no data for sensor {sensor} for the week ending {}", self.as_of)
            }
            ReportRecord::CrossSensorWeek { stats } => {
                write!(f, "all sensors weekly stats are: {}", Summary(stats))
            }
            ReportRecord::StoreEmpty => write!(f, "error getting stats: no data for any sensor"),
            ReportRecord::InvalidDate { input } => {
                write!(f, "error getting stats: invalid date: {input}")
            }
        }
    }
}

/// Writes every record of `report` as its own line.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for record in &report.records {
        writeln!(out, "{}", Line::new(record, &report.as_of))?;
    }
    Ok(())
}
