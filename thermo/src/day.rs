//! Calendar days and the trailing report window.
//!
//! Readings are bucketed at day granularity. A [`Day`] wraps a
//! [`chrono::NaiveDate`] and always renders in the fixed `YYYY-MM-DD` format
//! used on the wire and in reports.
//!
//! A [`Window`] is the [`WINDOW_DAYS`] consecutive days ending at (and
//! including) an as-of day, iterated oldest first:
//!
//! ```text
//! as_of - 7   as_of - 6   ...   as_of - 1   as_of
//!     └───────────────── 8 days ─────────────────┘
//! ```

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::ReportError;

/// chrono format string for the fixed day layout.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Width of a formatted day (`YYYY-MM-DD`).
const DAY_TEXT_LEN: usize = 10;

/// Number of calendar days covered by a report window, as-of day included.
pub const WINDOW_DAYS: u64 = 8;

/// A calendar day with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    /// Parses a day in the fixed `YYYY-MM-DD` format.
    ///
    /// The input must be exactly ten characters wide; chrono alone would
    /// accept unpadded months and days such as `2024-1-5`.
    ///
    /// # Errors
    ///
    /// - [`ReportError::InvalidDateLength`] if the text is not ten characters
    /// - [`ReportError::InvalidDate`] if chrono rejects the text
    ///
    /// # Examples
    ///
    /// ```
    /// use thermo::Day;
    ///
    /// let day = Day::parse("2024-03-01").unwrap();
    /// assert_eq!(day.to_string(), "2024-03-01");
    /// assert!(Day::parse("03/01/2024").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ReportError> {
        if input.len() != DAY_TEXT_LEN {
            return Err(ReportError::InvalidDateLength {
                input: input.to_string(),
            });
        }

        NaiveDate::parse_from_str(input, DAY_FORMAT)
            .map(Self)
            .map_err(|source| ReportError::InvalidDate {
                input: input.to_string(),
                source,
            })
    }

    /// Builds a day from a year, month and day of month.
    ///
    /// Returns `None` for dates that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the day `days` before this one, or `None` past the calendar's start.
    pub fn days_before(self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }

    /// Returns the day `days` after this one, or `None` past the calendar's end.
    pub fn days_after(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The inclusive range of [`WINDOW_DAYS`] days ending at an as-of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Oldest day in the window.
    start: Day,
    /// The as-of day (newest, inclusive).
    end: Day,
}

impl Window {
    /// Creates the window that ends at `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::DateOutOfRange`] if the oldest day would fall
    /// before the first representable date.
    pub fn ending_at(as_of: Day) -> Result<Self, ReportError> {
        let start = as_of
            .days_before(WINDOW_DAYS - 1)
            .ok_or(ReportError::DateOutOfRange { date: as_of })?;

        Ok(Self { start, end: as_of })
    }

    /// Returns the oldest day in the window.
    pub fn start(&self) -> Day {
        self.start
    }

    /// Returns the as-of day.
    pub fn end(&self) -> Day {
        self.end
    }

    /// Iterates the days of the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = Day> {
        let end = self.end.0;
        self.start
            .0
            .iter_days()
            .take_while(move |date| *date <= end)
            .map(Day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        Day::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let d = day("2024-02-29");
        assert_eq!(d.to_string(), "2024-02-29");
        assert_eq!(d, Day::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Day::parse("2024-1-5"),
            Err(ReportError::InvalidDateLength { .. })
        ));
        assert!(matches!(
            Day::parse("2023-02-29"),
            Err(ReportError::InvalidDate { .. })
        ));
        assert!(matches!(
            Day::parse("yesterday!"),
            Err(ReportError::InvalidDate { .. })
        ));
        assert!(Day::parse("").is_err());
        assert!(Day::parse(" 2024-01-05").is_err());
    }

    #[test]
    fn test_window_spans_eight_days_inclusive() {
        let window = Window::ending_at(day("2024-03-03")).unwrap();
        let days: Vec<String> = window.days().map(|d| d.to_string()).collect();

        assert_eq!(days.len(), 8);
        assert_eq!(days.first().unwrap(), "2024-02-25");
        assert_eq!(days.last().unwrap(), "2024-03-03");
        assert_eq!(window.start(), day("2024-02-25"));
        assert_eq!(window.end(), day("2024-03-03"));
    }

    #[test]
    fn test_window_crosses_leap_day() {
        let window = Window::ending_at(day("2024-03-01")).unwrap();
        let days: Vec<Day> = window.days().collect();

        assert_eq!(window.start(), day("2024-02-23"));
        assert!(days.contains(&day("2024-02-29")));
        assert!(!days.contains(&day("2024-02-22")));
        assert!(!days.contains(&day("2024-03-02")));
    }

    #[test]
    fn test_window_at_calendar_start_is_out_of_range() {
        let first = Day::from(NaiveDate::MIN);
        assert!(matches!(
            Window::ending_at(first),
            Err(ReportError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_day_serializes_as_string() {
        let json = serde_json::to_string(&day("2024-01-05")).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
    }
}
