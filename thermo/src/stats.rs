//! Point statistics over a bucket of readings, and the running fold used to
//! roll several buckets into one aggregate.
//!
//! All arithmetic is integer: the average is `total / count` with Rust's
//! truncating division, so readings `[1, 2]` average to `1`, and `[-1, -2]`
//! to `-1`.
//!
//! Totals are kept as `i128`, so summing any number of `i64` readings cannot
//! overflow, and the average always lies between `min` and `max`.
//!
//! Aggregates across buckets are count-weighted. Folding
//! `{total: 10, count: 1}` with `{total: 60, count: 3}` averages to
//! `70 / 4 = 17`, not the mean of the two bucket averages.

use serde::Serialize;

/// A single temperature reading.
pub type Temperature = i64;

/// Summary statistics over one or more readings.
///
/// A `Stats` value is only ever built from at least one reading, so `count`
/// is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Smallest reading.
    pub min: Temperature,
    /// Largest reading.
    pub max: Temperature,
    /// `total / count`, truncated toward zero.
    pub avg: Temperature,
    /// Number of readings.
    pub count: u64,
    /// Sum of all readings.
    pub total: i128,
}

impl Stats {
    /// Computes statistics over a bucket of readings.
    ///
    /// Returns `None` for an empty slice; the average of nothing is never
    /// computed.
    ///
    /// # Examples
    ///
    /// ```
    /// use thermo::Stats;
    ///
    /// let stats = Stats::from_readings(&[1, 2]).unwrap();
    /// assert_eq!((stats.total, stats.count, stats.avg), (3, 2, 1));
    /// assert!(Stats::from_readings(&[]).is_none());
    /// ```
    pub fn from_readings(readings: &[Temperature]) -> Option<Self> {
        let (&first, rest) = readings.split_first()?;

        let mut min = first;
        let mut max = first;
        let mut total = i128::from(first);
        for &reading in rest {
            min = min.min(reading);
            max = max.max(reading);
            total += i128::from(reading);
        }

        let count = readings.len() as u64;
        Some(Self {
            min,
            max,
            avg: truncating_avg(total, count),
            count,
            total,
        })
    }
}

/// Integer average with truncation toward zero. `count` must be non-zero.
fn truncating_avg(total: i128, count: u64) -> Temperature {
    let avg = total / i128::from(count);
    // A mean of i64 readings is within [min, max], so the clamp never bites.
    Temperature::try_from(avg).unwrap_or(if avg < 0 {
        Temperature::MIN
    } else {
        Temperature::MAX
    })
}

/// Running fold of [`Stats`] values.
///
/// Min of mins, max of maxes, sum of totals and sum of counts. The first
/// folded value seeds min and max.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    bounds: Option<(Temperature, Temperature)>,
    total: i128,
    count: u64,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one set of statistics into the running aggregate.
    pub fn fold(&mut self, stats: &Stats) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(stats.min), max.max(stats.max)),
            None => (stats.min, stats.max),
        });
        self.total += stats.total;
        self.count += stats.count;
    }

    /// Number of readings folded in so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Produces the aggregate, or `None` if nothing contributed.
    pub fn finish(&self) -> Option<Stats> {
        let (min, max) = self.bounds?;
        if self.count == 0 {
            return None;
        }

        Some(Stats {
            min,
            max,
            avg: truncating_avg(self.total, self.count),
            count: self.count,
            total: self.total,
        })
    }
}
