//! Window aggregation over the trailing eight days.
//!
//! Both report modes walk the same [`Window`] and read every (sensor, day)
//! bucket through a [`StatsSource`], but group the results differently:
//!
//! - **Daily cross-section**: day-major. For each day, one record per sensor
//!   plus a cross-sensor aggregate for that day.
//! - **Weekly per-sensor**: sensor-major. For each sensor, one record folding
//!   all eight days, plus one aggregate across every sensor and day.
//!
//! Aggregates fold totals and counts, so averages are weighted by the number
//! of readings rather than averaging averages.
//!
//! # Consistency
//!
//! The aggregator performs one independent lookup per (sensor, day) pair.
//! Against a live [`Store`](crate::Store), each lookup takes and releases
//! the read lock on its own, so rows of one report may straddle concurrent
//! ingestion. Pass a [`StoreSnapshot`](crate::StoreSnapshot) to get a single
//! consistent instant instead.

use crate::day::Window;
use crate::error::ReportError;
use crate::report::ReportRecord;
use crate::stats::Accumulator;
use crate::store::StatsSource;

/// Builds the day-major cross-section records for `window`.
///
/// For each day, oldest first, every known sensor yields either a
/// [`ReportRecord::PerSensorDay`] or a [`ReportRecord::PerSensorMissing`].
/// A [`ReportRecord::CrossSensorDay`] follows the sensors of a day when at
/// least one of them had readings. An empty source produces no records.
pub fn daily_cross_section<S: StatsSource + ?Sized>(
    source: &S,
    window: &Window,
) -> Vec<ReportRecord> {
    let sensors = source.sensor_names();
    let mut records = Vec::new();

    for day in window.days() {
        let mut across = Accumulator::new();

        for sensor in &sensors {
            match source.lookup_day(sensor, day) {
                Ok(stats) => {
                    across.fold(&stats);
                    records.push(ReportRecord::PerSensorDay {
                        sensor: sensor.clone(),
                        date: day,
                        stats,
                    });
                }
                Err(_) => records.push(ReportRecord::PerSensorMissing {
                    sensor: sensor.clone(),
                    date: day,
                }),
            }
        }

        if let Some(stats) = across.finish() {
            records.push(ReportRecord::CrossSensorDay { date: day, stats });
        }
    }

    tracing::debug!(
        sensors = sensors.len(),
        records = records.len(),
        from = %window.start(),
        as_of = %window.end(),
        "daily cross-section computed"
    );

    records
}

/// Builds the sensor-major weekly records for `window`.
///
/// Each sensor yields a [`ReportRecord::PerSensorWeek`] folding all of its
/// readings in the window, or a [`ReportRecord::PerSensorWeekMissing`] if it
/// had none. A trailing [`ReportRecord::CrossSensorWeek`] folds every
/// contributing bucket of every sensor.
///
/// # Errors
///
/// Returns [`ReportError::StoreEmpty`] if the source knows no sensors at all;
/// no per-sensor records are produced in that case.
pub fn weekly_per_sensor<S: StatsSource + ?Sized>(
    source: &S,
    window: &Window,
) -> Result<Vec<ReportRecord>, ReportError> {
    let sensors = source.sensor_names();
    if sensors.is_empty() {
        return Err(ReportError::StoreEmpty);
    }

    let mut records = Vec::with_capacity(sensors.len() + 1);
    let mut overall = Accumulator::new();

    for sensor in sensors {
        let mut week = Accumulator::new();

        // Missing days are skipped, not counted.
        for stats in window
            .days()
            .filter_map(|day| source.lookup_day(&sensor, day).ok())
        {
            week.fold(&stats);
            overall.fold(&stats);
        }

        records.push(match week.finish() {
            Some(stats) => ReportRecord::PerSensorWeek { sensor, stats },
            None => ReportRecord::PerSensorWeekMissing { sensor },
        });
    }

    if let Some(stats) = overall.finish() {
        records.push(ReportRecord::CrossSensorWeek { stats });
    }

    tracing::debug!(
        records = records.len(),
        readings = overall.count(),
        from = %window.start(),
        as_of = %window.end(),
        "weekly per-sensor rollup computed"
    );

    Ok(records)
}
