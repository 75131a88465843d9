//! Store module for the thermo temperature store.
//!
//! The [`Store`] owns every reading ever ingested, grouped by sensor and then
//! by day:
//!
//! ```text
//! sensors
//! ├── "kitchen"
//! │   ├── 2024-03-01 → [21, 22, 21]
//! │   └── 2024-03-02 → [20]
//! └── "garage"
//!     └── 2024-03-02 → [8, 9]
//! ```
//!
//! # Design
//!
//! - One [`parking_lot::RwLock`] guards the whole mapping
//! - Ingestion takes the write lock for a single append
//! - Each point lookup takes the read lock for a single bucket read
//! - Buckets are created and first appended under the same write lock, so
//!   no reader ever observes an empty bucket
//! - Nothing is ever removed; the mapping only grows
//! - Snapshots copy only the buckets of one report window
//!
//! Report generation reads through the [`StatsSource`] trait, implemented by
//! both the live [`Store`] (one lock cycle per lookup) and an owned
//! [`StoreSnapshot`] (no locking at all).
//!
//! # Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use thermo::{Day, FixedClock, StatsSource, Store};
//!
//! let today = Day::parse("2024-03-02").unwrap();
//! let store = Store::with_clock(Arc::new(FixedClock::new(today)));
//!
//! store.ingest("kitchen", 21);
//! store.ingest("kitchen", 23);
//!
//! let stats = store.lookup_day("kitchen", today).unwrap();
//! assert_eq!((stats.min, stats.max, stats.avg), (21, 23, 22));
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::day::{Day, Window};
use crate::error::LookupError;
use crate::stats::{Stats, Temperature};

/// Readings of one sensor, keyed by day.
type Buckets = HashMap<Day, Vec<Temperature>>;

/// All sensors, keyed by name.
type SensorMap = HashMap<String, Buckets>;

/// Read access to per-bucket statistics.
///
/// This is the seam the window aggregator reads through, so a report can be
/// computed either against the live store or against a frozen copy.
pub trait StatsSource {
    /// Returns the names of all sensors known at call time.
    fn sensor_names(&self) -> BTreeSet<String>;

    /// Returns statistics for exactly one (sensor, day) bucket.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the sensor is unknown or has no
    /// readings on `day`.
    fn lookup_day(&self, sensor: &str, day: Day) -> Result<Stats, LookupError>;
}

/// Thread-safe, in-memory temperature store.
///
/// Share it between threads with an [`Arc`]; all methods take `&self`.
pub struct Store {
    /// Readings keyed by sensor, then by day.
    sensors: RwLock<SensorMap>,
    /// Source of the day stamped on ingested readings.
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Creates an empty store that stamps readings with the local wall-clock date.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that stamps readings using `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sensors: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the current day according to the store's clock.
    pub fn today(&self) -> Day {
        self.clock.today()
    }

    /// Records a reading for `sensor`, stamped with today's date.
    ///
    /// Returns the day the reading was filed under.
    pub fn ingest(&self, sensor: &str, temperature: Temperature) -> Day {
        let day = self.clock.today();
        self.ingest_on(sensor, day, temperature);
        day
    }

    /// Records a reading for `sensor` on an explicit `day`.
    ///
    /// Sensor and day buckets are created on demand. Any temperature value
    /// is accepted. Callers are responsible for passing a non-empty sensor
    /// name.
    pub fn ingest_on(&self, sensor: &str, day: Day, temperature: Temperature) {
        let mut sensors = self.sensors.write();

        // Look up before inserting so the common path does not allocate a key.
        if !sensors.contains_key(sensor) {
            tracing::debug!(sensor, "registering new sensor");
            sensors.insert(sensor.to_string(), HashMap::new());
        }

        if let Some(buckets) = sensors.get_mut(sensor) {
            buckets.entry(day).or_default().push(temperature);
        }

        tracing::trace!(sensor, %day, temperature, "reading ingested");
    }

    /// Number of distinct sensors seen so far.
    pub fn sensor_count(&self) -> usize {
        self.sensors.read().len()
    }

    /// Total number of readings across all sensors and days.
    pub fn reading_count(&self) -> usize {
        self.sensors
            .read()
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Copies the buckets that fall inside `window` under a single read lock.
    ///
    /// Every lookup against the returned snapshot reflects the same instant,
    /// regardless of ingestion that happens afterwards. All sensors are carried
    /// over, including those with no readings in the window, so the snapshot
    /// lists the same sensor names the store did.
    pub fn snapshot(&self, window: &Window) -> StoreSnapshot {
        let guard = self.sensors.read();
        let sensors = guard
            .iter()
            .map(|(name, buckets)| {
                let in_window: Buckets = window
                    .days()
                    .filter_map(|day| buckets.get(&day).map(|readings| (day, readings.clone())))
                    .collect();
                (name.clone(), in_window)
            })
            .collect();

        StoreSnapshot { sensors }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("sensors", &self.sensor_count())
            .finish_non_exhaustive()
    }
}

impl StatsSource for Store {
    fn sensor_names(&self) -> BTreeSet<String> {
        self.sensors.read().keys().cloned().collect()
    }

    fn lookup_day(&self, sensor: &str, day: Day) -> Result<Stats, LookupError> {
        lookup_in(&self.sensors.read(), sensor, day)
    }
}

/// An owned, point-in-time copy of a [`Store`]'s readings within one window.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    sensors: SensorMap,
}

impl StoreSnapshot {
    /// Number of distinct sensors in the snapshot.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Number of (sensor, day) buckets copied into the snapshot.
    pub fn bucket_count(&self) -> usize {
        self.sensors.values().map(HashMap::len).sum()
    }
}

impl StatsSource for StoreSnapshot {
    fn sensor_names(&self) -> BTreeSet<String> {
        self.sensors.keys().cloned().collect()
    }

    fn lookup_day(&self, sensor: &str, day: Day) -> Result<Stats, LookupError> {
        lookup_in(&self.sensors, sensor, day)
    }
}

/// Computes statistics for one bucket of `sensors`.
fn lookup_in(sensors: &SensorMap, sensor: &str, day: Day) -> Result<Stats, LookupError> {
    sensors
        .get(sensor)
        .and_then(|buckets| buckets.get(&day))
        .and_then(|readings| Stats::from_readings(readings))
        .ok_or_else(|| LookupError::NotFound {
            sensor: sensor.to_string(),
            date: day,
        })
}
