//! Durable append-only reading store backed by SQLite.
//!
//! Readings arrive at a seconds-to-minutes cadence from a single device, so
//! the store is optimized for bounded scans over a single-writer append log,
//! not for write throughput. One connection behind a mutex serializes the
//! write path; range reads hold the same lock briefly.
//!
//! Durability: WAL journaling with `synchronous=FULL`, so an acknowledged
//! append survives a crash immediately after the insert returns.
//!
//! Retention is unbounded on purpose. Rows are immutable once appended and
//! never deleted; at a one-minute cadence the table grows roughly half a
//! million rows per year, which SQLite handles without compaction.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::reading::{NewReading, Reading};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS weather_readings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    temperature REAL,
    humidity REAL,
    windSpeed REAL,
    noiseLevel REAL,
    timestamp TEXT NOT NULL
);
";

const COLUMNS: &str = "id, temperature, humidity, windSpeed, noiseLevel, timestamp";

/// Append-only time-series store for readings.
pub struct ReadingStore {
    conn: Mutex<Connection>,
}

impl ReadingStore {
    /// Open (creating if necessary) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory store. Used by tests and ad-hoc tooling.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // journal_mode reports the resulting mode as a row; discard it.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append a reading and return its assigned id. Ids are strictly
    /// increasing with insertion order and never reused.
    pub fn append(&self, reading: &NewReading) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO weather_readings (temperature, humidity, windSpeed, noiseLevel, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reading.temperature,
                reading.humidity,
                reading.wind_speed,
                reading.noise_level,
                reading.timestamp,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The most recently appended reading, if any.
    pub fn latest(&self) -> Result<Option<Reading>, StoreError> {
        let conn = self.conn.lock();
        let reading = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM weather_readings ORDER BY id DESC LIMIT 1"),
                [],
                row_to_reading,
            )
            .optional()?;
        Ok(reading)
    }

    /// The most recent `limit` readings, ordered oldest to newest so the
    /// result charts directly without client-side sorting.
    pub fn query_range(&self, limit: usize) -> Result<Vec<Reading>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM weather_readings ORDER BY id DESC LIMIT ?1"
        ))?;
        let mut readings = stmt
            .query_map(params![limit as i64], row_to_reading)?
            .collect::<Result<Vec<_>, _>>()?;
        readings.reverse();
        Ok(readings)
    }

    /// Total number of stored readings. Diagnostic use.
    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM weather_readings", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<Reading> {
    Ok(Reading {
        id: row.get(0)?,
        temperature: row.get(1)?,
        humidity: row.get(2)?,
        wind_speed: row.get(3)?,
        noise_level: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f64) -> NewReading {
        NewReading {
            temperature: Some(temperature),
            humidity: Some(50.0),
            wind_speed: Some(5.0),
            noise_level: Some(40.0),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let store = ReadingStore::open_in_memory().unwrap();

        let first = store.append(&sample(10.0)).unwrap();
        let second = store.append(&sample(11.0)).unwrap();
        let third = store.append(&sample(12.0)).unwrap();

        assert!(first < second && second < third);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_latest_on_empty_store() {
        let store = ReadingStore::open_in_memory().unwrap();
        assert_eq!(store.latest().unwrap(), None);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_latest_returns_most_recent() {
        let store = ReadingStore::open_in_memory().unwrap();
        store.append(&sample(10.0)).unwrap();
        let id = store.append(&sample(25.5)).unwrap();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.id, id);
        assert_eq!(latest.temperature, Some(25.5));
    }

    #[test]
    fn test_query_range_is_bounded_and_oldest_first() {
        let store = ReadingStore::open_in_memory().unwrap();
        for i in 0..10 {
            store.append(&sample(i as f64)).unwrap();
        }

        let rows = store.query_range(4).unwrap();
        assert_eq!(rows.len(), 4);
        // The four most recent readings, oldest first.
        assert_eq!(rows[0].temperature, Some(6.0));
        assert_eq!(rows[3].temperature, Some(9.0));
        assert!(rows.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn test_query_range_larger_than_store() {
        let store = ReadingStore::open_in_memory().unwrap();
        store.append(&sample(1.0)).unwrap();

        let rows = store.query_range(1440).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_sentinel_fields_round_trip_as_null() {
        let store = ReadingStore::open_in_memory().unwrap();
        store
            .append(&NewReading {
                temperature: Some(20.0),
                humidity: None,
                wind_speed: None,
                noise_level: Some(30.0),
                timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            })
            .unwrap();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.humidity, None);
        assert_eq!(latest.wind_speed, None);
        assert_eq!(latest.noise_level, Some(30.0));
    }

    #[test]
    fn test_readings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");

        {
            let store = ReadingStore::open(&path).unwrap();
            store.append(&sample(18.0)).unwrap();
            store.append(&sample(19.0)).unwrap();
        }

        let store = ReadingStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.latest().unwrap().unwrap().temperature, Some(19.0));
    }
}
