//! Relational backend: readings in a SQLite database.
//!
//! On first use for a destination the backend ensures the two store tables
//! exist. Devices are deduplicated through the
//! [`DeviceRegistry`](crate::registry::DeviceRegistry); readings reference
//! their device by id:
//!
//! ```text
//! device(deviceId INTEGER PRIMARY KEY, name TEXT NOT NULL, origin TEXT NOT NULL)
//! reading(readingId INTEGER PRIMARY KEY, deviceId INTEGER NOT NULL,
//!         kind TEXT, date TEXT, value INTEGER)
//! ```
//!
//! `date` holds the canonical timestamp string from
//! [`timefmt`](crate::timefmt), which orders lexicographically exactly as
//! the instants order, so range queries compare strings directly. Each
//! reading is inserted and committed independently; a failure partway
//! through a batch leaves the preceding inserts persisted.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use rusqlite::{Connection, params};

use crate::device::{Device, DeviceId};
use crate::error::{DbError, Result, ThermologError};
use crate::reading::{DeviceReading, Reading, ReadingKind};
use crate::registry::DeviceRegistry;
use crate::store::{Retrieve, Store};
use crate::timefmt::{string_to_time, time_to_string};

/// Store schema, created when a destination is used for the first time.
const CREATE_TABLES_SQL: &str = "
CREATE TABLE device (
  deviceId INTEGER PRIMARY KEY NOT NULL,
  name TEXT NOT NULL,
  origin TEXT NOT NULL
);
CREATE TABLE reading (
  readingId INTEGER PRIMARY KEY NOT NULL,
  deviceId INTEGER NOT NULL,
  kind TEXT,
  date TEXT,
  value INTEGER
);
";

/// Lexicographic floor of every canonical timestamp; used when a window
/// reaches back past the representable range.
const EARLIEST_DATE: &str = "0000-01-01 00:00:00";

/// Store and retrieval over a SQLite database file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbStore;

impl DbStore {
    /// Creates the relational backend.
    pub fn new() -> Self {
        Self
    }

    /// Read-only device id lookup against an existing store.
    ///
    /// Returns [`DeviceId::UNKNOWN`] when no matching device row exists;
    /// "not found" is a result, not an error.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be opened or the lookup query fails
    /// (for example because the file is not one of our stores).
    pub fn get_device_id(&self, device: &Device, source: &Path) -> Result<DeviceId> {
        let conn = open(source)?;
        let registry = DeviceRegistry::new(&conn);
        Ok(registry.get_id(device)?)
    }
}

impl Store for DbStore {
    fn save(&self, data: &[DeviceReading], destination: &Path) -> Result<()> {
        let path = destination.display().to_string();
        let conn = open(destination)?;
        ensure_tables_exist(&conn, &path)?;

        let registry = DeviceRegistry::new(&conn);
        // Ids resolved once per save call; cross-call dedup still goes
        // through the registry lookup.
        let mut ids: HashMap<Device, DeviceId> = HashMap::new();

        for entry in data {
            if !entry.filled() {
                return Err(ThermologError::UnfilledReading {
                    name: entry.device.name.clone(),
                });
            }

            let id = match ids.get(&entry.device) {
                Some(id) => *id,
                None => {
                    let id = registry.find_or_create(&entry.device)?;
                    ids.insert(entry.device.clone(), id);
                    id
                }
            };

            let date = time_to_string(&entry.reading.time)?;
            conn.execute(
                "INSERT INTO reading (deviceId, kind, date, value) VALUES (?1, ?2, ?3, ?4)",
                params![id.0, entry.reading.kind.as_str(), date, entry.reading.value],
            )
            .map_err(|source| DbError::ReadingInsert { source })?;
        }

        tracing::debug!(count = data.len(), path = %path, "inserted readings into database");
        Ok(())
    }
}

impl Retrieve for DbStore {
    fn load(&self, kind: ReadingKind, source: &Path) -> Result<Vec<DeviceReading>> {
        let conn = open(source)?;
        let mut stmt = conn
            .prepare(
                "SELECT device.name, device.origin, reading.date, reading.value
                 FROM reading JOIN device ON device.deviceId = reading.deviceId
                 WHERE reading.kind = ?1
                 ORDER BY reading.date ASC",
            )
            .map_err(|source| DbError::Query { source })?;

        let rows = stmt
            .query_map(params![kind.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(|source| DbError::Query { source })?;

        let mut data = Vec::new();
        for row in rows {
            let (name, origin, date, value) = row.map_err(|source| DbError::Query { source })?;
            let time = string_to_time(&date)?;
            data.push(DeviceReading::new(
                Device::new(name, origin),
                Reading::new(kind, value, time),
            ));
        }
        Ok(data)
    }

    fn get_devices(&self, kind: ReadingKind, source: &Path) -> Result<Vec<Device>> {
        let conn = open(source)?;
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT device.name, device.origin
                 FROM device JOIN reading ON reading.deviceId = device.deviceId
                 WHERE reading.kind = ?1
                 ORDER BY device.name ASC, device.origin ASC",
            )
            .map_err(|source| DbError::Query { source })?;

        let rows = stmt
            .query_map(params![kind.as_str()], |row| {
                Ok(Device::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|source| DbError::Query { source })?;

        let mut devices = Vec::new();
        for device in rows {
            devices.push(device.map_err(|source| DbError::Query { source })?);
        }
        Ok(devices)
    }

    fn get_device_readings(
        &self,
        device: &Device,
        kind: ReadingKind,
        source: &Path,
        window: Duration,
    ) -> Result<Vec<Reading>> {
        let window = TimeDelta::from_std(window).map_err(|_| ThermologError::WindowTooLarge {
            seconds: window.as_secs(),
        })?;

        let conn = open(source)?;
        let registry = DeviceRegistry::new(&conn);
        let id = registry.get_id(device)?;
        if !id.is_known() {
            return Ok(Vec::new());
        }

        // Anchor the window at the device's own latest sample, any kind.
        let max_date: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM reading WHERE deviceId = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .map_err(|source| DbError::Query { source })?;
        let Some(max_date) = max_date else {
            return Ok(Vec::new());
        };

        let max_time = string_to_time(&max_date)?;
        let min_date = match max_time.checked_sub_signed(window) {
            Some(min_time) => time_to_string(&min_time)
                .unwrap_or_else(|_| EARLIEST_DATE.to_string()),
            None => EARLIEST_DATE.to_string(),
        };

        let mut stmt = conn
            .prepare(
                "SELECT date, value FROM reading
                 WHERE deviceId = ?1 AND kind = ?2 AND date >= ?3
                 ORDER BY date ASC",
            )
            .map_err(|source| DbError::Query { source })?;
        let rows = stmt
            .query_map(params![id.0, kind.as_str(), min_date], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|source| DbError::Query { source })?;

        let mut readings = Vec::new();
        for row in rows {
            let (date, value) = row.map_err(|source| DbError::Query { source })?;
            readings.push(Reading::new(kind, value, string_to_time(&date)?));
        }
        Ok(readings)
    }
}

/// Opens the database file, creating it when absent.
fn open(path: &Path) -> Result<Connection> {
    Connection::open(path).map_err(|source| {
        DbError::Open {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

/// Makes sure the store tables exist, creating them when missing.
///
/// The existence check keeps creation idempotent across reopenings of the
/// same destination. Any failure here, including "file is not a database",
/// surfaces as a schema error, distinct from "cannot open".
fn ensure_tables_exist(conn: &Connection, path: &str) -> Result<()> {
    let exists = table_exists(conn, "device").map_err(|source| DbError::Schema {
        path: path.to_string(),
        source,
    })?;
    if !exists {
        conn.execute_batch(CREATE_TABLES_SQL)
            .map_err(|source| DbError::Schema {
                path: path.to_string(),
                source,
            })?;
        tracing::debug!(path, "created store tables");
    }
    Ok(())
}

/// Checks `sqlite_master` for a table of the given name.
fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    use rusqlite::OptionalExtension;

    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_creation_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_tables_exist(&conn, ":memory:").unwrap();
        ensure_tables_exist(&conn, ":memory:").unwrap();

        assert!(table_exists(&conn, "device").unwrap());
        assert!(table_exists(&conn, "reading").unwrap());
        assert!(!table_exists(&conn, "settings").unwrap());
    }
}
