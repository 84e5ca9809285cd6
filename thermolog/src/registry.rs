//! Device identity resolution for the relational backend.
//!
//! The registry maps a `(name, origin)` pair to its stable row id in the
//! `device` table, creating the row on first use. Resolution is idempotent:
//! repeated calls with an identical device always yield the same id, and
//! devices differing in either field always yield different ids. The
//! flat-file backend has no identity concept and does not use this module.

use rusqlite::{Connection, OptionalExtension, params};

use crate::device::{Device, DeviceId};
use crate::error::DbError;

/// Resolves device identity against an open store connection.
#[derive(Debug)]
pub struct DeviceRegistry<'conn> {
    conn: &'conn Connection,
}

impl<'conn> DeviceRegistry<'conn> {
    /// Creates a registry over an open connection whose `device` table
    /// already exists.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the id for the device, inserting a new row if no exact
    /// match on both name and origin exists yet.
    ///
    /// When the device is found, no write is issued.
    ///
    /// # Errors
    ///
    /// Fails when the lookup query or the insert fails.
    pub fn find_or_create(&self, device: &Device) -> Result<DeviceId, DbError> {
        if let Some(id) = self.lookup(device)? {
            return Ok(id);
        }

        self.conn
            .execute(
                "INSERT INTO device (name, origin) VALUES (?1, ?2)",
                params![device.name, device.origin],
            )
            .map_err(|source| DbError::DeviceInsert {
                name: device.name.clone(),
                origin: device.origin.clone(),
                source,
            })?;
        let id = DeviceId(self.conn.last_insert_rowid());
        tracing::debug!(name = %device.name, origin = %device.origin, %id, "registered new device");
        Ok(id)
    }

    /// Returns the id for the device, or [`DeviceId::UNKNOWN`] when no
    /// matching row exists.
    ///
    /// A missing device is a legitimate result, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when the lookup query itself fails.
    pub fn get_id(&self, device: &Device) -> Result<DeviceId, DbError> {
        Ok(self.lookup(device)?.unwrap_or(DeviceId::UNKNOWN))
    }

    /// Looks up the device row by exact match on both identity fields.
    fn lookup(&self, device: &Device) -> Result<Option<DeviceId>, DbError> {
        self.conn
            .query_row(
                "SELECT deviceId FROM device WHERE name = ?1 AND origin = ?2 LIMIT 1",
                params![device.name, device.origin],
                |row| row.get(0),
            )
            .optional()
            .map(|id| id.map(DeviceId))
            .map_err(|source| DbError::Query { source })
    }
}
