//! Storage contracts and backend selection.
//!
//! Two interchangeable backends persist device readings: an append-only
//! flat file ([`CsvStore`](crate::csv::CsvStore)) and a SQLite database
//! ([`DbStore`](crate::db::DbStore)). Both satisfy the same [`Store`] and
//! [`Retrieve`] contracts with identical observable semantics, so callers
//! depend only on the traits and pick a backend once, at construction
//! time, via [`StorageType`] and the factory functions.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::csv::CsvStore;
use crate::db::DbStore;
use crate::device::Device;
use crate::error::Result;
use crate::reading::{DeviceReading, Reading, ReadingKind};

/// Contract for appending device readings to persistent storage.
pub trait Store {
    /// Appends the given readings to the destination, creating it if it
    /// does not exist yet.
    ///
    /// A call typically carries readings of a single kind, in acquisition
    /// order. Writes are not transactional across the batch: on failure,
    /// readings persisted before the failing one remain in the store.
    ///
    /// # Errors
    ///
    /// Fails when the destination cannot be created or opened, when a
    /// reading is unfilled (sentinel value or default timestamp), or when
    /// an individual write fails.
    fn save(&self, data: &[DeviceReading], destination: &Path) -> Result<()>;
}

/// Contract for reading device readings back from persistent storage.
pub trait Retrieve {
    /// Loads all readings of the given kind, ordered by timestamp.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be opened or read, or when persisted
    /// data fails validation.
    fn load(&self, kind: ReadingKind, source: &Path) -> Result<Vec<DeviceReading>>;

    /// Lists the devices that have at least one reading of the given kind,
    /// sorted by name ascending, each device at most once.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be opened or read, or when persisted
    /// data fails validation.
    fn get_devices(&self, kind: ReadingKind, source: &Path) -> Result<Vec<Device>>;

    /// Retrieves a device's readings of the given kind within a trailing
    /// time window, ordered by timestamp ascending.
    ///
    /// The window is anchored to the device's own most recent sample
    /// across all reading kinds, not to wall-clock "now": a device that
    /// stopped reporting hours ago still yields its last window's worth of
    /// history. An unknown device yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be opened or read, or when persisted
    /// data fails validation.
    fn get_device_readings(
        &self,
        device: &Device,
        kind: ReadingKind,
        source: &Path,
        window: Duration,
    ) -> Result<Vec<Reading>>;
}

/// The available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Semicolon-separated flat file, append-only.
    Csv,
    /// SQLite database.
    Db,
}

impl StorageType {
    /// Returns the configuration literal for this backend.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::Csv => "csv",
            StorageType::Db => "db",
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = UnknownStorageType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(StorageType::Csv),
            "db" => Ok(StorageType::Db),
            other => Err(UnknownStorageType {
                text: other.to_string(),
            }),
        }
    }
}

/// Error for configuration strings that name no known backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{text}' is not a known storage type (expected 'csv' or 'db')")]
pub struct UnknownStorageType {
    /// The rejected configuration string.
    pub text: String,
}

/// Creates the [`Store`] implementation for the given backend.
pub fn create_store(storage: StorageType) -> Box<dyn Store> {
    match storage {
        StorageType::Csv => Box::new(CsvStore::new()),
        StorageType::Db => Box::new(DbStore::new()),
    }
}

/// Creates the [`Retrieve`] implementation for the given backend.
pub fn create_retrieve(storage: StorageType) -> Box<dyn Retrieve> {
    match storage {
        StorageType::Csv => Box::new(CsvStore::new()),
        StorageType::Db => Box::new(DbStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("csv".parse::<StorageType>().unwrap(), StorageType::Csv);
        assert_eq!("db".parse::<StorageType>().unwrap(), StorageType::Db);

        let err = "CSV".parse::<StorageType>().unwrap_err();
        assert!(err.to_string().contains("CSV"));
        assert!("sqlite".parse::<StorageType>().is_err());
        assert!("".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_type_display() {
        assert_eq!(StorageType::Csv.to_string(), "csv");
        assert_eq!(StorageType::Db.to_string(), "db");
    }
}
