//! # thermolog
//!
//! Embedded reading store for thermal and CPU load sensor logging.
//!
//! thermolog is the persistence core of a periodic sensor logger: it
//! durably records time-stamped sensor values, deduplicates the physical
//! devices they came from, and answers bounded historical range queries
//! for graph rendering. Sensor acquisition (reading `/sys` trees or WMI)
//! and the rendering front ends live outside this crate; they hand in and
//! take out plain [`DeviceReading`] values.
//!
//! ## Key Properties
//!
//! - Two interchangeable backends — an append-only flat file and a SQLite
//!   database — with identical observable semantics behind one [`Store`] /
//!   [`Retrieve`] contract
//! - Lossless canonical timestamps at whole-second precision
//!   (`YYYY-MM-DD HH:MM:SS`), strict on decode
//! - Stable device identity: a `(name, origin)` pair resolves to the same
//!   id for the lifetime of a store
//! - Range queries anchored to a device's own latest sample, so a sensor
//!   that went quiet still yields its final window of history
//! - Single-threaded, synchronous, blocking I/O; no background work
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use thermolog::{CsvStore, Device, DeviceReading, Reading, ReadingKind, Retrieve, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let time = thermolog::timefmt::string_to_time("2022-04-23 19:18:17")?;
//! let sample = DeviceReading::new(
//!     Device::new("coretemp", "/sys/class/hwmon/hwmon0"),
//!     Reading::new(ReadingKind::Temperature, 42_000, time),
//! );
//!
//! // Append to a flat file (use DbStore for the SQLite backend).
//! let store = CsvStore::new();
//! store.save(&[sample], "readings.csv".as_ref())?;
//!
//! // Query back for rendering: devices sorted by name, readings of the
//! // trailing two hours anchored at each device's latest sample.
//! for device in store.get_devices(ReadingKind::Temperature, "readings.csv".as_ref())? {
//!     let history = store.get_device_readings(
//!         &device,
//!         ReadingKind::Temperature,
//!         "readings.csv".as_ref(),
//!         Duration::from_secs(2 * 3600),
//!     )?;
//!     for reading in history {
//!         println!("{}: {:.2} °C", reading.time, reading.celsius());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`store`] — `Store` / `Retrieve` contracts, backend selection, factory
//! - [`csv`] — append-only flat-file backend
//! - [`db`] — SQLite backend
//! - [`registry`] — device identity resolution (relational backend only)
//! - [`timefmt`] — canonical timestamp codec
//! - [`device`], [`reading`] — the data model
//! - [`error`] — error types

pub mod csv;
pub mod db;
pub mod device;
pub mod error;
pub mod reading;
pub mod registry;
pub mod store;
pub mod timefmt;

// Re-export primary API types at crate root for convenience.
pub use csv::CsvStore;
pub use db::DbStore;
pub use device::{Device, DeviceId};
pub use error::{Result, ThermologError};
pub use reading::{DeviceReading, Reading, ReadingKind, ReadingTime, SENTINEL_VALUE};
pub use registry::DeviceRegistry;
pub use store::{Retrieve, StorageType, Store, create_retrieve, create_store};
