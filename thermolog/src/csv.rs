//! Flat-file backend: append-only, semicolon-separated readings.
//!
//! One record per line, in the order the readings were handed to
//! [`Store::save`]:
//!
//! ```text
//! <device-name>;<device-origin>;<kind>;<value>;<YYYY-MM-DD HH:MM:SS>
//! ```
//!
//! Every save appends; the backend never rewrites or truncates existing
//! content, performs no deduplication, and keeps no device identity beyond
//! repeating the `(name, origin)` pair on each line. Retrieval scans the
//! whole file, which is fine for the file sizes a periodic sensor logger
//! produces.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write as _};
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;

use crate::device::Device;
use crate::error::{IoError, ParseError, Result, ThermologError};
use crate::reading::{DeviceReading, Reading, ReadingKind};
use crate::store::{Retrieve, Store};
use crate::timefmt::{string_to_time, time_to_string};

/// Field separator within a record line.
const SEPARATOR: char = ';';

/// Store and retrieval over an append-only flat file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvStore;

impl CsvStore {
    /// Creates the flat-file backend.
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses every record in the file, all kinds included.
    fn parse_file(source: &Path) -> Result<Vec<DeviceReading>> {
        let path = source.display().to_string();
        let file = File::open(source).map_err(|source| IoError::Read {
            path: path.clone(),
            source,
        })?;

        let mut data = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| IoError::Read {
                path: path.clone(),
                source,
            })?;
            if line.is_empty() {
                continue;
            }
            data.push(parse_line(&line, &path, index + 1)?);
        }
        Ok(data)
    }
}

impl Store for CsvStore {
    fn save(&self, data: &[DeviceReading], destination: &Path) -> Result<()> {
        // Validate the whole batch before touching the destination, so a
        // rejected save leaves no newly created file behind.
        for entry in data {
            if !entry.filled() {
                return Err(ThermologError::UnfilledReading {
                    name: entry.device.name.clone(),
                });
            }
        }

        let path = destination.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .map_err(|source| IoError::Create {
                path: path.clone(),
                source,
            })?;
        let mut writer = BufWriter::new(file);

        for entry in data {
            let time = time_to_string(&entry.reading.time)?;
            writeln!(
                writer,
                "{name}{SEPARATOR}{origin}{SEPARATOR}{kind}{SEPARATOR}{value}{SEPARATOR}{time}",
                name = entry.device.name,
                origin = entry.device.origin,
                kind = entry.reading.kind,
                value = entry.reading.value,
            )
            .map_err(|source| IoError::Write {
                path: path.clone(),
                source,
            })?;
        }

        writer.flush().map_err(|source| IoError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(count = data.len(), path = %path, "appended readings to flat file");
        Ok(())
    }
}

impl Retrieve for CsvStore {
    fn load(&self, kind: ReadingKind, source: &Path) -> Result<Vec<DeviceReading>> {
        let mut data: Vec<DeviceReading> = Self::parse_file(source)?
            .into_iter()
            .filter(|entry| entry.reading.kind == kind)
            .collect();
        // Lines are written in acquisition order; sorting by time keeps the
        // contract identical to the relational backend even if several
        // writers interleaved batches.
        data.sort_by_key(|entry| entry.reading.time);
        Ok(data)
    }

    fn get_devices(&self, kind: ReadingKind, source: &Path) -> Result<Vec<Device>> {
        let mut devices: Vec<Device> = Vec::new();
        for entry in Self::parse_file(source)? {
            if entry.reading.kind == kind && !devices.contains(&entry.device) {
                devices.push(entry.device);
            }
        }
        devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.origin.cmp(&b.origin)));
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

        let of_device: Vec<Reading> = Self::parse_file(source)?
            .into_iter()
            .filter(|entry| entry.device == *device)
            .map(|entry| entry.reading)
            .collect();

        // The window is anchored to the device's own latest sample across
        // all kinds, not to wall-clock now.
        let Some(max_time) = of_device.iter().map(|r| r.time).max() else {
            return Ok(Vec::new());
        };
        let min_time = max_time.checked_sub_signed(window);

        let mut readings: Vec<Reading> = of_device
            .into_iter()
            .filter(|r| r.kind == kind && min_time.is_none_or(|min| r.time >= min))
            .collect();
        readings.sort_by_key(|r| r.time);
        Ok(readings)
    }
}

/// Parses one record line.
fn parse_line(line: &str, path: &str, number: usize) -> Result<DeviceReading> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    let [name, origin, kind, value, time] = fields[..] else {
        return Err(ParseError::MalformedLine {
            path: path.to_string(),
            line: number,
            text: line.to_string(),
        }
        .into());
    };

    let kind: ReadingKind = kind.parse()?;
    let value: i64 = value.parse().map_err(|_| ParseError::Value {
        text: value.to_string(),
    })?;
    let time = string_to_time(time)?;

    Ok(DeviceReading::new(
        Device::new(name, origin),
        Reading::new(kind, value, time),
    ))
}
