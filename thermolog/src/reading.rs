//! Reading types: the unit of acquisition and persistence.
//!
//! A [`Reading`] is one timestamped integer measurement of a given
//! [`ReadingKind`] for a device. Temperature values are stored in
//! millicelsius, load values as percent times one hundred, so both kinds
//! share one signed 64-bit representation and one storage path.

use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::ParseError;

/// Shorthand for the local-time instant readings are stamped with.
///
/// The store only ever persists whole seconds; sub-second components are
/// discarded when a reading is encoded.
pub type ReadingTime = DateTime<Local>;

/// The reserved "no value yet" marker.
///
/// A freshly constructed reading carries this value until acquisition fills
/// it in; it must never appear in persisted data.
pub const SENTINEL_VALUE: i64 = i64::MIN;

/// The measurement category; determines how [`Reading::value`] is
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    /// A temperature in millicelsius (1/1000th of a degree Celsius).
    Temperature,
    /// A CPU load in percent times one hundred.
    Load,
}

impl ReadingKind {
    /// Returns the wire literal used in flat files and the `reading.kind`
    /// database column.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temperature",
            ReadingKind::Load => "load",
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(ReadingKind::Temperature),
            "load" => Ok(ReadingKind::Load),
            other => Err(ParseError::Kind {
                text: other.to_string(),
            }),
        }
    }
}

/// One timestamped measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// The measurement category.
    pub kind: ReadingKind,
    /// The raw integer value; millicelsius for temperatures, percent times
    /// one hundred for load.
    pub value: i64,
    /// When the value was sampled.
    pub time: ReadingTime,
}

impl Reading {
    /// Creates a reading with the sentinel value and the epoch timestamp,
    /// to be filled in by acquisition.
    pub fn unset(kind: ReadingKind) -> Self {
        Self {
            kind,
            value: SENTINEL_VALUE,
            time: ReadingTime::from(std::time::UNIX_EPOCH),
        }
    }

    /// Creates a filled reading.
    pub fn new(kind: ReadingKind, value: i64, time: ReadingTime) -> Self {
        Self { kind, value, time }
    }

    /// Returns whether the value has been set to something other than the
    /// sentinel.
    pub fn has_value(&self) -> bool {
        self.value != SENTINEL_VALUE
    }

    /// Returns whether the reading is complete enough to be persisted:
    /// a real value and a non-default timestamp.
    pub fn filled(&self) -> bool {
        self.has_value() && self.time.timestamp() != 0
    }

    /// The temperature in degrees Celsius, rounded to 1/100th of a degree.
    ///
    /// Only meaningful for [`ReadingKind::Temperature`] readings.
    #[allow(clippy::cast_precision_loss)] // sensor values are far below 2^52
    pub fn celsius(&self) -> f64 {
        (self.value as f64 / 10.0).round() / 100.0
    }

    /// The temperature in degrees Fahrenheit, rounded to 1/100th of a
    /// degree.
    ///
    /// Only meaningful for [`ReadingKind::Temperature`] readings.
    #[allow(clippy::cast_precision_loss)] // sensor values are far below 2^52
    pub fn fahrenheit(&self) -> f64 {
        let f = self.value as f64 * 0.0018 + 32.0;
        (f * 100.0).round() / 100.0
    }

    /// The load as a percentage.
    ///
    /// Only meaningful for [`ReadingKind::Load`] readings.
    #[allow(clippy::cast_precision_loss)] // load percentages are tiny
    pub fn percent(&self) -> f64 {
        self.value as f64 / 100.0
    }
}

/// A reading together with the device it was obtained from. This is the
/// unit of persistence and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReading {
    /// The device the value was read from.
    pub device: Device,
    /// The measurement itself.
    pub reading: Reading,
}

impl DeviceReading {
    /// Creates a device reading.
    pub fn new(device: Device, reading: Reading) -> Self {
        Self { device, reading }
    }

    /// Returns whether both the device identity and the reading are
    /// complete enough to be persisted.
    pub fn filled(&self) -> bool {
        self.device.filled() && self.reading.filled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> ReadingTime {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn test_kind_round_trips_through_wire_literals() {
        assert_eq!(ReadingKind::Temperature.as_str(), "temperature");
        assert_eq!(ReadingKind::Load.as_str(), "load");
        assert_eq!(
            "temperature".parse::<ReadingKind>().unwrap(),
            ReadingKind::Temperature
        );
        assert_eq!("load".parse::<ReadingKind>().unwrap(), ReadingKind::Load);
        assert!("Temperature".parse::<ReadingKind>().is_err());
        assert!("".parse::<ReadingKind>().is_err());
    }

    #[test]
    fn test_unset_reading_is_not_filled() {
        let reading = Reading::unset(ReadingKind::Temperature);
        assert_eq!(reading.value, SENTINEL_VALUE);
        assert!(!reading.has_value());
        assert!(!reading.filled());
    }

    #[test]
    fn test_filled_requires_value_and_time() {
        let time = local(2022, 4, 23, 19, 8, 1);

        let mut reading = Reading::unset(ReadingKind::Load);
        reading.time = time;
        assert!(!reading.filled(), "sentinel value must not count as filled");

        let mut reading = Reading::unset(ReadingKind::Load);
        reading.value = 4275;
        assert!(!reading.filled(), "default timestamp must not count as filled");

        assert!(Reading::new(ReadingKind::Load, 4275, time).filled());
    }

    #[test]
    fn test_celsius() {
        let time = local(2022, 4, 23, 19, 8, 1);
        assert_eq!(Reading::new(ReadingKind::Temperature, 42_000, time).celsius(), 42.0);
        assert_eq!(Reading::new(ReadingKind::Temperature, 55_500, time).celsius(), 55.5);
        assert_eq!(Reading::new(ReadingKind::Temperature, -40_000, time).celsius(), -40.0);
        assert_eq!(Reading::new(ReadingKind::Temperature, -273_150, time).celsius(), -273.15);
    }

    #[test]
    fn test_fahrenheit() {
        let time = local(2022, 4, 23, 19, 8, 1);
        assert_eq!(Reading::new(ReadingKind::Temperature, 0, time).fahrenheit(), 32.0);
        assert_eq!(Reading::new(ReadingKind::Temperature, 100_000, time).fahrenheit(), 212.0);
        assert_eq!(Reading::new(ReadingKind::Temperature, -40_000, time).fahrenheit(), -40.0);
        assert_eq!(Reading::new(ReadingKind::Temperature, -273_150, time).fahrenheit(), -459.67);
    }

    #[test]
    fn test_percent() {
        let time = local(2022, 4, 23, 19, 8, 1);
        assert_eq!(Reading::new(ReadingKind::Load, 4275, time).percent(), 42.75);
        assert_eq!(Reading::new(ReadingKind::Load, 10_000, time).percent(), 100.0);
    }

    #[test]
    fn test_device_reading_filled() {
        let time = local(2022, 4, 23, 19, 8, 1);
        let good = DeviceReading::new(
            Device::new("cpu", "proc"),
            Reading::new(ReadingKind::Load, 4275, time),
        );
        assert!(good.filled());

        let bad_device = DeviceReading::new(
            Device::new("", "proc"),
            Reading::new(ReadingKind::Load, 4275, time),
        );
        assert!(!bad_device.filled());
    }
}
