//! Sensor device identity.
//!
//! A device is identified by the exact pair of its name and its origin.
//! The name is what the sensor calls itself (for example `coretemp` or
//! `cpu`), the origin is where the value was read from (a `/sys` path,
//! a WMI object name, and so on). Two devices are the same device if and
//! only if both fields match byte for byte.

use serde::{Deserialize, Serialize};

/// A sensor source identified by an exact `(name, origin)` pair.
///
/// Devices are immutable once recorded; the store never rewrites them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    /// Name of the device, e.g. `coretemp`.
    pub name: String,
    /// Origin of the reading, e.g. a `/sys` path or WMI object.
    pub origin: String,
}

impl Device {
    /// Creates a device from its name and origin.
    pub fn new(name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
        }
    }

    /// Returns whether both identity fields are set.
    ///
    /// A device with an empty name or origin cannot be persisted.
    pub fn filled(&self) -> bool {
        !self.name.is_empty() && !self.origin.is_empty()
    }
}

/// Opaque numeric identity assigned to a device by the relational backend.
///
/// Ids are stable for the lifetime of a store: a `(name, origin)` pair maps
/// to at most one id. The value `0` is reserved and means "device not
/// found"; it is never assigned to a real device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub i64);

impl DeviceId {
    /// The reserved id meaning "no matching device".
    pub const UNKNOWN: DeviceId = DeviceId(0);

    /// Returns whether this id refers to an actual device row.
    pub fn is_known(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_requires_both_fields() {
        assert!(!Device::default().filled());
        assert!(!Device::new("coretemp", "").filled());
        assert!(!Device::new("", "/sys/class/hwmon/hwmon0").filled());
        assert!(Device::new("coretemp", "/sys/class/hwmon/hwmon0").filled());
    }

    #[test]
    fn test_identity_is_exact() {
        let a = Device::new("foo", "bar");
        let b = Device::new("foo", "bar");
        let c = Device::new("foo", "Bar");
        assert_eq!(a, b);
        assert_ne!(a, c, "identity comparison is case-sensitive");
    }

    #[test]
    fn test_unknown_id_is_reserved() {
        assert!(!DeviceId::UNKNOWN.is_known());
        assert!(DeviceId(1).is_known());
        assert_eq!(DeviceId::UNKNOWN, DeviceId(0));
    }
}
