use couchpad_common::settings::{DeviceMapping, Settings};
use std::collections::HashMap;

/// Lookup table of allowed devices, keyed by device name
///
/// Built once from validated settings and read-only afterwards. A device
/// whose name has no entry here is never monitored.
pub struct Registry {
    devices: HashMap<String, DeviceMapping>,
}

impl Registry {
    /// Create a registry from a name-to-mapping table
    pub fn new(devices: HashMap<String, DeviceMapping>) -> Self {
        Self { devices }
    }

    /// Create a registry from the `mappings` section of loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.mappings.clone())
    }

    /// Mapping for the named device, or `None` if it is not an allowed device
    pub fn lookup(&self, name: &str) -> Option<&DeviceMapping> {
        self.devices.get(name)
    }

    /// Number of allowed devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
