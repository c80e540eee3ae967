//! Enumeration of input devices and access to their event streams
//!
//! The monitor reads devices through the `DeviceSource` trait so tests can
//! substitute simulated devices for `/dev/input`.

use couchpad_common::DeviceIdentity;
use evdev::{Device, InputEvent};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// Blocking stream of raw events from one open device
pub trait EventStream: Send {
    /// Block until the device reports at least one event, then return the batch
    fn next_events(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// Source of connected input devices
pub trait DeviceSource: Send + Sync {
    /// Identities of the currently connected devices
    ///
    /// Devices that cannot be opened or queried are skipped rather than
    /// reported as errors; a transient failure only delays detection until
    /// a later scan.
    fn enumerate(&self) -> Vec<DeviceIdentity>;

    /// Open the device at `path` for blocking event reads
    fn open(&self, path: &Path) -> io::Result<Box<dyn EventStream>>;
}

/// `/dev/input` backend over the evdev interface
pub struct EvdevSource {
    input_dir: PathBuf,
}

impl EvdevSource {
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
        }
    }

    /// Scan a directory other than `/dev/input`
    pub fn with_input_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }
}

impl Default for EvdevSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceSource for EvdevSource {
    fn enumerate(&self) -> Vec<DeviceIdentity> {
        let entries = match fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("failed to read {}: {}", self.input_dir.display(), err);
                return Vec::new();
            }
        };

        let mut devices = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_event_node = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("event"))
                .unwrap_or(false);
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let name = device.name().unwrap_or("Unknown Device").to_string();
                    devices.push(DeviceIdentity { name, path });
                }
                Err(err) => {
                    debug!("skipping {}: {}", path.display(), err);
                }
            }
        }

        devices
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn EventStream>> {
        let device = Device::open(path)?;
        Ok(Box::new(EvdevStream { device }))
    }
}

struct EvdevStream {
    device: Device,
}

impl EventStream for EvdevStream {
    fn next_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let events = self.device.fetch_events()?;
        Ok(events.collect())
    }
}
