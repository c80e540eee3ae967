//! Couchpad Device Monitor
//!
//! This library provides continuous discovery and reading of the input
//! devices that drive the couchpad launcher:
//! - Registry of allowed devices and their button maps
//! - Translation of raw evdev events into abstract actions
//! - One blocking reader task per connected device
//! - A polling supervisor with hot-plug add/remove semantics
//! - Channels delivering actions and connection-state notifications

pub mod bus;
pub mod monitor;
pub mod registry;
pub mod source;
pub mod translate;

mod reader;

// Re-export common types
pub use couchpad_common::{Action, ConnectionEvent, DeviceIdentity};

pub use bus::ActionBus;
pub use monitor::{DeviceMonitor, ShutdownHandle};
pub use registry::Registry;
pub use source::{DeviceSource, EvdevSource, EventStream};
pub use translate::translate;
