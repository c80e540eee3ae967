use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// Re-export common dependencies
pub use serde;
pub use tokio;
pub use tracing;

// Settings model and loader
pub mod settings;

/// Abstract user intent produced by the device monitor
///
/// The set is closed: directional navigation, activation, the options menu,
/// window visibility toggling and shutdown. Button maps in `settings.json`
/// refer to these by their snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Options,
    ToggleView,
    Close,
}

impl Action {
    /// Configuration name of the action, as used in button maps
    pub fn name(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Enter => "enter",
            Action::Options => "options",
            Action::ToggleView => "toggle_view",
            Action::Close => "close",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of an input device at enumeration time
///
/// The path is not stable across replugs; the name is the lookup key into
/// the device registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Connection-state notification consumed by the tray indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(String),
    Disconnected(String),
}

impl ConnectionEvent {
    /// Name of the device the notification refers to
    pub fn device_name(&self) -> &str {
        match self {
            ConnectionEvent::Connected(name) | ConnectionEvent::Disconnected(name) => name,
        }
    }
}
