//! Settings loading and validation for the launcher
//!
//! The settings file is a single `settings.json` describing the app grid,
//! per-device button maps, menu labels, tray icons and window geometry.
//! Only the `mappings` section feeds the device monitor; the rest is pure
//! data handed to the widget layer.

use crate::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

pub const SETTINGS_FILE_NAME: &str = "settings.json";

const CONFIG_DIR_NAME: &str = "couchpad";

/// Errors raised while locating, parsing or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no settings file found (searched {0:?})")]
    NotFound(Vec<PathBuf>),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("device \"{device}\": key code {code} is mapped to both \"{first}\" and \"{second}\"")]
    DuplicateKeyCode {
        device: String,
        code: u16,
        first: Action,
        second: Action,
    },
}

/// Command line of a launchable app, either a single string or an argv list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    Line(String),
    Argv(Vec<String>),
}

/// One entry of the launcher grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEntry {
    pub cmd: CommandLine,
    pub enabled: bool,
    pub icon: String,
}

/// Per-device button map and tray visibility flag
///
/// `buttons` maps actions to raw key codes. Each code may appear only once
/// per device; duplicates are rejected when the settings file is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceMapping {
    pub buttons: HashMap<Action, u16>,
    pub tray: bool,
}

/// Labels for the tray context menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSettings {
    pub hide: String,
    pub settings: String,
}

/// Base64-encoded tray icons, one per connection state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayIcons {
    pub connected: String,
    pub disconnected: String,
    pub standby: String,
}

/// Launcher window geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub apps_per_row: u32,
    pub button_size: u32,
    pub fullscreen: bool,
    pub height: u32,
    pub width: u32,
}

/// Validated launcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub apps: HashMap<String, AppEntry>,
    pub mappings: HashMap<String, DeviceMapping>,
    pub menu: MenuSettings,
    pub tray: TrayIcons,
    pub window: WindowSettings,
    /// Directory icons are loaded from, derived from the settings file location
    #[serde(skip)]
    pub icons_directory: PathBuf,
}

impl Settings {
    /// Load settings from the default search paths
    pub async fn load() -> Result<Self, SettingsError> {
        Self::load_with_search(default_search_paths()).await
    }

    /// Load settings from an explicit file path
    pub async fn load_from(path: &Path) -> Result<Self, SettingsError> {
        Self::load_with_search(vec![path.to_path_buf()]).await
    }

    async fn load_with_search(paths: Vec<PathBuf>) -> Result<Self, SettingsError> {
        for path in &paths {
            if !path.exists() {
                debug!("no settings file at {}", path.display());
                continue;
            }

            debug!("reading settings file {}", path.display());
            let content = fs::read_to_string(path)
                .await
                .map_err(|source| SettingsError::Io {
                    path: path.clone(),
                    source,
                })?;
            let mut settings: Settings =
                serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                    path: path.clone(),
                    source,
                })?;
            settings.validate()?;

            settings.icons_directory = path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("icons");
            if let Err(err) = fs::create_dir_all(&settings.icons_directory).await {
                warn!(
                    "failed to create icons directory {}: {}",
                    settings.icons_directory.display(),
                    err
                );
            }

            return Ok(settings);
        }

        Err(SettingsError::NotFound(paths))
    }

    /// Reject button maps that bind the same key code twice on one device
    fn validate(&self) -> Result<(), SettingsError> {
        for (device, mapping) in &self.mappings {
            let mut seen: HashMap<u16, Action> = HashMap::new();
            for (&action, &code) in &mapping.buttons {
                if let Some(&first) = seen.get(&code) {
                    return Err(SettingsError::DuplicateKeyCode {
                        device: device.clone(),
                        code,
                        first,
                        second: action,
                    });
                }
                seen.insert(code, action);
            }
        }
        Ok(())
    }
}

/// Search order for the settings file: the user config directory first,
/// then the directory the executable runs from
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = env::var_os("HOME") {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join(CONFIG_DIR_NAME)
                .join(SETTINGS_FILE_NAME),
        );
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            paths.push(dir.join(SETTINGS_FILE_NAME));
        }
    }
    paths
}
