//! User configuration stored in the OS config directory.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "LanePlanner";
const CONFIG_FILE: &str = "config.json";

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Column width in pixels.
    pub cell_width: f32,
    /// Height of a row without any lanes.
    pub base_row_height: f32,
    /// Offset of lane 0 from the top of a row.
    pub margin_top: f32,
    /// Vertical distance between lanes.
    pub lane_height: f32,
    /// Overrides the platform data directory for the plan store.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cell_width: 28.0,
            base_row_height: 52.0,
            margin_top: 30.0,
            lane_height: 44.0,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`. A missing file yields defaults silently, a
    /// malformed one is logged.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No config at {:?}: {}", path, e);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Directory holding the plan store.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
