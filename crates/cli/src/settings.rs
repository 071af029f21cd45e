use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use enlearn_core::shared::constants::APP_DIR_NAME;

/// Persistent defaults read from `settings.json` in the user config directory.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model_path: Option<PathBuf>,
    pub language: Option<String>,
    pub threads: Option<usize>,
    pub position_discount: Option<f64>,
    pub workers: Option<usize>,
    pub phrases_file: Option<PathBuf>,
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads the user settings, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
