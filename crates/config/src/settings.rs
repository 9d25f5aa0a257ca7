// Application settings
// Loaded from <config dir>/canon/settings.toml

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding library.json, backups/ and exports/.
    /// None = platform data directory.
    pub library_dir: Option<PathBuf>,

    /// Rotated backups kept.
    pub max_backups: usize,

    /// Take a backup automatically before every import merge.
    pub backup_on_import: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library_dir: None,
            max_backups: 5,
            backup_on_import: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("canon").join("settings.toml"))
    }

    /// Load settings; a missing or unreadable file yields defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::config_path() else {
            return Err("no config directory on this platform".into());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, text).map_err(|e| e.to_string())
    }
}
