use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use chrono::Locale;

use crate::localize;
use crate::pages::{DateStyle, LOCALE_DATE_FORMAT};
use crate::storage::{DEFAULT_SLOT, FileStorage};

pub const CONFIG_VERSION: u64 = 1;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("lodestar")
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("lodestar")
        .join(format!("v{}", CONFIG_VERSION))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct LodestarConfig {
    pub data_directory: PathBuf,
    /// Storage slot holding the snapshot.
    pub slot: String,
    /// strftime pattern for due dates and deadlines.
    pub date_format: String,
    /// Date locale such as `de_DE`; the desktop language when unset.
    pub locale: Option<String>,
    pub debug_logging: bool,
    /// Ask before deleting anything.
    pub confirm_destructive: bool,
    pub storage_quota_bytes: Option<usize>,
}

impl Default for LodestarConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            slot: DEFAULT_SLOT.to_string(),
            date_format: LOCALE_DATE_FORMAT.to_string(),
            locale: None,
            debug_logging: false,
            confirm_destructive: true,
            storage_quota_bytes: None,
        }
    }
}

impl LodestarConfig {
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.json")
    }

    /// Read a config file. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like `load_from`, but any problem falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            log::warn!("Using default config: {}", e);
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Date rendering for the views. An unknown `locale` name falls back to
    /// the desktop language.
    pub fn date_style(&self) -> DateStyle {
        let configured = self.locale.as_deref().and_then(|name| match Locale::try_from(name) {
            Ok(locale) => Some(locale),
            Err(_) => {
                log::warn!("Unknown date locale {:?}, using the desktop language", name);
                None
            }
        });
        DateStyle::new(self.date_format.clone(), configured.unwrap_or_else(localize::date_locale))
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.storage().slot_path(&self.slot)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_directory).with_quota(self.storage_quota_bytes)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }
}
