//! Settings file management.
//!
//! Reads `~/.secretcrypt/config.toml` (or `$SECRETCRYPT_CONFIG`). Every field
//! is optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Process-wide settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Cloud key-management backend settings
    #[serde(default)]
    pub kms: KmsSettings,
    /// Local symmetric backend settings
    #[serde(default)]
    pub local: LocalSettings,
}

/// Settings for the `kms` backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmsSettings {
    /// Region used when encrypt or decrypt params carry none
    #[serde(default = "default_region")]
    pub default_region: String,
    /// Endpoint override, e.g. a local KMS emulator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for KmsSettings {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            endpoint: None,
        }
    }
}

/// Settings for the `local` backend.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSettings {
    /// Key file location, defaults to `~/.secretcrypt/key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

fn default_region() -> String {
    constants::DEFAULT_REGION.to_string()
}

/// `~/.secretcrypt`
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(constants::CONFIG_DIR))
}

impl Settings {
    /// Location of the settings file.
    pub fn path() -> Result<PathBuf> {
        match std::env::var_os(constants::CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(config_dir()?.join(constants::CONFIG_FILE)),
        }
    }

    /// Load settings from the default location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` if the file
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load settings from `path`, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading settings");

        if !path.exists() {
            debug!("no settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    /// Resolved key file for the local backend.
    pub fn local_key_file(&self) -> Result<PathBuf> {
        match &self.local.key_file {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join(constants::KEY_FILE)),
        }
    }
}

impl std::str::FromStr for Settings {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s).map_err(ConfigError::Parse)?;
        Ok(settings)
    }
}
