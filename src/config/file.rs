//! TOML configuration file loading
//!
//! Supports `~/.config/sms-remote/config.toml` as a persistent config source.
//! All fields are optional; a missing section falls back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;
use crate::data::UserData;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Host platform description
    #[serde(default)]
    pub platform: PlatformFileConfig,

    /// Permission grants of the host
    #[serde(default)]
    pub permissions: PermissionsFileConfig,

    /// Per-module user data; a module listed here is enabled
    #[serde(default)]
    pub modules: Vec<UserData>,
}

/// Platform section
#[derive(Debug, Default, Deserialize)]
pub struct PlatformFileConfig {
    /// Platform version number (e.g. 21 for Lollipop)
    pub version: Option<i32>,
}

/// Permissions section
#[derive(Debug, Default, Deserialize)]
pub struct PermissionsFileConfig {
    /// Granted permission identifiers
    #[serde(default)]
    pub granted: Vec<String>,
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the content is not valid TOML for [`ConfigFile`]
pub fn parse_config_file(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a config file that must exist
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be read and
/// [`crate::Error::Toml`] if its content does not parse
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config_file(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load a TOML config file
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
#[must_use]
pub fn load_config_file(path: &Path) -> ConfigFile {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return ConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/sms-remote/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("sms-remote").join("config.toml"))
}
