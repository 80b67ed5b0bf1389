//! Configuration management for the remote-control registry

pub mod file;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::{MemoryUserDataStore, UserData};
use crate::modules::Gate;
use crate::providers::{FixedPlatformVersion, GrantedPermissions};
use crate::{Error, Result};

/// Platform version assumed when neither the file nor the environment sets one
pub const DEFAULT_PLATFORM_VERSION: i32 = 23;

/// Environment variable overriding the platform version
pub const PLATFORM_VERSION_ENV: &str = "SMS_REMOTE_PLATFORM_VERSION";

/// Environment variable overriding the granted permissions (comma-separated)
pub const GRANTED_PERMISSIONS_ENV: &str = "SMS_REMOTE_GRANTED_PERMISSIONS";

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform version the gate checks modules against
    pub platform_version: i32,

    /// Permissions the host grants
    pub granted_permissions: HashSet<String>,

    /// User data of enabled modules
    pub modules: Vec<UserData>,

    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform_version: DEFAULT_PLATFORM_VERSION,
            granted_permissions: HashSet::new(),
            modules: Vec::new(),
            source: None,
        }
    }
}

impl Config {
    /// Load configuration from a file plus environment overrides
    ///
    /// Uses `path` when given, otherwise the standard config file location.
    /// An explicit path must be readable; the standard location may be
    /// missing or malformed and then yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `path` cannot be read or parsed, or if an
    /// environment override cannot be parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let mut config = Self::from_file(file::read_config_file(p)?);
                config.source = Some(p.to_path_buf());
                config
            }
            None => file::config_file_path()
                .map_or_else(Self::default, |p| Self::from_default_path(&p)),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(
            platform_version = config.platform_version,
            granted = config.granted_permissions.len(),
            enabled_modules = config.modules.len(),
            "resolved configuration"
        );
        Ok(config)
    }

    /// Configuration from the standard location, tolerating a missing file
    fn from_default_path(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        let mut config = Self::from_file(file::load_config_file(path));
        config.source = Some(path.to_path_buf());
        config
    }

    /// Build configuration from a parsed file
    #[must_use]
    pub fn from_file(file: file::ConfigFile) -> Self {
        Self {
            platform_version: file.platform.version.unwrap_or(DEFAULT_PLATFORM_VERSION),
            granted_permissions: file.permissions.granted.into_iter().collect(),
            modules: file.modules,
            source: None,
        }
    }

    /// Apply overrides looked up through `var`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the platform version override is not an integer
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = var(PLATFORM_VERSION_ENV) {
            self.platform_version = raw.trim().parse().map_err(|e| {
                Error::Config(format!("{PLATFORM_VERSION_ENV}={raw:?} is not an integer: {e}"))
            })?;
        }

        if let Some(raw) = var(GRANTED_PERMISSIONS_ENV) {
            self.granted_permissions = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        Ok(())
    }

    /// Gate over the configured platform version and grants
    #[must_use]
    pub fn gate(&self) -> Gate {
        Gate::new(
            Arc::new(FixedPlatformVersion(self.platform_version)),
            Arc::new(GrantedPermissions::new(self.granted_permissions.clone())),
        )
    }

    /// In-memory store seeded with the configured user data
    #[must_use]
    pub fn user_data_store(&self) -> MemoryUserDataStore {
        self.modules.iter().cloned().collect()
    }
}
