//! Host environment providers
//!
//! The gate never asks the platform directly; it goes through these traits so
//! callers can plug in the real host or a fixed snapshot (config, tests).

use std::collections::HashSet;

/// Answers which permissions the host currently grants
pub trait PermissionProvider: Send + Sync {
    /// The subset of `permissions` not currently granted, in input order
    fn missing(&self, permissions: &[&str]) -> Vec<String>;

    /// Whether every permission in `permissions` is granted
    fn has_all(&self, permissions: &[&str]) -> bool {
        self.missing(permissions).is_empty()
    }
}

/// Supplies the running platform's version number
pub trait PlatformVersionProvider: Send + Sync {
    fn platform_version(&self) -> i32;
}

/// Permission provider backed by a fixed set of granted identifiers
#[derive(Debug, Clone, Default)]
pub struct GrantedPermissions {
    granted: HashSet<String>,
}

impl GrantedPermissions {
    #[must_use]
    pub const fn new(granted: HashSet<String>) -> Self {
        Self { granted }
    }

    /// Grant an additional permission
    pub fn grant(&mut self, permission: impl Into<String>) {
        self.granted.insert(permission.into());
    }

    #[must_use]
    pub const fn as_set(&self) -> &HashSet<String> {
        &self.granted
    }
}

impl<S: Into<String>> FromIterator<S> for GrantedPermissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl PermissionProvider for GrantedPermissions {
    fn missing(&self, permissions: &[&str]) -> Vec<String> {
        permissions
            .iter()
            .filter(|p| !self.granted.contains(**p))
            .map(|p| (*p).to_string())
            .collect()
    }
}

/// Platform version provider returning a constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPlatformVersion(pub i32);

impl PlatformVersionProvider for FixedPlatformVersion {
    fn platform_version(&self) -> i32 {
        self.0
    }
}
