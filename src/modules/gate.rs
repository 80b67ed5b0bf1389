//! Eligibility checks run before a module's commands may execute
//!
//! Compatibility is checked before permissions. Both checks are pure; the
//! inputs come from [`crate::providers`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::types::{Module, SdkWindow};
use crate::providers::{PermissionProvider, PlatformVersionProvider};

/// Whether `module` can run on platform version `current`
#[must_use]
pub const fn is_compatible(module: &Module, current: i32) -> bool {
    module.window().contains(current)
}

/// Required permissions of `module` absent from `granted`, in declared order
#[must_use]
pub fn missing_permissions(module: &Module, granted: &HashSet<String>) -> Vec<String> {
    module
        .required_permissions()
        .iter()
        .filter(|p| !granted.contains(**p))
        .map(|p| (*p).to_string())
        .collect()
}

/// Whether `granted` covers every permission `module` requires
#[must_use]
pub fn has_all_permissions(module: &Module, granted: &HashSet<String>) -> bool {
    missing_permissions(module, granted).is_empty()
}

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    /// Compatible and fully permitted
    Eligible,
    /// Platform version outside the module's window
    Incompatible { window: SdkWindow, current: i32 },
    /// Compatible, but these permissions are not granted
    MissingPermissions { missing: Vec<String> },
}

impl Eligibility {
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => write!(f, "eligible"),
            Self::Incompatible { window, current } => match window.max {
                Some(max) => write!(
                    f,
                    "requires platform version between {} and {max} (current {current})",
                    window.min
                ),
                None => write!(
                    f,
                    "requires platform version >= {} (current {current})",
                    window.min
                ),
            },
            Self::MissingPermissions { missing } => {
                write!(f, "missing permissions: {}", missing.join(", "))
            }
        }
    }
}

/// Eligibility gate bound to the host's version and permission providers
#[derive(Clone)]
pub struct Gate {
    versions: Arc<dyn PlatformVersionProvider>,
    permissions: Arc<dyn PermissionProvider>,
}

impl Gate {
    #[must_use]
    pub fn new(
        versions: Arc<dyn PlatformVersionProvider>,
        permissions: Arc<dyn PermissionProvider>,
    ) -> Self {
        Self {
            versions,
            permissions,
        }
    }

    /// Whether `module` is compatible with the current platform
    #[must_use]
    pub fn is_compatible(&self, module: &Module) -> bool {
        is_compatible(module, self.versions.platform_version())
    }

    /// Required permissions the host has not granted
    #[must_use]
    pub fn missing_permissions(&self, module: &Module) -> Vec<String> {
        self.permissions.missing(module.required_permissions())
    }

    /// Whether the host grants every permission `module` requires
    #[must_use]
    pub fn has_all_permissions(&self, module: &Module) -> bool {
        self.permissions.has_all(module.required_permissions())
    }

    /// Run both checks, compatibility first
    #[must_use]
    pub fn eligibility(&self, module: &Module) -> Eligibility {
        let current = self.versions.platform_version();
        if !is_compatible(module, current) {
            return Eligibility::Incompatible {
                window: module.window(),
                current,
            };
        }

        let missing = self.missing_permissions(module);
        if missing.is_empty() {
            Eligibility::Eligible
        } else {
            Eligibility::MissingPermissions { missing }
        }
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("platform_version", &self.versions.platform_version())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{BATTERY, BLUETOOTH, MOBILE_DATA, WIFI_HOTSPOT, permission};
    use crate::providers::{FixedPlatformVersion, GrantedPermissions};

    fn granted(perms: &[&str]) -> HashSet<String> {
        perms.iter().map(|p| (*p).to_string()).collect()
    }

    fn gate(version: i32, perms: &[&str]) -> Gate {
        Gate::new(
            Arc::new(FixedPlatformVersion(version)),
            Arc::new(perms.iter().copied().collect::<GrantedPermissions>()),
        )
    }

    #[test]
    fn mobile_data_stops_at_lollipop() {
        assert!(is_compatible(&MOBILE_DATA, 21));
        assert!(!is_compatible(&MOBILE_DATA, 22));
        assert!(is_compatible(&MOBILE_DATA, -1));
        assert!(!is_compatible(&MOBILE_DATA, -2));
    }

    #[test]
    fn unbounded_module_stays_compatible() {
        for version in [-1, 0, 16, 21, 34, i32::MAX] {
            assert!(is_compatible(&BLUETOOTH, version), "version {version}");
        }
    }

    #[test]
    fn bluetooth_missing_admin() {
        let granted = granted(&[permission::BLUETOOTH]);
        assert_eq!(
            missing_permissions(&BLUETOOTH, &granted),
            vec![permission::BLUETOOTH_ADMIN]
        );
        assert!(!has_all_permissions(&BLUETOOTH, &granted));
    }

    #[test]
    fn missing_permissions_extremes() {
        let all: HashSet<String> = WIFI_HOTSPOT
            .required_permissions()
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        assert!(missing_permissions(&WIFI_HOTSPOT, &all).is_empty());

        let none = HashSet::new();
        assert_eq!(
            missing_permissions(&WIFI_HOTSPOT, &none),
            WIFI_HOTSPOT.required_permissions()
        );
    }

    #[test]
    fn module_without_permissions_is_always_permitted() {
        assert!(has_all_permissions(&BATTERY, &HashSet::new()));
    }

    #[test]
    fn gate_checks_compatibility_first() {
        let gate = gate(22, &[]);
        let result = gate.eligibility(&MOBILE_DATA);
        assert_eq!(
            result,
            Eligibility::Incompatible {
                window: MOBILE_DATA.window(),
                current: 22
            }
        );
        assert_eq!(
            result.to_string(),
            "requires platform version between -1 and 21 (current 22)"
        );
    }

    #[test]
    fn gate_reports_missing_permissions() {
        let gate = gate(30, &[permission::BLUETOOTH]);
        let result = gate.eligibility(&BLUETOOTH);
        assert!(!result.is_eligible());
        assert_eq!(
            result.to_string(),
            "missing permissions: android.permission.BLUETOOTH_ADMIN"
        );
        assert!(!gate.has_all_permissions(&BLUETOOTH));
    }

    #[test]
    fn gate_allows_eligible_module() {
        let gate = gate(30, &[permission::BLUETOOTH, permission::BLUETOOTH_ADMIN]);
        assert!(gate.is_compatible(&BLUETOOTH));
        assert!(gate.eligibility(&BLUETOOTH).is_eligible());
        assert!(gate.eligibility(&BATTERY).is_eligible());
    }

    #[test]
    fn eligibility_serializes_with_status_tag() {
        let json = serde_json::to_value(Eligibility::MissingPermissions {
            missing: vec!["p".to_string()],
        })
        .unwrap();
        assert_eq!(json["status"], "missing_permissions");
        assert_eq!(json["missing"][0], "p");
    }
}
