//! Built-in catalog of control modules
//!
//! The catalog is assembled once at startup and validated before anything
//! can query it. Initialize with [`init`], then read it through [`global`] or
//! pass the returned reference around.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::types::{Command, Module, SdkWindow};
use crate::{Error, Result};

/// Platform version code for Android 5.0
pub const LOLLIPOP: i32 = 21;

/// Permission identifiers referenced by the built-in modules
pub mod permission {
    pub const ACCESS_FINE_LOCATION: &str = "android.permission.ACCESS_FINE_LOCATION";
    pub const ACCESS_WIFI_STATE: &str = "android.permission.ACCESS_WIFI_STATE";
    pub const BLUETOOTH: &str = "android.permission.BLUETOOTH";
    pub const BLUETOOTH_ADMIN: &str = "android.permission.BLUETOOTH_ADMIN";
    pub const CHANGE_NETWORK_STATE: &str = "android.permission.CHANGE_NETWORK_STATE";
    pub const CHANGE_WIFI_STATE: &str = "android.permission.CHANGE_WIFI_STATE";
    pub const WRITE_SETTINGS: &str = "android.permission.WRITE_SETTINGS";
}

pub static WIFI_HOTSPOT: Module = Module::new(
    "wifi_hotspot",
    &[Command::WifiHotspotEnable, Command::WifiHotspotDisable],
    SdkWindow::at_least(-1),
    &[
        permission::CHANGE_WIFI_STATE,
        permission::ACCESS_WIFI_STATE,
        permission::WRITE_SETTINGS,
    ],
    "control_module_title_wifi_hotspot",
    "control_module_desc_wifi_hotspot",
    "ic_wifi_tethering_grey_700_36dp",
);

pub static MOBILE_DATA: Module = Module::new(
    "mobile_data",
    &[Command::MobileDataEnable, Command::MobileDataDisable],
    SdkWindow::between(-1, LOLLIPOP),
    &[permission::CHANGE_NETWORK_STATE],
    "control_module_title_mobile_data",
    "control_module_desc_mobile_data",
    "ic_network_cell_grey_700_36dp",
);

pub static BATTERY: Module = Module::new(
    "battery",
    &[Command::BatteryLevelFetch, Command::BatteryIsCharging],
    SdkWindow::at_least(-1),
    &[],
    "control_module_title_battery",
    "control_module_desc_battery",
    "ic_battery_50_grey_700_36dp",
);

pub static LOCATION: Module = Module::new(
    "location",
    &[Command::LocationFetch],
    SdkWindow::at_least(-1),
    &[permission::ACCESS_FINE_LOCATION],
    "control_module_title_location",
    "control_module_desc_location",
    "ic_location_on_grey_700_36dp",
);

pub static WIFI: Module = Module::new(
    "wifi",
    &[Command::WifiEnable, Command::WifiDisable, Command::WifiIsEnabled],
    SdkWindow::at_least(-1),
    &[permission::CHANGE_WIFI_STATE, permission::ACCESS_WIFI_STATE],
    "control_module_title_wifi",
    "control_module_desc_wifi",
    "ic_signal_wifi_2_bar_grey_700_36dp",
);

pub static BLUETOOTH: Module = Module::new(
    "bluetooth",
    &[
        Command::BluetoothEnable,
        Command::BluetoothDisable,
        Command::BluetoothIsEnabled,
    ],
    SdkWindow::at_least(-1),
    &[permission::BLUETOOTH, permission::BLUETOOTH_ADMIN],
    "control_module_title_bluetooth",
    "control_module_desc_bluetooth",
    "ic_bluetooth_grey_700_36dp",
);

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

/// Build and validate the built-in catalog, storing it process-wide
///
/// Safe to call more than once; later calls return the stored catalog.
///
/// # Errors
///
/// Returns [`Error::CatalogIntegrity`] if the built-in data is malformed
pub fn init() -> Result<&'static Catalog> {
    if let Some(catalog) = GLOBAL.get() {
        return Ok(catalog);
    }
    let catalog = Catalog::builtin()?;
    Ok(GLOBAL.get_or_init(|| catalog))
}

/// The process-wide catalog, if [`init`] has succeeded
#[must_use]
pub fn global() -> Option<&'static Catalog> {
    GLOBAL.get()
}

/// Immutable, ordered set of control modules
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: Vec<Module>,
}

impl Catalog {
    /// Build a catalog from modules, enforcing structural integrity
    ///
    /// Rejects empty or duplicate ids, empty or repeated command lists,
    /// inverted version windows, and commands claimed by several modules.
    pub(crate) fn new(modules: Vec<Module>) -> Result<Self> {
        validate(&modules)?;
        Ok(Self { modules })
    }

    /// The built-in catalog, in declaration order
    ///
    /// On top of the structural checks, every known [`Command`] must be
    /// owned by a module.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogIntegrity`] if the built-in data is malformed
    pub fn builtin() -> Result<Self> {
        let catalog = Self::new(vec![
            WIFI_HOTSPOT.clone(),
            MOBILE_DATA.clone(),
            BATTERY.clone(),
            LOCATION.clone(),
            WIFI.clone(),
            BLUETOOTH.clone(),
        ])?;
        require_complete(&catalog.modules)?;
        Ok(catalog)
    }

    /// Copy of every module, in declaration order
    #[must_use]
    pub fn all_modules(&self) -> Vec<Module> {
        self.modules.clone()
    }

    /// Iterate modules in declaration order without copying
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Every known [`Command`] must be owned by one of `modules`
pub(crate) fn require_complete(modules: &[Module]) -> Result<()> {
    let unmapped: Vec<&str> = Command::ALL
        .iter()
        .filter(|cmd| !modules.iter().any(|m| m.has_command(**cmd)))
        .map(Command::as_str)
        .collect();
    if unmapped.is_empty() {
        return Ok(());
    }

    Err(Error::CatalogIntegrity(format!(
        "commands without a module: {}",
        unmapped.join(", ")
    )))
}

fn validate(modules: &[Module]) -> Result<()> {
    let mut ids: HashSet<&str> = HashSet::new();
    let mut owners: HashMap<Command, &str> = HashMap::new();

    for module in modules {
        let id = module.id();
        if id.trim().is_empty() {
            return Err(Error::CatalogIntegrity("module with empty id".to_string()));
        }
        if !ids.insert(id) {
            return Err(Error::CatalogIntegrity(format!("duplicate module id {id}")));
        }
        if module.commands().is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "module {id} declares no commands"
            )));
        }
        if let Some(max) = module.sdk_max()
            && module.sdk_min() > max
        {
            return Err(Error::CatalogIntegrity(format!(
                "module {id} has sdk_min {} above sdk_max {max}",
                module.sdk_min()
            )));
        }

        let mut own: HashSet<Command> = HashSet::new();
        for &command in module.commands() {
            if !own.insert(command) {
                return Err(Error::CatalogIntegrity(format!(
                    "module {id} lists {command} twice"
                )));
            }
            if let Some(other) = owners.insert(command, id) {
                return Err(Error::CatalogIntegrity(format!(
                    "command {command} owned by both {other} and {id}"
                )));
            }
        }
    }

    Ok(())
}
