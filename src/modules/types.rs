//! Control module and command types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;

use crate::data::{UserData, UserDataStore};
use crate::Error;

/// Separator used by [`Module::commands_string`]
pub const COMMAND_SEPARATOR: &str = "\r\n";

/// A single named operation a control module can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    WifiHotspotEnable,
    WifiHotspotDisable,
    MobileDataEnable,
    MobileDataDisable,
    BatteryLevelFetch,
    BatteryIsCharging,
    LocationFetch,
    WifiEnable,
    WifiDisable,
    WifiIsEnabled,
    BluetoothEnable,
    BluetoothDisable,
    BluetoothIsEnabled,
}

impl Command {
    /// Every known command, in declaration order
    pub const ALL: [Self; 13] = [
        Self::WifiHotspotEnable,
        Self::WifiHotspotDisable,
        Self::MobileDataEnable,
        Self::MobileDataDisable,
        Self::BatteryLevelFetch,
        Self::BatteryIsCharging,
        Self::LocationFetch,
        Self::WifiEnable,
        Self::WifiDisable,
        Self::WifiIsEnabled,
        Self::BluetoothEnable,
        Self::BluetoothDisable,
        Self::BluetoothIsEnabled,
    ];

    /// Canonical token for this command
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WifiHotspotEnable => "WIFI_HOTSPOT_ENABLE",
            Self::WifiHotspotDisable => "WIFI_HOTSPOT_DISABLE",
            Self::MobileDataEnable => "MOBILE_DATA_ENABLE",
            Self::MobileDataDisable => "MOBILE_DATA_DISABLE",
            Self::BatteryLevelFetch => "BATTERY_LEVEL_FETCH",
            Self::BatteryIsCharging => "BATTERY_IS_CHARGING",
            Self::LocationFetch => "LOCATION_FETCH",
            Self::WifiEnable => "WIFI_ENABLE",
            Self::WifiDisable => "WIFI_DISABLE",
            Self::WifiIsEnabled => "WIFI_IS_ENABLED",
            Self::BluetoothEnable => "BLUETOOTH_ENABLE",
            Self::BluetoothDisable => "BLUETOOTH_DISABLE",
            Self::BluetoothIsEnabled => "BLUETOOTH_IS_ENABLED",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Parse a command token
    ///
    /// Case-insensitive; spaces and hyphens count as underscores, so
    /// `"bluetooth enable"` and `"Bluetooth-Enable"` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
            .to_uppercase();

        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == normalized)
            .ok_or_else(|| Error::UnknownCommand(s.trim().to_string()))
    }
}

/// Inclusive platform-version range in which a module is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SdkWindow {
    /// Lowest supported platform version
    pub min: i32,
    /// Highest supported platform version; `None` means unbounded
    pub max: Option<i32>,
}

impl SdkWindow {
    /// Window with a lower bound only
    #[must_use]
    pub const fn at_least(min: i32) -> Self {
        Self { min, max: None }
    }

    /// Closed window `[min, max]`
    #[must_use]
    pub const fn between(min: i32, max: i32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Whether `version` falls inside the window
    #[must_use]
    pub const fn contains(&self, version: i32) -> bool {
        if version < self.min {
            return false;
        }
        match self.max {
            Some(max) => version <= max,
            None => true,
        }
    }
}

impl fmt::Display for SdkWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..={max}", self.min),
            None => write!(f, ">= {}", self.min),
        }
    }
}

/// A named bundle of device-control commands
///
/// Modules only exist inside a [`crate::modules::Catalog`]; equality,
/// ordering and hashing all go through `id`.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    id: &'static str,
    commands: &'static [Command],
    window: SdkWindow,
    required_permissions: &'static [&'static str],
    title_ref: &'static str,
    description_ref: &'static str,
    icon_ref: &'static str,
}

impl Module {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        id: &'static str,
        commands: &'static [Command],
        window: SdkWindow,
        required_permissions: &'static [&'static str],
        title_ref: &'static str,
        description_ref: &'static str,
        icon_ref: &'static str,
    ) -> Self {
        Self {
            id,
            commands,
            window,
            required_permissions,
            title_ref,
            description_ref,
            icon_ref,
        }
    }

    /// Stable module identifier
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Commands owned by this module, in declaration order
    #[must_use]
    pub const fn commands(&self) -> &'static [Command] {
        self.commands
    }

    /// Whether this module owns `command`
    #[must_use]
    pub fn has_command(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }

    /// Platform-version window the module supports
    #[must_use]
    pub const fn window(&self) -> SdkWindow {
        self.window
    }

    /// Lower platform bound
    #[must_use]
    pub const fn sdk_min(&self) -> i32 {
        self.window.min
    }

    /// Upper platform bound, `None` when unbounded
    #[must_use]
    pub const fn sdk_max(&self) -> Option<i32> {
        self.window.max
    }

    /// Permissions required before any command of this module may run
    #[must_use]
    pub const fn required_permissions(&self) -> &'static [&'static str] {
        self.required_permissions
    }

    /// Resource key of the display title
    #[must_use]
    pub const fn title_ref(&self) -> &'static str {
        self.title_ref
    }

    /// Resource key of the description text
    #[must_use]
    pub const fn description_ref(&self) -> &'static str {
        self.description_ref
    }

    /// Resource key of the icon
    #[must_use]
    pub const fn icon_ref(&self) -> &'static str {
        self.icon_ref
    }

    /// Command names, one per line, separated by `\r\n`
    #[must_use]
    pub fn commands_string(&self) -> String {
        self.commands
            .iter()
            .map(Command::as_str)
            .collect::<Vec<_>>()
            .join(COMMAND_SEPARATOR)
    }

    /// Persisted user data for this module, looked up by id
    #[must_use]
    pub fn user_data(&self, store: &dyn UserDataStore) -> Option<UserData> {
        store.user_data(self.id)
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Module {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Module {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(other.id)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}
