//! SMS Remote - capability registry for remote device control
//!
//! Inbound commands (typically received by SMS) are resolved to the control
//! module that owns them, checked against the module's platform-version
//! window and required permissions, and only then handed to an executor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           Inbound message (SMS)              │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │                 Dispatcher                   │
//! │  parse  │  resolve  │  user data  │  gate    │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │        Command executor (device side)        │
//! └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod modules;
pub mod providers;

pub use config::Config;
pub use data::{MemoryUserDataStore, UserData, UserDataStore};
pub use dispatch::{
    CommandExecutor, DispatchOutcome, Dispatcher, LoggingExecutor, ParsedCommand, parse_message,
};
pub use error::{Error, Result};
pub use modules::{Catalog, Command, Eligibility, Gate, Module, SdkWindow};
pub use providers::{
    FixedPlatformVersion, GrantedPermissions, PermissionProvider, PlatformVersionProvider,
};
