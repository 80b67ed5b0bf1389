//! Control module registry
//!
//! Modules bundle device-control commands with the platform versions and
//! permissions they need. The catalog is fixed at startup; lookups and
//! eligibility checks are pure queries over it.

pub mod catalog;
pub mod gate;
mod resolver;
pub mod types;

pub use catalog::Catalog;
pub use gate::{Eligibility, Gate, has_all_permissions, is_compatible, missing_permissions};
pub use types::{Command, Module, SdkWindow};
