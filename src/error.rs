//! Error types for the remote-control registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the catalog or running commands
///
/// Unresolved ids/commands and ineligible modules are not errors; lookups
/// return `Option` and the gate returns an [`crate::modules::Eligibility`].
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog failed its integrity checks at construction time
    #[error("catalog integrity violation: {0}")]
    CatalogIntegrity(String),

    /// Command token did not name a known command
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Command executor failed
    #[error("execution error: {0}")]
    Execution(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
