//! Inbound command dispatch
//!
//! Turns message text into commands, resolves each to its module, applies the
//! user's per-module settings and the eligibility gate, and hands approved
//! commands to a [`CommandExecutor`].

mod executor;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

pub use executor::{CommandExecutor, ExecutionRecord, LoggingExecutor};

use crate::data::UserDataStore;
use crate::modules::{Catalog, Command, Eligibility, Gate};

/// Separators between commands in a single message
const COMMAND_DELIMITERS: [char; 3] = [';', '\n', '\r'];

/// One fragment of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Fragment named a known command
    Known(Command),
    /// Fragment did not parse; kept verbatim for the reply
    Unknown(String),
}

/// Split message text into command fragments
///
/// Fragments are separated by `;` or line breaks; blank fragments are dropped.
#[must_use]
pub fn parse_message(text: &str) -> Vec<ParsedCommand> {
    text.split(COMMAND_DELIMITERS)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            fragment.parse::<Command>().map_or_else(
                |_| ParsedCommand::Unknown(fragment.to_string()),
                ParsedCommand::Known,
            )
        })
        .collect()
}

/// What happened to a single command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Executor ran the command
    Executed {
        module: String,
        command: Command,
        output: String,
    },
    /// No module owns the token
    Unresolved { token: String },
    /// Module has no user data, so the user never enabled it
    ModuleDisabled { module: String, command: Command },
    /// Sender is not on the module's granted phone list
    SenderNotGranted { module: String, command: Command },
    /// Gate rejected the module
    Ineligible {
        module: String,
        command: Command,
        eligibility: Eligibility,
    },
    /// Executor returned an error
    Failed {
        module: String,
        command: Command,
        reason: String,
    },
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executed {
                command, output, ..
            } => {
                if output.is_empty() {
                    write!(f, "{command}: done")
                } else {
                    write!(f, "{command}: {output}")
                }
            }
            Self::Unresolved { token } => write!(f, "unknown command: {token}"),
            Self::ModuleDisabled { module, command } => {
                write!(f, "{command}: module {module} is disabled")
            }
            Self::SenderNotGranted { module, command } => {
                write!(f, "{command}: sender not granted for module {module}")
            }
            Self::Ineligible {
                command,
                eligibility,
                ..
            } => write!(f, "{command}: {eligibility}"),
            Self::Failed {
                command, reason, ..
            } => write!(f, "{command}: failed: {reason}"),
        }
    }
}

/// Routes inbound commands through resolution, user settings and the gate
#[derive(Clone)]
pub struct Dispatcher<'a> {
    catalog: &'a Catalog,
    gate: Gate,
    store: Arc<dyn UserDataStore>,
    executor: Arc<dyn CommandExecutor>,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        gate: Gate,
        store: Arc<dyn UserDataStore>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            catalog,
            gate,
            store,
            executor,
        }
    }

    /// Dispatch a single command sent by `sender`
    pub async fn dispatch(&self, sender: &str, command: Command) -> DispatchOutcome {
        let Some(module) = self.catalog.find_by_command(command) else {
            tracing::warn!(%command, "command has no owning module");
            return DispatchOutcome::Unresolved {
                token: command.to_string(),
            };
        };
        let module_id = module.id().to_string();
        tracing::debug!(%command, module = %module_id, "resolved command");

        let Some(user_data) = module.user_data(self.store.as_ref()) else {
            tracing::warn!(%command, module = %module_id, "module is disabled");
            return DispatchOutcome::ModuleDisabled {
                module: module_id,
                command,
            };
        };

        if !user_data.is_phone_granted(sender) {
            tracing::warn!(%command, module = %module_id, sender, "sender not granted");
            return DispatchOutcome::SenderNotGranted {
                module: module_id,
                command,
            };
        }

        let eligibility = self.gate.eligibility(module);
        if !eligibility.is_eligible() {
            tracing::warn!(%command, module = %module_id, %eligibility, "module not eligible");
            return DispatchOutcome::Ineligible {
                module: module_id,
                command,
                eligibility,
            };
        }

        match self.executor.execute(module, command).await {
            Ok(output) => {
                tracing::info!(%command, module = %module_id, "command executed");
                DispatchOutcome::Executed {
                    module: module_id,
                    command,
                    output,
                }
            }
            Err(e) => {
                tracing::warn!(%command, module = %module_id, error = %e, "command failed");
                DispatchOutcome::Failed {
                    module: module_id,
                    command,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Dispatch every command in a message, in order
    pub async fn dispatch_message(&self, sender: &str, text: &str) -> Vec<DispatchOutcome> {
        let parsed = parse_message(text);
        tracing::debug!(fragments = parsed.len(), "parsed inbound message");

        let mut outcomes = Vec::with_capacity(parsed.len());
        for fragment in parsed {
            let outcome = match fragment {
                ParsedCommand::Known(command) => self.dispatch(sender, command).await,
                ParsedCommand::Unknown(token) => {
                    tracing::warn!(token = %token, "unknown command token");
                    DispatchOutcome::Unresolved { token }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("modules", &self.catalog.len())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
