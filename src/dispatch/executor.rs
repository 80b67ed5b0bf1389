//! Command executor seam

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Result;
use crate::modules::{Command, Module};

/// Performs the side effect behind an approved command
///
/// Only called after the dispatcher's checks pass. The returned text is sent
/// back to the sender as the reply body.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` on behalf of `module`
    ///
    /// # Errors
    ///
    /// Returns error if the underlying device action fails
    async fn execute(&self, module: &Module, command: Command) -> Result<String>;
}

/// An executed command as seen by [`LoggingExecutor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub module: String,
    pub command: Command,
    pub executed_at: DateTime<Utc>,
}

/// Dry-run executor: records and logs commands without touching hardware
#[derive(Debug, Default)]
pub struct LoggingExecutor {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl LoggingExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands executed so far, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<ExecutionRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandExecutor for LoggingExecutor {
    async fn execute(&self, module: &Module, command: Command) -> Result<String> {
        tracing::info!(module = %module.id(), %command, "dry run: command accepted");
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(ExecutionRecord {
                module: module.id().to_string(),
                command,
                executed_at: Utc::now(),
            });
        Ok("accepted (dry run)".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::BLUETOOTH;

    #[tokio::test]
    async fn records_each_execution() {
        let executor = LoggingExecutor::new();
        let output = executor
            .execute(&BLUETOOTH, Command::BluetoothEnable)
            .await
            .unwrap();
        assert_eq!(output, "accepted (dry run)");

        let records = executor.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].module, "bluetooth");
        assert_eq!(records[0].command, Command::BluetoothEnable);
    }
}
