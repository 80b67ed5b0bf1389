//! Shared test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sms_remote::{
    Command, CommandExecutor, Error, FixedPlatformVersion, Gate, GrantedPermissions,
    MemoryUserDataStore, Module, UserData,
};

/// Phone number granted in the default fixtures
pub const OWNER_PHONE: &str = "+43 660 1234567";

/// Gate over a fixed platform version and permission set
pub fn gate(platform_version: i32, granted: &[&str]) -> Gate {
    Gate::new(
        Arc::new(FixedPlatformVersion(platform_version)),
        Arc::new(granted.iter().copied().collect::<GrantedPermissions>()),
    )
}

/// Store with the given modules enabled for [`OWNER_PHONE`]
pub fn store_with(module_ids: &[&str]) -> Arc<MemoryUserDataStore> {
    Arc::new(
        module_ids
            .iter()
            .map(|id| UserData::new(*id, vec![OWNER_PHONE.to_string()]))
            .collect(),
    )
}

/// Executor that records calls and can be told to fail
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, Command)>>,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Command)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, module: &Module, command: Command) -> sms_remote::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((module.id().to_string(), command));
        match &self.fail_with {
            Some(reason) => Err(Error::Execution(reason.clone())),
            None => Ok(format!("ran {command}")),
        }
    }
}
