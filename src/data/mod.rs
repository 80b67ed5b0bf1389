//! Per-module user data
//!
//! A module the user has enabled has a [`UserData`] record listing the phone
//! numbers allowed to control it. The registry only reads these records; how
//! they are persisted is up to the [`UserDataStore`] implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Persisted settings for one control module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Id of the module this record belongs to
    #[serde(rename = "id")]
    pub module_id: String,

    /// Phone numbers allowed to send this module's commands
    #[serde(default)]
    pub granted_phones: Vec<String>,
}

impl UserData {
    #[must_use]
    pub fn new(module_id: impl Into<String>, granted_phones: Vec<String>) -> Self {
        Self {
            module_id: module_id.into(),
            granted_phones,
        }
    }

    /// Whether `phone` may control the module
    ///
    /// Numbers are compared after dropping whitespace, dashes, dots and
    /// parentheses, so `+43 660 123-45` matches `+4366012345`.
    #[must_use]
    pub fn is_phone_granted(&self, phone: &str) -> bool {
        let wanted = normalize_phone(phone);
        !wanted.is_empty()
            && self
                .granted_phones
                .iter()
                .any(|granted| normalize_phone(granted) == wanted)
    }
}

/// Strip formatting characters from a phone number
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect()
}

/// Source of per-module user data, keyed by module id
pub trait UserDataStore: Send + Sync {
    fn user_data(&self, module_id: &str) -> Option<UserData>;
}

/// In-memory user data store
#[derive(Debug, Default)]
pub struct MemoryUserDataStore {
    records: RwLock<HashMap<String, UserData>>,
}

impl MemoryUserDataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its module
    pub fn put(&self, data: UserData) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        records.insert(data.module_id.clone(), data);
    }

    /// Remove a module's record, disabling it
    pub fn remove(&self, module_id: &str) -> Option<UserData> {
        self.records
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(module_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<UserData> for MemoryUserDataStore {
    fn from_iter<I: IntoIterator<Item = UserData>>(iter: I) -> Self {
        let store = Self::new();
        for data in iter {
            store.put(data);
        }
        store
    }
}

impl UserDataStore for MemoryUserDataStore {
    fn user_data(&self, module_id: &str) -> Option<UserData> {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(module_id)
            .cloned()
    }
}
