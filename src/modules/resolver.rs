//! Module lookup by id or by command

use super::catalog::Catalog;
use super::types::{Command, Module};

impl Catalog {
    /// Find a module by exact, case-sensitive id
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Module> {
        self.iter().find(|m| m.id() == id)
    }

    /// Find the module that owns `command`
    ///
    /// Returns the first owner in declaration order, or `None` when no module
    /// claims the command.
    #[must_use]
    pub fn find_by_command(&self, command: Command) -> Option<&Module> {
        self.iter().find(|m| m.has_command(command))
    }
}
