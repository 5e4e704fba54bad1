//! Names under which the fixture's helpers are exposed to test code.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixture operations addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandName {
    Mount,
    Flow,
    ViewPort,
    TransformationPane,
    TryAssertion,
}

impl CommandName {
    pub const ALL: [CommandName; 5] = [
        CommandName::Mount,
        CommandName::Flow,
        CommandName::ViewPort,
        CommandName::TransformationPane,
        CommandName::TryAssertion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Mount => "mount",
            CommandName::Flow => "flow",
            CommandName::ViewPort => "viewPort",
            CommandName::TransformationPane => "transformationPane",
            CommandName::TryAssertion => "tryAssertion",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-fixture table of registered commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandName>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all five harness commands.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for command in CommandName::ALL {
            // Fresh registry, names in ALL are distinct.
            let _ = registry.register(command.as_str(), command);
        }
        registry
    }

    pub fn register(&mut self, name: &str, command: CommandName) -> Result<()> {
        if self.commands.contains_key(name) {
            return Err(HarnessError::DuplicateCommand(name.to_string()));
        }
        tracing::debug!(name, command = %command, "Registered harness command");
        self.commands.insert(name.to_string(), command);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<CommandName> {
        self.commands
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::UnknownCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
