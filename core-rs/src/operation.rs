//! Operations and the validated bridge configuration

use crate::config::DirectoryEndpoint;
use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::reference::ResourceCategory;
use std::fmt;
use std::str::FromStr;

/// Directory operation requested for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Adds a binding to the target directory
    Bind,
    /// Replaces a binding in the target directory
    Rebind,
    /// Removes bindings from the target directory
    Unbind,
    /// Lists bindings in the target directory
    List,
}

impl Operation {
    pub const ALL: [Operation; 4] = [Self::Bind, Self::Rebind, Self::Unbind, Self::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bind => "BIND",
            Self::Rebind => "REBIND",
            Self::Unbind => "UNBIND",
            Self::List => "LIST",
        }
    }

    /// Whether the operation reads from the source directory
    pub fn needs_source(&self) -> bool {
        matches!(self, Self::Bind | Self::Rebind)
    }
}

impl FromStr for Operation {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                BridgeError::Validation(format!(
                    "Unknown operation '{}'; OPERATION is one of [BIND, REBIND, UNBIND, LIST]",
                    s
                ))
            })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The source-directory resource a BIND or REBIND copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResource {
    pub category: ResourceCategory,
    /// Name of the resource in the source directory
    pub name: String,
}

impl SourceResource {
    pub fn new(category: ResourceCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

/// What a run does, with exactly the inputs that operation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bind {
        source: DirectoryEndpoint,
        resource: SourceResource,
    },
    Rebind {
        source: DirectoryEndpoint,
        resource: SourceResource,
    },
    Unbind,
    List,
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Bind { .. } => Operation::Bind,
            Self::Rebind { .. } => Operation::Rebind,
            Self::Unbind => Operation::Unbind,
            Self::List => Operation::List,
        }
    }

    /// Source endpoint, present only for BIND and REBIND
    pub fn source(&self) -> Option<&DirectoryEndpoint> {
        match self {
            Self::Bind { source, .. } | Self::Rebind { source, .. } => Some(source),
            Self::Unbind | Self::List => None,
        }
    }
}

/// Immutable configuration for one run, built by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    target: DirectoryEndpoint,
    name: DistinguishedName,
    command: Command,
}

impl BridgeConfig {
    pub fn new(target: DirectoryEndpoint, name: DistinguishedName, command: Command) -> Self {
        Self {
            target,
            name,
            command,
        }
    }

    pub fn target(&self) -> &DirectoryEndpoint {
        &self.target
    }

    /// Binding name in the target directory
    pub fn name(&self) -> &DistinguishedName {
        &self.name
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn operation(&self) -> Operation {
        self.command.operation()
    }
}
