//! Operation dispatch against open directory sessions
//!
//! Each run executes exactly one operation. LIST and UNBIND first enumerate
//! the binding name and branch on [`Listing`]: a context is handled through
//! its children, a leaf is handled directly.

use crate::drivers::{Listing, NameClassPair};
use crate::errors::Result;
use crate::naming::DistinguishedName;
use crate::operation::{BridgeConfig, Command, Operation, SourceResource};
use crate::reference::ResourceCategory;
use crate::resolver::ReferenceResolver;
use crate::session::Sessions;
use std::fmt;
use tracing::info;

/// Successful result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Bound {
        name: DistinguishedName,
        category: ResourceCategory,
    },
    Rebound {
        name: DistinguishedName,
        category: ResourceCategory,
    },
    /// Names removed, in removal order
    Unbound {
        name: DistinguishedName,
        removed: Vec<DistinguishedName>,
    },
    /// Children of a context, in enumeration order
    Listed {
        name: DistinguishedName,
        children: Vec<NameClassPair>,
    },
    /// LIST on a leaf binding
    Leaf {
        name: DistinguishedName,
        description: String,
    },
}

impl Outcome {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Bound { .. } => Operation::Bind,
            Self::Rebound { .. } => Operation::Rebind,
            Self::Unbound { .. } => Operation::Unbind,
            Self::Listed { .. } | Self::Leaf { .. } => Operation::List,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound { .. } => write!(f, "Bind completed"),
            Self::Rebound { .. } => write!(f, "Rebind completed"),
            Self::Unbound { .. } => write!(f, "Unbind completed"),
            Self::Listed { name, children } => {
                writeln!(f, "Listing of {} {{", name)?;
                for child in children {
                    writeln!(f, "{}", child.name)?;
                }
                writeln!(f, "}}")
            }
            Self::Leaf { name, description } => write!(f, "{} found, type: {}", name, description),
        }
    }
}

/// Executes a validated operation
pub struct Dispatcher<'a> {
    sessions: &'a mut Sessions,
}

impl<'a> Dispatcher<'a> {
    pub fn new(sessions: &'a mut Sessions) -> Self {
        Self { sessions }
    }

    pub fn execute(&mut self, config: &BridgeConfig) -> Result<Outcome> {
        let name = config.name();
        match config.command() {
            Command::List => self.list(name),
            Command::Unbind => self.unbind(name),
            Command::Bind { resource, .. } => self.bind(name, resource, false),
            Command::Rebind { resource, .. } => self.bind(name, resource, true),
        }
    }

    fn list(&mut self, name: &DistinguishedName) -> Result<Outcome> {
        let target = self.sessions.target().driver()?;
        match target.list(name)? {
            Listing::Children(children) => Ok(Outcome::Listed {
                name: name.clone(),
                children,
            }),
            Listing::NotAContext => {
                let bound = target.lookup(name)?;
                Ok(Outcome::Leaf {
                    name: name.clone(),
                    description: bound.describe(),
                })
            }
        }
    }

    fn unbind(&mut self, name: &DistinguishedName) -> Result<Outcome> {
        let target = self.sessions.target_mut().driver_mut()?;
        let removed = match target.list(name)? {
            Listing::Children(children) if !children.is_empty() => {
                info!(
                    "[Dispatcher] Removing {} bindings under '{}'",
                    children.len(),
                    name
                );
                let mut removed = Vec::with_capacity(children.len());
                for child in &children {
                    let child_name = name.child(&child.name)?;
                    target.unbind(&child_name)?;
                    removed.push(child_name);
                }
                removed
            }
            // Leaf binding or empty context
            _ => {
                target.unbind(name)?;
                vec![name.clone()]
            }
        };

        Ok(Outcome::Unbound {
            name: name.clone(),
            removed,
        })
    }

    fn bind(
        &mut self,
        name: &DistinguishedName,
        resource: &SourceResource,
        replace: bool,
    ) -> Result<Outcome> {
        let resolved =
            ReferenceResolver::resolve(self.sessions.source()?, resource.category, &resource.name)?;
        info!(
            "[Dispatcher] Importing {} {} from source directory to target directory as {}",
            resource.category, resource.name, name
        );

        let target = self.sessions.target_mut().driver_mut()?;
        let category = resolved.category();
        let reference = resolved.into_reference();
        if replace {
            target.rebind(name, &reference)?;
            Ok(Outcome::Rebound {
                name: name.clone(),
                category,
            })
        } else {
            target.bind(name, &reference)?;
            Ok(Outcome::Bound {
                name: name.clone(),
                category,
            })
        }
    }
}
