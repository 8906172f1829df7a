//! Directory driver trait for the bridge
//!
//! Defines the uniform interface every directory backend implements.
//! Implementations include:
//! - FileSystemDirectory (contexts as directories, bindings as files)
//! - InMemoryDirectory (shared in-process tree, used as a test double)
//! - Future: LdapDirectory, RegistryDirectory

use crate::config::DirectoryEndpoint;
use crate::errors::Result;
use crate::naming::DistinguishedName;
use crate::reference::{BoundObject, ResourceReference};

/// Name and class of one child binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameClassPair {
    /// RDN of the child, relative to the listed context
    pub name: String,

    /// Class name of the bound object
    pub class_name: String,
}

impl NameClassPair {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
        }
    }
}

/// Result of enumerating a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The name is a context; children in enumeration order (may be empty)
    Children(Vec<NameClassPair>),

    /// The name is a leaf binding
    NotAContext,
}

/// Directory driver trait
///
/// All directory backends must implement this interface. Each call blocks
/// until the backend answers; timeouts are whatever the backend enforces.
///
/// # Semantics
///
/// Drivers must:
/// - Treat the empty name as the root context
/// - Refuse `bind` onto an occupied name with `AlreadyBound`
/// - Replace unconditionally on `rebind`
/// - Report a leaf passed to `list` as `Listing::NotAContext`, not as an error
/// - Commit each call independently (no cross-call transactions)
pub trait DirectoryDriver: Send {
    /// Look up the object bound at `name`
    ///
    /// Fails with `NameNotFound` when nothing is bound there.
    fn lookup(&self, name: &DistinguishedName) -> Result<BoundObject>;

    /// Bind `reference` at `name`
    ///
    /// Fails with `AlreadyBound` if the name is occupied and with
    /// `NameNotFound` if the parent context does not exist.
    fn bind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()>;

    /// Bind `reference` at `name`, replacing any existing leaf binding
    fn rebind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()>;

    /// Remove the binding at `name`
    ///
    /// Removing a name that is not bound succeeds. Removing a context that
    /// still has children fails with `ContextNotEmpty`.
    fn unbind(&mut self, name: &DistinguishedName) -> Result<()>;

    /// Enumerate the direct children of `name`
    fn list(&self, name: &DistinguishedName) -> Result<Listing>;

    /// Create an empty context at `name`
    fn create_subcontext(&mut self, name: &DistinguishedName) -> Result<()>;

    /// Release the connection
    fn close(&mut self) -> Result<()>;
}

/// Connects drivers from endpoint parameters
///
/// Selects the backend from the endpoint's factory identifier.
pub trait DirectoryDriverFactory {
    /// Open a connection to `endpoint`
    ///
    /// Fails with `Connection` if the directory cannot be reached or the
    /// credentials are rejected.
    fn connect(&self, endpoint: &DirectoryEndpoint) -> Result<Box<dyn DirectoryDriver>>;
}
