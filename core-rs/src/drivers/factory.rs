//! Factory selecting a directory backend from the endpoint's factory identifier

use crate::config::DirectoryEndpoint;
use crate::drivers::filesystem::FileSystemDirectory;
use crate::drivers::traits::{DirectoryDriver, DirectoryDriverFactory};
use crate::errors::{BridgeError, Result};
use tracing::debug;

/// Backends the standard factory can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryBackend {
    FileSystem,
}

impl DirectoryBackend {
    /// Parse a factory identifier
    ///
    /// The fully qualified name used by Java file-system contexts is accepted
    /// as an alias so existing configuration keeps working.
    pub fn from_factory_id(id: &str) -> Option<Self> {
        match id {
            "filesystem" | "fs" | "com.sun.jndi.fscontext.RefFSContextFactory" => {
                Some(Self::FileSystem)
            }
            _ => None,
        }
    }
}

/// Default factory used by the command-line tools
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDriverFactory;

impl StandardDriverFactory {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryDriverFactory for StandardDriverFactory {
    fn connect(&self, endpoint: &DirectoryEndpoint) -> Result<Box<dyn DirectoryDriver>> {
        let backend = DirectoryBackend::from_factory_id(endpoint.factory()).ok_or_else(|| {
            BridgeError::Connection(format!(
                "Unsupported directory factory '{}'",
                endpoint.factory()
            ))
        })?;
        debug!(
            "[DriverFactory] Connecting {:?} backend at {} as '{}' (referral: {})",
            backend,
            endpoint.provider_url(),
            endpoint.principal(),
            endpoint.referral()
        );

        match backend {
            DirectoryBackend::FileSystem => Ok(Box::new(FileSystemDirectory::from_provider_url(
                endpoint.provider_url(),
            )?)),
        }
    }
}
