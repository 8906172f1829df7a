//! Directory session management
//!
//! A [`Session`] owns one open directory connection and closes it exactly
//! once: through [`Session::close`], through [`Sessions::teardown`], or on
//! drop as a last resort. Close-time failures are logged and discarded.

use crate::config::DirectoryEndpoint;
use crate::drivers::{DirectoryDriver, DirectoryDriverFactory};
use crate::errors::{BridgeError, Result};
use std::fmt;
use tracing::{debug, warn};

/// Which side of the bridge a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    Source,
    Target,
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// An open connection to one directory
pub struct Session {
    role: SessionRole,
    provider_url: String,
    driver: Option<Box<dyn DirectoryDriver>>,
}

impl Session {
    /// Wrap an already connected driver
    pub fn new(role: SessionRole, provider_url: impl Into<String>, driver: Box<dyn DirectoryDriver>) -> Self {
        Self {
            role,
            provider_url: provider_url.into(),
            driver: Some(driver),
        }
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn provider_url(&self) -> &str {
        &self.provider_url
    }

    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }

    pub fn driver(&self) -> Result<&dyn DirectoryDriver> {
        self.driver
            .as_deref()
            .ok_or_else(|| self.closed_error())
    }

    pub fn driver_mut(&mut self) -> Result<&mut (dyn DirectoryDriver + 'static)> {
        let role = self.role;
        self.driver
            .as_deref_mut()
            .ok_or_else(|| BridgeError::Directory(format!("The {} session is closed", role)))
    }

    /// Close the connection; later calls do nothing
    pub fn close(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            return;
        };
        match driver.close() {
            Ok(()) => debug!("[Session] Closed {} session at {}", self.role, self.provider_url),
            Err(e) => {
                let cleanup = BridgeError::Cleanup(e.to_string());
                warn!(
                    "[Session] Ignoring failure closing {} session at {}: {}",
                    self.role, self.provider_url, cleanup
                );
            }
        }
    }

    fn closed_error(&self) -> BridgeError {
        BridgeError::Directory(format!("The {} session is closed", self.role))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("provider_url", &self.provider_url)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Opens sessions through a driver factory
pub struct SessionManager<'a> {
    factory: &'a dyn DirectoryDriverFactory,
}

impl<'a> SessionManager<'a> {
    pub fn new(factory: &'a dyn DirectoryDriverFactory) -> Self {
        Self { factory }
    }

    /// Connect to `endpoint`; connection failures propagate unchanged
    pub fn open(&self, role: SessionRole, endpoint: &DirectoryEndpoint) -> Result<Session> {
        debug!(
            "[Session] Opening {} session at {} as '{}'",
            role,
            endpoint.provider_url(),
            endpoint.principal()
        );
        let driver = self.factory.connect(endpoint)?;
        Ok(Session::new(role, endpoint.provider_url(), driver))
    }
}

/// The sessions of one run: always a target, a source only for BIND/REBIND
#[derive(Debug)]
pub struct Sessions {
    target: Session,
    source: Option<Session>,
}

impl Sessions {
    pub fn new(target: Session) -> Self {
        Self {
            target,
            source: None,
        }
    }

    pub fn attach_source(&mut self, source: Session) {
        self.source = Some(source);
    }

    pub fn target(&self) -> &Session {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut Session {
        &mut self.target
    }

    pub fn source(&self) -> Result<&Session> {
        self.source
            .as_ref()
            .ok_or_else(|| BridgeError::Directory("No source session is open".to_string()))
    }

    /// Close the target and the source, each independently
    pub fn teardown(mut self) {
        self.target.close();
        if let Some(source) = self.source.as_mut() {
            source.close();
        }
    }
}
