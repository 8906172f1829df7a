//! Binding verification: confirms that a connection factory and a
//! destination bound in a directory are usable by a messaging client

use crate::config::{DirectoryEndpoint, ReferralPolicy};
use crate::drivers::DirectoryDriverFactory;
use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::reference::{BoundObject, ResourceCategory, ResourceReference};
use crate::session::{Session, SessionManager, SessionRole};
use crate::validator::{endpoint, missing};
use std::fmt;
use tracing::info;

/// Unvalidated parameters of a binding check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckParameters {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub referral: Option<ReferralPolicy>,
    pub factory: Option<String>,
    pub connection_factory: Option<String>,
    pub destination: Option<String>,
}

/// A validated binding check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub endpoint: DirectoryEndpoint,
    pub connection_factory: String,
    pub destination: String,
}

impl CheckParameters {
    /// Check required parameters in order: URL, username, password,
    /// connection factory, destination
    pub fn validate(&self) -> Result<CheckConfig> {
        let url = self.url.as_ref().ok_or_else(|| missing("-jndiUrl"))?;
        let username = self.username.as_ref().ok_or_else(|| missing("-jndiUsername"))?;
        let password = self.password.as_ref().ok_or_else(|| missing("-jndiPassword"))?;
        let connection_factory = self.connection_factory.clone().ok_or_else(|| missing("-cf"))?;
        let destination = self.destination.clone().ok_or_else(|| missing("-destination"))?;

        Ok(CheckConfig {
            endpoint: endpoint(url, username, password, self.referral, self.factory.as_ref()),
            connection_factory,
            destination,
        })
    }
}

/// Open one session, check both bindings, close the session
pub fn run(config: &CheckConfig, factory: &dyn DirectoryDriverFactory) -> Result<VerifiedBindings> {
    info!(
        "[Verify] Checking '{}' and '{}' on {}",
        config.connection_factory,
        config.destination,
        config.endpoint.provider_url()
    );
    let mut session = SessionManager::new(factory).open(SessionRole::Target, &config.endpoint)?;
    let result = check_bindings(&session, &config.connection_factory, &config.destination);
    session.close();
    result
}

/// References found by [`check_bindings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedBindings {
    pub connection_factory: ResourceReference,
    pub destination: ResourceReference,
    /// Topic or queue
    pub destination_category: ResourceCategory,
}

impl fmt::Display for VerifiedBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Connection factory: {}", self.connection_factory.class_name)?;
        write!(
            f,
            "Destination: {} ({})",
            self.destination.class_name, self.destination_category
        )
    }
}

fn lookup_reference(session: &Session, name: &str) -> Result<ResourceReference> {
    let dn = DistinguishedName::parse(name)
        .map_err(|e| BridgeError::Resolution(format!("Cannot resolve '{}': {}", name, e)))?;
    match session.driver()?.lookup(&dn) {
        Ok(BoundObject::Reference(reference)) => Ok(reference),
        Ok(BoundObject::Context) => Err(BridgeError::Resolution(format!(
            "'{}' is a context, not a binding",
            name
        ))),
        Err(BridgeError::NameNotFound(_)) => Err(BridgeError::Resolution(format!(
            "Nothing is bound at '{}'",
            name
        ))),
        Err(e) => Err(e),
    }
}

/// Look up `cf_name` and `destination_name` and check their categories
pub fn check_bindings(
    session: &Session,
    cf_name: &str,
    destination_name: &str,
) -> Result<VerifiedBindings> {
    let connection_factory = lookup_reference(session, cf_name)?;
    if ResourceCategory::of(&connection_factory) != Some(ResourceCategory::ConnectionFactory) {
        return Err(BridgeError::Resolution(format!(
            "'{}' is bound to {}, not a connection factory",
            cf_name, connection_factory.class_name
        )));
    }

    let destination = lookup_reference(session, destination_name)?;
    let destination_category = match ResourceCategory::of(&destination) {
        Some(category @ (ResourceCategory::Topic | ResourceCategory::Queue)) => category,
        _ => {
            return Err(BridgeError::Resolution(format!(
                "Destination must be a topic or a queue ('{}' is bound to {})",
                destination_name, destination.class_name
            )))
        }
    };

    Ok(VerifiedBindings {
        connection_factory,
        destination,
        destination_category,
    })
}
