//! Reference resolution in the source directory

use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::reference::{BoundObject, Resource, ResourceCategory};
use crate::session::Session;
use tracing::debug;

/// Looks up source resources and extracts their reference descriptors
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Resolve `name` in the source session as a resource of `category`
    ///
    /// Read-only: performs a single lookup. Fails with `Resolution` when
    /// nothing is bound at `name`, when `name` is a context, or when the
    /// bound reference belongs to a different category.
    pub fn resolve(source: &Session, category: ResourceCategory, name: &str) -> Result<Resource> {
        let dn = DistinguishedName::parse(name).map_err(|e| {
            BridgeError::Resolution(format!("Cannot resolve {} '{}': {}", category, name, e))
        })?;
        debug!("[Resolver] Looking up {} '{}' in {}", category, name, source.provider_url());

        let bound = source.driver()?.lookup(&dn).map_err(|e| match e {
            BridgeError::NameNotFound(_) => BridgeError::Resolution(format!(
                "No {} named '{}' in the source directory",
                category, name
            )),
            other => other,
        })?;

        match bound {
            BoundObject::Reference(reference) => match ResourceCategory::of(&reference) {
                Some(found) if found == category => Ok(Resource::new(category, reference)),
                Some(found) => Err(BridgeError::Resolution(format!(
                    "'{}' is a {}, not a {}",
                    name, found, category
                ))),
                None => Err(BridgeError::Resolution(format!(
                    "'{}' is bound to {}, not a {}",
                    name, reference.class_name, category
                ))),
            },
            BoundObject::Context => Err(BridgeError::Resolution(format!(
                "'{}' is a context, not a {}",
                name, category
            ))),
        }
    }
}
