//! Bridge run: validate, open sessions, dispatch, tear down

use crate::dispatcher::{Dispatcher, Outcome};
use crate::drivers::DirectoryDriverFactory;
use crate::errors::Result;
use crate::operation::BridgeConfig;
use crate::session::{SessionManager, SessionRole, Sessions};
use crate::validator::{ParameterValidator, RawParameters};
use tracing::info;

/// Run one validated operation
///
/// Opens the target session, then the source session for BIND/REBIND,
/// dispatches, and closes every opened session before returning, whether
/// the operation succeeded or not.
///
/// # Example
///
/// ```
/// use dirbridge_core::drivers::{InMemoryDirectory, MemoryDirectoryFactory};
/// use dirbridge_core::{bridge, ParameterValidator, RawParameters};
///
/// let target = InMemoryDirectory::new();
/// let factory = MemoryDirectoryFactory::new().register("mem://target", &target);
///
/// let config = ParameterValidator::validate(&RawParameters {
///     target_url: Some("mem://target".to_string()),
///     target_username: Some("admin".to_string()),
///     target_password: Some("pw".to_string()),
///     operation: Some("LIST".to_string()),
///     name: Some(String::new()),
///     ..Default::default()
/// })
/// .unwrap();
///
/// let outcome = bridge::run(&config, &factory).unwrap();
/// assert_eq!(outcome.to_string(), "Listing of  {\n}\n");
/// ```
pub fn run(config: &BridgeConfig, factory: &dyn DirectoryDriverFactory) -> Result<Outcome> {
    let manager = SessionManager::new(factory);
    info!(
        "[Bridge] {} '{}' on {}",
        config.operation(),
        config.name(),
        config.target().provider_url()
    );

    let mut sessions = Sessions::new(manager.open(SessionRole::Target, config.target())?);
    let result = open_source_and_dispatch(config, &manager, &mut sessions);
    sessions.teardown();
    result
}

fn open_source_and_dispatch(
    config: &BridgeConfig,
    manager: &SessionManager<'_>,
    sessions: &mut Sessions,
) -> Result<Outcome> {
    if let Some(source) = config.command().source() {
        sessions.attach_source(manager.open(SessionRole::Source, source)?);
    }
    Dispatcher::new(sessions).execute(config)
}

/// Validate `params` and run the operation
///
/// Validation failures return before the factory is used.
pub fn execute(params: &RawParameters, factory: &dyn DirectoryDriverFactory) -> Result<Outcome> {
    let config = ParameterValidator::validate(params)?;
    run(&config, factory)
}
