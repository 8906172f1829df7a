//! Validation Contract Tests
//!
//! These tests verify INVARIANTS that MUST NEVER BREAK regardless of implementation.
//!
//! **Invariant**: a run with a missing or inconsistent parameter fails with a
//! validation error before any directory is contacted, and the failure names
//! the first problem in a fixed order.

use dirbridge_core::drivers::{InMemoryDirectory, MemoryDirectoryFactory};
use dirbridge_core::{bridge, BridgeError, ErrorKind, RawParameters};

fn complete_bind() -> RawParameters {
    RawParameters {
        source_url: Some("mem://source".to_string()),
        source_username: Some("default@vpn".to_string()),
        source_password: Some("pw".to_string()),
        target_url: Some("mem://target".to_string()),
        target_username: Some("admin".to_string()),
        target_password: Some("pw".to_string()),
        operation: Some("BIND".to_string()),
        topic: Some("T1".to_string()),
        name: Some("dn=T1,o=example".to_string()),
        ..Default::default()
    }
}

/// Run `params` and return the validation message plus the number of
/// directory calls made on either side
fn reject(params: &RawParameters) -> (String, usize) {
    let source = InMemoryDirectory::new();
    let target = InMemoryDirectory::new();
    let factory = MemoryDirectoryFactory::new()
        .register("mem://source", &source)
        .register("mem://target", &target);

    let message = match bridge::execute(params, &factory) {
        Err(BridgeError::Validation(message)) => message,
        other => panic!("Expected a validation error, got {:?}", other),
    };
    (message, source.total_calls() + target.total_calls())
}

/// WHY: Validation is the only gate before credentials go over the wire
/// BREAKS: Half-configured runs connecting to production directories
#[test]
fn every_missing_field_fails_before_any_directory_call() {
    let removals: [fn(&mut RawParameters); 10] = [
        |p| p.target_url = None,
        |p| p.target_username = None,
        |p| p.target_password = None,
        |p| p.operation = None,
        |p| p.operation = Some("MOVE".to_string()),
        |p| p.source_url = None,
        |p| p.source_username = None,
        |p| p.source_password = None,
        |p| p.topic = None,
        |p| p.name = None,
    ];

    for remove in removals {
        let mut params = complete_bind();
        remove(&mut params);
        let (_, calls) = reject(&params);
        assert_eq!(calls, 0);
    }
}

/// WHY: Operators fix one problem at a time, top to bottom
/// REASON: Target endpoint, then operation, then source, then name
/// BREAKS: Error messages that point at the wrong flag
#[test]
fn first_problem_wins_in_fixed_order() {
    let mut params = RawParameters::default();
    assert_eq!(reject(&params).0, "Please specify \"-jndiUrl\" parameter");

    params.target_url = Some("mem://target".to_string());
    assert_eq!(reject(&params).0, "Please specify \"-jndiUsername\" parameter");

    params.target_username = Some("admin".to_string());
    assert_eq!(reject(&params).0, "Please specify \"-jndiPassword\" parameter");

    params.target_password = Some("pw".to_string());
    assert_eq!(reject(&params).0, "Please specify \"-operation\" parameter");

    params.operation = Some("rebind".to_string());
    assert!(reject(&params).0.starts_with("For BIND or REBIND operation please specify all"));

    params.source_url = Some("mem://source".to_string());
    params.source_username = Some("default@vpn".to_string());
    params.source_password = Some("pw".to_string());
    assert_eq!(reject(&params).0, "Please specify one of [-cf, -topic, -queue]");

    params.queue = Some("Q1".to_string());
    assert_eq!(reject(&params).0, "Please specify \"-name\" parameter");
}

/// WHY: A run imports exactly one resource
/// BREAKS: Silent choice between two resources the operator named
#[test]
fn more_than_one_resource_is_rejected() {
    let mut params = complete_bind();
    params.connection_factory = Some("/jms/cf/default".to_string());
    let (message, calls) = reject(&params);
    assert_eq!(message, "Please specify only one of [-cf, -topic, -queue]");
    assert_eq!(calls, 0);
}

/// WHY: UNBIND and LIST never read the source, so they never require it
/// BREAKS: Target-only maintenance would demand broker credentials
#[test]
fn target_only_operations_do_not_require_source() {
    for operation in ["UNBIND", "LIST"] {
        let mut params = complete_bind();
        params.operation = Some(operation.to_string());
        params.source_url = None;
        params.source_username = None;
        params.source_password = None;
        params.topic = None;
        params.name = None;
        assert_eq!(reject(&params).0, "Please specify \"-name\" parameter");
    }
}

/// WHY: Validation failures end the run with their own kind, so the CLI
/// can print usage instead of a directory error
#[test]
fn validation_errors_are_not_directory_errors() {
    let err = bridge::execute(&RawParameters::default(), &MemoryDirectoryFactory::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.is_fatal());
}
