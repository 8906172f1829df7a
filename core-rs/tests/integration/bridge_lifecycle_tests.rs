//! Bridge Lifecycle Integration Tests
//!
//! Drives whole runs through `bridge::execute` against in-memory source and
//! target directories: BIND, REBIND, LIST and UNBIND in sequence, checking
//! the target tree after each step.
//!
//! **Pattern: Direct API Testing**
//! Uses the library API with `MemoryDirectoryFactory` instead of the CLI
//! binary, so directory state and call logs can be inspected directly.

use dirbridge_core::drivers::{DirectoryCall, DirectoryDriver, InMemoryDirectory, MemoryDirectoryFactory};
use dirbridge_core::{
    bridge, BoundObject, BridgeError, DistinguishedName, Outcome, RawParameters, ResourceReference,
};

const SOURCE_URL: &str = "mem://broker";
const TARGET_URL: &str = "mem://ldap";

fn dn(name: &str) -> DistinguishedName {
    DistinguishedName::parse(name).unwrap()
}

/// Helper: source with one resource of each category, target with `o=example`
fn create_directories() -> (InMemoryDirectory, InMemoryDirectory, MemoryDirectoryFactory) {
    let mut source = InMemoryDirectory::new().with_credentials("default@vpn", "broker-pw");
    source
        .bind(
            &dn("/jms/cf/default"),
            &ResourceReference::new("com.example.jms.ExampleConnectionFactory")
                .with_factory("com.example.jndi.ExampleObjectFactory")
                .with_address("Host", "tcp://broker:55555"),
        )
        .unwrap();
    source
        .bind(
            &dn("/jms/topic/prices"),
            &ResourceReference::new("com.example.jms.ExampleTopic").with_address("Topic", "prices"),
        )
        .unwrap();
    source
        .bind(
            &dn("Q1"),
            &ResourceReference::new("com.example.jms.ExampleQueue").with_address("Queue", "Q1"),
        )
        .unwrap();
    source
        .bind(
            &dn("Q2"),
            &ResourceReference::new("com.example.jms.ExampleQueue").with_address("Queue", "Q2"),
        )
        .unwrap();
    source.clear_calls();

    let mut target = InMemoryDirectory::new().with_credentials("cn=admin", "ldap-pw");
    target.create_subcontext(&dn("o=example")).unwrap();
    target.clear_calls();

    let factory = MemoryDirectoryFactory::new()
        .register(SOURCE_URL, &source)
        .register(TARGET_URL, &target);
    (source, target, factory)
}

fn params(operation: &str, name: &str) -> RawParameters {
    RawParameters {
        source_url: Some(SOURCE_URL.to_string()),
        source_username: Some("default@vpn".to_string()),
        source_password: Some("broker-pw".to_string()),
        target_url: Some(TARGET_URL.to_string()),
        target_username: Some("cn=admin".to_string()),
        target_password: Some("ldap-pw".to_string()),
        operation: Some(operation.to_string()),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn queue(operation: &str, queue: &str, name: &str) -> RawParameters {
    RawParameters {
        queue: Some(queue.to_string()),
        ..params(operation, name)
    }
}

fn listed_names(factory: &MemoryDirectoryFactory, name: &str) -> Vec<String> {
    match bridge::execute(&params("LIST", name), factory).unwrap() {
        Outcome::Listed { children, .. } => children.into_iter().map(|c| c.name).collect(),
        other => panic!("Expected a context listing, got {:?}", other),
    }
}

fn bound_class(target: &InMemoryDirectory, name: &str) -> String {
    match target.handle().lookup(&dn(name)).unwrap() {
        BoundObject::Reference(reference) => reference.class_name,
        BoundObject::Context => panic!("Expected a leaf at {}", name),
    }
}

#[test]
fn test_bind_then_list() {
    let (_source, target, factory) = create_directories();

    let outcome = bridge::execute(&queue("BIND", "Q1", "dn=Q1,o=example"), &factory).unwrap();
    assert_eq!(outcome.to_string(), "Bind completed");

    assert_eq!(listed_names(&factory, "o=example"), vec!["dn=Q1".to_string()]);
    assert_eq!(bound_class(&target, "dn=Q1,o=example"), "com.example.jms.ExampleQueue");
}

#[test]
fn test_bind_copies_reference_unchanged() {
    let (source, target, factory) = create_directories();
    let cf = RawParameters {
        connection_factory: Some("/jms/cf/default".to_string()),
        ..params("BIND", "cn=defaultCF,o=example")
    };
    bridge::execute(&cf, &factory).unwrap();

    let original = source.handle().lookup(&dn("/jms/cf/default")).unwrap();
    let copied = target.handle().lookup(&dn("cn=defaultCF,o=example")).unwrap();
    assert_eq!(original, copied);
}

#[test]
fn test_bind_twice_is_already_bound() {
    let (_source, target, factory) = create_directories();
    bridge::execute(&queue("BIND", "Q1", "dn=Q1,o=example"), &factory).unwrap();

    let err = bridge::execute(&queue("BIND", "Q2", "dn=Q1,o=example"), &factory).unwrap_err();
    assert!(matches!(err, BridgeError::AlreadyBound(_)));

    // First binding survives untouched
    match target.handle().lookup(&dn("dn=Q1,o=example")).unwrap() {
        BoundObject::Reference(reference) => assert_eq!(reference.addresses[0].content, "Q1"),
        BoundObject::Context => panic!("Expected a leaf binding"),
    }
}

#[test]
fn test_rebind_replaces_single_entry() {
    let (_source, target, factory) = create_directories();
    bridge::execute(&queue("REBIND", "Q1", "dn=Q,o=example"), &factory).unwrap();
    let outcome = bridge::execute(&queue("REBIND", "Q2", "dn=Q,o=example"), &factory).unwrap();
    assert_eq!(outcome.to_string(), "Rebind completed");

    assert_eq!(listed_names(&factory, "o=example"), vec!["dn=Q".to_string()]);
    match target.handle().lookup(&dn("dn=Q,o=example")).unwrap() {
        BoundObject::Reference(reference) => assert_eq!(reference.addresses[0].content, "Q2"),
        BoundObject::Context => panic!("Expected a leaf binding"),
    }
}

#[test]
fn test_unbind_context_removes_every_child() {
    let (_source, target, factory) = create_directories();
    bridge::execute(&queue("BIND", "Q1", "dn=Q1,o=example"), &factory).unwrap();
    bridge::execute(&queue("BIND", "Q2", "dn=Q2,o=example"), &factory).unwrap();
    let topic = RawParameters {
        topic: Some("/jms/topic/prices".to_string()),
        ..params("BIND", "dn=prices,o=example")
    };
    bridge::execute(&topic, &factory).unwrap();

    match bridge::execute(&params("UNBIND", "o=example"), &factory).unwrap() {
        Outcome::Unbound { removed, .. } => assert_eq!(removed.len(), 3),
        other => panic!("Expected Unbound, got {:?}", other),
    }

    // The context itself stays, now empty
    assert!(target.contains(&dn("o=example")));
    assert!(listed_names(&factory, "o=example").is_empty());
}

#[test]
fn test_unbind_leaf_removes_only_that_binding() {
    let (_source, target, factory) = create_directories();
    bridge::execute(&queue("BIND", "Q1", "dn=Q1,o=example"), &factory).unwrap();
    bridge::execute(&queue("BIND", "Q2", "dn=Q2,o=example"), &factory).unwrap();

    let outcome = bridge::execute(&params("UNBIND", "dn=Q1,o=example"), &factory).unwrap();
    assert_eq!(outcome.to_string(), "Unbind completed");

    assert!(!target.contains(&dn("dn=Q1,o=example")));
    assert!(target.contains(&dn("dn=Q2,o=example")));
}

#[test]
fn test_list_leaf_reports_type() {
    let (_source, _target, factory) = create_directories();
    bridge::execute(&queue("BIND", "Q1", "dn=Q1,o=example"), &factory).unwrap();

    let outcome = bridge::execute(&params("LIST", "dn=Q1,o=example"), &factory).unwrap();
    assert!(matches!(outcome, Outcome::Leaf { .. }));
    assert_eq!(
        outcome.to_string(),
        "dn=Q1,o=example found, type: com.example.jms.ExampleQueue (queue)"
    );
}

#[test]
fn test_list_empty_context() {
    let (_source, _target, factory) = create_directories();
    let outcome = bridge::execute(&params("LIST", "o=example"), &factory).unwrap();
    assert_eq!(outcome.to_string(), "Listing of o=example {\n}\n");
}

#[test]
fn test_bind_then_unbind_restores_listing() {
    let (_source, _target, factory) = create_directories();
    bridge::execute(&queue("BIND", "Q2", "dn=Keep,o=example"), &factory).unwrap();
    let before = listed_names(&factory, "o=example");

    bridge::execute(&queue("BIND", "Q1", "dn=Temp,o=example"), &factory).unwrap();
    bridge::execute(&params("UNBIND", "dn=Temp,o=example"), &factory).unwrap();

    assert_eq!(listed_names(&factory, "o=example"), before);
}

#[test]
fn test_wrong_category_is_resolution_error() {
    let (_source, target, factory) = create_directories();
    let as_topic = RawParameters {
        topic: Some("Q1".to_string()),
        ..params("BIND", "dn=Q1,o=example")
    };

    let err = bridge::execute(&as_topic, &factory).unwrap_err();
    assert!(matches!(err, BridgeError::Resolution(_)));
    assert!(!target.contains(&dn("dn=Q1,o=example")));
}

#[test]
fn test_bad_credentials_are_connection_errors() {
    let (_source, target, factory) = create_directories();
    let mut p = params("LIST", "o=example");
    p.target_password = Some("wrong".to_string());

    let err = bridge::execute(&p, &factory).unwrap_err();
    assert!(matches!(err, BridgeError::Connection(_)));
    assert_eq!(target.call_count(DirectoryCall::Close), 0);
}
