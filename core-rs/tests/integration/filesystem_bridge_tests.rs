//! Filesystem Bridge Integration Tests
//!
//! Runs the bridge through `StandardDriverFactory` with `file://` provider
//! URLs, so both directories live in temporary directories on disk.
//!
//! Uses tempfile for isolation - NO /tmp pollution

use dirbridge_core::drivers::{DirectoryDriver, FileSystemDirectory, StandardDriverFactory, BINDING_EXTENSION};
use dirbridge_core::{
    bridge, BoundObject, BridgeError, DistinguishedName, Outcome, RawParameters, ResourceReference,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn dn(name: &str) -> DistinguishedName {
    DistinguishedName::parse(name).unwrap()
}

fn url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Helper: source tree with a queue and a connection factory, empty target
/// with an `o=example` context
fn create_trees() -> (TempDir, TempDir) {
    let source = TempDir::new().unwrap();
    let mut directory = FileSystemDirectory::open(source.path()).unwrap();
    directory
        .bind(
            &dn("/JNDI/Q/requests"),
            &ResourceReference::new("com.example.jms.ExampleQueue").with_address("Queue", "requests"),
        )
        .unwrap();
    directory
        .bind(
            &dn("/JNDI/CF/default"),
            &ResourceReference::new("com.example.jms.ExampleConnectionFactory")
                .with_address("Host", "tcp://broker:55555"),
        )
        .unwrap();

    let target = TempDir::new().unwrap();
    fs::create_dir(target.path().join("o=example")).unwrap();
    (source, target)
}

fn params(source: &TempDir, target: &TempDir, operation: &str, name: &str) -> RawParameters {
    RawParameters {
        source_url: Some(url(source.path())),
        source_username: Some("default@vpn".to_string()),
        source_password: Some("pw".to_string()),
        target_url: Some(url(target.path())),
        target_username: Some("admin".to_string()),
        target_password: Some("secret".to_string()),
        operation: Some(operation.to_string()),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_bind_writes_binding_file() {
    let (source, target) = create_trees();
    let p = RawParameters {
        queue: Some("/JNDI/Q/requests".to_string()),
        ..params(&source, &target, "BIND", "dn=requests,o=example")
    };

    let outcome = bridge::execute(&p, &StandardDriverFactory).unwrap();
    assert_eq!(outcome.to_string(), "Bind completed");

    let file = target
        .path()
        .join("o=example")
        .join(format!("dn=requests.{}", BINDING_EXTENSION));
    assert!(file.is_file());
    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("com.example.jms.ExampleQueue"));
}

#[test]
fn test_full_lifecycle_on_disk() {
    let (source, target) = create_trees();
    let bind_cf = RawParameters {
        connection_factory: Some("/JNDI/CF/default".to_string()),
        ..params(&source, &target, "BIND", "cn=cf,o=example")
    };
    let bind_queue = RawParameters {
        queue: Some("/JNDI/Q/requests".to_string()),
        ..params(&source, &target, "BIND", "cn=requests,o=example")
    };
    bridge::execute(&bind_cf, &StandardDriverFactory).unwrap();
    bridge::execute(&bind_queue, &StandardDriverFactory).unwrap();

    let listing = bridge::execute(&params(&source, &target, "LIST", "o=example"), &StandardDriverFactory)
        .unwrap();
    assert_eq!(listing.to_string(), "Listing of o=example {\ncn=cf\ncn=requests\n}\n");

    let leaf = bridge::execute(&params(&source, &target, "LIST", "cn=cf,o=example"), &StandardDriverFactory)
        .unwrap();
    assert_eq!(
        leaf.to_string(),
        "cn=cf,o=example found, type: com.example.jms.ExampleConnectionFactory (connection factory)"
    );

    bridge::execute(&params(&source, &target, "UNBIND", "o=example"), &StandardDriverFactory).unwrap();
    let emptied = bridge::execute(&params(&source, &target, "LIST", "o=example"), &StandardDriverFactory)
        .unwrap();
    assert_eq!(emptied, Outcome::Listed { name: dn("o=example"), children: vec![] });
    assert!(target.path().join("o=example").is_dir());
}

#[test]
fn test_rebind_overwrites_file() {
    let (source, target) = create_trees();
    let rebind = |resource: &str| RawParameters {
        connection_factory: Some(resource.to_string()),
        ..params(&source, &target, "REBIND", "cn=shared,o=example")
    };
    bridge::execute(&rebind("/JNDI/CF/default"), &StandardDriverFactory).unwrap();

    let mut seeded = FileSystemDirectory::open(source.path()).unwrap();
    seeded
        .rebind(
            &dn("/JNDI/CF/default"),
            &ResourceReference::new("com.example.jms.ExampleConnectionFactory")
                .with_address("Host", "tcp://standby:55555"),
        )
        .unwrap();
    bridge::execute(&rebind("/JNDI/CF/default"), &StandardDriverFactory).unwrap();

    let target_dir = FileSystemDirectory::open(target.path()).unwrap();
    match target_dir.lookup(&dn("cn=shared,o=example")).unwrap() {
        BoundObject::Reference(reference) => {
            assert_eq!(reference.addresses[0].content, "tcp://standby:55555")
        }
        BoundObject::Context => panic!("Expected a leaf binding"),
    }
    let entries = fs::read_dir(target.path().join("o=example")).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_missing_target_root_is_connection_error() {
    let (source, target) = create_trees();
    let mut p = params(&source, &target, "LIST", "o=example");
    p.target_url = Some(url(&target.path().join("nowhere")));

    let err = bridge::execute(&p, &StandardDriverFactory).unwrap_err();
    assert!(matches!(err, BridgeError::Connection(_)));
}

#[test]
fn test_unsupported_factory_is_connection_error() {
    let (source, target) = create_trees();
    let mut p = params(&source, &target, "LIST", "o=example");
    p.target_factory = Some("com.example.ldap.LdapCtxFactory".to_string());

    let err = bridge::execute(&p, &StandardDriverFactory).unwrap_err();
    assert!(matches!(err, BridgeError::Connection(_)));
}

#[test]
fn test_bind_into_missing_context_fails() {
    let (source, target) = create_trees();
    let p = RawParameters {
        queue: Some("/JNDI/Q/requests".to_string()),
        ..params(&source, &target, "BIND", "dn=requests,o=missing")
    };

    let err = bridge::execute(&p, &StandardDriverFactory).unwrap_err();
    assert!(matches!(err, BridgeError::NameNotFound(_)));
    assert!(!target.path().join("o=missing").exists());
}
