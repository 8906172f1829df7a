//! InMemoryDirectory: an in-process directory tree
//!
//! Clones share one store, so a test can keep a handle while the bridge
//! connects through [`MemoryDirectoryFactory`]. Every call is recorded in
//! the store's call log, and failures can be injected per call type.

use crate::config::DirectoryEndpoint;
use crate::drivers::traits::{DirectoryDriver, DirectoryDriverFactory, Listing, NameClassPair};
use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::reference::{BoundObject, ResourceReference, CONTEXT_CLASS_NAME};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Kind of directory call recorded in the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryCall {
    Connect,
    Lookup,
    Bind,
    Rebind,
    Unbind,
    List,
    CreateSubcontext,
    Close,
}

#[derive(Debug, Clone)]
enum Node {
    Context,
    Leaf(ResourceReference),
}

#[derive(Debug)]
struct Store {
    /// Keyed by path from the root; the root context is the empty path
    nodes: BTreeMap<Vec<String>, Node>,
    calls: Vec<(DirectoryCall, String)>,
    failures: HashSet<DirectoryCall>,
    credentials: Option<(String, String)>,
}

impl Default for Store {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Vec::new(), Node::Context);
        Self {
            nodes,
            calls: Vec::new(),
            failures: HashSet::new(),
            credentials: None,
        }
    }
}

impl Store {
    fn record(&mut self, call: DirectoryCall, name: &DistinguishedName) -> Result<()> {
        self.calls.push((call, name.to_string()));
        if self.failures.contains(&call) {
            return Err(BridgeError::Directory(format!(
                "Injected failure on {:?} '{}'",
                call, name
            )));
        }
        Ok(())
    }

    fn require_parent(&self, key: &[String], name: &DistinguishedName) -> Result<()> {
        let parent = &key[..key.len().saturating_sub(1)];
        match self.nodes.get(parent) {
            Some(Node::Context) => Ok(()),
            _ => Err(BridgeError::NameNotFound(format!(
                "Parent context of '{}' does not exist",
                name
            ))),
        }
    }

    fn children(&self, key: &[String]) -> Vec<NameClassPair> {
        self.nodes
            .iter()
            .filter(|(path, _)| path.len() == key.len() + 1 && path.starts_with(key))
            .map(|(path, node)| {
                let class_name = match node {
                    Node::Context => CONTEXT_CLASS_NAME.to_string(),
                    Node::Leaf(reference) => reference.class_name.clone(),
                };
                NameClassPair::new(path[key.len()].clone(), class_name)
            })
            .collect()
    }
}

fn key_of(name: &DistinguishedName) -> Vec<String> {
    name.path_from_root().map(str::to_string).collect()
}

/// Handle to a shared in-memory directory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    store: Arc<Mutex<Store>>,
    closed: bool,
}

impl InMemoryDirectory {
    /// Create an empty directory holding only the root context
    pub fn new() -> Self {
        Self::default()
    }

    /// Require these credentials on connect
    pub fn with_credentials(self, principal: &str, credentials: &str) -> Self {
        self.lock().credentials = Some((principal.to_string(), credentials.to_string()));
        self
    }

    /// Make every future call of `call` fail
    pub fn fail_on(&self, call: DirectoryCall) {
        self.lock().failures.insert(call);
    }

    /// A fresh open handle on the same store
    pub fn handle(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            closed: false,
        }
    }

    /// Recorded calls with the name each was made on, in order
    pub fn calls(&self) -> Vec<(DirectoryCall, String)> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, call: DirectoryCall) -> usize {
        self.lock().calls.iter().filter(|(c, _)| *c == call).count()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    /// Forget recorded calls (e.g. after seeding test data)
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Whether anything is bound at `name`, without recording a call
    pub fn contains(&self, name: &DistinguishedName) -> bool {
        self.lock().nodes.contains_key(&key_of(name))
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BridgeError::Directory(
                "In-memory directory connection is closed".to_string(),
            ));
        }
        Ok(())
    }

    fn record_connect(&self, endpoint: &DirectoryEndpoint) -> Result<()> {
        let mut store = self.lock();
        store
            .calls
            .push((DirectoryCall::Connect, endpoint.provider_url().to_string()));
        if store.failures.contains(&DirectoryCall::Connect) {
            return Err(BridgeError::Connection(format!(
                "Cannot reach directory at {}",
                endpoint.provider_url()
            )));
        }
        if let Some((principal, credentials)) = &store.credentials {
            if principal != endpoint.principal() || credentials != endpoint.credentials() {
                return Err(BridgeError::Connection(format!(
                    "Authentication failed for '{}' at {}",
                    endpoint.principal(),
                    endpoint.provider_url()
                )));
            }
        }
        Ok(())
    }
}

impl DirectoryDriver for InMemoryDirectory {
    fn lookup(&self, name: &DistinguishedName) -> Result<BoundObject> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::Lookup, name)?;
        match store.nodes.get(&key_of(name)) {
            Some(Node::Context) => Ok(BoundObject::Context),
            Some(Node::Leaf(reference)) => Ok(BoundObject::Reference(reference.clone())),
            None => Err(BridgeError::NameNotFound(name.to_string())),
        }
    }

    fn bind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::Bind, name)?;
        let key = key_of(name);
        if store.nodes.contains_key(&key) {
            return Err(BridgeError::AlreadyBound(name.to_string()));
        }
        store.require_parent(&key, name)?;
        store.nodes.insert(key, Node::Leaf(reference.clone()));
        Ok(())
    }

    fn rebind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::Rebind, name)?;
        let key = key_of(name);
        if key.is_empty() {
            return Err(BridgeError::Directory(
                "Cannot rebind the root context".to_string(),
            ));
        }
        store.require_parent(&key, name)?;
        if matches!(store.nodes.get(&key), Some(Node::Context)) && !store.children(&key).is_empty() {
            return Err(BridgeError::ContextNotEmpty(name.to_string()));
        }
        store.nodes.insert(key, Node::Leaf(reference.clone()));
        Ok(())
    }

    fn unbind(&mut self, name: &DistinguishedName) -> Result<()> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::Unbind, name)?;
        let key = key_of(name);
        if key.is_empty() {
            return Err(BridgeError::Directory(
                "Cannot unbind the root context".to_string(),
            ));
        }
        store.require_parent(&key, name)?;
        if matches!(store.nodes.get(&key), Some(Node::Context)) && !store.children(&key).is_empty() {
            return Err(BridgeError::ContextNotEmpty(name.to_string()));
        }
        store.nodes.remove(&key);
        Ok(())
    }

    fn list(&self, name: &DistinguishedName) -> Result<Listing> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::List, name)?;
        let key = key_of(name);
        match store.nodes.get(&key) {
            Some(Node::Context) => Ok(Listing::Children(store.children(&key))),
            Some(Node::Leaf(_)) => Ok(Listing::NotAContext),
            None => Err(BridgeError::NameNotFound(name.to_string())),
        }
    }

    fn create_subcontext(&mut self, name: &DistinguishedName) -> Result<()> {
        self.ensure_open()?;
        let mut store = self.lock();
        store.record(DirectoryCall::CreateSubcontext, name)?;
        let key = key_of(name);
        if store.nodes.contains_key(&key) {
            return Err(BridgeError::AlreadyBound(name.to_string()));
        }
        store.require_parent(&key, name)?;
        store.nodes.insert(key, Node::Context);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.lock().record(DirectoryCall::Close, &DistinguishedName::root())
    }
}

/// Factory connecting endpoints to registered in-memory directories by URL
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectoryFactory {
    directories: HashMap<String, InMemoryDirectory>,
}

impl MemoryDirectoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `directory` for endpoints whose provider URL is `url`
    pub fn register(mut self, url: &str, directory: &InMemoryDirectory) -> Self {
        self.directories.insert(url.to_string(), directory.clone());
        self
    }
}

impl DirectoryDriverFactory for MemoryDirectoryFactory {
    fn connect(&self, endpoint: &DirectoryEndpoint) -> Result<Box<dyn DirectoryDriver>> {
        let directory = self.directories.get(endpoint.provider_url()).ok_or_else(|| {
            BridgeError::Connection(format!(
                "No directory listening at {}",
                endpoint.provider_url()
            ))
        })?;
        directory.record_connect(endpoint)?;
        Ok(Box::new(directory.handle()))
    }
}
