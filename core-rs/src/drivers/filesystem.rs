//! FileSystemDirectory: a directory service backed by the local filesystem
//!
//! Layout under the provider root:
//! - every context is a directory named by its RDN
//! - every leaf binding is a `<rdn>.binding` JSON file in its parent context
//!
//! `o=example/dn=Q1.binding` therefore holds the binding `dn=Q1,o=example`.
//! RDNs are percent-encoded on disk where they would collide with path
//! syntax (`/`, `%`, a leading `.`) or with the `.binding` suffix.

use crate::drivers::traits::{DirectoryDriver, Listing, NameClassPair};
use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::reference::{BoundObject, ResourceReference, CONTEXT_CLASS_NAME};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of leaf binding files
pub const BINDING_EXTENSION: &str = "binding";

/// On-disk form of a leaf binding
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BindingRecord {
    reference: ResourceReference,

    /// ISO 8601 timestamp of the last bind or rebind
    bound_at: String,
}

/// What a name currently denotes on disk
enum Entry {
    Context(PathBuf),
    Leaf(PathBuf),
    Missing,
}

/// File-system-backed directory connection
#[derive(Debug, Clone)]
pub struct FileSystemDirectory {
    root: PathBuf,
    closed: bool,
}

impl FileSystemDirectory {
    /// Open the directory rooted at `root`
    ///
    /// # Example
    ///
    /// ```
    /// use dirbridge_core::drivers::FileSystemDirectory;
    ///
    /// let temp = tempfile::TempDir::new().unwrap();
    /// let directory = FileSystemDirectory::open(temp.path()).unwrap();
    /// assert_eq!(directory.root(), temp.path());
    ///
    /// assert!(FileSystemDirectory::open(&temp.path().join("missing")).is_err());
    /// ```
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(BridgeError::Connection(format!(
                "Directory root {} does not exist or is not a directory",
                root.display()
            )));
        }
        debug!("[FileSystemDirectory] Opened root {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            closed: false,
        })
    }

    /// Open the directory named by a provider URL (`file:///path` or a bare path)
    pub fn from_provider_url(url: &str) -> Result<Self> {
        Self::open(&Self::root_from_url(url)?)
    }

    /// Provider root on disk
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn root_from_url(url: &str) -> Result<PathBuf> {
        let path = match url.strip_prefix("file://") {
            Some(rest) => rest,
            None if url.contains("://") => {
                return Err(BridgeError::Connection(format!(
                    "Unsupported provider URL for filesystem directory: {}",
                    url
                )))
            }
            None => url,
        };
        if path.is_empty() {
            return Err(BridgeError::Connection(
                "Provider URL does not name a path".to_string(),
            ));
        }
        Ok(PathBuf::from(path))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BridgeError::Directory(
                "Filesystem directory connection is closed".to_string(),
            ));
        }
        Ok(())
    }

    fn context_path(&self, name: &DistinguishedName) -> PathBuf {
        name.path_from_root()
            .fold(self.root.clone(), |path, rdn| path.join(encode_component(rdn)))
    }

    fn leaf_path(&self, name: &DistinguishedName) -> Option<PathBuf> {
        let leaf = name.leaf()?;
        let parent = name.parent()?;
        Some(
            self.context_path(&parent)
                .join(format!("{}.{}", encode_component(leaf), BINDING_EXTENSION)),
        )
    }

    fn entry(&self, name: &DistinguishedName) -> Entry {
        let context = self.context_path(name);
        if context.is_dir() {
            return Entry::Context(context);
        }
        match self.leaf_path(name) {
            Some(leaf) if leaf.is_file() => Entry::Leaf(leaf),
            _ => Entry::Missing,
        }
    }

    /// Path of the parent context, failing if it does not exist
    fn parent_context(&self, name: &DistinguishedName) -> Result<PathBuf> {
        let parent = name.parent().unwrap_or_else(DistinguishedName::root);
        match self.entry(&parent) {
            Entry::Context(path) => Ok(path),
            _ => Err(BridgeError::NameNotFound(format!(
                "Parent context '{}' of '{}' does not exist",
                parent, name
            ))),
        }
    }

    fn read_record(path: &Path) -> Result<BindingRecord> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write a binding file atomically (temp file + rename)
    fn write_record(path: &Path, reference: &ResourceReference) -> Result<()> {
        let record = BindingRecord {
            reference: reference.clone(),
            bound_at: Utc::now().to_rfc3339(),
        };
        let data = serde_json::to_string_pretty(&record)?;

        let file_name = path
            .file_name()
            .ok_or_else(|| BridgeError::Directory(format!("Invalid binding path {}", path.display())))?;
        let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
        fs::write(&temp_path, data)?;
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn is_empty_dir(path: &Path) -> Result<bool> {
        Ok(fs::read_dir(path)?.next().is_none())
    }
}

/// On-disk file name for an RDN
///
/// Encoded names never start with `.` (reserved for temp files) and never
/// end with `.binding`, so a context directory cannot collide with a leaf file.
fn encode_component(rdn: &str) -> String {
    let mut encoded = rdn.replace('%', "%25").replace('/', "%2F");
    if encoded.starts_with('.') {
        encoded.replace_range(..1, "%2E");
    }
    let suffix = format!(".{}", BINDING_EXTENSION);
    if encoded.ends_with(&suffix) {
        let dot = encoded.len() - suffix.len();
        encoded.replace_range(dot..dot + 1, "%2E");
    }
    encoded
}

fn decode_component(file_name: &str) -> String {
    let mut decoded = String::with_capacity(file_name.len());
    let mut rest = file_name;
    while let Some(pos) = rest.find('%') {
        decoded.push_str(&rest[..pos]);
        let escape = &rest[pos..];
        let (c, len) = match escape.get(..3) {
            Some("%25") => ('%', 3),
            Some("%2F") => ('/', 3),
            Some("%2E") => ('.', 3),
            _ => ('%', 1),
        };
        decoded.push(c);
        rest = &escape[len..];
    }
    decoded.push_str(rest);
    decoded
}

impl DirectoryDriver for FileSystemDirectory {
    fn lookup(&self, name: &DistinguishedName) -> Result<BoundObject> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] lookup '{}'", name);
        match self.entry(name) {
            Entry::Context(_) => Ok(BoundObject::Context),
            Entry::Leaf(path) => Ok(BoundObject::Reference(Self::read_record(&path)?.reference)),
            Entry::Missing => Err(BridgeError::NameNotFound(name.to_string())),
        }
    }

    fn bind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] bind '{}'", name);
        if name.is_root() {
            return Err(BridgeError::AlreadyBound("<root context>".to_string()));
        }
        self.parent_context(name)?;
        match self.entry(name) {
            Entry::Context(_) | Entry::Leaf(_) => Err(BridgeError::AlreadyBound(name.to_string())),
            Entry::Missing => {
                let path = self
                    .leaf_path(name)
                    .ok_or_else(|| BridgeError::InvalidName(name.to_string()))?;
                Self::write_record(&path, reference)
            }
        }
    }

    fn rebind(&mut self, name: &DistinguishedName, reference: &ResourceReference) -> Result<()> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] rebind '{}'", name);
        if name.is_root() {
            return Err(BridgeError::Directory(
                "Cannot rebind the root context".to_string(),
            ));
        }
        self.parent_context(name)?;
        if let Entry::Context(path) = self.entry(name) {
            if !Self::is_empty_dir(&path)? {
                return Err(BridgeError::ContextNotEmpty(name.to_string()));
            }
            fs::remove_dir(&path)?;
        }
        let path = self
            .leaf_path(name)
            .ok_or_else(|| BridgeError::InvalidName(name.to_string()))?;
        Self::write_record(&path, reference)
    }

    fn unbind(&mut self, name: &DistinguishedName) -> Result<()> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] unbind '{}'", name);
        if name.is_root() {
            return Err(BridgeError::Directory(
                "Cannot unbind the root context".to_string(),
            ));
        }
        self.parent_context(name)?;
        match self.entry(name) {
            Entry::Leaf(path) => fs::remove_file(&path)?,
            Entry::Context(path) => {
                if !Self::is_empty_dir(&path)? {
                    return Err(BridgeError::ContextNotEmpty(name.to_string()));
                }
                fs::remove_dir(&path)?;
            }
            Entry::Missing => {}
        }
        Ok(())
    }

    fn list(&self, name: &DistinguishedName) -> Result<Listing> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] list '{}'", name);
        let context = match self.entry(name) {
            Entry::Context(path) => path,
            Entry::Leaf(_) => return Ok(Listing::NotAContext),
            Entry::Missing => return Err(BridgeError::NameNotFound(name.to_string())),
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(&context)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            // Temp files and anything else not written by this driver
            if file_name.starts_with('.') {
                continue;
            }

            if path.is_dir() {
                children.push(NameClassPair::new(
                    decode_component(&file_name),
                    CONTEXT_CLASS_NAME,
                ));
                continue;
            }

            // Skip files that are not bindings
            let rdn = match file_name.strip_suffix(&format!(".{}", BINDING_EXTENSION)) {
                Some(rdn) if !rdn.is_empty() => decode_component(rdn),
                _ => continue,
            };
            let record = Self::read_record(&path)?;
            children.push(NameClassPair::new(rdn, record.reference.class_name));
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Listing::Children(children))
    }

    fn create_subcontext(&mut self, name: &DistinguishedName) -> Result<()> {
        self.ensure_open()?;
        debug!("[FileSystemDirectory] create_subcontext '{}'", name);
        if name.is_root() {
            return Err(BridgeError::AlreadyBound("<root context>".to_string()));
        }
        self.parent_context(name)?;
        match self.entry(name) {
            Entry::Missing => {
                fs::create_dir(self.context_path(name))?;
                Ok(())
            }
            _ => Err(BridgeError::AlreadyBound(name.to_string())),
        }
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            debug!("[FileSystemDirectory] Closed root {}", self.root.display());
        }
        self.closed = true;
        Ok(())
    }
}
