//! Error types for the directory bridge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Name already bound: {0}")]
    AlreadyBound(String),

    #[error("Name not found: {0}")]
    NameNotFound(String),

    /// Reserved for backends that can only report a leaf passed to `list`
    /// as an error; the bundled drivers return `Listing::NotAContext` instead
    #[error("Not a context: {0}")]
    NotAContext(String),

    #[error("Context not empty: {0}")]
    ContextNotEmpty(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Cleanup error: {0}")]
    Cleanup(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Taxonomy class of a [`BridgeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Connection,
    Resolution,
    AlreadyBound,
    NotAContext,
    Cleanup,
    /// Any other failure reported by a directory backend
    Directory,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Validation(_) => ErrorKind::Validation,
            BridgeError::Connection(_) => ErrorKind::Connection,
            BridgeError::Resolution(_) => ErrorKind::Resolution,
            BridgeError::AlreadyBound(_) => ErrorKind::AlreadyBound,
            BridgeError::NotAContext(_) => ErrorKind::NotAContext,
            BridgeError::Cleanup(_) => ErrorKind::Cleanup,
            BridgeError::NameNotFound(_)
            | BridgeError::ContextNotEmpty(_)
            | BridgeError::InvalidName(_)
            | BridgeError::Directory(_)
            | BridgeError::Io(_)
            | BridgeError::Yaml(_)
            | BridgeError::Json(_) => ErrorKind::Directory,
        }
    }

    /// Whether this error terminates a run
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::NotAContext | ErrorKind::Cleanup)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
