//! Drivers module for directory operations
//!
//! Provides the uniform directory interface (DirectoryDriver trait) and implementations:
//! - FileSystemDirectory: contexts as directories, bindings as JSON files
//! - InMemoryDirectory: shared in-process tree with a call log
//! - StandardDriverFactory: picks a backend from the endpoint's factory identifier

mod traits;
mod filesystem;
mod memory;
mod factory;

pub use traits::{DirectoryDriver, DirectoryDriverFactory, Listing, NameClassPair};
pub use filesystem::{FileSystemDirectory, BINDING_EXTENSION};
pub use memory::{DirectoryCall, InMemoryDirectory, MemoryDirectoryFactory};
pub use factory::{DirectoryBackend, StandardDriverFactory};
