//! # dirbridge - directory binding bridge
//!
//! Copies messaging resource bindings (connection factories, topics and
//! queues) from a message broker's own naming directory into an enterprise
//! naming directory, so applications can look them up in one place.
//!
//! ## Operations
//!
//! - `BIND` imports one source resource under a new name in the target
//! - `REBIND` imports it, replacing whatever the name held
//! - `UNBIND` removes a binding, or every child of a context
//! - `LIST` prints the children of a context, or the type of a leaf
//!
//! ## Architecture
//!
//! ```text
//!   RawParameters ──validate──▶ BridgeConfig
//!                                    │
//!                         SessionManager::open
//!                        ┌───────────┴──────────┐
//!                   target Session        source Session (BIND/REBIND)
//!                        │                      │
//!                        └──── Dispatcher ◀─────┘ ReferenceResolver
//!                                    │
//!                              Sessions::teardown
//! ```
//!
//! Directory access goes through the [`drivers::DirectoryDriver`] trait, so
//! the same run works against the file-backed directory or an in-memory one.

pub mod errors;
pub mod naming;
pub mod reference;
pub mod config;
pub mod drivers;
pub mod operation;
pub mod validator;
pub mod session;
pub mod resolver;
pub mod dispatcher;
pub mod bridge;
pub mod verify;
pub mod cli;

pub use errors::{BridgeError, ErrorKind};
pub use naming::DistinguishedName;
pub use reference::{BoundObject, RefAddr, Resource, ResourceCategory, ResourceReference};
pub use config::{BridgeFile, DirectoryEndpoint, EndpointSettings, ReferralPolicy};
pub use operation::{BridgeConfig, Command, Operation, SourceResource};
pub use validator::{ParameterValidator, RawParameters};
pub use session::{Session, SessionManager, SessionRole, Sessions};
pub use resolver::ReferenceResolver;
pub use dispatcher::{Dispatcher, Outcome};
pub use verify::{check_bindings, CheckConfig, CheckParameters, VerifiedBindings};

/// Version of the bridge tools
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
