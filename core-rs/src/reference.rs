//! Resource references carried between directories
//!
//! A [`ResourceReference`] is the portable addressing descriptor of a
//! connection factory, topic or queue. The bridge copies it from the source
//! directory to the target directory without interpreting its addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class name reported for intermediate contexts in listings and lookups
pub const CONTEXT_CLASS_NAME: &str = "javax.naming.Context";

/// Coarse category of a bridged resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceCategory {
    ConnectionFactory,
    Topic,
    Queue,
}

impl ResourceCategory {
    /// Category implied by a reference's class name
    ///
    /// # Examples
    ///
    /// ```
    /// use dirbridge_core::ResourceCategory;
    ///
    /// assert_eq!(
    ///     ResourceCategory::from_class_name("com.example.jms.ExampleQueue"),
    ///     Some(ResourceCategory::Queue)
    /// );
    /// assert_eq!(ResourceCategory::from_class_name("java.lang.String"), None);
    /// ```
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        let simple = class_name.rsplit('.').next().unwrap_or(class_name);
        if simple.ends_with("ConnectionFactory") {
            Some(Self::ConnectionFactory)
        } else if simple.ends_with("Topic") {
            Some(Self::Topic)
        } else if simple.ends_with("Queue") {
            Some(Self::Queue)
        } else {
            None
        }
    }

    /// Category of a reference, if it names a bridged resource type
    pub fn of(reference: &ResourceReference) -> Option<Self> {
        Self::from_class_name(&reference.class_name)
    }

    /// Human-readable label ("connection factory", "topic", "queue")
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectionFactory => "connection factory",
            Self::Topic => "topic",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One typed address within a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefAddr {
    #[serde(rename = "type")]
    pub addr_type: String,
    pub content: String,
}

impl RefAddr {
    pub fn new(addr_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            addr_type: addr_type.into(),
            content: content.into(),
        }
    }
}

/// Portable reference descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    /// Class of the object the reference reconstructs
    pub class_name: String,

    /// Object factory able to reconstruct a client proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_class_name: Option<String>,

    /// Addressing metadata, in the order the source directory produced it
    #[serde(default)]
    pub addresses: Vec<RefAddr>,
}

impl ResourceReference {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            factory_class_name: None,
            addresses: Vec::new(),
        }
    }

    pub fn with_factory(mut self, factory_class_name: impl Into<String>) -> Self {
        self.factory_class_name = Some(factory_class_name.into());
        self
    }

    pub fn with_address(mut self, addr_type: impl Into<String>, content: impl Into<String>) -> Self {
        self.addresses.push(RefAddr::new(addr_type, content));
        self
    }
}

/// A resolved source resource, tagged by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    ConnectionFactory(ResourceReference),
    Topic(ResourceReference),
    Queue(ResourceReference),
}

impl Resource {
    /// Tag `reference` with `category`
    pub fn new(category: ResourceCategory, reference: ResourceReference) -> Self {
        match category {
            ResourceCategory::ConnectionFactory => Self::ConnectionFactory(reference),
            ResourceCategory::Topic => Self::Topic(reference),
            ResourceCategory::Queue => Self::Queue(reference),
        }
    }

    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::ConnectionFactory(_) => ResourceCategory::ConnectionFactory,
            Self::Topic(_) => ResourceCategory::Topic,
            Self::Queue(_) => ResourceCategory::Queue,
        }
    }

    pub fn reference(&self) -> &ResourceReference {
        match self {
            Self::ConnectionFactory(r) | Self::Topic(r) | Self::Queue(r) => r,
        }
    }

    pub fn into_reference(self) -> ResourceReference {
        match self {
            Self::ConnectionFactory(r) | Self::Topic(r) | Self::Queue(r) => r,
        }
    }
}

/// Object returned by a directory lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundObject {
    /// A leaf binding holding a reference descriptor
    Reference(ResourceReference),

    /// An intermediate context
    Context,
}

impl BoundObject {
    /// Class name of the bound object
    pub fn class_name(&self) -> &str {
        match self {
            Self::Reference(reference) => &reference.class_name,
            Self::Context => CONTEXT_CLASS_NAME,
        }
    }

    /// Type description printed for a leaf LIST
    ///
    /// The class name, followed by the resource category when one applies:
    /// `com.example.jms.ExampleQueue (queue)`.
    pub fn describe(&self) -> String {
        match self {
            Self::Reference(reference) => match ResourceCategory::of(reference) {
                Some(category) => format!("{} ({})", reference.class_name, category),
                None => reference.class_name.clone(),
            },
            Self::Context => CONTEXT_CLASS_NAME.to_string(),
        }
    }
}
