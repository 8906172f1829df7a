/**
 * config.rs
 * Directory endpoints and the optional bridge configuration file (YAML format)
 *
 * Format:
 * ```yaml
 * target:
 *   url: file:///srv/jndi
 *   username: admin
 *   password: secret
 *   referral: throw
 *   factory: filesystem
 * source:
 *   url: file:///srv/broker-jndi
 *   username: default@vpn
 *   password: secret
 * ```
 *
 * Every field is optional; values given on the command line take precedence.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{BridgeError, Result};

/// Factory identifier used when none is configured
pub const DEFAULT_FACTORY: &str = "filesystem";

/// How a directory client treats referrals to another server
///
/// Carried on every endpoint and logged at connect. The filesystem backend
/// has no referrals, so the policy does not change its behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralPolicy {
    /// Fail the operation with a referral error
    #[default]
    Throw,
    Follow,
    Ignore,
}

impl ReferralPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Throw => "throw",
            Self::Follow => "follow",
            Self::Ignore => "ignore",
        }
    }
}

impl FromStr for ReferralPolicy {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "throw" => Ok(Self::Throw),
            "follow" => Ok(Self::Follow),
            "ignore" => Ok(Self::Ignore),
            other => Err(BridgeError::Validation(format!(
                "Unknown referral policy '{}' (expected throw, follow or ignore)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReferralPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection parameters for one directory system
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryEndpoint {
    provider_url: String,
    principal: String,
    credentials: String,
    referral: ReferralPolicy,
    factory: String,
}

impl DirectoryEndpoint {
    /// Create an endpoint with the default referral policy and factory
    ///
    /// # Example
    ///
    /// ```
    /// use dirbridge_core::{DirectoryEndpoint, ReferralPolicy};
    ///
    /// let endpoint = DirectoryEndpoint::new("file:///srv/jndi", "admin", "secret");
    /// assert_eq!(endpoint.referral(), ReferralPolicy::Throw);
    /// assert_eq!(endpoint.factory(), "filesystem");
    /// assert!(!format!("{:?}", endpoint).contains("secret"));
    /// ```
    pub fn new(
        provider_url: impl Into<String>,
        principal: impl Into<String>,
        credentials: impl Into<String>,
    ) -> Self {
        Self {
            provider_url: provider_url.into(),
            principal: principal.into(),
            credentials: credentials.into(),
            referral: ReferralPolicy::default(),
            factory: DEFAULT_FACTORY.to_string(),
        }
    }

    pub fn with_referral(mut self, referral: ReferralPolicy) -> Self {
        self.referral = referral;
        self
    }

    pub fn with_factory(mut self, factory: impl Into<String>) -> Self {
        self.factory = factory.into();
        self
    }

    pub fn provider_url(&self) -> &str {
        &self.provider_url
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn credentials(&self) -> &str {
        &self.credentials
    }

    pub fn referral(&self) -> ReferralPolicy {
        self.referral
    }

    pub fn factory(&self) -> &str {
        &self.factory
    }
}

impl fmt::Debug for DirectoryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryEndpoint")
            .field("provider_url", &self.provider_url)
            .field("principal", &self.principal)
            .field("credentials", &"<redacted>")
            .field("referral", &self.referral)
            .field("factory", &self.factory)
            .finish()
    }
}

/// Endpoint defaults read from the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub referral: Option<ReferralPolicy>,
    #[serde(default)]
    pub factory: Option<String>,
}

/// Bridge configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeFile {
    #[serde(default)]
    pub target: EndpointSettings,
    #[serde(default)]
    pub source: EndpointSettings,
}

impl BridgeFile {
    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BridgeError::Validation(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
