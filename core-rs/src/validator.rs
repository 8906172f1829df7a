//! Parameter validation for bridge runs
//!
//! Checks the precondition matrix in order and stops at the first failure,
//! before any directory session exists:
//! 1. target URL, username and password
//! 2. a recognised operation
//! 3. for BIND/REBIND: source URL, username and password, and exactly one
//!    of connection factory, topic or queue
//! 4. the binding name

use crate::config::{BridgeFile, DirectoryEndpoint, EndpointSettings, ReferralPolicy, DEFAULT_FACTORY};
use crate::errors::{BridgeError, Result};
use crate::naming::DistinguishedName;
use crate::operation::{BridgeConfig, Command, Operation, SourceResource};
use crate::reference::ResourceCategory;

/// Unvalidated parameters, as collected from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    pub source_url: Option<String>,
    pub source_username: Option<String>,
    pub source_password: Option<String>,
    pub source_referral: Option<ReferralPolicy>,
    pub source_factory: Option<String>,

    pub target_url: Option<String>,
    pub target_username: Option<String>,
    pub target_password: Option<String>,
    pub target_referral: Option<ReferralPolicy>,
    pub target_factory: Option<String>,

    pub operation: Option<String>,

    pub connection_factory: Option<String>,
    pub topic: Option<String>,
    pub queue: Option<String>,

    pub name: Option<String>,
}

impl RawParameters {
    /// Fill parameters not given on the command line from a config file
    pub fn with_file_defaults(mut self, file: &BridgeFile) -> Self {
        fill_endpoint(
            &file.target,
            &mut self.target_url,
            &mut self.target_username,
            &mut self.target_password,
            &mut self.target_referral,
            &mut self.target_factory,
        );
        fill_endpoint(
            &file.source,
            &mut self.source_url,
            &mut self.source_username,
            &mut self.source_password,
            &mut self.source_referral,
            &mut self.source_factory,
        );
        self
    }
}

fn fill_endpoint(
    settings: &EndpointSettings,
    url: &mut Option<String>,
    username: &mut Option<String>,
    password: &mut Option<String>,
    referral: &mut Option<ReferralPolicy>,
    factory: &mut Option<String>,
) {
    if url.is_none() {
        *url = settings.url.clone();
    }
    if username.is_none() {
        *username = settings.username.clone();
    }
    if password.is_none() {
        *password = settings.password.clone();
    }
    if referral.is_none() {
        *referral = settings.referral;
    }
    if factory.is_none() {
        *factory = settings.factory.clone();
    }
}

pub(crate) fn missing(flag: &str) -> BridgeError {
    BridgeError::Validation(format!("Please specify \"{}\" parameter", flag))
}

pub(crate) fn endpoint(
    url: &str,
    username: &str,
    password: &str,
    referral: Option<ReferralPolicy>,
    factory: Option<&String>,
) -> DirectoryEndpoint {
    DirectoryEndpoint::new(url, username, password)
        .with_referral(referral.unwrap_or_default())
        .with_factory(factory.map(String::as_str).unwrap_or(DEFAULT_FACTORY))
}

/// Builds a [`BridgeConfig`] from [`RawParameters`]
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validate parameters in precondition order
    ///
    /// # Examples
    ///
    /// ```
    /// use dirbridge_core::{Operation, ParameterValidator, RawParameters};
    ///
    /// let params = RawParameters {
    ///     target_url: Some("file:///srv/jndi".to_string()),
    ///     target_username: Some("admin".to_string()),
    ///     target_password: Some("secret".to_string()),
    ///     operation: Some("LIST".to_string()),
    ///     name: Some("ou=queues".to_string()),
    ///     ..Default::default()
    /// };
    /// let config = ParameterValidator::validate(&params).unwrap();
    /// assert_eq!(config.operation(), Operation::List);
    ///
    /// let err = ParameterValidator::validate(&RawParameters::default()).unwrap_err();
    /// assert!(err.to_string().contains("-jndiUrl"));
    /// ```
    pub fn validate(params: &RawParameters) -> Result<BridgeConfig> {
        // 1. Target endpoint
        let target_url = params.target_url.as_ref().ok_or_else(|| missing("-jndiUrl"))?;
        let target_username = params
            .target_username
            .as_ref()
            .ok_or_else(|| missing("-jndiUsername"))?;
        let target_password = params
            .target_password
            .as_ref()
            .ok_or_else(|| missing("-jndiPassword"))?;

        // 2. Operation
        let operation: Operation = params
            .operation
            .as_ref()
            .ok_or_else(|| missing("-operation"))?
            .parse()?;

        // 3. Source endpoint and resource for BIND/REBIND
        let command = if operation.needs_source() {
            let source = Self::source_endpoint(params)?;
            let resource = Self::source_resource(params)?;
            match operation {
                Operation::Bind => Command::Bind { source, resource },
                _ => Command::Rebind { source, resource },
            }
        } else if operation == Operation::Unbind {
            Command::Unbind
        } else {
            Command::List
        };

        // 4. Binding name
        let raw_name = params.name.as_ref().ok_or_else(|| missing("-name"))?;
        let name = DistinguishedName::parse(raw_name).map_err(|e| {
            BridgeError::Validation(format!("Invalid \"-name\" parameter: {}", e))
        })?;

        let target = endpoint(
            target_url,
            target_username,
            target_password,
            params.target_referral,
            params.target_factory.as_ref(),
        );

        Ok(BridgeConfig::new(target, name, command))
    }

    fn source_endpoint(params: &RawParameters) -> Result<DirectoryEndpoint> {
        match (
            &params.source_url,
            &params.source_username,
            &params.source_password,
        ) {
            (Some(url), Some(username), Some(password)) => Ok(endpoint(
                url,
                username,
                password,
                params.source_referral,
                params.source_factory.as_ref(),
            )),
            _ => Err(BridgeError::Validation(
                "For BIND or REBIND operation please specify all \"-solaceUrl\", \
                 \"-solaceUsername\" and \"-solacePassword\" parameters"
                    .to_string(),
            )),
        }
    }

    fn source_resource(params: &RawParameters) -> Result<SourceResource> {
        let mut supplied: Vec<SourceResource> = [
            (ResourceCategory::ConnectionFactory, &params.connection_factory),
            (ResourceCategory::Topic, &params.topic),
            (ResourceCategory::Queue, &params.queue),
        ]
        .into_iter()
        .filter_map(|(category, name)| {
            name.as_ref()
                .map(|name| SourceResource::new(category, name.clone()))
        })
        .collect();

        if supplied.len() > 1 {
            return Err(BridgeError::Validation(
                "Please specify only one of [-cf, -topic, -queue]".to_string(),
            ));
        }
        supplied.pop().ok_or_else(|| {
            BridgeError::Validation("Please specify one of [-cf, -topic, -queue]".to_string())
        })
    }
}
