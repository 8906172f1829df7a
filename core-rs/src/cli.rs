//! Command-line parsing shared by the `dirbridge` and `dirbridge-check` binaries
//!
//! Both tools accept single-dash long flags (`-jndiUrl URL`). They are
//! rewritten to clap's `--jndiUrl` form before parsing. Every parameter is
//! optional at the parser level; missing ones are reported by validation.

use crate::config::{BridgeFile, ReferralPolicy};
use crate::errors::Result;
use crate::validator::RawParameters;
use crate::verify::CheckParameters;
use clap::error::{ContextKind, ContextValue};
use clap::Parser;
use std::path::PathBuf;

/// Long flags accepted with a single dash; each takes a value
pub const VALUE_FLAGS: &[&str] = &[
    "solaceUrl",
    "solaceUsername",
    "solacePassword",
    "solaceReferral",
    "solaceFactory",
    "jndiUrl",
    "jndiUsername",
    "jndiPassword",
    "jndiReferral",
    "jndiFactory",
    "operation",
    "cf",
    "topic",
    "queue",
    "destination",
    "name",
    "config",
];

pub const BRIDGE_USAGE: &str = "
Usage:
dirbridge -solaceUrl S_URL -solaceUsername S_USERNAME@VPN -solacePassword S_PASSWORD \
-jndiUrl J_URL -jndiUsername J_USERNAME -jndiPassword J_PASSWORD \
-operation OPERATION [-cf CF] [-topic TOPIC] [-queue QUEUE] -name DN

Where:
- OPERATION  is one of [BIND, REBIND, UNBIND, LIST]

Options:
  -config FILE                 YAML file with default endpoint settings
  -jndiReferral / -solaceReferral POLICY   throw (default), follow or ignore
  -jndiFactory / -solaceFactory ID         directory backend (default: filesystem)
  -v, --verbose                Debug logging on stderr
";

pub const CHECK_USAGE: &str = "
Usage:
dirbridge-check -jndiUrl URL -jndiUsername USERNAME -jndiPassword PASSWORD \
-cf CONNECTION_FACTORY_DN -destination DESTINATION_DN
";

/// Rewrite single-dash long flags (`-flag`) to clap's `--flag`
///
/// A value following a flag is never rewritten; one starting with `-` is
/// attached as `--flag=-value`, so a password such as `-name` is not
/// mistaken for a flag. Unknown long flags are rewritten too, so clap
/// reports them whole.
///
/// # Example
///
/// ```
/// use dirbridge_core::cli::normalize_args;
///
/// let args = normalize_args(["dirbridge", "-jndiUrl", "file:///srv", "-v"].map(String::from));
/// assert_eq!(args, vec!["dirbridge", "--jndiUrl", "file:///srv", "-v"]);
/// ```
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut normalized: Vec<String> = Vec::new();
    let mut expecting_value = false;

    for (index, arg) in args.into_iter().enumerate() {
        if expecting_value && arg.starts_with('-') {
            // `--flag=-value` keeps clap from reading the value as a flag
            expecting_value = false;
            if let Some(flag) = normalized.last_mut() {
                flag.push('=');
                flag.push_str(&arg);
            }
            continue;
        }
        if index == 0 || expecting_value {
            expecting_value = false;
            normalized.push(arg);
            continue;
        }
        let flag = arg.strip_prefix('-').filter(|rest| !rest.starts_with('-'));
        match flag {
            // Single-character flags stay short (`-v`)
            Some(rest) if rest.chars().count() > 1 => {
                expecting_value = VALUE_FLAGS.contains(&rest);
                normalized.push(format!("--{}", rest));
            }
            _ => {
                if let Some(rest) = arg.strip_prefix("--") {
                    expecting_value = VALUE_FLAGS.contains(&rest);
                }
                normalized.push(arg);
            }
        }
    }
    normalized
}

/// The argument clap rejected, for the "Illegal argument specified" line
pub fn illegal_argument(err: &clap::Error) -> String {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.clone(),
        Some(ContextValue::Strings(args)) => args.join(", "),
        _ => err.kind().to_string(),
    }
}

/// Arguments of the `dirbridge` binary
#[derive(Parser, Debug, Default)]
#[command(name = "dirbridge")]
#[command(version)]
#[command(about = "Import connection factory, topic and queue bindings from a source directory into a target directory", long_about = None)]
pub struct BridgeArgs {
    /// Source directory URL
    #[arg(long = "solaceUrl", value_name = "S_URL")]
    pub solace_url: Option<String>,
    /// Source directory username (USERNAME@VPN)
    #[arg(long = "solaceUsername", value_name = "S_USERNAME")]
    pub solace_username: Option<String>,
    /// Source directory password
    #[arg(long = "solacePassword", value_name = "S_PASSWORD")]
    pub solace_password: Option<String>,
    /// Source referral policy (throw, follow, ignore)
    #[arg(long = "solaceReferral", value_name = "POLICY")]
    pub solace_referral: Option<ReferralPolicy>,
    /// Source directory backend
    #[arg(long = "solaceFactory", value_name = "ID")]
    pub solace_factory: Option<String>,

    /// Target directory URL
    #[arg(long = "jndiUrl", value_name = "J_URL")]
    pub jndi_url: Option<String>,
    /// Target directory username
    #[arg(long = "jndiUsername", value_name = "J_USERNAME")]
    pub jndi_username: Option<String>,
    /// Target directory password
    #[arg(long = "jndiPassword", value_name = "J_PASSWORD")]
    pub jndi_password: Option<String>,
    /// Target referral policy (throw, follow, ignore)
    #[arg(long = "jndiReferral", value_name = "POLICY")]
    pub jndi_referral: Option<ReferralPolicy>,
    /// Target directory backend
    #[arg(long = "jndiFactory", value_name = "ID")]
    pub jndi_factory: Option<String>,

    /// BIND, REBIND, UNBIND or LIST
    #[arg(long = "operation", value_name = "OPERATION")]
    pub operation: Option<String>,

    /// Source connection factory name
    #[arg(long = "cf", value_name = "CF")]
    pub cf: Option<String>,
    /// Source topic name
    #[arg(long = "topic", value_name = "TOPIC")]
    pub topic: Option<String>,
    /// Source queue name
    #[arg(long = "queue", value_name = "QUEUE")]
    pub queue: Option<String>,

    /// Distinguished name of the binding in the target directory
    #[arg(long = "name", value_name = "DN")]
    pub name: Option<String>,

    /// YAML config file with endpoint defaults
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl BridgeArgs {
    /// Parameters for validation, with config file defaults applied
    pub fn parameters(&self) -> Result<RawParameters> {
        let params = RawParameters {
            source_url: self.solace_url.clone(),
            source_username: self.solace_username.clone(),
            source_password: self.solace_password.clone(),
            source_referral: self.solace_referral,
            source_factory: self.solace_factory.clone(),
            target_url: self.jndi_url.clone(),
            target_username: self.jndi_username.clone(),
            target_password: self.jndi_password.clone(),
            target_referral: self.jndi_referral,
            target_factory: self.jndi_factory.clone(),
            operation: self.operation.clone(),
            connection_factory: self.cf.clone(),
            topic: self.topic.clone(),
            queue: self.queue.clone(),
            name: self.name.clone(),
        };

        match &self.config {
            Some(path) => Ok(params.with_file_defaults(&BridgeFile::load(path)?)),
            None => Ok(params),
        }
    }
}

/// Arguments of the `dirbridge-check` binary
#[derive(Parser, Debug, Default)]
#[command(name = "dirbridge-check")]
#[command(version)]
#[command(about = "Check that a connection factory and a destination are bound in a directory", long_about = None)]
pub struct CheckArgs {
    /// Directory URL
    #[arg(long = "jndiUrl", value_name = "URL")]
    pub jndi_url: Option<String>,
    /// Directory username
    #[arg(long = "jndiUsername", value_name = "USERNAME")]
    pub jndi_username: Option<String>,
    /// Directory password
    #[arg(long = "jndiPassword", value_name = "PASSWORD")]
    pub jndi_password: Option<String>,
    /// Referral policy (throw, follow, ignore)
    #[arg(long = "jndiReferral", value_name = "POLICY")]
    pub jndi_referral: Option<ReferralPolicy>,
    /// Directory backend
    #[arg(long = "jndiFactory", value_name = "ID")]
    pub jndi_factory: Option<String>,

    /// Connection factory distinguished name
    #[arg(long = "cf", value_name = "CONNECTION_FACTORY_DN")]
    pub cf: Option<String>,
    /// Destination distinguished name
    #[arg(long = "destination", value_name = "DESTINATION_DN")]
    pub destination: Option<String>,

    /// YAML config file; its target section supplies directory defaults
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl CheckArgs {
    pub fn parameters(&self) -> Result<CheckParameters> {
        let mut params = CheckParameters {
            url: self.jndi_url.clone(),
            username: self.jndi_username.clone(),
            password: self.jndi_password.clone(),
            referral: self.jndi_referral,
            factory: self.jndi_factory.clone(),
            connection_factory: self.cf.clone(),
            destination: self.destination.clone(),
        };

        if let Some(path) = &self.config {
            let file = BridgeFile::load(path)?;
            params.url = params.url.or(file.target.url);
            params.username = params.username.or(file.target.username);
            params.password = params.password.or(file.target.password);
            params.referral = params.referral.or(file.target.referral);
            params.factory = params.factory.or(file.target.factory);
        }
        Ok(params)
    }
}
