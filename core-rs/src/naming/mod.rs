//! Distinguished names for directory bindings
//!
//! A binding name is a comma-separated list of relative names (RDNs), most
//! significant last: `dn=Q1,o=example` is the binding `dn=Q1` inside the
//! context `o=example`. A backslash escapes a literal comma or backslash.
//! The empty string names the root context. Slashes carry no structure, so
//! broker-style names such as `/JNDI/Q/requests` are a single RDN.

use crate::errors::{BridgeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static RDN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\x00-\x1f\x7f]+$").expect("RDN pattern is a valid regex")
});

/// Parsed distinguished name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DistinguishedName {
    /// Unescaped RDNs, leaf first
    rdns: Vec<String>,
}

impl DistinguishedName {
    /// Parse a distinguished name
    ///
    /// # Examples
    ///
    /// ```
    /// use dirbridge_core::DistinguishedName;
    ///
    /// let dn = DistinguishedName::parse("dn=Q1, o=example").unwrap();
    /// assert_eq!(dn.leaf(), Some("dn=Q1"));
    /// assert_eq!(dn.to_string(), "dn=Q1,o=example");
    /// assert_eq!(dn.parent().unwrap().to_string(), "o=example");
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Ok(Self::root());
        }

        let mut rdns = Vec::new();
        let mut current = String::new();
        let mut chars = name.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => {
                        return Err(BridgeError::InvalidName(format!(
                            "Dangling escape at end of name: {}",
                            name
                        )))
                    }
                },
                ',' => {
                    rdns.push(Self::finish_rdn(&current, name)?);
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        rdns.push(Self::finish_rdn(&current, name)?);

        Ok(Self { rdns })
    }

    /// The root context
    pub fn root() -> Self {
        Self { rdns: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.rdns.is_empty()
    }

    /// RDNs in written order (leaf first)
    pub fn rdns(&self) -> &[String] {
        &self.rdns
    }

    /// RDNs walking down from the root context
    pub fn path_from_root(&self) -> impl Iterator<Item = &str> {
        self.rdns.iter().rev().map(String::as_str)
    }

    /// Leaf-most RDN, `None` for the root
    pub fn leaf(&self) -> Option<&str> {
        self.rdns.first().map(String::as_str)
    }

    /// Enclosing context, `None` for the root
    pub fn parent(&self) -> Option<DistinguishedName> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            rdns: self.rdns[1..].to_vec(),
        })
    }

    /// Name of `rdn` bound inside this context (`rdn + "," + self`)
    pub fn child(&self, rdn: &str) -> Result<DistinguishedName> {
        let rdn = Self::validate_rdn(rdn.trim(), rdn)?;
        let mut rdns = Vec::with_capacity(self.rdns.len() + 1);
        rdns.push(rdn);
        rdns.extend(self.rdns.iter().cloned());
        Ok(Self { rdns })
    }

    fn finish_rdn(raw: &str, full: &str) -> Result<String> {
        Self::validate_rdn(raw.trim(), full)
    }

    fn validate_rdn(rdn: &str, full: &str) -> Result<String> {
        if rdn.is_empty() {
            return Err(BridgeError::InvalidName(format!(
                "Empty component in name: {}",
                full
            )));
        }
        if !RDN_PATTERN.is_match(rdn) {
            return Err(BridgeError::InvalidName(format!(
                "Illegal component '{}' in name: {}",
                rdn, full
            )));
        }
        Ok(rdn.to_string())
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped: Vec<String> = self
            .rdns
            .iter()
            .map(|rdn| rdn.replace('\\', "\\\\").replace(',', "\\,"))
            .collect();
        write!(f, "{}", escaped.join(","))
    }
}

impl FromStr for DistinguishedName {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
