//! Member identifiers
//!
//! A member identifier is either a bare local account name ("jsmith") or a
//! fully qualified "local@domain" string. The domain portion scopes directory
//! lookups; when absent, the operation's default domain applies.

use crate::error::{Error, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bare or fully qualified member identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Parse an identifier, rejecting empty and multi-'@' forms
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::Validation(ValidationError::invalid_member_id(
                raw,
                "empty identifier",
            )));
        }
        match raw.matches('@').count() {
            0 => Ok(Self(raw.to_string())),
            1 => {
                let (local, domain) = raw.split_once('@').unwrap_or((raw, ""));
                if local.is_empty() {
                    Err(Error::Validation(ValidationError::invalid_member_id(
                        raw,
                        "missing local part",
                    )))
                } else if domain.is_empty() {
                    Err(Error::Validation(ValidationError::invalid_member_id(
                        raw,
                        "missing domain after '@'",
                    )))
                } else {
                    Ok(Self(raw.to_string()))
                }
            }
            _ => Err(Error::Validation(ValidationError::invalid_member_id(
                raw,
                "multiple '@' separators",
            ))),
        }
    }

    /// The full identifier as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The local account name, without any domain suffix
    pub fn local_part(&self) -> &str {
        match self.0.split_once('@') {
            Some((local, _)) => local,
            None => &self.0,
        }
    }

    /// The explicit domain suffix, if the identifier is qualified
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, domain)| domain)
    }

    /// Resolve to a (domain, local_part) pair, falling back to the operation's
    /// default domain for bare identifiers
    pub fn scope<'a>(&'a self, default_domain: &'a str) -> (&'a str, &'a str) {
        match self.0.split_once('@') {
            Some((local, domain)) => (domain, local),
            None => (default_domain, &self.0),
        }
    }

    /// The fully qualified form, using the default domain when unqualified
    pub fn qualified(&self, default_domain: &str) -> String {
        if self.0.contains('@') {
            self.0.clone()
        } else {
            format!("{}@{}", self.0, default_domain)
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MemberId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_identifier() {
        let member = MemberId::parse("jsmith").unwrap();
        assert_eq!(member.local_part(), "jsmith");
        assert_eq!(member.domain(), None);
    }

    #[test]
    fn test_parse_qualified_identifier() {
        let member = MemberId::parse("jsmith@example.com").unwrap();
        assert_eq!(member.local_part(), "jsmith");
        assert_eq!(member.domain(), Some("example.com"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let member = MemberId::parse("  jsmith \n").unwrap();
        assert_eq!(member.as_str(), "jsmith");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(MemberId::parse("").is_err());
        assert!(MemberId::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(MemberId::parse("@example.com").is_err());
        assert!(MemberId::parse("jsmith@").is_err());
        assert!(MemberId::parse("a@b@c").is_err());
    }

    #[test]
    fn test_scope_uses_explicit_domain() {
        let member = MemberId::parse("jsmith@other.com").unwrap();
        assert_eq!(member.scope("example.com"), ("other.com", "jsmith"));
    }

    #[test]
    fn test_scope_falls_back_to_default_domain() {
        let member = MemberId::parse("jsmith").unwrap();
        assert_eq!(member.scope("example.com"), ("example.com", "jsmith"));
    }

    #[test]
    fn test_qualified_form() {
        assert_eq!(
            MemberId::parse("jsmith").unwrap().qualified("example.com"),
            "jsmith@example.com"
        );
        assert_eq!(
            MemberId::parse("jsmith@other.com")
                .unwrap()
                .qualified("example.com"),
            "jsmith@other.com"
        );
    }

    #[test]
    fn test_display_round_trip() {
        let member = MemberId::parse("jsmith@example.com").unwrap();
        assert_eq!(member.to_string(), "jsmith@example.com");
    }
}
