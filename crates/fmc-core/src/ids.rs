//! Strongly-typed identifiers for FMC objects.
//!
//! The controller identifies everything with UUID-shaped strings, but not all
//! of them are RFC 4122 UUIDs and their case matters when echoed back, so the
//! wrappers keep the original string. Distinct types stop a zone id from being
//! passed where a device id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed identifier wrappers.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is empty or contains characters
            /// that cannot appear in a URL path segment.
            pub fn parse_str(input: &str) -> Result<Self> {
                validate_id(input).map(|_| Self(input.to_string()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(DomainUuid, "Domain (tenant) UUID");
id_type!(DeviceId, "Managed device record id");
id_type!(InterfaceId, "Device interface id");
id_type!(RouteId, "Static route id");
id_type!(ObjectId, "Network, host or network-group object id");
id_type!(ZoneId, "Security zone id");
id_type!(VariableSetId, "Variable set id");
id_type!(PolicyId, "Access control policy id");
id_type!(RuleId, "Access rule id");

/// Validates an identifier string.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the string is empty or would alter
/// the request path.
pub fn validate_id(s: &str) -> Result<&str> {
    if s.is_empty() {
        return Err(Error::InvalidEndpoint("empty object id".to_string()));
    }
    if s.chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(Error::InvalidEndpoint(format!("invalid object id `{s}`")));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "e276abec-e0f2-11e3-8169-6d9ed49b625f";
    const OBJECT: &str = "00505686-9A4D-0ed3-0000-004294967346";

    #[test]
    fn test_parse_str_valid() {
        let domain = DomainUuid::parse_str(DOMAIN).unwrap();
        assert_eq!(domain.as_str(), DOMAIN);
    }

    #[test]
    fn test_case_is_preserved() {
        let id: ObjectId = OBJECT.parse().unwrap();
        assert_eq!(id.to_string(), OBJECT);
    }

    #[test]
    fn test_parse_str_rejects_path_characters() {
        assert!(matches!(
            ObjectId::parse_str("abc/../def"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(ObjectId::parse_str("").is_err());
        assert!(ObjectId::parse_str("a b").is_err());
        assert!(ObjectId::parse_str("a?b=c").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = DeviceId::parse_str(OBJECT).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{OBJECT}\""));

        let back: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_into_string() {
        let id = ZoneId::parse_str(OBJECT).unwrap();
        assert_eq!(id.into_string(), OBJECT.to_string());
    }

    #[test]
    fn test_hash_dedups() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(RuleId::parse_str("1").unwrap());
        set.insert(RuleId::parse_str("2").unwrap());
        set.insert(RuleId::parse_str("1").unwrap());
        assert_eq!(set.len(), 2);
    }
}
