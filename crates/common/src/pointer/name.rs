use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::{PublicKey, PUBLIC_KEY_SIZE};

/// Prefix distinguishing pointer names from domains and legacy identifiers
pub const POINTER_NAME_PREFIX: &str = "fp1";

/// Total text length of a pointer name: prefix + hex-encoded public key
const POINTER_NAME_LEN: usize = POINTER_NAME_PREFIX.len() + PUBLIC_KEY_SIZE * 2;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PointerNameError {
    #[error("invalid pointer name: {0}")]
    Invalid(String),
}

/// A stable, keypair-derived name for a mutable pointer
///
/// The name is `fp1` followed by the lowercase hex encoding of the
/// Ed25519 public key, 67 characters total. It is derived from the public
/// key alone, so it is collision resistant and requires no registry to
/// exist first. The format is self-classifying: anything that parses as a
/// `PointerName` is resolved directly against the pointer layer, anything
/// else is treated as a domain or legacy identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PointerName(String);

impl PointerName {
    /// Derive the name for a public key
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        PointerName(format!("{}{}", POINTER_NAME_PREFIX, public_key.to_hex()))
    }

    /// Parse and validate a pointer name from text
    pub fn parse(s: &str) -> Result<Self, PointerNameError> {
        if s.len() != POINTER_NAME_LEN || !s.starts_with(POINTER_NAME_PREFIX) {
            return Err(PointerNameError::Invalid(s.to_string()));
        }
        let hex_part = &s[POINTER_NAME_PREFIX.len()..];
        let bytes =
            hex::decode(hex_part).map_err(|_| PointerNameError::Invalid(s.to_string()))?;
        // The encoded key must be a valid Ed25519 point
        PublicKey::try_from(bytes.as_slice())
            .map_err(|_| PointerNameError::Invalid(s.to_string()))?;
        Ok(PointerName(s.to_string()))
    }

    /// Check whether a string is a well-formed pointer name
    pub fn is_pointer_name(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Recover the public key the name was derived from
    pub fn public_key(&self) -> Result<PublicKey, PointerNameError> {
        let hex_part = &self.0[POINTER_NAME_PREFIX.len()..];
        let bytes = hex::decode(hex_part)
            .map_err(|_| PointerNameError::Invalid(self.0.clone()))?;
        PublicKey::try_from(bytes.as_slice())
            .map_err(|_| PointerNameError::Invalid(self.0.clone()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PointerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PointerName {
    type Err = PointerNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PointerName {
    type Error = PointerNameError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PointerName> for String {
    fn from(name: PointerName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretKey;

    #[test]
    fn test_name_round_trip() {
        let public = SecretKey::generate().public();
        let name = PointerName::from_public_key(&public);

        let parsed = PointerName::parse(name.as_str()).unwrap();
        assert_eq!(name, parsed);
        assert_eq!(parsed.public_key().unwrap(), public);
    }

    #[test]
    fn test_rejects_malformed_names() {
        assert!(PointerName::parse("feedback").is_err());
        assert!(PointerName::parse("fp1deadbeef").is_err());
        assert!(PointerName::parse("").is_err());

        // Right shape, wrong prefix
        let public = SecretKey::generate().public();
        let name = PointerName::from_public_key(&public);
        let wrong_prefix = name.as_str().replacen("fp1", "fp2", 1);
        assert!(PointerName::parse(&wrong_prefix).is_err());

        // Right prefix and length, but not valid hex
        let not_hex = format!("fp1{}", "z".repeat(64));
        assert!(PointerName::parse(&not_hex).is_err());
    }

    #[test]
    fn test_classification_helper() {
        let public = SecretKey::generate().public();
        let name = PointerName::from_public_key(&public);

        assert!(PointerName::is_pointer_name(name.as_str()));
        assert!(!PointerName::is_pointer_name("feedback"));
        assert!(!PointerName::is_pointer_name("forms.example.com"));
    }

    #[test]
    fn test_serde_validates() {
        let public = SecretKey::generate().public();
        let name = PointerName::from_public_key(&public);

        let json = serde_json::to_string(&name).unwrap();
        let back: PointerName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);

        let bad: Result<PointerName, _> = serde_json::from_str("\"not-a-name\"");
        assert!(bad.is_err());
    }
}
