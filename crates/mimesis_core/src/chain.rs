//! Chain addressing.

use mimesis_error::{ChainError, ChainErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Address of one conversational thread: `"{purpose}:{entity_id}"`.
///
/// The key splits on the first colon, so entity IDs may themselves
/// contain colons. Both halves must be non-empty.
///
/// # Examples
///
/// ```
/// use mimesis_core::ChainKey;
///
/// let key: ChainKey = "intention:bob".parse().unwrap();
/// assert_eq!(key.purpose(), "intention");
/// assert_eq!(key.entity_id(), "bob");
/// assert_eq!(key.to_string(), "intention:bob");
///
/// assert!("bob".parse::<ChainKey>().is_err());
/// assert!(":bob".parse::<ChainKey>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
#[display("{}:{}", purpose, entity_id)]
pub struct ChainKey {
    purpose: String,
    entity_id: String,
}

impl ChainKey {
    /// Build a key from its parts.
    #[track_caller]
    pub fn new(purpose: impl Into<String>, entity_id: impl Into<String>) -> Result<Self, ChainError> {
        let purpose = purpose.into();
        let entity_id = entity_id.into();
        if purpose.is_empty() || entity_id.is_empty() {
            return Err(ChainError::new(ChainErrorKind::InvalidKey(format!(
                "{}:{}",
                purpose, entity_id
            ))));
        }
        Ok(Self { purpose, entity_id })
    }

    /// Conversation purpose, e.g. `intention` or `memory`.
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// ID of the entity owning the chain.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

impl FromStr for ChainKey {
    type Err = ChainError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((purpose, entity_id)) if !purpose.is_empty() && !entity_id.is_empty() => {
                Ok(Self {
                    purpose: purpose.to_string(),
                    entity_id: entity_id.to_string(),
                })
            }
            _ => Err(ChainError::new(ChainErrorKind::InvalidKey(s.to_string()))),
        }
    }
}

impl TryFrom<String> for ChainKey {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChainKey> for String {
    fn from(key: ChainKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_first_colon() {
        let key: ChainKey = "memory:guild:elvira".parse().unwrap();
        assert_eq!(key.purpose(), "memory");
        assert_eq!(key.entity_id(), "guild:elvira");
    }

    #[test]
    fn test_rejects_empty_parts() {
        for bad in ["", ":", "memory:", ":elvira", "memory"] {
            let err = bad.parse::<ChainKey>().unwrap_err();
            assert_eq!(err.kind, ChainErrorKind::InvalidKey(bad.to_string()));
        }
        assert!(ChainKey::new("", "bob").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let key = ChainKey::new("intention", "bob").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"intention:bob\"");
        let back: ChainKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<ChainKey>("\"nocolon\"").is_err());
    }
}
