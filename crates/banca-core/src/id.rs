//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for client IDs.
///
/// Client ids are assigned by the remote store on creation and are immutable
/// thereafter; there is no constructor that invents a fresh id locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub i64);

impl ClientId {
    /// Creates a client ID from a raw value.
    #[must_use]
    pub const fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Parses a client ID from a string.
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.parse()?))
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ClientId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ClientId> for i64 {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

/// A strongly-typed wrapper for bank card numbers.
///
/// The card number is the primary key of a card across all tiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(pub String);

impl CardNumber {
    /// Creates a new card number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the card number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CardNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CardNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_roundtrip() {
        let id = ClientId::from_raw(7);
        assert_eq!(id.into_inner(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(ClientId::parse("7").unwrap(), id);
    }

    #[test]
    fn test_client_id_parse_invalid() {
        assert!(ClientId::parse("not-a-number").is_err());
    }

    #[test]
    fn test_card_number() {
        let number = CardNumber::new("4539148803436467");
        assert_eq!(number.as_str(), "4539148803436467");
        assert_eq!(CardNumber::from("4539148803436467"), number);
    }

    #[test]
    fn test_client_id_serde_transparent() {
        let id = ClientId::from_raw(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: ClientId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }
}
