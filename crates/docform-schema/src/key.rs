//! Field and section keys
//!
//! Provides [`FieldKey`] and [`SectionId`], the plain identifiers that appear
//! in submission payloads. Keys are derived from human-readable labels by
//! removing whitespace, so the same label always yields the same key.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of a scalar field or table column
///
/// # Invariants
/// - Never empty
/// - Contains no whitespace
///
/// # Examples
/// - `"Risk Owner"` → `RiskOwner`
/// - `"  Opening\tStock "` → `OpeningStock`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldKey(String);

impl FieldKey {
    /// Derive a key from a display label
    ///
    /// Deterministic and idempotent: `from_label(k.as_str()) == k` for any
    /// key `k`.
    ///
    /// # Errors
    /// Returns [`KeyError::Empty`] if the label is empty or all whitespace
    pub fn from_label(label: &str) -> Result<Self, KeyError> {
        let key: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        if key.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(key))
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into owned string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FieldKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_key(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for FieldKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_key(&value)?;
        Ok(Self(value))
    }
}

impl From<FieldKey> for String {
    fn from(key: FieldKey) -> Self {
        key.0
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a repeatable table section
///
/// Same invariants as [`FieldKey`]; kept as a distinct type so section ids and
/// column keys cannot be swapped by accident.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Derive a section id from a display label
    ///
    /// # Errors
    /// Returns [`KeyError::Empty`] if the label is empty or all whitespace
    pub fn from_label(label: &str) -> Result<Self, KeyError> {
        FieldKey::from_label(label).map(|k| Self(k.0))
    }

    /// Id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SectionId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_key(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for SectionId {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_key(&value)?;
        Ok(Self(value))
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn validate_key(s: &str) -> Result<(), KeyError> {
    if s.is_empty() {
        return Err(KeyError::Empty);
    }
    if s.chars().any(char::is_whitespace) {
        return Err(KeyError::ContainsWhitespace(s.to_string()));
    }
    Ok(())
}

/// Key construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Label or key is empty after whitespace removal
    #[error("key is empty")]
    Empty,

    /// Explicit key contains whitespace
    #[error("key contains whitespace: '{0}'")]
    ContainsWhitespace(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_strips_all_whitespace() {
        let key = FieldKey::from_label("Risk Owner").unwrap();
        assert_eq!(key.as_str(), "RiskOwner");

        let key = FieldKey::from_label("  Opening\tStock \n").unwrap();
        assert_eq!(key.as_str(), "OpeningStock");
    }

    #[test]
    fn from_label_is_idempotent() {
        let once = FieldKey::from_label("Net Amount (INR)").unwrap();
        let twice = FieldKey::from_label(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn from_label_rejects_blank() {
        assert_eq!(FieldKey::from_label("   "), Err(KeyError::Empty));
        assert_eq!(FieldKey::from_label(""), Err(KeyError::Empty));
    }

    #[test]
    fn from_str_rejects_whitespace() {
        let result = FieldKey::from_str("Risk Owner");
        assert!(matches!(result, Err(KeyError::ContainsWhitespace(_))));
        assert!(FieldKey::from_str("RiskOwner").is_ok());
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let key = FieldKey::from_label("Invoice No").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"InvoiceNo\"");

        let parsed: FieldKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn serde_rejects_invalid_key() {
        let parsed: Result<FieldKey, _> = serde_json::from_str("\"has space\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn section_id_from_label() {
        let id = SectionId::from_label("Line Items").unwrap();
        assert_eq!(id.to_string(), "LineItems");
    }
}
