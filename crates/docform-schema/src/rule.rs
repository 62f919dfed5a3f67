//! Declarative validation rules
//!
//! Rules are data. Evaluation lives in the validation engine.

use crate::key::{FieldKey, SectionId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Address of a field: a scalar, or a column of a table section
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTarget {
    /// Header field
    Scalar(FieldKey),
    /// Column of every row in a section
    Column {
        /// Owning section
        section: SectionId,
        /// Column key
        column: FieldKey,
    },
}

impl FieldTarget {
    /// Scalar target
    #[inline]
    #[must_use]
    pub fn scalar(key: FieldKey) -> Self {
        Self::Scalar(key)
    }

    /// Column target
    #[inline]
    #[must_use]
    pub fn column(section: SectionId, column: FieldKey) -> Self {
        Self::Column { section, column }
    }

    /// Field or column key
    #[must_use]
    pub fn key(&self) -> &FieldKey {
        match self {
            Self::Scalar(key) => key,
            Self::Column { column, .. } => column,
        }
    }

    /// Section, for column targets
    #[must_use]
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Scalar(_) => None,
            Self::Column { section, .. } => Some(section),
        }
    }
}

impl Display for FieldTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(key) => write!(f, "{key}"),
            Self::Column { section, column } => write!(f, "{section}[].{column}"),
        }
    }
}

/// Validation rule declared by a schema
///
/// Rules on a column target apply to every row of the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    /// Value must be non-empty
    Required {
        /// Checked field
        target: FieldTarget,
    },
    /// Value must parse as a decimal number
    Numeric {
        /// Checked field
        target: FieldTarget,
    },
    /// Value must match a regular expression
    Pattern {
        /// Checked field
        target: FieldTarget,
        /// Regular expression (anchor it to match the whole value)
        regex: String,
        /// Message shown on mismatch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Value may hold at most `max` characters
    MaxLength {
        /// Checked field
        target: FieldTarget,
        /// Maximum length in characters
        max: usize,
    },
    /// Section must contain at least `min` rows
    MinRows {
        /// Checked section
        section: SectionId,
        /// Minimum row count
        min: usize,
    },
    /// Section may contain at most `max` rows
    MaxRows {
        /// Checked section
        section: SectionId,
        /// Maximum row count
        max: usize,
    },
}

impl ValidationRule {
    /// Field the rule checks, if it is field-scoped
    #[must_use]
    pub fn target(&self) -> Option<&FieldTarget> {
        match self {
            Self::Required { target }
            | Self::Numeric { target }
            | Self::Pattern { target, .. }
            | Self::MaxLength { target, .. } => Some(target),
            Self::MinRows { .. } | Self::MaxRows { .. } => None,
        }
    }

    /// Section the rule refers to
    #[must_use]
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::MinRows { section, .. } | Self::MaxRows { section, .. } => Some(section),
            _ => self.target().and_then(FieldTarget::section),
        }
    }
}

/// Submission-time guard: two column totals must agree
///
/// Used by journal-style forms (debit/credit balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRule {
    /// Section whose rows are summed
    pub section: SectionId,
    /// Column summed on the left-hand side
    pub debit: FieldKey,
    /// Column summed on the right-hand side
    pub credit: FieldKey,
    /// Notice heading shown when the totals differ
    #[serde(default = "default_balance_label")]
    pub label: String,
}

fn default_balance_label() -> String {
    "Debit and credit totals must match".to_string()
}

impl BalanceRule {
    /// Create a guard with the default label
    #[must_use]
    pub fn new(section: SectionId, debit: FieldKey, credit: FieldKey) -> Self {
        Self {
            section,
            debit,
            credit,
            label: default_balance_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rule_yaml_shape() {
        let rules: Vec<ValidationRule> = serde_yaml::from_str(
            r#"
- rule: required
  target: { scalar: GSTIN }
- rule: pattern
  target: { column: { section: items, column: HSN } }
  regex: "^[0-9]{4,8}$"
- rule: min_rows
  section: items
  min: 1
"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules[0].target(),
            Some(&FieldTarget::Scalar(FieldKey::from_str("GSTIN").unwrap()))
        );
        assert_eq!(rules[1].section().map(SectionId::as_str), Some("items"));
        assert_eq!(rules[2].target(), None);
    }

    #[test]
    fn target_display() {
        let target = FieldTarget::column(
            SectionId::from_str("items").unwrap(),
            FieldKey::from_str("Amount").unwrap(),
        );
        assert_eq!(target.to_string(), "items[].Amount");
    }

    #[test]
    fn balance_rule_default_label() {
        let rule: BalanceRule =
            serde_json::from_str(r#"{"section": "entries", "debit": "Debit", "credit": "Credit"}"#)
                .unwrap();
        assert_eq!(rule.label, "Debit and credit totals must match");
    }
}
