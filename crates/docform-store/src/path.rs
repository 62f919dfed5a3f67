//! Concrete value addresses

use docform_schema::{FieldKey, FieldTarget, SectionId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Address of a value inside a [`crate::ValueStore`]
///
/// Unlike [`FieldTarget`], a cell path names one row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPath {
    /// Header field
    Scalar(FieldKey),
    /// One cell of a table section
    Cell {
        /// Owning section
        section: SectionId,
        /// Row index
        row: usize,
        /// Column key (base or runtime)
        column: FieldKey,
    },
    /// A whole section (row-count rules)
    Section(SectionId),
}

impl FieldPath {
    /// Header field path
    #[inline]
    #[must_use]
    pub fn scalar(key: FieldKey) -> Self {
        Self::Scalar(key)
    }

    /// Cell path
    #[inline]
    #[must_use]
    pub fn cell(section: SectionId, row: usize, column: FieldKey) -> Self {
        Self::Cell {
            section,
            row,
            column,
        }
    }

    /// Schema-level address this path is an instance of
    #[must_use]
    pub fn target(&self) -> Option<FieldTarget> {
        match self {
            Self::Scalar(key) => Some(FieldTarget::scalar(key.clone())),
            Self::Cell {
                section, column, ..
            } => Some(FieldTarget::column(section.clone(), column.clone())),
            Self::Section(_) => None,
        }
    }

    /// Owning section, if any
    #[must_use]
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Scalar(_) => None,
            Self::Cell { section, .. } | Self::Section(section) => Some(section),
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(key) => write!(f, "{key}"),
            Self::Cell {
                section,
                row,
                column,
            } => write!(f, "{section}[{row}].{column}"),
            Self::Section(section) => write!(f, "{section}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cell_display_and_target() {
        let path = FieldPath::cell(
            SectionId::from_str("items").unwrap(),
            2,
            FieldKey::from_str("Amount").unwrap(),
        );
        assert_eq!(path.to_string(), "items[2].Amount");
        assert_eq!(
            path.target(),
            Some(FieldTarget::column(
                SectionId::from_str("items").unwrap(),
                FieldKey::from_str("Amount").unwrap()
            ))
        );
    }

    #[test]
    fn section_path_has_no_target() {
        let path = FieldPath::Section(SectionId::from_str("items").unwrap());
        assert_eq!(path.target(), None);
        assert_eq!(path.section().map(SectionId::as_str), Some("items"));
    }
}
