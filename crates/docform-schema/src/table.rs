//! Repeatable table sections

use crate::field::FieldDefinition;
use crate::key::{FieldKey, KeyError, SectionId};
use serde::{Deserialize, Serialize};

/// Row key under which runtime-column values serialize
///
/// Base columns share the row object with it, so no base column may use it.
pub const DYNAMIC_FIELDS_KEY: &str = "dynamicFields";

/// Declaration of a repeatable line-item table
///
/// `columns` is the base column set; users may extend it at runtime when
/// `extensible` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Section identifier (payload key)
    pub id: SectionId,
    /// Display heading
    pub label: String,
    /// Base columns in display order
    pub columns: Vec<FieldDefinition>,
    /// Rows created when the form is opened
    #[serde(default = "default_initial_rows")]
    pub initial_rows: usize,
    /// Whether users may add their own columns
    #[serde(default = "default_extensible")]
    pub extensible: bool,
}

fn default_initial_rows() -> usize {
    1
}

fn default_extensible() -> bool {
    true
}

impl TableSchema {
    /// Create a section whose id is derived from its label
    ///
    /// # Errors
    /// Returns error if the label is blank
    pub fn new(label: impl Into<String>) -> Result<Self, KeyError> {
        let label = label.into();
        let id = SectionId::from_label(&label)?;
        Ok(Self::with_id(id, label))
    }

    /// Create a section with an explicit id
    #[must_use]
    pub fn with_id(id: SectionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            columns: Vec::new(),
            initial_rows: default_initial_rows(),
            extensible: default_extensible(),
        }
    }

    /// Append a base column
    #[inline]
    #[must_use]
    pub fn with_column(mut self, column: FieldDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the number of rows seeded on open
    #[inline]
    #[must_use]
    pub fn with_initial_rows(mut self, rows: usize) -> Self {
        self.initial_rows = rows;
        self
    }

    /// Disallow runtime columns
    #[inline]
    #[must_use]
    pub fn fixed_columns(mut self) -> Self {
        self.extensible = false;
        self
    }

    /// Look up a base column
    #[must_use]
    pub fn column(&self, key: &FieldKey) -> Option<&FieldDefinition> {
        self.columns.iter().find(|c| &c.key == key)
    }

    /// Whether `key` is a base column
    #[inline]
    #[must_use]
    pub fn has_column(&self, key: &FieldKey) -> bool {
        self.column(key).is_some()
    }

    /// Base column keys in display order
    pub fn column_keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.columns.iter().map(|c| &c.key)
    }
}
