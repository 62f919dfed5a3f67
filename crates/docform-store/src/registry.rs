//! Runtime column registry
//!
//! Tracks the user-added columns of one table section. The registry only
//! records columns; [`crate::TableSection`] propagates them into rows.

use docform_schema::FieldKey;
use serde::{Deserialize, Serialize};

/// Column added by the user at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicColumn {
    /// Key derived from `label`
    pub key: FieldKey,
    /// Label as the user typed it
    pub label: String,
}

/// Ordered set of runtime columns, unique by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<DynamicColumn>,
}

impl ColumnRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Whether `key` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &FieldKey) -> bool {
        self.columns.iter().any(|c| &c.key == key)
    }

    /// Look up a column
    #[inline]
    #[must_use]
    pub fn get(&self, key: &FieldKey) -> Option<&DynamicColumn> {
        self.columns.iter().find(|c| &c.key == key)
    }

    /// Columns in registration order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[DynamicColumn] {
        &self.columns
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.columns.iter().map(|c| &c.key)
    }

    /// Number of registered columns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no column is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Register a column; returns `false` if the key is taken
    pub(crate) fn register(&mut self, column: DynamicColumn) -> bool {
        if self.contains(&column.key) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub(crate) fn unregister(&mut self, key: &FieldKey) -> Option<DynamicColumn> {
        let pos = self.columns.iter().position(|c| &c.key == key)?;
        Some(self.columns.remove(pos))
    }
}
