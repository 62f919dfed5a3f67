//! Table sections
//!
//! A [`TableSection`] owns its rows and its runtime column registry, and keeps
//! them in step: every row carries a `dynamicFields` slot for exactly the
//! registered columns.

use crate::error::StoreError;
use crate::registry::{ColumnRegistry, DynamicColumn};
use crate::row::RowRecord;
use docform_schema::{FieldKey, FieldValue, SectionId, TableSchema};
use indexmap::IndexMap;

/// Live rows of one repeatable section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSection {
    id: SectionId,
    /// Seed values of the base columns
    template: IndexMap<FieldKey, FieldValue>,
    rows: Vec<RowRecord>,
    registry: ColumnRegistry,
    extensible: bool,
}

impl TableSection {
    /// Create a section seeded with the schema's initial rows
    #[must_use]
    pub fn from_schema(schema: &TableSchema) -> Self {
        let template = schema
            .columns
            .iter()
            .map(|c| (c.key.clone(), c.seed_value()))
            .collect();
        let mut section = Self {
            id: schema.id.clone(),
            template,
            rows: Vec::new(),
            registry: ColumnRegistry::new(),
            extensible: schema.extensible,
        };
        for _ in 0..schema.initial_rows {
            section.add_row();
        }
        section
    }

    /// Section identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Rows in insertion order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// One row
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&RowRecord> {
        self.rows.get(index)
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the section has no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Runtime columns
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// Whether users may add columns
    #[inline]
    #[must_use]
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Whether `key` is a base or runtime column
    #[must_use]
    pub fn has_column(&self, key: &FieldKey) -> bool {
        self.template.contains_key(key) || self.registry.contains(key)
    }

    /// Value of one cell
    #[must_use]
    pub fn cell(&self, row: usize, key: &FieldKey) -> Option<&FieldValue> {
        self.rows.get(row).and_then(|r| r.get(key))
    }

    /// Values of one column across every row, in row order
    pub fn column_values<'a>(
        &'a self,
        key: &'a FieldKey,
    ) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.rows.iter().filter_map(move |r| r.get(key))
    }

    /// Append a row; returns its index
    ///
    /// The row gets the base seed values and an empty slot for every
    /// registered runtime column.
    pub fn add_row(&mut self) -> usize {
        let mut row = RowRecord::new(self.template.clone());
        for key in self.registry.keys() {
            row.open_slot(key.clone());
        }
        self.rows.push(row);
        tracing::debug!(section = %self.id, rows = self.rows.len(), "row appended");
        self.rows.len() - 1
    }

    /// Remove the row at `index`; later rows shift down by one
    ///
    /// # Errors
    /// Returns `RowOutOfRange` if `index >= len`
    pub fn remove_row(&mut self, index: usize) -> Result<RowRecord, StoreError> {
        self.check_row(index)?;
        let row = self.rows.remove(index);
        tracing::debug!(section = %self.id, index, rows = self.rows.len(), "row removed");
        Ok(row)
    }

    /// Replace one cell, returning the previous value
    ///
    /// # Errors
    /// - `RowOutOfRange` if `row` does not exist
    /// - `UnknownColumn` if `key` is neither a base nor a runtime column
    pub fn set_cell(
        &mut self,
        row: usize,
        key: &FieldKey,
        value: FieldValue,
    ) -> Result<FieldValue, StoreError> {
        self.check_row(row)?;
        let section = self.id.clone();
        self.rows[row]
            .replace(key, value)
            .ok_or_else(|| StoreError::UnknownColumn {
                section,
                column: key.clone(),
            })
    }

    /// Register a runtime column and open its slot in every row
    ///
    /// The key is derived from `label`. A key that collides with a base
    /// column or a registered runtime column is rejected and nothing changes.
    ///
    /// # Errors
    /// - `ColumnsFixed` if the section is not extensible
    /// - `InvalidLabel` if the label is blank
    /// - `DuplicateKey` on collision
    pub fn add_column(&mut self, label: &str) -> Result<DynamicColumn, StoreError> {
        if !self.extensible {
            return Err(StoreError::ColumnsFixed(self.id.clone()));
        }
        let key = FieldKey::from_label(label)?;
        if self.has_column(&key) {
            tracing::warn!(section = %self.id, %key, "duplicate column rejected");
            return Err(StoreError::DuplicateKey {
                section: self.id.clone(),
                key,
            });
        }

        let column = DynamicColumn {
            key: key.clone(),
            label: label.trim().to_string(),
        };
        self.registry.register(column.clone());
        for row in &mut self.rows {
            row.open_slot(key.clone());
        }
        tracing::debug!(section = %self.id, %key, "column added");
        Ok(column)
    }

    /// Unregister a runtime column and drop its slot from every row
    ///
    /// Rows themselves are kept. Returns `None` if `key` is not a runtime
    /// column (base columns cannot be removed).
    pub fn remove_column(&mut self, key: &FieldKey) -> Option<DynamicColumn> {
        let column = self.registry.unregister(key)?;
        for row in &mut self.rows {
            row.close_slot(key);
        }
        tracing::debug!(section = %self.id, %key, "column removed");
        Some(column)
    }

    /// Every row's `dynamicFields` keys equal the registered keys
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|row| {
            row.dynamic_fields().len() == self.registry.len()
                && self
                    .registry
                    .keys()
                    .all(|k| row.dynamic_fields().contains_key(k))
        })
    }

    fn check_row(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.rows.len() {
            return Err(StoreError::RowOutOfRange {
                section: self.id.clone(),
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }
}
