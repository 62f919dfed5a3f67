//! Row records

use docform_schema::{FieldKey, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of a table section
///
/// Base-column values serialize flattened at the top level; runtime columns
/// serialize under [`docform_schema::DYNAMIC_FIELDS_KEY`], which schemas reserve.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    #[serde(flatten)]
    values: IndexMap<FieldKey, FieldValue>,
    #[serde(default)]
    dynamic_fields: IndexMap<FieldKey, FieldValue>,
}

impl RowRecord {
    /// Row with the given base values and no runtime columns
    #[must_use]
    pub fn new(values: IndexMap<FieldKey, FieldValue>) -> Self {
        Self {
            values,
            dynamic_fields: IndexMap::new(),
        }
    }

    /// Base-column values in display order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &IndexMap<FieldKey, FieldValue> {
        &self.values
    }

    /// Runtime-column values in registration order
    #[inline]
    #[must_use]
    pub fn dynamic_fields(&self) -> &IndexMap<FieldKey, FieldValue> {
        &self.dynamic_fields
    }

    /// Value of a base or runtime column
    #[must_use]
    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.values.get(key).or_else(|| self.dynamic_fields.get(key))
    }

    /// Replace an existing base or runtime value, returning the old one
    ///
    /// Returns `None` (and changes nothing) if the row has no such column.
    pub(crate) fn replace(&mut self, key: &FieldKey, value: FieldValue) -> Option<FieldValue> {
        let slot = match self.values.get_mut(key) {
            Some(slot) => slot,
            None => self.dynamic_fields.get_mut(key)?,
        };
        Some(std::mem::replace(slot, value))
    }

    pub(crate) fn open_slot(&mut self, key: FieldKey) {
        self.dynamic_fields.entry(key).or_default();
    }

    pub(crate) fn close_slot(&mut self, key: &FieldKey) -> Option<FieldValue> {
        self.dynamic_fields.shift_remove(key)
    }
}
