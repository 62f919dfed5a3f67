//! Opaque record lists (attachments, custom fields)

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered list of records the engine stores but never inspects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordList {
    records: Vec<Value>,
}

impl RecordList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record; returns its index
    pub fn push(&mut self, record: Value) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Remove the record at `index`
    ///
    /// # Errors
    /// Returns `RecordOutOfRange` if `index >= len`
    pub fn remove(&mut self, index: usize) -> Result<Value, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::RecordOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Records in order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.records.iter()
    }

    /// Records as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.records
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
