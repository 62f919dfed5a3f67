//! Error types for value-store mutations

use crate::path::FieldPath;
use docform_schema::{FieldKey, KeyError, SectionId};

/// Value-store errors
///
/// Every variant is raised before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Column label normalizes to a key already present in the section
    #[error("column '{key}' already exists in section '{section}'")]
    DuplicateKey {
        /// Owning section
        section: SectionId,
        /// Colliding key
        key: FieldKey,
    },

    /// Column label is unusable as a key
    #[error("invalid column label: {0}")]
    InvalidLabel(#[from] KeyError),

    /// Section does not accept runtime columns
    #[error("section '{0}' does not accept new columns")]
    ColumnsFixed(SectionId),

    /// Section is not part of this form
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// Header field is not part of this form
    #[error("unknown field: {0}")]
    UnknownField(FieldKey),

    /// Column is neither a base nor a registered runtime column
    #[error("unknown column '{column}' in section '{section}'")]
    UnknownColumn {
        /// Owning section
        section: SectionId,
        /// Missing key
        column: FieldKey,
    },

    /// Row index past the end of the section
    #[error("row {index} out of range for section '{section}' ({len} rows)")]
    RowOutOfRange {
        /// Owning section
        section: SectionId,
        /// Requested index
        index: usize,
        /// Current row count
        len: usize,
    },

    /// Approval role index past the end of the list
    #[error("approval role {index} out of range ({len} roles)")]
    RoleOutOfRange {
        /// Requested index
        index: usize,
        /// Current role count
        len: usize,
    },

    /// Attachment or custom-field index past the end of the list
    #[error("record {index} out of range ({len} records)")]
    RecordOutOfRange {
        /// Requested index
        index: usize,
        /// Current record count
        len: usize,
    },

    /// Path does not address a single value
    #[error("path {0} does not address a value")]
    NotAddressable(FieldPath),
}
