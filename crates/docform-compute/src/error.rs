//! Error types for recomputation

use docform_schema::{FieldTarget, SchemaError};
use docform_store::StoreError;

/// Computation errors
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    /// Derivations do not form a valid plan
    #[error("invalid derivations: {0}")]
    Schema(#[from] SchemaError),

    /// Derived value could not be written back
    #[error("cannot write derived value: {0}")]
    Store(#[from] StoreError),

    /// Intermediate result exceeds the decimal range
    #[error("arithmetic overflow computing {0}")]
    Overflow(FieldTarget),
}
