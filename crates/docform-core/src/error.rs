//! Error types for form instances
//!
//! Lower-layer errors are wrapped, so a caller handles one type per
//! operation family:
//! - [`FormError`] for editing and lifecycle operations
//! - [`SubmitError`] for submission attempts
//! - [`ConfigError`] for loading [`crate::EngineConfig`]

use crate::state::StateError;
use crate::submission::SubmissionReport;
use crate::types::FormId;
use docform_compute::ComputeError;
use docform_schema::SchemaError;
use docform_store::{FieldPath, StoreError};
use docform_validate::ValidationError;

/// Main form error type
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Schema failed its structural checks
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Schema rules could not be compiled
    #[error("validation setup failed: {0}")]
    Validation(#[from] ValidationError),

    /// Value-store mutation rejected
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Recomputation failed
    #[error("computation failed: {0}")]
    Compute(#[from] ComputeError),

    /// Lifecycle transition rejected
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Derived values are written by the engine only
    #[error("field '{0}' is derived and read-only")]
    ReadOnly(FieldPath),

    /// Instance has been submitted and no longer accepts changes
    #[error("form {0} has already been submitted")]
    Submitted(FormId),
}

impl FormError {
    /// Check if the user can correct the input and retry
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Compute(_) | Self::ReadOnly(_))
    }
}

/// Submission attempt errors
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Validation or balance checks failed; nothing was delivered
    #[error("submission blocked: {0}")]
    Blocked(SubmissionReport),

    /// Instance was already submitted
    #[error("form {0} has already been submitted")]
    AlreadySubmitted(FormId),

    /// Settling derived values failed
    #[error("computation failed: {0}")]
    Compute(#[from] ComputeError),

    /// Balance totals could not be evaluated
    #[error("balance check failed: {0}")]
    Aggregate(#[from] ValidationError),

    /// Lifecycle transition rejected
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl SubmitError {
    /// Check if the attempt was stopped by user-correctable findings
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    /// Findings of a blocked attempt
    #[must_use]
    pub fn report(&self) -> Option<&SubmissionReport> {
        match self {
            Self::Blocked(report) => Some(report),
            _ => None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON decoding failed
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use docform_schema::FieldKey;
    use std::str::FromStr;

    #[test]
    fn recoverable_errors() {
        let path = FieldPath::scalar(FieldKey::from_str("Total").unwrap());
        assert!(FormError::ReadOnly(path.clone()).is_recoverable());
        assert!(FormError::Store(StoreError::NotAddressable(path)).is_recoverable());
        assert!(!FormError::Submitted(FormId::new()).is_recoverable());
    }

    #[test]
    fn blocked_submission_is_blocking() {
        let err = SubmitError::Blocked(SubmissionReport::default());
        assert!(err.is_blocking());
        assert!(err.report().is_some());
        assert!(!SubmitError::AlreadySubmitted(FormId::new()).is_blocking());
    }
}
