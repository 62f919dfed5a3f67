//! Docform Core
//!
//! The form instance: one schema-driven document being edited, extended,
//! approved and finally submitted.
//!
//! # Core Concepts
//!
//! - [`FormInstance`]: aggregate root owning the value store
//! - [`FormState`]: `Editing`, `Blocked` with findings, or terminal `Submitted`
//! - [`ColumnDialog`]: non-blocking "name the new column" step
//! - [`SubmissionSink`]: fire-and-forget receiver of [`SubmissionPayload`]s
//! - [`EngineConfig`]: display and workflow defaults
//!
//! # Example
//!
//! ```rust
//! use docform_core::{EngineConfig, FormInstance};
//! use docform_schema::{Derivation, FieldDefinition, FieldKey, FieldKind, FieldValue, FormSchema, Formula};
//! use docform_store::FieldPath;
//! use std::str::FromStr;
//!
//! let key = |s: &str| FieldKey::from_str(s).unwrap();
//! let schema = FormSchema::new("variance", "Budget Variance")
//!     .with_field(FieldDefinition::new("Budgeted", FieldKind::Number).unwrap())
//!     .with_field(FieldDefinition::new("Actual", FieldKind::Number).unwrap())
//!     .with_field(FieldDefinition::new("Variance", FieldKind::Number).unwrap())
//!     .with_derivation(Derivation::scalar(
//!         key("Variance"),
//!         Formula::Difference { minuend: key("Actual"), subtrahend: key("Budgeted") },
//!     ));
//!
//! let mut form = FormInstance::open(schema, EngineConfig::default()).unwrap();
//! form.update_field(&FieldPath::scalar(key("Budgeted")), "200").unwrap();
//! form.update_field(&FieldPath::scalar(key("Actual")), "250").unwrap();
//! assert_eq!(
//!     form.value(&FieldPath::scalar(key("Variance"))),
//!     Some(&FieldValue::text("50.00"))
//! );
//!
//! let mut sink: Vec<docform_core::SubmissionPayload> = Vec::new();
//! form.submit(&mut sink).unwrap();
//! assert!(form.is_submitted());
//! ```

#![warn(unreachable_pub)]

mod dialog;
mod error;
mod instance;
mod state;
mod submission;
mod types;

pub use dialog::{ColumnDialog, DialogOutcome, LabelPreview};
pub use error::{ConfigError, FormError, SubmitError};
pub use instance::FormInstance;
pub use state::{allowed_transitions, validate_transition, FormState, StateError, StateKind};
pub use submission::{SubmissionPayload, SubmissionReport, SubmissionSink};
pub use types::{CheckboxLabels, EngineConfig, FormId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
