//! Docform Validate
//!
//! Gate between editing and submission.
//!
//! # Core Concepts
//!
//! - [`Validator`]: field-definition checks plus the schema's explicit
//!   [`docform_schema::ValidationRule`]s, producing a [`ValidationReport`]
//! - [`FieldError`]: one message scoped to a [`docform_store::FieldPath`]
//! - [`BalanceGuard`]: cross-row debit/credit check yielding
//!   [`AggregateImbalance`] notices
//!
//! Neither layer changes the store; a failed check leaves every entered value
//! in place.

#![warn(unreachable_pub)]

mod error;
mod guard;
mod report;
mod validator;

pub use error::ValidationError;
pub use guard::{AggregateImbalance, BalanceGuard};
pub use report::{FieldError, ValidationReport};
pub use validator::{Validator, DATE_FORMAT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
