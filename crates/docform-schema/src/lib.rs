//! Docform Schema
//!
//! Static, declarative description of a business form.
//!
//! # Core Concepts
//!
//! - [`FieldKey`] / [`SectionId`]: payload identifiers derived from labels
//! - [`FieldDefinition`] / [`FieldKind`]: one field and its control kind
//! - [`TableSchema`]: a repeatable line-item section with base columns
//! - [`ValidationRule`] / [`BalanceRule`]: declarative checks
//! - [`Derivation`] / [`Formula`]: computed fields
//! - [`FormSchema`]: the aggregate, loadable from JSON or YAML
//!
//! # Example
//!
//! ```rust
//! use docform_schema::{FieldDefinition, FieldKind, FormSchema, TableSchema};
//!
//! let items = TableSchema::new("Line Items")
//!     .unwrap()
//!     .with_column(FieldDefinition::new("Description", FieldKind::Text).unwrap())
//!     .with_column(FieldDefinition::new("Amount", FieldKind::Number).unwrap());
//!
//! let schema = FormSchema::new("invoice", "Tax Invoice")
//!     .with_field(FieldDefinition::new("Invoice No", FieldKind::Text).unwrap().required())
//!     .with_section(items);
//!
//! assert!(schema.check().is_ok());
//! assert_eq!(schema.fields[0].key.as_str(), "InvoiceNo");
//! ```

#![warn(unreachable_pub)]

mod deps;
mod derivation;
mod error;
mod field;
mod key;
mod rule;
mod schema;
mod table;

pub use deps::DependencyPlan;
pub use derivation::{Derivation, DerivationScope, Formula, DEFAULT_PRECISION};
pub use error::SchemaError;
pub use field::{FieldDefinition, FieldKind, FieldValue, SelectOption};
pub use key::{FieldKey, KeyError, SectionId};
pub use rule::{BalanceRule, FieldTarget, ValidationRule};
pub use schema::FormSchema;
pub use table::{TableSchema, DYNAMIC_FIELDS_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
