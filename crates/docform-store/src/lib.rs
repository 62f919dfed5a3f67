//! Docform Store
//!
//! Mutable state of one open form: header values, table sections with their
//! runtime columns, approval roles and opaque attachment/custom-field records.
//!
//! # Core Concepts
//!
//! - [`ValueStore`]: the whole snapshot, seeded from a [`docform_schema::FormSchema`]
//! - [`TableSection`]: ordered [`RowRecord`]s plus a [`ColumnRegistry`]
//! - [`DynamicColumn`]: a user-added column, keyed by its whitespace-free label
//! - [`ApprovalWorkflow`]: ordered `{roleName, signatureData}` slots
//! - [`FieldPath`]: address of one value (header field or cell)
//!
//! Every row of a section carries a `dynamicFields` entry for exactly the
//! columns registered in that section.
//!
//! # Example
//!
//! ```rust
//! use docform_schema::{FieldDefinition, FieldKind, FormSchema, SectionId, TableSchema};
//! use docform_store::ValueStore;
//!
//! let schema = FormSchema::new("risk-register", "Risk Register").with_section(
//!     TableSchema::new("risks")
//!         .unwrap()
//!         .with_column(FieldDefinition::new("Risk", FieldKind::Text).unwrap())
//!         .with_initial_rows(2),
//! );
//! let mut store = ValueStore::seed(&schema);
//! let risks: SectionId = "risks".parse().unwrap();
//!
//! let column = store.add_column(&risks, "Risk Owner").unwrap();
//! assert_eq!(column.key.as_str(), "RiskOwner");
//! assert!(store.section(&risks).unwrap().is_consistent());
//! ```

#![warn(unreachable_pub)]

mod approval;
mod error;
mod path;
mod records;
mod registry;
mod row;
mod section;
mod store;

pub use approval::{ApprovalRole, ApprovalWorkflow};
pub use error::StoreError;
pub use path::FieldPath;
pub use records::RecordList;
pub use registry::{ColumnRegistry, DynamicColumn};
pub use row::RowRecord;
pub use section::TableSection;
pub use store::ValueStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
