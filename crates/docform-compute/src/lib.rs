//! Docform Compute
//!
//! Recomputes derived fields (variance, roll-forward, line amounts, column
//! totals) from the current contents of a [`docform_store::ValueStore`].
//!
//! # Core Concepts
//!
//! - [`ComputationEngine`]: derivations plus their dependency order
//! - Triggers: [`ComputationEngine::on_commit`] after a field edit is
//!   finished, [`ComputationEngine::on_row_added`] and
//!   [`ComputationEngine::on_rows_changed`] after row changes,
//!   [`ComputationEngine::recompute_all`] before submission
//! - [`Change`]: each derived value written, with its old and new text
//!
//! Derived values are fixed-precision decimal strings. Operands that are
//! missing or not numeric count as zero.
//!
//! # Example
//!
//! ```rust
//! use docform_compute::ComputationEngine;
//! use docform_schema::{Derivation, FieldDefinition, FieldKind, FieldValue, FormSchema, Formula};
//! use docform_store::{FieldPath, ValueStore};
//!
//! let schema = FormSchema::new("savings", "Savings Report")
//!     .with_field(FieldDefinition::new("baseline", FieldKind::Number).unwrap())
//!     .with_field(FieldDefinition::new("current", FieldKind::Number).unwrap())
//!     .with_field(FieldDefinition::new("savings", FieldKind::Number).unwrap())
//!     .with_derivation(Derivation::scalar(
//!         "savings".parse().unwrap(),
//!         Formula::Difference {
//!             minuend: "baseline".parse().unwrap(),
//!             subtrahend: "current".parse().unwrap(),
//!         },
//!     ));
//!
//! let engine = ComputationEngine::new(&schema).unwrap();
//! let mut store = ValueStore::seed(&schema);
//! let baseline = FieldPath::scalar("baseline".parse().unwrap());
//!
//! store.set(&baseline, FieldValue::text("1200")).unwrap();
//! engine.on_commit(&mut store, &baseline).unwrap();
//!
//! let savings = store.get(&FieldPath::scalar("savings".parse().unwrap()));
//! assert_eq!(savings, Some(&FieldValue::text("1200.00")));
//! ```

#![warn(unreachable_pub)]

mod engine;
mod error;
mod formula;
mod numeric;

pub use engine::{Change, ComputationEngine};
pub use error::ComputeError;
pub use numeric::{format_fixed, operand, parse_decimal};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
