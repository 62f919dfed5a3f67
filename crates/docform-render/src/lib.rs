//! Docform Render
//!
//! Projects a form instance into either interactive controls or frozen
//! printable text, from the same state.
//!
//! # Core Concepts
//!
//! - [`RenderMode`] / [`RenderContext`]: the mode and display settings,
//!   passed explicitly down the render tree
//! - [`Control`]: closed set of widgets, one per field kind
//! - [`project`]: builds a [`DocumentView`] without touching the store
//! - [`FieldRenderer`]: the widget layer's seam, driven by [`render_document`]
//! - [`PlainTextRenderer`]: built-in text projection
//!
//! # Example
//!
//! ```rust
//! use docform_render::{project, PlainTextRenderer, RenderContext, RenderMode};
//! use docform_schema::{FieldDefinition, FieldKind, FormSchema};
//! use docform_store::ValueStore;
//!
//! let schema = FormSchema::new("memo", "Internal Memo")
//!     .with_field(FieldDefinition::new("Subject", FieldKind::Text).unwrap());
//! let store = ValueStore::seed(&schema);
//!
//! let view = project(&RenderContext::new(RenderMode::Print), &schema, &store, None);
//! assert_eq!(PlainTextRenderer::render(&view), "Internal Memo\nSubject: N/A\n");
//! ```

#![warn(unreachable_pub)]

mod context;
mod control;
mod renderer;
mod view;

pub use context::{RenderContext, RenderMode};
pub use control::Control;
pub use renderer::{render_document, render_field, FieldRenderer, PlainTextRenderer};
pub use view::{project, ApprovalView, ColumnView, DocumentView, FieldView, SectionControls, SectionView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
