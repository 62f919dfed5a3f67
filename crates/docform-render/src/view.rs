//! Document projection
//!
//! [`project`] turns a schema plus a live store into a [`DocumentView`]: the
//! full control tree for one mode. The store is only read, so projecting in
//! either mode, in any order, leaves every value untouched.

use crate::context::{RenderContext, RenderMode};
use crate::control::Control;
use docform_schema::{FieldKey, FieldTarget, FormSchema, SectionId, TableSchema};
use docform_store::{FieldPath, TableSection, ValueStore};
use docform_validate::ValidationReport;
use serde::Serialize;
use serde_json::Value;

/// One rendered value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// Address of the value
    pub path: FieldPath,
    /// Display label
    pub label: String,
    /// Widget or frozen text
    pub control: Control,
    /// Whether the field is mandatory
    pub required: bool,
    /// Inline messages (edit mode only)
    pub errors: Vec<String>,
}

/// Column header of a table section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    /// Column key
    pub key: FieldKey,
    /// Header label
    pub label: String,
    /// Added at runtime
    pub dynamic: bool,
}

/// Which section mutations are offered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SectionControls {
    /// Append a row
    pub add_row: bool,
    /// Remove a row
    pub remove_row: bool,
    /// Add a runtime column
    pub add_column: bool,
    /// Remove a runtime column
    pub remove_column: bool,
}

/// One rendered table section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    /// Section identifier
    pub id: SectionId,
    /// Section heading
    pub label: String,
    /// Effective columns: base then runtime
    pub columns: Vec<ColumnView>,
    /// Cells per row, aligned with `columns`
    pub rows: Vec<Vec<FieldView>>,
    /// Offered mutations
    pub controls: SectionControls,
    /// Section-level messages such as row-count rules (edit mode only)
    pub errors: Vec<String>,
}

/// One rendered approval role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalView {
    /// Position in the role list
    pub index: usize,
    /// Editable name or frozen text
    pub role: Control,
    /// Opaque payload for the signature component
    pub signature: Value,
    /// Whether a signature has been captured
    pub signed: bool,
    /// Removal offered
    pub removable: bool,
}

/// Complete projection of one form instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    /// Form title
    pub title: String,
    /// Mode the view was projected in
    pub mode: RenderMode,
    /// Header fields
    pub fields: Vec<FieldView>,
    /// Table sections
    pub sections: Vec<SectionView>,
    /// Approval roles
    pub approvals: Vec<ApprovalView>,
    /// Add-role control offered
    pub add_role: bool,
    /// Number of attachment records
    pub attachments: usize,
    /// Attachment add/remove offered
    pub manage_attachments: bool,
}

/// Project `store` for rendering in `ctx.mode`
///
/// `report` supplies inline messages from the last submission attempt; they
/// are only shown in edit mode.
#[must_use]
pub fn project(
    ctx: &RenderContext,
    schema: &FormSchema,
    store: &ValueStore,
    report: Option<&ValidationReport>,
) -> DocumentView {
    let editing = !ctx.is_print();
    let errors_for = |path: &FieldPath| -> Vec<String> {
        match report {
            Some(report) if editing => report.messages_for(path).map(str::to_string).collect(),
            _ => Vec::new(),
        }
    };

    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let path = FieldPath::scalar(field.key.clone());
            let derived = schema.is_derived(&FieldTarget::scalar(field.key.clone()));
            FieldView {
                control: Control::for_field(ctx, field, store.get(&path), derived),
                label: field.label.clone(),
                required: field.required,
                errors: errors_for(&path),
                path,
            }
        })
        .collect();

    let sections = schema
        .sections
        .iter()
        .filter_map(|table| {
            let section = store.section(&table.id)?;
            Some(project_section(ctx, schema, table, section, &errors_for))
        })
        .collect();

    let approvals = store
        .approvals()
        .roles()
        .iter()
        .enumerate()
        .map(|(index, role)| ApprovalView {
            index,
            role: if editing {
                Control::TextInput {
                    value: role.role_name.clone(),
                }
            } else {
                Control::Frozen {
                    text: if role.role_name.trim().is_empty() {
                        ctx.placeholder.clone()
                    } else {
                        role.role_name.clone()
                    },
                }
            },
            signature: role.signature_data.clone(),
            signed: role.is_signed(),
            removable: editing,
        })
        .collect();

    tracing::trace!(schema = %schema.id, mode = ?ctx.mode, "document projected");

    DocumentView {
        title: schema.title.clone(),
        mode: ctx.mode,
        fields,
        sections,
        approvals,
        add_role: editing,
        attachments: store.attachments().len(),
        manage_attachments: editing,
    }
}

fn project_section(
    ctx: &RenderContext,
    schema: &FormSchema,
    table: &TableSchema,
    section: &TableSection,
    errors_for: &dyn Fn(&FieldPath) -> Vec<String>,
) -> SectionView {
    let editing = !ctx.is_print();

    let mut columns: Vec<ColumnView> = table
        .columns
        .iter()
        .map(|c| ColumnView {
            key: c.key.clone(),
            label: c.label.clone(),
            dynamic: false,
        })
        .collect();
    columns.extend(section.registry().columns().iter().map(|c| ColumnView {
        key: c.key.clone(),
        label: c.label.clone(),
        dynamic: true,
    }));

    let rows = (0..section.len())
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let path = FieldPath::cell(table.id.clone(), row, column.key.clone());
                    let value = section.cell(row, &column.key);
                    let (control, required) = match table.column(&column.key) {
                        Some(def) => {
                            let target = FieldTarget::column(table.id.clone(), def.key.clone());
                            (
                                Control::for_field(ctx, def, value, schema.is_derived(&target)),
                                def.required,
                            )
                        }
                        None => (Control::for_dynamic(ctx, value), false),
                    };
                    FieldView {
                        label: column.label.clone(),
                        control,
                        required,
                        errors: errors_for(&path),
                        path,
                    }
                })
                .collect()
        })
        .collect();

    let extensible = editing && section.is_extensible();
    SectionView {
        id: table.id.clone(),
        label: table.label.clone(),
        controls: SectionControls {
            add_row: editing,
            remove_row: editing && !section.is_empty(),
            add_column: extensible,
            remove_column: extensible && !section.registry().is_empty(),
        },
        errors: errors_for(&FieldPath::Section(table.id.clone())),
        columns,
        rows,
    }
}
