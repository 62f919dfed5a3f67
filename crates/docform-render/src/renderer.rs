//! Widget-layer seam
//!
//! The engine does not own widgets. A [`FieldRenderer`] supplies one method per
//! [`Control`] variant and [`render_document`] walks a [`DocumentView`]
//! through it, dispatching each field exactly once.

use crate::control::Control;
use crate::view::{ApprovalView, DocumentView, FieldView, SectionView};
use docform_schema::SelectOption;

/// Widget implementation for every control variant
pub trait FieldRenderer {
    /// Single-line text entry
    fn text_input(&mut self, field: &FieldView, value: &str);
    /// Numeric entry
    fn number_input(&mut self, field: &FieldView, value: &str);
    /// Date entry
    fn date_input(&mut self, field: &FieldView, value: &str);
    /// Dropdown
    fn select(&mut self, field: &FieldView, options: &[SelectOption], selected: Option<&str>);
    /// Multi-line text entry
    fn text_area(&mut self, field: &FieldView, value: &str);
    /// Tick box
    fn checkbox(&mut self, field: &FieldView, checked: bool);
    /// Read-only derived value
    fn computed(&mut self, field: &FieldView, text: &str);
    /// Printable text
    fn frozen(&mut self, field: &FieldView, text: &str);

    /// Document heading
    fn begin_document(&mut self, _view: &DocumentView) {}
    /// Section heading, before its rows
    fn begin_section(&mut self, _section: &SectionView) {}
    /// Start of one row
    fn begin_row(&mut self, _section: &SectionView, _row: usize) {}
    /// After the last row of a section
    fn end_section(&mut self, _section: &SectionView) {}
    /// One approval slot; the role name has already been rendered
    fn approval(&mut self, _approval: &ApprovalView) {}
}

/// Dispatch one field to its widget
pub fn render_field<R: FieldRenderer + ?Sized>(renderer: &mut R, field: &FieldView) {
    match &field.control {
        Control::TextInput { value } => renderer.text_input(field, value),
        Control::NumberInput { value } => renderer.number_input(field, value),
        Control::DateInput { value } => renderer.date_input(field, value),
        Control::Select { options, selected } => {
            renderer.select(field, options, selected.as_deref());
        }
        Control::TextArea { value } => renderer.text_area(field, value),
        Control::Checkbox { checked } => renderer.checkbox(field, *checked),
        Control::Computed { text } => renderer.computed(field, text),
        Control::Frozen { text } => renderer.frozen(field, text),
    }
}

/// Walk the whole document through `renderer`
pub fn render_document<R: FieldRenderer + ?Sized>(renderer: &mut R, view: &DocumentView) {
    renderer.begin_document(view);
    for field in &view.fields {
        render_field(renderer, field);
    }
    for section in &view.sections {
        renderer.begin_section(section);
        for (index, row) in section.rows.iter().enumerate() {
            renderer.begin_row(section, index);
            for cell in row {
                render_field(renderer, cell);
            }
        }
        renderer.end_section(section);
    }
    for approval in &view.approvals {
        renderer.approval(approval);
    }
}

/// Line-oriented text projection of a document
///
/// Edit-mode controls are shown as `[value]`; print mode shows plain text.
#[derive(Debug, Default, Clone)]
pub struct PlainTextRenderer {
    out: String,
    indent: usize,
}

impl PlainTextRenderer {
    /// Create empty renderer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `view` and return the text
    #[must_use]
    pub fn render(view: &DocumentView) -> String {
        let mut renderer = Self::new();
        render_document(&mut renderer, view);
        renderer.finish()
    }

    /// Consume the renderer, returning the text
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, field: &FieldView, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(&field.label);
        self.out.push_str(": ");
        self.out.push_str(text);
        for error in &field.errors {
            self.out.push_str(" (");
            self.out.push_str(error);
            self.out.push(')');
        }
        self.out.push('\n');
    }

    fn boxed(&mut self, field: &FieldView, value: &str) {
        self.line(field, &format!("[{value}]"));
    }
}

impl FieldRenderer for PlainTextRenderer {
    fn text_input(&mut self, field: &FieldView, value: &str) {
        self.boxed(field, value);
    }

    fn number_input(&mut self, field: &FieldView, value: &str) {
        self.boxed(field, value);
    }

    fn date_input(&mut self, field: &FieldView, value: &str) {
        self.boxed(field, value);
    }

    fn select(&mut self, field: &FieldView, options: &[SelectOption], selected: Option<&str>) {
        let label = selected
            .and_then(|v| options.iter().find(|o| o.value == v))
            .map_or("", |o| o.label.as_str());
        self.line(field, &format!("[{label} v]"));
    }

    fn text_area(&mut self, field: &FieldView, value: &str) {
        self.boxed(field, value);
    }

    fn checkbox(&mut self, field: &FieldView, checked: bool) {
        self.line(field, if checked { "[x]" } else { "[ ]" });
    }

    fn computed(&mut self, field: &FieldView, text: &str) {
        self.line(field, &format!("={text}"));
    }

    fn frozen(&mut self, field: &FieldView, text: &str) {
        self.line(field, text);
    }

    fn begin_document(&mut self, view: &DocumentView) {
        self.out.push_str(&view.title);
        self.out.push('\n');
    }

    fn begin_section(&mut self, section: &SectionView) {
        self.out.push_str("== ");
        self.out.push_str(&section.label);
        self.out.push_str(" ==\n");
        for error in &section.errors {
            self.out.push('(');
            self.out.push_str(error);
            self.out.push_str(")\n");
        }
    }

    fn begin_row(&mut self, _section: &SectionView, row: usize) {
        self.indent = 1;
        self.out.push_str(&format!("#{}\n", row + 1));
    }

    fn end_section(&mut self, _section: &SectionView) {
        self.indent = 0;
    }

    fn approval(&mut self, approval: &ApprovalView) {
        let name = match &approval.role {
            Control::TextInput { value } => format!("[{value}]"),
            Control::Frozen { text } => text.clone(),
            _ => String::new(),
        };
        let signed = if approval.signed { "signed" } else { "unsigned" };
        self.out.push_str(&format!("Approval {}: {name} ({signed})\n", approval.index + 1));
    }
}
