//! Column-naming dialog
//!
//! Adding a runtime column asks the user for a label first. The dialog is a
//! plain value: the UI edits the draft, shows [`ColumnDialog::preview`], and
//! hands the dialog back with a [`DialogOutcome`].

use docform_schema::{FieldKey, SectionId};

/// How the user closed the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Add the column
    Confirmed,
    /// Discard the draft
    Cancelled,
}

/// Live feedback on the draft label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelPreview {
    /// Nothing usable typed yet
    Blank,
    /// Label would create this key
    Available(FieldKey),
    /// Key already used in the section
    Taken(FieldKey),
}

/// Pending request to add a column to one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDialog {
    section: SectionId,
    label: String,
    taken: Vec<FieldKey>,
}

impl ColumnDialog {
    pub(crate) fn new(section: SectionId, taken: Vec<FieldKey>) -> Self {
        Self {
            section,
            label: String::new(),
            taken,
        }
    }

    /// Target section
    #[inline]
    #[must_use]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    /// Current draft label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the draft label
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Key the draft would produce, or why it cannot be used
    #[must_use]
    pub fn preview(&self) -> LabelPreview {
        match FieldKey::from_label(&self.label) {
            Ok(key) if self.taken.contains(&key) => LabelPreview::Taken(key),
            Ok(key) => LabelPreview::Available(key),
            Err(_) => LabelPreview::Blank,
        }
    }

    /// Whether confirming would add a column
    #[inline]
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        matches!(self.preview(), LabelPreview::Available(_))
    }
}
