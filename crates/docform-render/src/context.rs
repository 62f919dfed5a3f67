//! Render mode and display settings
//!
//! The mode travels down the render tree inside a [`RenderContext`]; nothing
//! reads it from shared state, so instances rendered side by side never
//! interfere.

use chrono::NaiveDate;
use docform_schema::{FieldKind, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Stored date format of `date` fields
const ISO_DATE: &str = "%Y-%m-%d";

/// Editable controls or frozen printable text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Interactive controls
    #[default]
    Edit,
    /// Read-only document
    Print,
}

impl RenderMode {
    /// The other mode
    #[inline]
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Edit => Self::Print,
            Self::Print => Self::Edit,
        }
    }

    /// Whether this is print mode
    #[inline]
    #[must_use]
    pub fn is_print(self) -> bool {
        self == Self::Print
    }
}

/// Mode plus the display settings used by frozen text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Current mode
    pub mode: RenderMode,
    /// Text shown for empty values in print mode
    pub placeholder: String,
    /// `chrono` format for dates in print mode
    pub date_format: String,
    /// Print text for a checked / unchecked checkbox
    pub checkbox_labels: (String, String),
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderMode::Edit)
    }
}

impl RenderContext {
    /// Context with default display settings
    #[must_use]
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            placeholder: "N/A".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            checkbox_labels: ("Yes".to_string(), "No".to_string()),
        }
    }

    /// Set the empty-value placeholder
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the print date format
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the checkbox print labels
    #[must_use]
    pub fn with_checkbox_labels(mut self, checked: impl Into<String>, unchecked: impl Into<String>) -> Self {
        self.checkbox_labels = (checked.into(), unchecked.into());
        self
    }

    /// Same settings, other mode
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            mode: self.mode.toggle(),
            ..self.clone()
        }
    }

    /// Whether fields render frozen
    #[inline]
    #[must_use]
    pub fn is_print(&self) -> bool {
        self.mode.is_print()
    }

    /// Printable text of `value` for a field of `kind`
    #[must_use]
    pub fn display_text(&self, kind: &FieldKind, value: Option<&FieldValue>) -> String {
        if matches!(kind, FieldKind::Checkbox) {
            let checked = value.and_then(FieldValue::as_flag).unwrap_or(false);
            let (yes, no) = &self.checkbox_labels;
            return if checked { yes.clone() } else { no.clone() };
        }

        let Some(text) = value.and_then(FieldValue::as_text).map(str::trim) else {
            return self.placeholder.clone();
        };
        if text.is_empty() {
            return self.placeholder.clone();
        }

        match kind {
            FieldKind::Date => self.format_date(text),
            FieldKind::Select { options } => options
                .iter()
                .find(|o| o.value == text)
                .map_or_else(|| text.to_string(), |o| o.label.clone()),
            _ => text.to_string(),
        }
    }

    /// Reformat an ISO date; anything else is printed as entered
    fn format_date(&self, text: &str) -> String {
        let Ok(date) = NaiveDate::parse_from_str(text, ISO_DATE) else {
            return text.to_string();
        };
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.date_format)) {
            Ok(()) => out,
            Err(_) => text.to_string(),
        }
    }
}
