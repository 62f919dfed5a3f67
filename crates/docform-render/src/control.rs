//! Closed control dispatch
//!
//! Each field kind maps to exactly one edit-mode control. Derived fields
//! become [`Control::Computed`] in edit mode; every field becomes
//! [`Control::Frozen`] in print mode.

use crate::context::RenderContext;
use docform_schema::{FieldDefinition, FieldKind, FieldValue, SelectOption};
use serde::Serialize;

/// Widget the rendering layer should show for one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    /// Single-line text entry
    TextInput {
        /// Current text
        value: String,
    },
    /// Numeric entry
    NumberInput {
        /// Current text
        value: String,
    },
    /// Date picker (ISO `YYYY-MM-DD`)
    DateInput {
        /// Current text
        value: String,
    },
    /// Dropdown
    Select {
        /// Choices in declaration order
        options: Vec<SelectOption>,
        /// Selected option value, if any
        selected: Option<String>,
    },
    /// Multi-line text entry
    TextArea {
        /// Current text
        value: String,
    },
    /// Tick box
    Checkbox {
        /// Current state
        checked: bool,
    },
    /// Non-editable derived value
    Computed {
        /// Derived text
        text: String,
    },
    /// Printable text
    Frozen {
        /// Display text
        text: String,
    },
}

impl Control {
    /// Control for `value` of `field`
    #[must_use]
    pub fn for_field(
        ctx: &RenderContext,
        field: &FieldDefinition,
        value: Option<&FieldValue>,
        derived: bool,
    ) -> Self {
        if ctx.is_print() {
            return Self::Frozen {
                text: ctx.display_text(&field.kind, value),
            };
        }

        let text = value
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string();
        if derived {
            return Self::Computed { text };
        }

        match &field.kind {
            FieldKind::Text => Self::TextInput { value: text },
            FieldKind::Number => Self::NumberInput { value: text },
            FieldKind::Date => Self::DateInput { value: text },
            FieldKind::TextArea => Self::TextArea { value: text },
            FieldKind::Select { options } => Self::Select {
                options: options.clone(),
                selected: (!text.is_empty()).then_some(text),
            },
            FieldKind::Checkbox => Self::Checkbox {
                checked: value.and_then(FieldValue::as_flag).unwrap_or(false),
            },
        }
    }

    /// Text control for a runtime column (no declared kind)
    #[must_use]
    pub fn for_dynamic(ctx: &RenderContext, value: Option<&FieldValue>) -> Self {
        if ctx.is_print() {
            return Self::Frozen {
                text: ctx.display_text(&FieldKind::Text, value),
            };
        }
        Self::TextInput {
            value: value
                .and_then(FieldValue::as_text)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Whether the user can change the value through this control
    #[inline]
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Self::Computed { .. } | Self::Frozen { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderMode;

    fn field(kind: FieldKind) -> FieldDefinition {
        FieldDefinition::new("Value", kind).unwrap()
    }

    #[test]
    fn one_control_per_kind() {
        let ctx = RenderContext::new(RenderMode::Edit);
        let value = FieldValue::text("x");
        let cases = [
            (FieldKind::Text, "text_input"),
            (FieldKind::Number, "number_input"),
            (FieldKind::Date, "date_input"),
            (FieldKind::select(["x"]), "select"),
            (FieldKind::TextArea, "text_area"),
            (FieldKind::Checkbox, "checkbox"),
        ];
        for (kind, name) in cases {
            let control = Control::for_field(&ctx, &field(kind), Some(&value), false);
            let json = serde_json::to_value(&control).unwrap();
            assert_eq!(json["control"], name);
            assert!(control.is_interactive());
        }
    }

    #[test]
    fn derived_fields_not_editable() {
        let ctx = RenderContext::new(RenderMode::Edit);
        let control = Control::for_field(
            &ctx,
            &field(FieldKind::Number),
            Some(&FieldValue::text("50.00")),
            true,
        );
        assert_eq!(
            control,
            Control::Computed {
                text: "50.00".to_string()
            }
        );
        assert!(!control.is_interactive());
    }

    #[test]
    fn print_mode_freezes_everything() {
        let ctx = RenderContext::new(RenderMode::Print);
        let control = Control::for_field(&ctx, &field(FieldKind::Text), None, false);
        assert_eq!(
            control,
            Control::Frozen {
                text: "N/A".to_string()
            }
        );
    }

    #[test]
    fn empty_select_has_no_selection() {
        let ctx = RenderContext::new(RenderMode::Edit);
        let control = Control::for_field(
            &ctx,
            &field(FieldKind::select(["Low", "High"])),
            Some(&FieldValue::empty()),
            false,
        );
        assert!(matches!(control, Control::Select { selected: None, .. }));
    }
}
