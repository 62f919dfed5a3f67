//! Instance identity and engine configuration

use crate::error::ConfigError;
use docform_render::{RenderContext, RenderMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Unique form instance identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub Ulid);

impl FormId {
    /// Generate new form ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Print text for a checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxLabels {
    /// Shown when ticked
    pub checked: String,
    /// Shown when not ticked
    pub unchecked: String,
}

impl Default for CheckboxLabels {
    fn default() -> Self {
        Self {
            checked: "Yes".to_string(),
            unchecked: "No".to_string(),
        }
    }
}

/// Engine configuration
///
/// Every setting has a default, so partial documents load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Text for empty values in print mode
    pub print_placeholder: String,
    /// `chrono` format for dates in print mode
    pub date_display_format: String,
    /// Checkbox print text
    pub checkbox_labels: CheckboxLabels,
    /// Role name used when a role is added without one
    pub default_role_name: String,
    /// Largest debit/credit difference still accepted
    pub balance_tolerance: Decimal,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document
    ///
    /// # Errors
    /// Returns error if the document is not a valid configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a YAML document
    ///
    /// # Errors
    /// Returns error if the document is not a valid configuration
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// With print placeholder
    #[inline]
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.print_placeholder = placeholder.into();
        self
    }

    /// With print date format
    #[inline]
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_display_format = format.into();
        self
    }

    /// With checkbox print text
    #[inline]
    #[must_use]
    pub fn with_checkbox_labels(mut self, checked: impl Into<String>, unchecked: impl Into<String>) -> Self {
        self.checkbox_labels = CheckboxLabels {
            checked: checked.into(),
            unchecked: unchecked.into(),
        };
        self
    }

    /// With default role name
    #[inline]
    #[must_use]
    pub fn with_default_role(mut self, name: impl Into<String>) -> Self {
        self.default_role_name = name.into();
        self
    }

    /// With balance tolerance
    #[inline]
    #[must_use]
    pub fn with_balance_tolerance(mut self, tolerance: Decimal) -> Self {
        self.balance_tolerance = tolerance;
        self
    }

    /// Render context for `mode` carrying these display settings
    #[must_use]
    pub fn render_context(&self, mode: RenderMode) -> RenderContext {
        RenderContext::new(mode)
            .with_placeholder(self.print_placeholder.clone())
            .with_date_format(self.date_display_format.clone())
            .with_checkbox_labels(
                self.checkbox_labels.checked.clone(),
                self.checkbox_labels.unchecked.clone(),
            )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            print_placeholder: "N/A".to_string(),
            date_display_format: "%d/%m/%Y".to_string(),
            checkbox_labels: CheckboxLabels::default(),
            default_role_name: "Approver".to_string(),
            balance_tolerance: Decimal::ZERO,
        }
    }
}
