//! Field definitions
//!
//! [`FieldDefinition`] is the immutable declaration of one scalar field or
//! table column. [`FieldKind`] is the closed set of control kinds a renderer
//! must be able to display.

use crate::key::{FieldKey, KeyError};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Value held by a field or cell
///
/// Serializes untagged: text as a JSON string, flags as a JSON boolean.
/// Numbers in schema data are accepted and kept as their decimal text.
/// The empty value is `Text("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawValue")]
pub enum FieldValue {
    /// Checkbox state
    Flag(bool),
    /// Any textual input (numbers and dates are kept as entered)
    Text(String),
}

impl FieldValue {
    /// The empty value
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Text value
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the value counts as "not filled in"
    ///
    /// Blank text and an unchecked flag are empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(b) => !b,
        }
    }

    /// Text content, if this is a text value
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    /// Flag content, if this is a flag value
    #[inline]
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Flag(bool),
    Text(String),
    Number(serde_json::Number),
}

impl From<RawValue> for FieldValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Flag(b) => Self::Flag(b),
            RawValue::Text(s) => Self::Text(s),
            RawValue::Number(n) => Self::Text(n.to_string()),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// One choice of a `select` field
///
/// Accepts either a plain string (value and label identical) or a
/// `{ value, label }` map when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct SelectOption {
    /// Stored value
    pub value: String,
    /// Display label
    pub label: String,
}

impl SelectOption {
    /// Option whose label equals its value
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// Option with distinct value and label
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Full { value: String, label: Option<String> },
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(value) => Self::plain(value),
            RawOption::Full { value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                Self { value, label }
            }
        }
    }
}

/// Control kind of a field
///
/// Each kind maps to exactly one interactive control in edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Decimal number
    Number,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// One of a fixed set of options
    Select {
        /// Allowed options in display order
        options: Vec<SelectOption>,
    },
    /// Multi-line text
    #[serde(rename = "textarea")]
    TextArea,
    /// Boolean checkbox
    Checkbox,
}

impl FieldKind {
    /// Select kind from plain option values
    #[must_use]
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select {
            options: options.into_iter().map(SelectOption::plain).collect(),
        }
    }

    /// Kind name as it appears in schema data
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select { .. } => "select",
            Self::TextArea => "textarea",
            Self::Checkbox => "checkbox",
        }
    }

    /// Options of a select field
    #[must_use]
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            Self::Select { options } => Some(options),
            _ => None,
        }
    }

    /// Value a freshly created field of this kind holds
    #[must_use]
    pub fn empty_value(&self) -> FieldValue {
        match self {
            Self::Checkbox => FieldValue::Flag(false),
            _ => FieldValue::empty(),
        }
    }
}

/// Declaration of a scalar field or table column
///
/// When deserialized without an explicit `key`, the key is derived from
/// `label` with [`FieldKey::from_label`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDefinition")]
pub struct FieldDefinition {
    /// Payload key
    pub key: FieldKey,
    /// Display label
    pub label: String,
    /// Control kind
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Must be filled before submission
    #[serde(default)]
    pub required: bool,
    /// Seed value when a form or row is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<FieldValue>,
}

impl FieldDefinition {
    /// Create a field whose key is derived from its label
    ///
    /// # Errors
    /// Returns error if the label is blank
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Result<Self, KeyError> {
        let label = label.into();
        let key = FieldKey::from_label(&label)?;
        Ok(Self::with_key(key, label, kind))
    }

    /// Create a field with an explicit key
    #[must_use]
    pub fn with_key(key: FieldKey, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            required: false,
            initial: None,
        }
    }

    /// Mark as required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the seed value
    #[inline]
    #[must_use]
    pub fn with_initial(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Seed value, falling back to the kind's empty value
    #[must_use]
    pub fn seed_value(&self) -> FieldValue {
        self.initial
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }
}

#[derive(Deserialize)]
struct RawFieldDefinition {
    #[serde(default)]
    key: Option<FieldKey>,
    label: String,
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    initial: Option<FieldValue>,
}

impl TryFrom<RawFieldDefinition> for FieldDefinition {
    type Error = KeyError;

    fn try_from(raw: RawFieldDefinition) -> Result<Self, Self::Error> {
        let key = match raw.key {
            Some(key) => key,
            None => FieldKey::from_label(&raw.label)?,
        };
        Ok(Self {
            key,
            label: raw.label,
            kind: raw.kind,
            required: raw.required,
            initial: raw.initial,
        })
    }
}
