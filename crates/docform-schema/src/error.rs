//! Error types for schema loading and structural checks

use crate::key::{FieldKey, KeyError, SectionId};
use crate::rule::FieldTarget;

/// Schema errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Invalid key in schema data
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// JSON decoding failed
    #[error("invalid JSON schema: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// YAML decoding failed
    #[error("invalid YAML schema: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Two scalar fields share a key
    #[error("duplicate field key: {0}")]
    DuplicateField(FieldKey),

    /// Two sections share an id
    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),

    /// Two columns of one section share a key
    #[error("duplicate column '{column}' in section '{section}'")]
    DuplicateColumn {
        /// Owning section
        section: SectionId,
        /// Repeated key
        column: FieldKey,
    },

    /// Select field declares no options
    #[error("select field '{0}' has no options")]
    EmptyOptions(FieldKey),

    /// Initial value of a select field is not one of its options
    #[error("initial value '{value}' of '{field}' is not an option")]
    InitialNotAnOption {
        /// Select field
        field: FieldKey,
        /// Offending value
        value: String,
    },

    /// Reference to a section the schema does not declare
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// Reference to a field the schema does not declare
    #[error("unknown field: {0}")]
    UnknownField(FieldTarget),

    /// Two derivations write the same field
    #[error("field {0} is derived more than once")]
    DuplicateDerivation(FieldTarget),

    /// A derivation reads its own output
    #[error("derivation of {0} reads its own output")]
    SelfReferentialDerivation(FieldTarget),

    /// Derivations form a dependency cycle
    #[error("derivation cycle through {0}")]
    DerivationCycle(FieldTarget),

    /// Aggregate formula declared in row scope
    #[error("column total for {0} must be declared in scalar scope")]
    AggregateInRowScope(FieldKey),

    /// Base column key collides with the row's runtime-column map
    #[error("column {column} in section {section} uses the reserved key dynamicFields")]
    ReservedColumnKey {
        /// Section declaring the column
        section: SectionId,
        /// Offending key
        column: FieldKey,
    },
}
