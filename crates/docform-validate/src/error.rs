//! Error types for building validators

use docform_schema::{FieldKey, FieldTarget, SectionId};

/// Validator construction and aggregate evaluation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A `pattern` rule does not compile
    #[error("invalid pattern for {target}: {source}")]
    InvalidPattern {
        /// Field the rule applies to
        target: FieldTarget,
        /// Compiler diagnostic
        #[source]
        source: regex::Error,
    },

    /// A balance column total exceeds the decimal range
    #[error("total of {column} in section {section} overflows")]
    TotalOverflow {
        /// Checked section
        section: SectionId,
        /// Summed column
        column: FieldKey,
    },

    /// Debit minus credit exceeds the decimal range
    #[error("balance difference in section {0} overflows")]
    DifferenceOverflow(SectionId),
}
