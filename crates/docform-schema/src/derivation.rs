//! Derived-field declarations
//!
//! A [`Derivation`] names a target field, the scope its operands are read
//! from, and the [`Formula`] that combines them.

use crate::key::{FieldKey, SectionId};
use crate::rule::FieldTarget;
use serde::{Deserialize, Serialize};

/// Default number of fraction digits of a derived value
pub const DEFAULT_PRECISION: u32 = 2;

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

/// Where a derivation reads its operands and writes its target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScope {
    /// Operands and target are header fields
    Scalar,
    /// Operands and target are columns of the same row
    Row {
        /// Owning section
        section: SectionId,
    },
}

/// Arithmetic shape of a derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// `minuend − subtrahend` (variance, savings)
    Difference {
        /// Left operand
        minuend: FieldKey,
        /// Right operand
        subtrahend: FieldKey,
    },
    /// Sum of all operands (revised amount = original + adjustment)
    Sum {
        /// Added operands
        operands: Vec<FieldKey>,
    },
    /// Product of all factors (amount = quantity × rate)
    Product {
        /// Multiplied operands
        factors: Vec<FieldKey>,
    },
    /// `opening + Σ additions − Σ deductions` (closing stock, closing balance)
    RollForward {
        /// Opening balance
        opening: FieldKey,
        /// Added operands
        additions: Vec<FieldKey>,
        /// Subtracted operands
        deductions: Vec<FieldKey>,
    },
    /// Sum of one column over every row of a section
    ColumnTotal {
        /// Summed section
        section: SectionId,
        /// Summed column
        column: FieldKey,
    },
}

impl Formula {
    /// Operands read from the derivation's own scope
    ///
    /// Empty for [`Formula::ColumnTotal`], whose inputs live in a section.
    #[must_use]
    pub fn operands(&self) -> Vec<&FieldKey> {
        match self {
            Self::Difference {
                minuend,
                subtrahend,
            } => vec![minuend, subtrahend],
            Self::Sum { operands } => operands.iter().collect(),
            Self::Product { factors } => factors.iter().collect(),
            Self::RollForward {
                opening,
                additions,
                deductions,
            } => std::iter::once(opening)
                .chain(additions)
                .chain(deductions)
                .collect(),
            Self::ColumnTotal { .. } => Vec::new(),
        }
    }

    /// Whether the formula aggregates over rows
    #[inline]
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::ColumnTotal { .. })
    }
}

/// One derived field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    /// Field written by the derivation
    pub target: FieldKey,
    /// Operand scope
    pub scope: DerivationScope,
    /// Arithmetic shape
    pub formula: Formula,
    /// Fraction digits of the formatted result
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Derivation {
    /// Header-field derivation
    #[must_use]
    pub fn scalar(target: FieldKey, formula: Formula) -> Self {
        Self {
            target,
            scope: DerivationScope::Scalar,
            formula,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Per-row derivation inside `section`
    #[must_use]
    pub fn row(section: SectionId, target: FieldKey, formula: Formula) -> Self {
        Self {
            target,
            scope: DerivationScope::Row { section },
            formula,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Override the output precision
    #[inline]
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Address of the written field
    #[must_use]
    pub fn output(&self) -> FieldTarget {
        self.locate(&self.target)
    }

    /// Addresses of every input field
    #[must_use]
    pub fn inputs(&self) -> Vec<FieldTarget> {
        if let Formula::ColumnTotal { section, column } = &self.formula {
            return vec![FieldTarget::column(section.clone(), column.clone())];
        }
        self.formula
            .operands()
            .into_iter()
            .map(|key| self.locate(key))
            .collect()
    }

    fn locate(&self, key: &FieldKey) -> FieldTarget {
        match &self.scope {
            DerivationScope::Scalar => FieldTarget::scalar(key.clone()),
            DerivationScope::Row { section } => FieldTarget::column(section.clone(), key.clone()),
        }
    }
}
