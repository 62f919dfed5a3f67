//! Submission-time aggregate guards
//!
//! The guard compares column totals across all rows of a section (debit
//! against credit). It is separate from per-field validation and must run on
//! settled derived values.

use crate::error::ValidationError;
use docform_compute::{format_fixed, operand};
use docform_schema::{BalanceRule, FieldKey, SectionId};
use docform_store::ValueStore;
use rust_decimal::Decimal;
use serde::Serialize;

/// Column totals that fail to balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{label}: debit {debit_total}, credit {credit_total}, difference {difference}")]
pub struct AggregateImbalance {
    /// Notice text from the rule
    pub label: String,
    /// Checked section
    pub section: SectionId,
    /// Sum of the debit column
    pub debit_total: String,
    /// Sum of the credit column
    pub credit_total: String,
    /// `debit_total − credit_total`
    pub difference: String,
}

/// Evaluator for a schema's balance rules
#[derive(Debug, Clone)]
pub struct BalanceGuard {
    rules: Vec<BalanceRule>,
    tolerance: Decimal,
}

impl BalanceGuard {
    /// Guard over `rules` requiring exact balance
    #[must_use]
    pub fn new(rules: Vec<BalanceRule>) -> Self {
        Self {
            rules,
            tolerance: Decimal::ZERO,
        }
    }

    /// Accept differences up to `tolerance` in absolute value
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Evaluate every rule; empty when all balance
    ///
    /// # Errors
    /// Returns error if a column total or a difference leaves the decimal range
    pub fn check(&self, store: &ValueStore) -> Result<Vec<AggregateImbalance>, ValidationError> {
        self.rules
            .iter()
            .filter_map(|rule| self.check_rule(rule, store).transpose())
            .collect()
    }

    fn check_rule(
        &self,
        rule: &BalanceRule,
        store: &ValueStore,
    ) -> Result<Option<AggregateImbalance>, ValidationError> {
        let debit = column_total(store, &rule.section, &rule.debit)?;
        let credit = column_total(store, &rule.section, &rule.credit)?;
        let difference = debit
            .checked_sub(credit)
            .ok_or_else(|| ValidationError::DifferenceOverflow(rule.section.clone()))?;
        if difference.abs() <= self.tolerance {
            return Ok(None);
        }

        let imbalance = AggregateImbalance {
            label: rule.label.clone(),
            section: rule.section.clone(),
            debit_total: format_fixed(debit, 2),
            credit_total: format_fixed(credit, 2),
            difference: format_fixed(difference, 2),
        };
        tracing::warn!(section = %rule.section, difference = %imbalance.difference, "aggregate imbalance");
        Ok(Some(imbalance))
    }
}

fn column_total(
    store: &ValueStore,
    section: &SectionId,
    column: &FieldKey,
) -> Result<Decimal, ValidationError> {
    store
        .section(section)
        .into_iter()
        .flat_map(|s| s.column_values(column))
        .map(|v| operand(Some(v)))
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| ValidationError::TotalOverflow {
            section: section.clone(),
            column: column.clone(),
        })
}
