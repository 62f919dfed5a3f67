//! Formula evaluation against live values

use crate::error::ComputeError;
use crate::numeric::operand;
use docform_schema::{Derivation, DerivationScope, FieldKey, Formula};
use docform_store::{FieldPath, ValueStore};
use rust_decimal::Decimal;

fn sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Evaluate `derivation` for the value at `path`
///
/// Operands are read from `store` at call time. Missing or non-numeric
/// operands count as zero.
pub(crate) fn evaluate(
    derivation: &Derivation,
    store: &ValueStore,
    path: &FieldPath,
) -> Result<Decimal, ComputeError> {
    let row = match path {
        FieldPath::Cell { row, .. } => Some(*row),
        _ => None,
    };
    let read = |key: &FieldKey| -> Decimal {
        match &derivation.scope {
            DerivationScope::Scalar => operand(store.scalar(key)),
            DerivationScope::Row { section } => operand(
                row.and_then(|r| store.section(section).and_then(|s| s.cell(r, key))),
            ),
        }
    };
    let overflow = || ComputeError::Overflow(derivation.output());

    match &derivation.formula {
        Formula::Difference {
            minuend,
            subtrahend,
        } => read(minuend)
            .checked_sub(read(subtrahend))
            .ok_or_else(overflow),
        Formula::Sum { operands } => sum(operands.iter().map(read)).ok_or_else(overflow),
        Formula::Product { factors } if factors.is_empty() => Ok(Decimal::ZERO),
        Formula::Product { factors } => factors
            .iter()
            .map(read)
            .try_fold(Decimal::ONE, Decimal::checked_mul)
            .ok_or_else(overflow),
        Formula::RollForward {
            opening,
            additions,
            deductions,
        } => {
            let added = sum(additions.iter().map(read)).ok_or_else(overflow)?;
            let deducted = sum(deductions.iter().map(read)).ok_or_else(overflow)?;
            read(opening)
                .checked_add(added)
                .and_then(|v| v.checked_sub(deducted))
                .ok_or_else(overflow)
        }
        Formula::ColumnTotal { section, column } => sum(store
            .section(section)
            .into_iter()
            .flat_map(|s| s.column_values(column))
            .map(|v| operand(Some(v))))
        .ok_or_else(overflow),
    }
}
