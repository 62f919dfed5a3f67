//! Tolerant decimal parsing and fixed-precision formatting

use docform_schema::FieldValue;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Largest scale a [`Decimal`] can carry
const MAX_SCALE: u32 = 28;

/// Parse user-entered numeric text
///
/// Surrounding whitespace and thousands separators (`,`) are ignored.
/// Returns `None` for blank or non-numeric text.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// Numeric reading of a field value; anything unparseable counts as zero
#[must_use]
pub fn operand(value: Option<&FieldValue>) -> Decimal {
    value
        .and_then(FieldValue::as_text)
        .and_then(parse_decimal)
        .unwrap_or(Decimal::ZERO)
}

/// Round half away from zero and render exactly `precision` fraction digits
///
/// Negative zero renders as `0.00`.
#[must_use]
pub fn format_fixed(value: Decimal, precision: u32) -> String {
    let precision = precision.min(MAX_SCALE);
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(precision);
    rounded.to_string()
}
