//! Per-field validation
//!
//! Two layers run in order: checks implied by each field definition (required,
//! number, date, select option), then the schema's explicit rules. Empty
//! optional values skip every format check.

use crate::error::ValidationError;
use crate::report::ValidationReport;
use chrono::NaiveDate;
use docform_compute::parse_decimal;
use docform_schema::{
    FieldDefinition, FieldKind, FieldTarget, FieldValue, FormSchema, SectionId, ValidationRule,
};
use docform_store::{FieldPath, ValueStore};
use regex::Regex;

/// Accepted input format of `date` fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Explicit rule check with patterns compiled
#[derive(Debug, Clone)]
enum Check {
    Required(FieldTarget),
    Numeric(FieldTarget),
    Pattern {
        target: FieldTarget,
        regex: Regex,
        message: Option<String>,
    },
    MaxLength {
        target: FieldTarget,
        max: usize,
    },
    MinRows {
        section: SectionId,
        min: usize,
    },
    MaxRows {
        section: SectionId,
        max: usize,
    },
}

impl Check {
    fn compile(rule: &ValidationRule) -> Result<Self, ValidationError> {
        Ok(match rule {
            ValidationRule::Required { target } => Self::Required(target.clone()),
            ValidationRule::Numeric { target } => Self::Numeric(target.clone()),
            ValidationRule::Pattern {
                target,
                regex,
                message,
            } => Self::Pattern {
                target: target.clone(),
                regex: Regex::new(regex).map_err(|source| ValidationError::InvalidPattern {
                    target: target.clone(),
                    source,
                })?,
                message: message.clone(),
            },
            ValidationRule::MaxLength { target, max } => Self::MaxLength {
                target: target.clone(),
                max: *max,
            },
            ValidationRule::MinRows { section, min } => Self::MinRows {
                section: section.clone(),
                min: *min,
            },
            ValidationRule::MaxRows { section, max } => Self::MaxRows {
                section: section.clone(),
                max: *max,
            },
        })
    }
}

/// Compiled validator for one schema
#[derive(Debug, Clone)]
pub struct Validator {
    schema: FormSchema,
    checks: Vec<Check>,
}

impl Validator {
    /// Compile the schema's rules
    ///
    /// # Errors
    /// Returns `InvalidPattern` if a pattern rule does not compile
    pub fn new(schema: &FormSchema) -> Result<Self, ValidationError> {
        let checks = schema
            .rules
            .iter()
            .map(Check::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            schema: schema.clone(),
            checks,
        })
    }

    /// Validate every value in `store`
    #[must_use]
    pub fn validate(&self, store: &ValueStore) -> ValidationReport {
        let mut report = ValidationReport::new();

        for field in &self.schema.fields {
            let path = FieldPath::scalar(field.key.clone());
            check_definition(field, store.get(&path), &path, &mut report);
        }
        for table in &self.schema.sections {
            let Some(section) = store.section(&table.id) else {
                continue;
            };
            for row in 0..section.len() {
                for column in &table.columns {
                    let path = FieldPath::cell(table.id.clone(), row, column.key.clone());
                    check_definition(column, store.get(&path), &path, &mut report);
                }
            }
        }

        for check in &self.checks {
            self.run_check(check, store, &mut report);
        }

        if !report.is_valid() {
            tracing::debug!(
                schema = %self.schema.id,
                errors = report.len(),
                "validation failed"
            );
        }
        report
    }

    fn run_check(&self, check: &Check, store: &ValueStore, report: &mut ValidationReport) {
        match check {
            Check::Required(target) => {
                for (path, value) in values(store, target) {
                    if value.map_or(true, FieldValue::is_empty) {
                        report.push(path, format!("{} is required", self.label(target)));
                    }
                }
            }
            Check::Numeric(target) => {
                for (path, text) in filled(store, target) {
                    if parse_decimal(text).is_none() {
                        report.push(path, format!("{} must be a number", self.label(target)));
                    }
                }
            }
            Check::Pattern {
                target,
                regex,
                message,
            } => {
                for (path, text) in filled(store, target) {
                    if !regex.is_match(text) {
                        let message = message
                            .clone()
                            .unwrap_or_else(|| format!("{} has an invalid format", self.label(target)));
                        report.push(path, message);
                    }
                }
            }
            Check::MaxLength { target, max } => {
                for (path, text) in filled(store, target) {
                    if text.chars().count() > *max {
                        report.push(
                            path,
                            format!("{} must be at most {max} characters", self.label(target)),
                        );
                    }
                }
            }
            Check::MinRows { section, min } => {
                let len = store.section(section).map_or(0, |s| s.len());
                if len < *min {
                    report.push(
                        FieldPath::Section(section.clone()),
                        format!("{} must have at least {min} row(s)", self.section_label(section)),
                    );
                }
            }
            Check::MaxRows { section, max } => {
                let len = store.section(section).map_or(0, |s| s.len());
                if len > *max {
                    report.push(
                        FieldPath::Section(section.clone()),
                        format!("{} must have at most {max} row(s)", self.section_label(section)),
                    );
                }
            }
        }
    }

    fn label(&self, target: &FieldTarget) -> String {
        self.schema
            .definition(target)
            .map_or_else(|| target.key().to_string(), |d| d.label.clone())
    }

    fn section_label(&self, id: &SectionId) -> String {
        self.schema
            .section(id)
            .map_or_else(|| id.to_string(), |s| s.label.clone())
    }
}

/// Checks implied by a field definition
fn check_definition(
    field: &FieldDefinition,
    value: Option<&FieldValue>,
    path: &FieldPath,
    report: &mut ValidationReport,
) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        if field.required {
            report.push(path.clone(), format!("{} is required", field.label));
        }
        return;
    };
    let Some(text) = value.as_text() else {
        return;
    };

    match &field.kind {
        FieldKind::Number if parse_decimal(text).is_none() => {
            report.push(path.clone(), format!("{} must be a number", field.label));
        }
        FieldKind::Date if NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).is_err() => {
            report.push(
                path.clone(),
                format!("{} must be a date (YYYY-MM-DD)", field.label),
            );
        }
        FieldKind::Select { options } if !options.iter().any(|o| o.value == text) => {
            report.push(
                path.clone(),
                format!("{} must be one of the listed options", field.label),
            );
        }
        _ => {}
    }
}

/// Every concrete value addressed by `target`
fn values<'a>(
    store: &'a ValueStore,
    target: &FieldTarget,
) -> Vec<(FieldPath, Option<&'a FieldValue>)> {
    match target {
        FieldTarget::Scalar(key) => {
            vec![(FieldPath::scalar(key.clone()), store.scalar(key))]
        }
        FieldTarget::Column { section, column } => store
            .section(section)
            .map(|s| {
                (0..s.len())
                    .map(|row| {
                        (
                            FieldPath::cell(section.clone(), row, column.clone()),
                            s.cell(row, column),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Non-empty text values addressed by `target`
fn filled<'a>(store: &'a ValueStore, target: &FieldTarget) -> Vec<(FieldPath, &'a str)> {
    values(store, target)
        .into_iter()
        .filter_map(|(path, value)| {
            let text = value?.as_text()?;
            (!text.trim().is_empty()).then_some((path, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docform_schema::{FieldKey, TableSchema};
    use std::str::FromStr;

    fn key(s: &str) -> FieldKey {
        FieldKey::from_str(s).unwrap()
    }

    fn invoice() -> FormSchema {
        FormSchema::new("invoice", "Tax Invoice")
            .with_field(FieldDefinition::new("Invoice No", FieldKind::Text).unwrap().required())
            .with_field(FieldDefinition::new("Invoice Date", FieldKind::Date).unwrap())
            .with_field(FieldDefinition::new("GSTIN", FieldKind::Text).unwrap())
            .with_field(FieldDefinition::new("Place", FieldKind::select(["KA", "MH"])).unwrap())
            .with_section(
                TableSchema::new("items")
                    .unwrap()
                    .with_column(FieldDefinition::new("Description", FieldKind::Text).unwrap())
                    .with_column(FieldDefinition::new("Amount", FieldKind::Number).unwrap()),
            )
            .with_rule(ValidationRule::Pattern {
                target: FieldTarget::scalar(key("GSTIN")),
                regex: "^[0-9]{2}[A-Z0-9]{13}$".to_string(),
                message: Some("GSTIN must be 15 characters".to_string()),
            })
            .with_rule(ValidationRule::Required {
                target: FieldTarget::column(SectionId::from_str("items").unwrap(), key("Description")),
            })
            .with_rule(ValidationRule::MaxRows {
                section: SectionId::from_str("items").unwrap(),
                max: 2,
            })
    }

    fn messages(report: &ValidationReport) -> Vec<String> {
        report.errors().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn seeded_form_reports_required_only() {
        let schema = invoice();
        let validator = Validator::new(&schema).unwrap();
        let report = validator.validate(&ValueStore::seed(&schema));

        assert_eq!(
            messages(&report),
            [
                "InvoiceNo: Invoice No is required",
                "items[0].Description: Description is required",
            ]
        );
    }

    #[test]
    fn kind_checks_apply_to_filled_values() {
        let schema = invoice();
        let validator = Validator::new(&schema).unwrap();
        let mut store = ValueStore::seed(&schema);
        store.set_scalar(&key("InvoiceNo"), FieldValue::text("INV-7")).unwrap();
        store.set_scalar(&key("InvoiceDate"), FieldValue::text("31/03/2024")).unwrap();
        store.set_scalar(&key("Place"), FieldValue::text("TN")).unwrap();
        store.set_scalar(&key("GSTIN"), FieldValue::text("29ABC")).unwrap();
        let items = store.section_mut(&SectionId::from_str("items").unwrap()).unwrap();
        items.set_cell(0, &key("Description"), FieldValue::text("Bolts")).unwrap();
        items.set_cell(0, &key("Amount"), FieldValue::text("twelve")).unwrap();

        assert_eq!(
            messages(&validator.validate(&store)),
            [
                "InvoiceDate: Invoice Date must be a date (YYYY-MM-DD)",
                "Place: Place must be one of the listed options",
                "items[0].Amount: Amount must be a number",
                "GSTIN: GSTIN must be 15 characters",
            ]
        );
    }

    #[test]
    fn valid_form_passes() {
        let schema = invoice();
        let validator = Validator::new(&schema).unwrap();
        let mut store = ValueStore::seed(&schema);
        store.set_scalar(&key("InvoiceNo"), FieldValue::text("INV-7")).unwrap();
        store.set_scalar(&key("InvoiceDate"), FieldValue::text("2024-03-31")).unwrap();
        store.set_scalar(&key("GSTIN"), FieldValue::text("29ABCDE1234F1Z5")).unwrap();
        let items = store.section_mut(&SectionId::from_str("items").unwrap()).unwrap();
        items.set_cell(0, &key("Description"), FieldValue::text("Bolts")).unwrap();
        items.set_cell(0, &key("Amount"), FieldValue::text("1,200.00")).unwrap();

        assert!(validator.validate(&store).is_valid());
    }

    #[test]
    fn row_count_rules_use_section_path() {
        let schema = invoice();
        let validator = Validator::new(&schema).unwrap();
        let mut store = ValueStore::seed(&schema);
        let items = SectionId::from_str("items").unwrap();
        let section = store.section_mut(&items).unwrap();
        section.add_row();
        section.add_row();

        let report = validator.validate(&store);
        let section_path = FieldPath::Section(items);
        assert_eq!(
            report.messages_for(&section_path).collect::<Vec<_>>(),
            ["items must have at most 2 row(s)"]
        );
    }

    #[test]
    fn bad_pattern_rejected_at_build() {
        let schema = invoice().with_rule(ValidationRule::Pattern {
            target: FieldTarget::scalar(key("GSTIN")),
            regex: "([".to_string(),
            message: None,
        });
        assert!(matches!(
            Validator::new(&schema),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }
}
