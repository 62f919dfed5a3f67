//! Loading schema documents and the label → key wire contract.

use docform_schema::{
    DerivationScope, FieldKey, FieldKind, FieldTarget, FormSchema, Formula, SchemaError,
    SectionId, ValidationRule,
};
use proptest::prelude::*;
use std::str::FromStr;

const JOURNAL: &str = r#"
id: journal-voucher
title: Journal Voucher
fields:
  - label: Voucher No
    kind: text
    required: true
  - label: Voucher Date
    kind: date
    required: true
  - label: Narration
    kind: textarea
sections:
  - id: entries
    label: Entries
    initial_rows: 2
    columns:
      - label: Account
        kind: text
        required: true
      - label: Debit
        kind: number
      - label: Credit
        kind: number
rules:
  - rule: min_rows
    section: entries
    min: 1
derivations:
  - target: TotalDebit
    scope: scalar
    formula:
      column_total: { section: entries, column: Debit }
balance:
  - section: entries
    debit: Debit
    credit: Credit
approvals: [Prepared By, Checked By]
"#;

#[test]
fn yaml_document_loads() {
    let schema = FormSchema::from_yaml(&JOURNAL.replace(
        "fields:\n",
        "fields:\n  - label: Total Debit\n    kind: number\n",
    ))
    .unwrap();

    assert_eq!(schema.id, "journal-voucher");
    assert_eq!(schema.fields.len(), 4);
    assert_eq!(schema.fields[1].key.as_str(), "VoucherNo");
    assert_eq!(schema.fields[3].kind, FieldKind::TextArea);

    let entries = schema.section(&SectionId::from_str("entries").unwrap()).unwrap();
    assert_eq!(entries.initial_rows, 2);
    assert_eq!(entries.columns[1].key.as_str(), "Debit");

    assert!(matches!(schema.rules[0], ValidationRule::MinRows { min: 1, .. }));
    assert_eq!(schema.derivations[0].scope, DerivationScope::Scalar);
    assert!(matches!(
        schema.derivations[0].formula,
        Formula::ColumnTotal { .. }
    ));
    assert_eq!(schema.approvals, ["Prepared By", "Checked By"]);
}

#[test]
fn yaml_document_with_missing_target_fails_check() {
    // TotalDebit is derived but never declared as a field
    let result = FormSchema::from_yaml(JOURNAL);
    match result {
        Err(SchemaError::UnknownField(FieldTarget::Scalar(key))) => {
            assert_eq!(key.as_str(), "TotalDebit");
        }
        other => panic!("expected unknown field, got {other:?}"),
    }
}

#[test]
fn json_document_loads() {
    let schema = FormSchema::from_json(
        r#"{
            "id": "expense-claim",
            "title": "Expense Claim",
            "fields": [
                {"label": "Employee Name", "kind": "text", "required": true},
                {"label": "Category", "kind": "select", "options": ["Travel", "Meals"]}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(schema.fields[0].key.as_str(), "EmployeeName");
    assert_eq!(schema.fields[1].kind.options().unwrap().len(), 2);
    assert!(schema.sections.is_empty());
}

#[test]
fn malformed_document_reports_decoder_error() {
    let result = FormSchema::from_json("{\"id\": 1}");
    assert!(matches!(result, Err(SchemaError::InvalidJson(_))));
}

proptest! {
    #[test]
    fn derived_keys_are_stable_and_whitespace_free(label in "[ A-Za-z0-9()/\\t-]{1,40}") {
        if let Ok(key) = FieldKey::from_label(&label) {
            prop_assert!(!key.as_str().chars().any(char::is_whitespace));
            prop_assert_eq!(FieldKey::from_label(key.as_str()).unwrap(), key.clone());
            prop_assert_eq!(FieldKey::from_label(&label).unwrap(), key);
        } else {
            prop_assert!(label.trim().is_empty());
        }
    }
}
