//! Journal voucher: blocked while unbalanced, delivered once balanced.

use docform_core::{FormInstance, StateKind, SubmitError};
use docform_render::RenderMode;
use docform_test_utils::{cell, journal, open, scalar, MemorySink};
use pretty_assertions::assert_eq;
use serde_json::json;

fn filled(credit: &str) -> FormInstance {
    let mut form = open(journal());
    form.update_field(&scalar("VoucherNo"), "JV-12").unwrap();
    form.update_field(&scalar("VoucherDate"), "2024-04-01").unwrap();
    for (row, (account, debit, credit)) in [("Cash", "100", "0"), ("Sales", "0", credit)]
        .into_iter()
        .enumerate()
    {
        form.update_field(&cell("entries", row, "Account"), account).unwrap();
        form.update_field(&cell("entries", row, "Debit"), debit).unwrap();
        form.update_field(&cell("entries", row, "Credit"), credit).unwrap();
    }
    form
}

#[test]
fn imbalance_blocks_submission() {
    let mut form = filled("90");
    let mut sink = MemorySink::new();

    let err = form.submit(&mut sink).unwrap_err();
    let report = match &err {
        SubmitError::Blocked(report) => report,
        other => panic!("expected blocked submission, got {other:?}"),
    };
    assert!(report.validation.is_valid());
    assert_eq!(
        report.messages(),
        ["Journal does not balance: debit 100.00, credit 90.00, difference 10.00"]
    );
    assert_eq!(form.state().kind(), StateKind::Blocked);
    assert!(sink.is_empty());

    // entered values survive the failed attempt
    assert_eq!(
        form.value(&cell("entries", 1, "Credit")).and_then(|v| v.as_text()),
        Some("90")
    );
}

#[test]
fn missing_values_show_inline_until_next_attempt() {
    let mut form = open(journal());
    let mut sink = MemorySink::new();
    assert!(form.submit(&mut sink).unwrap_err().is_blocking());

    let view = form.view(RenderMode::Edit);
    assert_eq!(view.fields[0].errors, ["Voucher No is required"]);
    assert_eq!(view.sections[0].rows[0][0].errors, ["Account is required"]);

    form.update_field(&scalar("VoucherNo"), "JV-13").unwrap();
    assert_eq!(form.state().kind(), StateKind::Editing);
    assert_eq!(form.view(RenderMode::Edit).fields[0].errors, ["Voucher No is required"]);
    assert!(form.view(RenderMode::Print).fields[0].errors.is_empty());
}

#[test]
fn balanced_journal_is_delivered() {
    let mut form = filled("90");
    let mut sink = MemorySink::new();
    assert!(form.submit(&mut sink).is_err());

    form.update_field(&cell("entries", 1, "Credit"), "100").unwrap();
    form.set_signature(0, json!({"image": "data:image/png;base64,AAAA"}))
        .unwrap();
    let payload = form.submit(&mut sink).unwrap();

    assert_eq!(form.state().kind(), StateKind::Submitted);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.last(), Some(&payload));

    let mut json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["formId"], json!(form.id().to_string()));
    json.as_object_mut().unwrap().remove("formId");
    assert_eq!(
        json,
        json!({
            "schemaId": "journal-voucher",
            "fields": {
                "VoucherNo": "JV-12",
                "VoucherDate": "2024-04-01",
                "Narration": ""
            },
            "sections": {
                "entries": [
                    {"Account": "Cash", "Debit": "100", "Credit": "0", "dynamicFields": {}},
                    {"Account": "Sales", "Debit": "0", "Credit": "100", "dynamicFields": {}}
                ]
            },
            "dynamicColumns": {},
            "approvals": [
                {"roleName": "Prepared By", "signatureData": {"image": "data:image/png;base64,AAAA"}},
                {"roleName": "Checked By", "signatureData": {}}
            ],
            "attachments": [],
            "customFields": []
        })
    );
}

#[test]
fn tolerance_accepts_rounding_difference() {
    let mut form = FormInstance::open(
        journal(),
        docform_core::EngineConfig::new().with_balance_tolerance(rust_decimal::Decimal::new(1, 2)),
    )
    .unwrap();
    form.update_field(&scalar("VoucherNo"), "JV-14").unwrap();
    form.update_field(&scalar("VoucherDate"), "2024-04-02").unwrap();
    for (row, (account, debit, credit)) in [("Cash", "10.00", "0"), ("Sales", "0", "9.99")]
        .into_iter()
        .enumerate()
    {
        form.update_field(&cell("entries", row, "Account"), account).unwrap();
        form.update_field(&cell("entries", row, "Debit"), debit).unwrap();
        form.update_field(&cell("entries", row, "Credit"), credit).unwrap();
    }
    assert!(form.submit(&mut MemorySink::new()).is_ok());
}

#[test]
fn out_of_range_totals_fail_without_delivery() {
    let half = "50000000000000000000000000000";
    let mut form = filled("0");
    form.update_field(&cell("entries", 0, "Debit"), half).unwrap();
    form.update_field(&cell("entries", 1, "Debit"), half).unwrap();

    let mut sink = MemorySink::new();
    let err = form.submit(&mut sink).unwrap_err();
    assert!(matches!(err, SubmitError::Aggregate(_)));
    assert!(!err.is_blocking());
    assert!(sink.is_empty());
    assert_eq!(form.state().kind(), StateKind::Editing);
}
