//! Derived values follow live inputs on every trigger.

use docform_core::FormError;
use docform_render::{Control, RenderMode};
use docform_schema::FieldValue;
use docform_test_utils::{budget_variance, cell, open, scalar, section, stock_register};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn text(form: &docform_core::FormInstance, path: &docform_store::FieldPath) -> String {
    form.value(path)
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
        .to_string()
}

#[test]
fn variance_tracks_both_operands() {
    let mut form = open(budget_variance());
    form.update_field(&scalar("BudgetedAmount"), "200").unwrap();
    form.update_field(&scalar("ActualAmount"), "250").unwrap();
    assert_eq!(text(&form, &scalar("Variance")), "50.00");

    form.update_field(&scalar("ActualAmount"), "180").unwrap();
    assert_eq!(text(&form, &scalar("Variance")), "-20.00");

    form.update_field(&scalar("BudgetedAmount"), "1,000").unwrap();
    assert_eq!(text(&form, &scalar("Variance")), "-820.00");
}

#[test]
fn non_numeric_input_counts_as_zero() {
    let mut form = open(budget_variance());
    form.update_field(&scalar("BudgetedAmount"), "abc").unwrap();
    form.update_field(&scalar("ActualAmount"), "75.5").unwrap();
    assert_eq!(text(&form, &scalar("Variance")), "75.50");
}

#[test]
fn derived_value_renders_computed_then_frozen() {
    let mut form = open(budget_variance());
    form.update_field(&scalar("ActualAmount"), "12").unwrap();

    let edit = form.view(RenderMode::Edit);
    let variance = edit.fields.iter().find(|f| f.path == scalar("Variance")).unwrap();
    assert_eq!(
        variance.control,
        Control::Computed {
            text: "12.00".to_string()
        }
    );

    let print = form.view(RenderMode::Print);
    let variance = print.fields.iter().find(|f| f.path == scalar("Variance")).unwrap();
    assert_eq!(
        variance.control,
        Control::Frozen {
            text: "12.00".to_string()
        }
    );
}

#[test]
fn closing_stock_and_total_follow_rows() {
    let mut form = open(stock_register());
    let stock = section("stock");
    for (column, value) in [("Item", "Cement"), ("Opening", "10"), ("Received", "5"), ("Adjusted", "1"), ("Issued", "3")] {
        form.update_field(&cell("stock", 0, column), value).unwrap();
    }
    assert_eq!(text(&form, &cell("stock", 0, "Closing")), "13.00");
    assert_eq!(text(&form, &scalar("TotalClosing")), "13.00");

    let row = form.add_row(&stock).unwrap();
    assert_eq!(text(&form, &cell("stock", row, "Closing")), "0.00");
    form.update_field(&cell("stock", row, "Opening"), "7").unwrap();
    assert_eq!(text(&form, &scalar("TotalClosing")), "20.00");

    form.remove_row(&stock, 0).unwrap();
    assert_eq!(text(&form, &scalar("TotalClosing")), "7.00");
}

#[test]
fn derived_cells_refuse_input() {
    let mut form = open(stock_register());
    let err = form
        .update_field(&cell("stock", 0, "Closing"), "99")
        .unwrap_err();
    assert!(matches!(err, FormError::ReadOnly(_)));
    assert_eq!(text(&form, &cell("stock", 0, "Closing")), "0.00");
    assert!(form.value(&cell("stock", 0, "Missing")).is_none());
    assert!(form.set_field(&cell("stock", 0, "Missing"), "1").is_err());
}

proptest! {
    #[test]
    fn total_matches_sum_of_closings(rows in prop::collection::vec((0u32..1000, 0u32..1000, 0u32..1000), 1..6)) {
        let mut form = open(stock_register());
        let stock = section("stock");
        let mut expected: i64 = 0;
        for (index, (opening, received, issued)) in rows.iter().enumerate() {
            if index > 0 {
                form.add_row(&stock).unwrap();
            }
            form.update_field(&cell("stock", index, "Opening"), opening.to_string()).unwrap();
            form.update_field(&cell("stock", index, "Received"), received.to_string()).unwrap();
            form.update_field(&cell("stock", index, "Issued"), issued.to_string()).unwrap();
            expected += i64::from(*opening) + i64::from(*received) - i64::from(*issued);
        }
        prop_assert_eq!(text(&form, &scalar("TotalClosing")), format!("{expected}.00"));
    }
}
