//! Approval roles, opaque records and the terminal submitted state.

use docform_core::{EngineConfig, FormError, FormInstance, FormState, StateKind};
use docform_render::{Control, PlainTextRenderer, RenderMode};
use docform_store::StoreError;
use docform_test_utils::{budget_variance, open, scalar, MemorySink};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn role_names(form: &FormInstance) -> Vec<String> {
    form.store()
        .approvals()
        .roles()
        .iter()
        .map(|r| r.role_name.clone())
        .collect()
}

#[test]
fn approval_roles_are_open_ended() {
    let mut form = FormInstance::open(
        budget_variance(),
        EngineConfig::new().with_default_role("Reviewer"),
    )
    .unwrap();
    assert_eq!(role_names(&form), ["Prepared By", "Approved By"]);

    let added = form.add_role(None).unwrap();
    assert_eq!(added, 2);
    form.rename_role(added, "Finance Controller").unwrap();
    form.set_signature(1, json!({"strokes": [[0, 0], [4, 2]]})).unwrap();

    let removed = form.remove_role(0).unwrap();
    assert_eq!(removed.role_name, "Prepared By");
    assert_eq!(role_names(&form), ["Approved By", "Finance Controller"]);
    assert!(form.store().approvals().get(0).unwrap().is_signed());

    assert!(matches!(
        form.remove_role(5),
        Err(FormError::Store(StoreError::RoleOutOfRange { index: 5, len: 2 }))
    ));
}

#[test]
fn attachments_and_custom_fields_pass_through() {
    let mut form = open(budget_variance());
    form.add_attachment(json!({"name": "quote.pdf", "size": 1024})).unwrap();
    form.add_attachment(json!({"name": "photo.jpg"})).unwrap();
    form.remove_attachment(0).unwrap();
    form.add_custom_field(json!({"label": "Cost Centre", "value": "CC-7"})).unwrap();
    assert!(form.remove_custom_field(3).is_err());

    form.update_field(&scalar("Department"), "Stores").unwrap();
    let mut sink = MemorySink::new();
    let payload = form.submit(&mut sink).unwrap();
    assert_eq!(payload.attachments, [json!({"name": "photo.jpg"})]);
    assert_eq!(payload.custom_fields, [json!({"label": "Cost Centre", "value": "CC-7"})]);
}

#[test]
fn submitted_instance_is_frozen() {
    let mut form = open(budget_variance());
    form.update_field(&scalar("Department"), "Stores").unwrap();
    form.submit(&mut MemorySink::new()).unwrap();
    assert_eq!(form.state(), &FormState::Submitted);

    assert!(matches!(
        form.update_field(&scalar("Department"), "Ops"),
        Err(FormError::Submitted(_))
    ));
    assert!(matches!(form.rename_role(0, "x"), Err(FormError::Submitted(_))));
    assert!(matches!(
        form.add_attachment(json!({})),
        Err(FormError::Submitted(_))
    ));

    // viewing is still allowed
    let text = PlainTextRenderer::render(&form.view(RenderMode::Print));
    assert!(text.starts_with("Budget Variance Report\nDepartment: Stores\n"));
}

#[test]
fn print_settings_come_from_config() {
    let form = FormInstance::open(budget_variance(), EngineConfig::new().with_placeholder("--")).unwrap();
    let view = form.view(RenderMode::Print);
    assert_eq!(
        view.fields[0].control,
        Control::Frozen {
            text: "--".to_string()
        }
    );
    assert!(!view.add_role);
}

#[test]
fn repeated_blocked_attempts_stay_blocked() {
    let mut form = open(budget_variance());
    let mut sink = MemorySink::new();
    assert!(form.submit(&mut sink).is_err());
    assert!(form.submit(&mut sink).is_err());
    assert_eq!(form.state().kind(), StateKind::Blocked);
    assert_eq!(form.last_report().unwrap().messages(), ["Department: Department is required"]);
}

proptest! {
    #[test]
    fn removing_a_role_shifts_later_roles(extra in prop::collection::vec("[A-Z][a-z]{0,8}", 0..5), pick in 0usize..7) {
        let mut form = open(budget_variance());
        for name in &extra {
            form.add_role(Some(name.as_str())).unwrap();
        }
        let before = role_names(&form);
        let index = pick % before.len();

        let removed = form.remove_role(index).unwrap();
        let mut expected = before.clone();
        let gone = expected.remove(index);

        prop_assert_eq!(removed.role_name, gone);
        prop_assert_eq!(role_names(&form), expected);
    }
}
