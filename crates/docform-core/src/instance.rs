//! Form instance
//!
//! [`FormInstance`] owns one live document: its schema, value store, derived
//! value engine, validators and lifecycle state. Every user action is a
//! method call that runs to completion, recomputation included, before the
//! next one.

use crate::dialog::{ColumnDialog, DialogOutcome};
use crate::error::{FormError, SubmitError};
use crate::state::{validate_transition, FormState, StateKind};
use crate::submission::{SubmissionPayload, SubmissionReport, SubmissionSink};
use crate::types::{EngineConfig, FormId};
use docform_compute::{Change, ComputationEngine};
use docform_render::{project, DocumentView, RenderMode};
use docform_schema::{FieldKey, FieldValue, FormSchema, SectionId};
use docform_store::{ApprovalRole, DynamicColumn, FieldPath, RowRecord, StoreError, ValueStore};
use docform_validate::{BalanceGuard, Validator};
use serde_json::Value;
use tracing::{debug, info, warn};

/// One live form
#[derive(Debug, Clone)]
pub struct FormInstance {
    id: FormId,
    schema: FormSchema,
    config: EngineConfig,
    store: ValueStore,
    engine: ComputationEngine,
    validator: Validator,
    guard: BalanceGuard,
    state: FormState,
    last_report: Option<SubmissionReport>,
}

impl FormInstance {
    /// Open a new instance of `schema`
    ///
    /// Checks the schema, seeds initial values and settles every derived
    /// value.
    ///
    /// # Errors
    /// Returns error if the schema fails its structural checks or its rules
    /// cannot be compiled
    pub fn open(schema: FormSchema, config: EngineConfig) -> Result<Self, FormError> {
        schema.check()?;
        let engine = ComputationEngine::new(&schema)?;
        let validator = Validator::new(&schema)?;
        let guard = BalanceGuard::new(schema.balance.clone()).with_tolerance(config.balance_tolerance);
        let mut store = ValueStore::seed(&schema);
        engine.recompute_all(&mut store)?;

        let id = FormId::new();
        info!(form = %id, schema = %schema.id, "form opened");

        Ok(Self {
            id,
            schema,
            config,
            store,
            engine,
            validator,
            guard,
            state: FormState::Editing,
            last_report: None,
        })
    }

    /// Instance ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> FormId {
        self.id
    }

    /// Schema this instance was opened from
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current values
    #[inline]
    #[must_use]
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Findings of the last failed submission attempt
    #[inline]
    #[must_use]
    pub fn last_report(&self) -> Option<&SubmissionReport> {
        self.last_report.as_ref()
    }

    /// Whether the instance has been submitted
    #[inline]
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.state.is_terminal()
    }

    /// Value at `path`
    #[must_use]
    pub fn value(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.store.get(path)
    }

    // --- editing ---

    /// Store user input at `path` without recomputing
    ///
    /// Call [`Self::commit_field`] when the user finishes editing the field.
    ///
    /// # Errors
    /// - `ReadOnly` if `path` is a derived value
    /// - `Store` if `path` does not resolve
    /// - `Submitted` after submission
    pub fn set_field(&mut self, path: &FieldPath, value: impl Into<FieldValue>) -> Result<FieldValue, FormError> {
        let value = value.into();
        self.edit(|form| form.write_field(path, value))
    }

    /// Recompute every value depending on `path`
    ///
    /// On failure every derived value keeps its previous text.
    ///
    /// # Errors
    /// - `Compute` if a derived value overflows
    /// - `Submitted` after submission
    pub fn commit_field(&mut self, path: &FieldPath) -> Result<Vec<Change>, FormError> {
        self.transact(|form| form.recompute(path))
    }

    /// Store user input at `path` and recompute its dependents
    ///
    /// If recomputation fails the input is discarded as well.
    ///
    /// # Errors
    /// See [`Self::set_field`] and [`Self::commit_field`]
    pub fn update_field(&mut self, path: &FieldPath, value: impl Into<FieldValue>) -> Result<Vec<Change>, FormError> {
        let value = value.into();
        self.transact(|form| {
            form.write_field(path, value)?;
            form.recompute(path)
        })
    }

    // --- rows and columns ---

    /// Append a row to `section`, returning its index
    ///
    /// The row is dropped again if settling its derived values fails.
    ///
    /// # Errors
    /// - `Store` if the section is unknown
    /// - `Compute` if a derived value overflows
    /// - `Submitted` after submission
    pub fn add_row(&mut self, section: &SectionId) -> Result<usize, FormError> {
        self.transact(|form| {
            let row = form.store.section_mut(section)?.add_row();
            form.engine.on_row_added(&mut form.store, section, row)?;
            Ok(row)
        })
    }

    /// Remove row `index` of `section`
    ///
    /// # Errors
    /// - `Store` if the section is unknown or `index` is out of range
    /// - `Compute` if a derived value overflows
    /// - `Submitted` after submission
    pub fn remove_row(&mut self, section: &SectionId, index: usize) -> Result<RowRecord, FormError> {
        self.transact(|form| {
            let removed = form.store.section_mut(section)?.remove_row(index)?;
            form.engine.on_rows_changed(&mut form.store, section)?;
            Ok(removed)
        })
    }

    /// Add a runtime column labelled `label` to `section`
    ///
    /// # Errors
    /// - `Store` if the label is blank or collides, or the section does not
    ///   accept columns
    /// - `Submitted` after submission
    pub fn add_column(&mut self, section: &SectionId, label: &str) -> Result<DynamicColumn, FormError> {
        self.edit(|form| Ok(form.store.add_column(section, label)?))
    }

    /// Remove runtime column `key` from `section`
    ///
    /// Returns `None` if `key` is not a runtime column.
    ///
    /// # Errors
    /// - `Store` if the section is unknown
    /// - `Submitted` after submission
    pub fn remove_column(&mut self, section: &SectionId, key: &FieldKey) -> Result<Option<DynamicColumn>, FormError> {
        self.edit(|form| Ok(form.store.remove_column(section, key)?))
    }

    /// Start naming a new column of `section`
    ///
    /// # Errors
    /// - `Store` if the section is unknown or does not accept columns
    /// - `Submitted` after submission
    pub fn begin_column(&self, section: &SectionId) -> Result<ColumnDialog, FormError> {
        self.ensure_open()?;
        let live = self
            .store
            .section(section)
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))?;
        if !live.is_extensible() {
            return Err(StoreError::ColumnsFixed(section.clone()).into());
        }

        let mut taken: Vec<FieldKey> = self
            .schema
            .section(section)
            .map(|table| table.columns.iter().map(|c| c.key.clone()).collect())
            .unwrap_or_default();
        taken.extend(live.registry().keys().cloned());
        Ok(ColumnDialog::new(section.clone(), taken))
    }

    /// Close a column dialog
    ///
    /// A confirmed dialog adds the column; a cancelled one changes nothing
    /// and returns `None`.
    ///
    /// # Errors
    /// See [`Self::add_column`]
    pub fn finish_column(
        &mut self,
        dialog: ColumnDialog,
        outcome: DialogOutcome,
    ) -> Result<Option<DynamicColumn>, FormError> {
        match outcome {
            DialogOutcome::Cancelled => {
                debug!(form = %self.id, section = %dialog.section(), "column dialog cancelled");
                Ok(None)
            }
            DialogOutcome::Confirmed => self.add_column(dialog.section(), dialog.label()).map(Some),
        }
    }

    // --- approvals ---

    /// Append an approval role, returning its index
    ///
    /// `None` uses the configured default role name.
    ///
    /// # Errors
    /// Returns `Submitted` after submission
    pub fn add_role(&mut self, name: Option<&str>) -> Result<usize, FormError> {
        self.edit(|form| {
            let name = name.map_or_else(|| form.config.default_role_name.clone(), str::to_string);
            Ok(form.store.approvals_mut().add_role(name))
        })
    }

    /// Remove approval role `index`; later roles shift down
    ///
    /// # Errors
    /// - `Store` if `index` is out of range
    /// - `Submitted` after submission
    pub fn remove_role(&mut self, index: usize) -> Result<ApprovalRole, FormError> {
        self.edit(|form| Ok(form.store.approvals_mut().remove_role(index)?))
    }

    /// Rename approval role `index`, returning the old name
    ///
    /// # Errors
    /// - `Store` if `index` is out of range
    /// - `Submitted` after submission
    pub fn rename_role(&mut self, index: usize, name: impl Into<String>) -> Result<String, FormError> {
        let name = name.into();
        self.edit(|form| Ok(form.store.approvals_mut().rename_role(index, name)?))
    }

    /// Store the signature payload of role `index`, returning the old one
    ///
    /// # Errors
    /// - `Store` if `index` is out of range
    /// - `Submitted` after submission
    pub fn set_signature(&mut self, index: usize, payload: Value) -> Result<Value, FormError> {
        self.edit(|form| Ok(form.store.approvals_mut().set_signature(index, payload)?))
    }

    // --- opaque records ---

    /// Append an attachment record, returning its index
    ///
    /// # Errors
    /// Returns `Submitted` after submission
    pub fn add_attachment(&mut self, record: Value) -> Result<usize, FormError> {
        self.edit(|form| Ok(form.store.attachments_mut().push(record)))
    }

    /// Remove attachment record `index`
    ///
    /// # Errors
    /// - `Store` if `index` is out of range
    /// - `Submitted` after submission
    pub fn remove_attachment(&mut self, index: usize) -> Result<Value, FormError> {
        self.edit(|form| Ok(form.store.attachments_mut().remove(index)?))
    }

    /// Append a custom-field record, returning its index
    ///
    /// # Errors
    /// Returns `Submitted` after submission
    pub fn add_custom_field(&mut self, record: Value) -> Result<usize, FormError> {
        self.edit(|form| Ok(form.store.custom_fields_mut().push(record)))
    }

    /// Remove custom-field record `index`
    ///
    /// # Errors
    /// - `Store` if `index` is out of range
    /// - `Submitted` after submission
    pub fn remove_custom_field(&mut self, index: usize) -> Result<Value, FormError> {
        self.edit(|form| Ok(form.store.custom_fields_mut().remove(index)?))
    }

    // --- rendering and submission ---

    /// Project the instance for rendering in `mode`
    ///
    /// Inline messages from the last failed submission are included in
    /// edit mode.
    #[must_use]
    pub fn view(&self, mode: RenderMode) -> DocumentView {
        let ctx = self.config.render_context(mode);
        let report = self.last_report.as_ref().map(|r| &r.validation);
        project(&ctx, &self.schema, &self.store, report)
    }

    /// Settle, check and hand the instance to `sink`
    ///
    /// On failure nothing is delivered, entered values are kept and the
    /// findings stay available through [`Self::last_report`].
    ///
    /// # Errors
    /// - `Blocked` if validation or a balance guard fails
    /// - `AlreadySubmitted` after submission
    /// - `Compute` if a derived value overflows
    /// - `Aggregate` if a balance total overflows
    pub fn submit<S>(&mut self, sink: &mut S) -> Result<SubmissionPayload, SubmitError>
    where
        S: SubmissionSink + ?Sized,
    {
        if self.state.is_terminal() {
            return Err(SubmitError::AlreadySubmitted(self.id));
        }

        self.engine.recompute_all(&mut self.store)?;
        let report = SubmissionReport {
            validation: self.validator.validate(&self.store),
            imbalances: self.guard.check(&self.store)?,
        };

        if !report.is_clear() {
            validate_transition(self.state.kind(), StateKind::Blocked)?;
            warn!(
                form = %self.id,
                errors = report.validation.len(),
                imbalances = report.imbalances.len(),
                "submission blocked"
            );
            self.state = FormState::Blocked(report.clone());
            self.last_report = Some(report.clone());
            return Err(SubmitError::Blocked(report));
        }

        validate_transition(self.state.kind(), StateKind::Submitted)?;
        let payload = SubmissionPayload::collect(self.id, self.schema.id.clone(), &self.store);
        self.state = FormState::Submitted;
        self.last_report = None;
        sink.deliver(payload.clone());
        info!(form = %self.id, schema = %self.schema.id, "submission accepted");
        Ok(payload)
    }

    /// Run a store mutation that either applies fully or fails unchanged
    ///
    /// A blocked instance returns to `Editing` only once `op` succeeds.
    fn edit<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T, FormError>) -> Result<T, FormError> {
        self.begin_mutation()?;
        let out = op(self)?;
        self.resume_editing();
        Ok(out)
    }

    /// Like [`Self::edit`], restoring every value if `op` fails part way
    fn transact<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T, FormError>) -> Result<T, FormError> {
        self.begin_mutation()?;
        let snapshot = self.store.clone();
        match op(self) {
            Ok(out) => {
                self.resume_editing();
                Ok(out)
            }
            Err(err) => {
                self.store = snapshot;
                debug!(form = %self.id, error = %err, "change rolled back");
                Err(err)
            }
        }
    }

    /// Reject writes after submission
    fn begin_mutation(&self) -> Result<(), FormError> {
        self.ensure_open()?;
        if matches!(self.state, FormState::Blocked(_)) {
            validate_transition(self.state.kind(), StateKind::Editing)?;
        }
        Ok(())
    }

    fn resume_editing(&mut self) {
        if matches!(self.state, FormState::Blocked(_)) {
            debug!(form = %self.id, "editing resumed");
            self.state = FormState::Editing;
        }
    }

    fn write_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<FieldValue, FormError> {
        self.ensure_writable(path)?;
        Ok(self.store.set(path, value)?)
    }

    fn recompute(&mut self, path: &FieldPath) -> Result<Vec<Change>, FormError> {
        Ok(self.engine.on_commit(&mut self.store, path)?)
    }

    fn ensure_open(&self) -> Result<(), FormError> {
        if self.state.is_terminal() {
            return Err(FormError::Submitted(self.id));
        }
        Ok(())
    }

    fn ensure_writable(&self, path: &FieldPath) -> Result<(), FormError> {
        match path.target() {
            Some(target) if self.engine.is_derived(&target) => Err(FormError::ReadOnly(path.clone())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docform_schema::{Derivation, FieldDefinition, FieldKind, Formula, TableSchema};
    use std::str::FromStr;

    fn key(s: &str) -> FieldKey {
        FieldKey::from_str(s).unwrap()
    }

    fn scalar(s: &str) -> FieldPath {
        FieldPath::scalar(key(s))
    }

    fn budget() -> FormSchema {
        FormSchema::new("budget-variance", "Budget Variance")
            .with_field(FieldDefinition::new("Department", FieldKind::Text).unwrap().required())
            .with_field(FieldDefinition::new("Budgeted", FieldKind::Number).unwrap())
            .with_field(FieldDefinition::new("Actual", FieldKind::Number).unwrap())
            .with_field(FieldDefinition::new("Variance", FieldKind::Number).unwrap())
            .with_derivation(Derivation::scalar(
                key("Variance"),
                Formula::Difference {
                    minuend: key("Actual"),
                    subtrahend: key("Budgeted"),
                },
            ))
            .with_section(
                TableSchema::new("lines")
                    .unwrap()
                    .with_column(FieldDefinition::new("Item", FieldKind::Text).unwrap()),
            )
            .with_approvals(["Prepared By"])
    }

    fn open() -> FormInstance {
        FormInstance::open(budget(), EngineConfig::default()).unwrap()
    }

    const HALF_RANGE: &str = "50000000000000000000000000000";

    fn lines() -> SectionId {
        SectionId::from_str("lines").unwrap()
    }

    fn amount(row: usize) -> FieldPath {
        FieldPath::cell(lines(), row, key("Amount"))
    }

    /// Ledger whose `Total` sums `Amount`; each new row starts at `seed`
    fn ledger(seed: &str) -> FormInstance {
        let schema = FormSchema::new("ledger", "Ledger")
            .with_field(FieldDefinition::new("Reference", FieldKind::Text).unwrap().required())
            .with_field(FieldDefinition::new("Total", FieldKind::Number).unwrap())
            .with_section(
                TableSchema::new("lines").unwrap().with_column(
                    FieldDefinition::new("Amount", FieldKind::Number)
                        .unwrap()
                        .with_initial(seed),
                ),
            )
            .with_derivation(Derivation::scalar(
                key("Total"),
                Formula::ColumnTotal {
                    section: lines(),
                    column: key("Amount"),
                },
            ));
        FormInstance::open(schema, EngineConfig::default()).unwrap()
    }

    #[test]
    fn commit_recomputes_dependents() {
        let mut form = open();
        form.update_field(&scalar("Budgeted"), FieldValue::text("200")).unwrap();
        let changes = form.update_field(&scalar("Actual"), FieldValue::text("250")).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(form.value(&scalar("Variance")), Some(&FieldValue::text("50.00")));
    }

    #[test]
    fn set_without_commit_defers_recompute() {
        let mut form = open();
        form.set_field(&scalar("Actual"), FieldValue::text("10")).unwrap();
        assert_eq!(form.value(&scalar("Variance")), Some(&FieldValue::text("0.00")));
        form.commit_field(&scalar("Actual")).unwrap();
        assert_eq!(form.value(&scalar("Variance")), Some(&FieldValue::text("10.00")));
    }

    #[test]
    fn derived_fields_are_read_only() {
        let mut form = open();
        let err = form.set_field(&scalar("Variance"), FieldValue::text("1")).unwrap_err();
        assert!(matches!(err, FormError::ReadOnly(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn add_role_uses_default_name() {
        let mut form = open();
        let index = form.add_role(None).unwrap();
        assert_eq!(form.store().approvals().get(index).unwrap().role_name, "Approver");
        let named = form.add_role(Some("Finance Head")).unwrap();
        assert_eq!(form.store().approvals().get(named).unwrap().role_name, "Finance Head");
    }

    #[test]
    fn blocked_then_edit_resumes() {
        let mut form = open();
        let mut sink: Vec<SubmissionPayload> = Vec::new();

        let err = form.submit(&mut sink).unwrap_err();
        assert!(err.is_blocking());
        assert_eq!(form.state().kind(), StateKind::Blocked);
        assert!(sink.is_empty());

        form.set_field(&scalar("Department"), FieldValue::text("Ops")).unwrap();
        assert_eq!(form.state().kind(), StateKind::Editing);
        assert!(form.last_report().is_some());

        form.submit(&mut sink).unwrap();
        assert!(form.is_submitted());
        assert!(form.last_report().is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn submitted_rejects_mutation() {
        let mut form = open();
        form.update_field(&scalar("Department"), FieldValue::text("Ops")).unwrap();
        form.submit(&mut Vec::<SubmissionPayload>::new()).unwrap();

        let lines = SectionId::from_str("lines").unwrap();
        assert!(matches!(form.add_row(&lines), Err(FormError::Submitted(_))));
        assert!(matches!(form.add_role(None), Err(FormError::Submitted(_))));
        assert!(matches!(form.begin_column(&lines), Err(FormError::Submitted(_))));
        assert!(matches!(
            form.submit(&mut Vec::<SubmissionPayload>::new()),
            Err(SubmitError::AlreadySubmitted(_))
        ));
    }

    #[test]
    fn cancelled_dialog_changes_nothing() {
        let mut form = open();
        let lines = SectionId::from_str("lines").unwrap();
        let mut dialog = form.begin_column(&lines).unwrap();
        dialog.set_label("Cost Centre");
        assert_eq!(form.finish_column(dialog, DialogOutcome::Cancelled).unwrap(), None);
        assert!(form.store().section(&lines).unwrap().registry().is_empty());
    }

    #[test]
    fn unknown_section_rejected() {
        let form = open();
        let err = form.begin_column(&SectionId::from_str("missing").unwrap()).unwrap_err();
        assert!(matches!(err, FormError::Store(StoreError::UnknownSection(_))));
    }

    #[test]
    fn rejected_edits_keep_blocked_state() {
        let mut form = open();
        assert!(form.submit(&mut Vec::<SubmissionPayload>::new()).is_err());

        let err = form.remove_row(&lines(), 9).unwrap_err();
        assert!(matches!(
            err,
            FormError::Store(StoreError::RowOutOfRange { index: 9, .. })
        ));
        assert!(form.add_row(&SectionId::from_str("missing").unwrap()).is_err());
        assert!(form.set_field(&scalar("Variance"), FieldValue::text("1")).is_err());
        assert!(form.rename_role(4, "Auditor").is_err());

        assert_eq!(form.state().kind(), StateKind::Blocked);
        assert_eq!(form.store().section(&lines()).unwrap().len(), 1);
        assert!(form.last_report().is_some());
    }

    #[test]
    fn overflowing_row_is_dropped() {
        let mut form = ledger(HALF_RANGE);
        assert!(form.submit(&mut Vec::<SubmissionPayload>::new()).is_err());
        let total = form.value(&scalar("Total")).cloned();

        let err = form.add_row(&lines()).unwrap_err();
        assert!(matches!(err, FormError::Compute(_)));
        assert_eq!(form.store().section(&lines()).unwrap().len(), 1);
        assert_eq!(form.value(&scalar("Total")).cloned(), total);
        assert_eq!(form.state().kind(), StateKind::Blocked);
    }

    #[test]
    fn overflowing_input_is_discarded() {
        let mut form = ledger("");
        form.update_field(&amount(0), FieldValue::text(HALF_RANGE)).unwrap();
        let row = form.add_row(&lines()).unwrap();
        let total = form.value(&scalar("Total")).cloned();

        assert!(form.update_field(&amount(row), FieldValue::text(HALF_RANGE)).is_err());
        assert_eq!(form.value(&amount(row)), Some(&FieldValue::empty()));
        assert_eq!(form.value(&scalar("Total")).cloned(), total);

        form.update_field(&amount(row), FieldValue::text("5")).unwrap();
        assert_eq!(form.state().kind(), StateKind::Editing);
    }
}
