//! Submission handoff
//!
//! A payload is assembled only after recomputation has settled and every
//! check passed. Delivery is fire-and-forget: the sink's outcome never flows
//! back into the engine.

use crate::types::FormId;
use docform_schema::{FieldKey, FieldValue, SectionId};
use docform_store::{ApprovalRole, DynamicColumn, RowRecord, ValueStore};
use docform_validate::{AggregateImbalance, ValidationReport};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Findings of one submission attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    /// Field-scoped validation messages
    pub validation: ValidationReport,
    /// Failed balance guards
    pub imbalances: Vec<AggregateImbalance>,
}

impl SubmissionReport {
    /// Whether nothing blocks submission
    #[inline]
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.validation.is_valid() && self.imbalances.is_empty()
    }

    /// Every message, field errors first
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.validation
            .errors()
            .iter()
            .map(ToString::to_string)
            .chain(self.imbalances.iter().map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for SubmissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} field error(s), {} imbalance(s)",
            self.validation.len(),
            self.imbalances.len()
        )
    }
}

/// Document handed to the storage collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Submitted instance
    pub form_id: FormId,
    /// Schema the instance was built from
    pub schema_id: String,
    /// Header values in declaration order
    pub fields: IndexMap<FieldKey, FieldValue>,
    /// Rows per section
    pub sections: IndexMap<SectionId, Vec<RowRecord>>,
    /// Labels of runtime columns per section
    pub dynamic_columns: IndexMap<SectionId, Vec<DynamicColumn>>,
    /// Approval roles in order
    pub approvals: Vec<ApprovalRole>,
    /// Opaque attachment records
    pub attachments: Vec<Value>,
    /// Opaque custom-field records
    pub custom_fields: Vec<Value>,
}

impl SubmissionPayload {
    /// Snapshot of `store`
    #[must_use]
    pub fn collect(form_id: FormId, schema_id: impl Into<String>, store: &ValueStore) -> Self {
        let sections = store
            .sections()
            .iter()
            .map(|(id, section)| (id.clone(), section.rows().to_vec()))
            .collect();
        let dynamic_columns = store
            .sections()
            .iter()
            .filter(|(_, section)| !section.registry().is_empty())
            .map(|(id, section)| (id.clone(), section.registry().columns().to_vec()))
            .collect();

        Self {
            form_id,
            schema_id: schema_id.into(),
            fields: store.scalars().clone(),
            sections,
            dynamic_columns,
            approvals: store.approvals().roles().to_vec(),
            attachments: store.attachments().as_slice().to_vec(),
            custom_fields: store.custom_fields().as_slice().to_vec(),
        }
    }
}

/// Receiver of accepted submissions
pub trait SubmissionSink {
    /// Take ownership of an accepted payload
    fn deliver(&mut self, payload: SubmissionPayload);
}

impl SubmissionSink for Vec<SubmissionPayload> {
    fn deliver(&mut self, payload: SubmissionPayload) {
        self.push(payload);
    }
}
