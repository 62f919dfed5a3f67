//! Testing utilities for Docform workspace
//!
//! Shared sample schemas, path helpers and an in-memory submission sink.

#![allow(missing_docs)]

use docform_core::{EngineConfig, FormInstance, SubmissionPayload, SubmissionSink};
use docform_schema::{FieldKey, FormSchema, SectionId};
use docform_store::FieldPath;
use std::str::FromStr;

pub const JOURNAL_YAML: &str = include_str!("../fixtures/journal.yaml");
pub const BUDGET_VARIANCE_YAML: &str = include_str!("../fixtures/budget_variance.yaml");
pub const STOCK_REGISTER_YAML: &str = include_str!("../fixtures/stock_register.yaml");
pub const RISK_REGISTER_YAML: &str = include_str!("../fixtures/risk_register.yaml");

/// Balanced-entry journal voucher with a fixed column set
pub fn journal() -> FormSchema {
    FormSchema::from_yaml(JOURNAL_YAML).unwrap()
}

/// Header-only variance report (`Variance = Actual − Budgeted`)
pub fn budget_variance() -> FormSchema {
    FormSchema::from_yaml(BUDGET_VARIANCE_YAML).unwrap()
}

/// Per-row closing stock plus a column total
pub fn stock_register() -> FormSchema {
    FormSchema::from_yaml(STOCK_REGISTER_YAML).unwrap()
}

/// Extensible risk table
pub fn risk_register() -> FormSchema {
    FormSchema::from_yaml(RISK_REGISTER_YAML).unwrap()
}

pub fn open(schema: FormSchema) -> FormInstance {
    FormInstance::open(schema, EngineConfig::default()).unwrap()
}

pub fn key(s: &str) -> FieldKey {
    FieldKey::from_str(s).unwrap()
}

pub fn section(s: &str) -> SectionId {
    SectionId::from_str(s).unwrap()
}

pub fn scalar(s: &str) -> FieldPath {
    FieldPath::scalar(key(s))
}

pub fn cell(section_id: &str, row: usize, column: &str) -> FieldPath {
    FieldPath::cell(section(section_id), row, key(column))
}

/// Sink that keeps every delivered payload
#[derive(Debug, Default)]
pub struct MemorySink {
    pub payloads: Vec<SubmissionPayload>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn last(&self) -> Option<&SubmissionPayload> {
        self.payloads.last()
    }
}

impl SubmissionSink for MemorySink {
    fn deliver(&mut self, payload: SubmissionPayload) {
        self.payloads.push(payload);
    }
}
