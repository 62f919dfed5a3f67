//! Value store
//!
//! The mutable snapshot of one form instance. Every mutation either applies
//! fully or returns an error before touching any value.

use crate::approval::ApprovalWorkflow;
use crate::error::StoreError;
use crate::path::FieldPath;
use crate::records::RecordList;
use crate::registry::DynamicColumn;
use crate::section::TableSection;
use docform_schema::{FieldKey, FieldValue, FormSchema, SectionId};
use indexmap::IndexMap;

/// Scalar values, table sections, approvals and opaque records of a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    scalars: IndexMap<FieldKey, FieldValue>,
    sections: IndexMap<SectionId, TableSection>,
    approvals: ApprovalWorkflow,
    attachments: RecordList,
    custom_fields: RecordList,
}

impl ValueStore {
    /// Seed a store from schema-declared initial values
    #[must_use]
    pub fn seed(schema: &FormSchema) -> Self {
        let scalars = schema
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.seed_value()))
            .collect();
        let sections = schema
            .sections
            .iter()
            .map(|s| (s.id.clone(), TableSection::from_schema(s)))
            .collect();

        Self {
            scalars,
            sections,
            approvals: ApprovalWorkflow::from_names(schema.approvals.iter().cloned()),
            attachments: RecordList::new(),
            custom_fields: RecordList::new(),
        }
    }

    /// Header values in declaration order
    #[inline]
    #[must_use]
    pub fn scalars(&self) -> &IndexMap<FieldKey, FieldValue> {
        &self.scalars
    }

    /// One header value
    #[inline]
    #[must_use]
    pub fn scalar(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.scalars.get(key)
    }

    /// Replace a header value, returning the old one
    ///
    /// # Errors
    /// Returns `UnknownField` if the form has no such header field
    pub fn set_scalar(&mut self, key: &FieldKey, value: FieldValue) -> Result<FieldValue, StoreError> {
        let slot = self
            .scalars
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownField(key.clone()))?;
        Ok(std::mem::replace(slot, value))
    }

    /// Table sections in declaration order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &IndexMap<SectionId, TableSection> {
        &self.sections
    }

    /// One table section
    #[inline]
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&TableSection> {
        self.sections.get(id)
    }

    /// One table section, mutably
    ///
    /// # Errors
    /// Returns `UnknownSection` if the form has no such section
    pub fn section_mut(&mut self, id: &SectionId) -> Result<&mut TableSection, StoreError> {
        self.sections
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSection(id.clone()))
    }

    /// Register a runtime column in `section`
    ///
    /// # Errors
    /// - `UnknownSection` if the form has no such section
    /// - any error of [`TableSection::add_column`]
    pub fn add_column(&mut self, section: &SectionId, label: &str) -> Result<DynamicColumn, StoreError> {
        self.section_mut(section)?.add_column(label)
    }

    /// Unregister a runtime column of `section`
    ///
    /// Removing a key that is not registered is a no-op returning `None`.
    ///
    /// # Errors
    /// Returns `UnknownSection` if the form has no such section
    pub fn remove_column(
        &mut self,
        section: &SectionId,
        key: &FieldKey,
    ) -> Result<Option<DynamicColumn>, StoreError> {
        Ok(self.section_mut(section)?.remove_column(key))
    }

    /// Read the value at `path`
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        match path {
            FieldPath::Scalar(key) => self.scalar(key),
            FieldPath::Cell {
                section,
                row,
                column,
            } => self.section(section).and_then(|s| s.cell(*row, column)),
            FieldPath::Section(_) => None,
        }
    }

    /// Write the value at `path`, returning the old one
    ///
    /// # Errors
    /// - `UnknownField`, `UnknownSection`, `RowOutOfRange`, `UnknownColumn`
    ///   when the path does not resolve
    /// - `NotAddressable` for a section path
    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<FieldValue, StoreError> {
        match path {
            FieldPath::Scalar(key) => self.set_scalar(key, value),
            FieldPath::Cell {
                section,
                row,
                column,
            } => self.section_mut(section)?.set_cell(*row, column, value),
            FieldPath::Section(_) => Err(StoreError::NotAddressable(path.clone())),
        }
    }

    /// Approval roles
    #[inline]
    #[must_use]
    pub fn approvals(&self) -> &ApprovalWorkflow {
        &self.approvals
    }

    /// Approval roles, mutably
    #[inline]
    pub fn approvals_mut(&mut self) -> &mut ApprovalWorkflow {
        &mut self.approvals
    }

    /// Attachment records
    #[inline]
    #[must_use]
    pub fn attachments(&self) -> &RecordList {
        &self.attachments
    }

    /// Attachment records, mutably
    #[inline]
    pub fn attachments_mut(&mut self) -> &mut RecordList {
        &mut self.attachments
    }

    /// Custom-field records
    #[inline]
    #[must_use]
    pub fn custom_fields(&self) -> &RecordList {
        &self.custom_fields
    }

    /// Custom-field records, mutably
    #[inline]
    pub fn custom_fields_mut(&mut self) -> &mut RecordList {
        &mut self.custom_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docform_schema::{FieldDefinition, FieldKind, TableSchema};
    use std::str::FromStr;

    fn schema() -> FormSchema {
        FormSchema::new("purchase-order", "Purchase Order")
            .with_field(FieldDefinition::new("PO Number", FieldKind::Text).unwrap())
            .with_field(
                FieldDefinition::new("Currency", FieldKind::select(["INR", "USD"]))
                    .unwrap()
                    .with_initial("INR"),
            )
            .with_field(FieldDefinition::new("Urgent", FieldKind::Checkbox).unwrap())
            .with_section(
                TableSchema::new("items")
                    .unwrap()
                    .with_column(FieldDefinition::new("Description", FieldKind::Text).unwrap())
                    .with_column(FieldDefinition::new("Qty", FieldKind::Number).unwrap()),
            )
            .with_approvals(["Prepared By", "Approved By"])
    }

    fn key(s: &str) -> FieldKey {
        FieldKey::from_str(s).unwrap()
    }

    fn items() -> SectionId {
        SectionId::from_str("items").unwrap()
    }

    #[test]
    fn seed_from_schema() {
        let store = ValueStore::seed(&schema());

        assert_eq!(store.scalar(&key("PONumber")), Some(&FieldValue::empty()));
        assert_eq!(store.scalar(&key("Currency")), Some(&FieldValue::text("INR")));
        assert_eq!(store.scalar(&key("Urgent")), Some(&FieldValue::Flag(false)));
        assert_eq!(store.section(&items()).map(TableSection::len), Some(1));
        assert_eq!(store.approvals().len(), 2);
        assert!(store.attachments().is_empty());
    }

    #[test]
    fn set_by_path() {
        let mut store = ValueStore::seed(&schema());
        let path = FieldPath::cell(items(), 0, key("Qty"));

        let old = store.set(&path, FieldValue::text("12")).unwrap();
        assert_eq!(old, FieldValue::empty());
        assert_eq!(store.get(&path), Some(&FieldValue::text("12")));
    }

    #[test]
    fn unknown_targets_rejected() {
        let mut store = ValueStore::seed(&schema());
        assert_eq!(
            store.set_scalar(&key("Nope"), FieldValue::empty()),
            Err(StoreError::UnknownField(key("Nope")))
        );
        let missing = SectionId::from_str("taxes").unwrap();
        assert_eq!(
            store.add_column(&missing, "Cess"),
            Err(StoreError::UnknownSection(missing))
        );
        assert!(matches!(
            store.set(&FieldPath::Section(items()), FieldValue::empty()),
            Err(StoreError::NotAddressable(_))
        ));
    }

    #[test]
    fn remove_unregistered_column_is_noop() {
        let mut store = ValueStore::seed(&schema());
        let before = store.clone();
        assert_eq!(store.remove_column(&items(), &key("Bin")), Ok(None));
        assert_eq!(store, before);
    }
}
