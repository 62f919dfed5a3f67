//! Form schema aggregate
//!
//! A [`FormSchema`] is pure data: header fields, table sections, validation
//! rules, derivations, balance guards and the initial approval roles.

use crate::deps::DependencyPlan;
use crate::derivation::{Derivation, DerivationScope, Formula};
use crate::error::SchemaError;
use crate::field::{FieldDefinition, FieldKind};
use crate::key::{FieldKey, SectionId};
use crate::rule::{BalanceRule, FieldTarget, ValidationRule};
use crate::table::{TableSchema, DYNAMIC_FIELDS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Static declaration of one business form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Schema identifier (stable across versions of the same form)
    pub id: String,
    /// Document title
    pub title: String,
    /// Header fields in display order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Repeatable table sections in display order
    #[serde(default)]
    pub sections: Vec<TableSchema>,
    /// Explicit validation rules
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
    /// Derived fields
    #[serde(default)]
    pub derivations: Vec<Derivation>,
    /// Submission-time balance guards
    #[serde(default)]
    pub balance: Vec<BalanceRule>,
    /// Approval roles present when the form opens
    #[serde(default)]
    pub approvals: Vec<String>,
}

impl FormSchema {
    /// Create an empty schema
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
            sections: Vec::new(),
            rules: Vec::new(),
            derivations: Vec::new(),
            balance: Vec::new(),
            approvals: Vec::new(),
        }
    }

    /// Parse from JSON and run structural checks
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the schema fails [`FormSchema::check`]
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Self = serde_json::from_str(json)?;
        schema.check()?;
        schema.log_loaded();
        Ok(schema)
    }

    /// Parse from YAML and run structural checks
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the schema fails [`FormSchema::check`]
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: Self = serde_yaml::from_str(yaml)?;
        schema.check()?;
        schema.log_loaded();
        Ok(schema)
    }

    /// Append a header field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a table section
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: TableSchema) -> Self {
        self.sections.push(section);
        self
    }

    /// Append a validation rule
    #[inline]
    #[must_use]
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a derivation
    #[inline]
    #[must_use]
    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivations.push(derivation);
        self
    }

    /// Append a balance guard
    #[inline]
    #[must_use]
    pub fn with_balance(mut self, rule: BalanceRule) -> Self {
        self.balance.push(rule);
        self
    }

    /// Set the initial approval roles
    #[must_use]
    pub fn with_approvals<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.approvals = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a header field
    #[must_use]
    pub fn field(&self, key: &FieldKey) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| &f.key == key)
    }

    /// Look up a table section
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&TableSchema> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Definition behind a field address
    #[must_use]
    pub fn definition(&self, target: &FieldTarget) -> Option<&FieldDefinition> {
        match target {
            FieldTarget::Scalar(key) => self.field(key),
            FieldTarget::Column { section, column } => {
                self.section(section).and_then(|s| s.column(column))
            }
        }
    }

    /// Whether some derivation writes `target`
    #[must_use]
    pub fn is_derived(&self, target: &FieldTarget) -> bool {
        self.derivations.iter().any(|d| &d.output() == target)
    }

    /// Build the derivation evaluation plan
    ///
    /// # Errors
    /// Returns error on duplicate, self-referential or cyclic derivations
    pub fn plan(&self) -> Result<DependencyPlan, SchemaError> {
        DependencyPlan::build(&self.derivations)
    }

    /// Verify structural consistency
    ///
    /// # Errors
    /// Returns the first violation found
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(&field.key) {
                return Err(SchemaError::DuplicateField(field.key.clone()));
            }
            check_options(field)?;
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(&section.id) {
                return Err(SchemaError::DuplicateSection(section.id.clone()));
            }
            let mut columns = HashSet::new();
            for column in &section.columns {
                if !columns.insert(&column.key) {
                    return Err(SchemaError::DuplicateColumn {
                        section: section.id.clone(),
                        column: column.key.clone(),
                    });
                }
                if column.key.as_str() == DYNAMIC_FIELDS_KEY {
                    return Err(SchemaError::ReservedColumnKey {
                        section: section.id.clone(),
                        column: column.key.clone(),
                    });
                }
                check_options(column)?;
            }
        }

        for rule in &self.rules {
            if let Some(target) = rule.target() {
                self.require(target)?;
            } else if let Some(section) = rule.section() {
                self.require_section(section)?;
            }
        }

        for derivation in &self.derivations {
            if derivation.formula.is_aggregate()
                && matches!(derivation.scope, DerivationScope::Row { .. })
            {
                return Err(SchemaError::AggregateInRowScope(derivation.target.clone()));
            }
            if let Formula::ColumnTotal { section, .. } = &derivation.formula {
                self.require_section(section)?;
            }
            if let DerivationScope::Row { section } = &derivation.scope {
                self.require_section(section)?;
            }
            self.require(&derivation.output())?;
            for input in derivation.inputs() {
                self.require(&input)?;
            }
        }

        for guard in &self.balance {
            self.require(&FieldTarget::column(guard.section.clone(), guard.debit.clone()))?;
            self.require(&FieldTarget::column(guard.section.clone(), guard.credit.clone()))?;
        }

        self.plan().map(|_| ())
    }

    fn log_loaded(&self) {
        debug!(
            schema = %self.id,
            fields = self.fields.len(),
            sections = self.sections.len(),
            derivations = self.derivations.len(),
            "schema loaded"
        );
    }

    fn require(&self, target: &FieldTarget) -> Result<(), SchemaError> {
        if let Some(section) = target.section() {
            self.require_section(section)?;
        }
        if self.definition(target).is_none() {
            return Err(SchemaError::UnknownField(target.clone()));
        }
        Ok(())
    }

    fn require_section(&self, id: &SectionId) -> Result<(), SchemaError> {
        if self.section(id).is_none() {
            return Err(SchemaError::UnknownSection(id.clone()));
        }
        Ok(())
    }
}

fn check_options(field: &FieldDefinition) -> Result<(), SchemaError> {
    let FieldKind::Select { options } = &field.kind else {
        return Ok(());
    };
    if options.is_empty() {
        return Err(SchemaError::EmptyOptions(field.key.clone()));
    }
    if let Some(initial) = field.initial.as_ref().and_then(|v| v.as_text()) {
        if !initial.is_empty() && !options.iter().any(|o| o.value == initial) {
            return Err(SchemaError::InitialNotAnOption {
                field: field.key.clone(),
                value: initial.to_string(),
            });
        }
    }
    Ok(())
}
