//! Computation engine
//!
//! Holds the schema's derivations and their evaluation plan. Each trigger
//! runs the affected derivations in plan order against the live store, so
//! every operand is read after the edits that precede it.

use crate::error::ComputeError;
use crate::formula::evaluate;
use crate::numeric::format_fixed;
use docform_schema::{
    DependencyPlan, Derivation, DerivationScope, FieldTarget, FieldValue, FormSchema, SectionId,
};
use docform_store::{FieldPath, TableSection, ValueStore};

/// One derived value written by a recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Written value
    pub path: FieldPath,
    /// Value before the write
    pub old: FieldValue,
    /// Value after the write
    pub new: FieldValue,
}

/// Derivation evaluator for one schema
#[derive(Debug, Clone)]
pub struct ComputationEngine {
    derivations: Vec<Derivation>,
    plan: DependencyPlan,
}

impl ComputationEngine {
    /// Build the engine for `schema`
    ///
    /// # Errors
    /// Returns `Schema` if the derivations cannot be ordered
    pub fn new(schema: &FormSchema) -> Result<Self, ComputeError> {
        let plan = schema.plan()?;
        tracing::debug!(
            schema = %schema.id,
            derivations = schema.derivations.len(),
            "computation plan built"
        );
        Ok(Self {
            derivations: schema.derivations.clone(),
            plan,
        })
    }

    /// Derivations in declaration order
    #[inline]
    #[must_use]
    pub fn derivations(&self) -> &[Derivation] {
        &self.derivations
    }

    /// Whether `target` is written by a derivation
    #[inline]
    #[must_use]
    pub fn is_derived(&self, target: &FieldTarget) -> bool {
        self.plan.is_derived(target)
    }

    /// Recompute after the user finished editing the value at `path`
    ///
    /// # Errors
    /// Returns error if a derived value overflows or cannot be written
    pub fn on_commit(
        &self,
        store: &mut ValueStore,
        path: &FieldPath,
    ) -> Result<Vec<Change>, ComputeError> {
        let Some(target) = path.target() else {
            return Ok(Vec::new());
        };
        let row = match path {
            FieldPath::Cell { row, .. } => Some(*row),
            _ => None,
        };
        let affected = self.plan.affected_by(&target);
        self.run(store, &affected, row)
    }

    /// Recompute after a row was appended to `section` at index `row`
    ///
    /// Runs the section's row derivations for the new row, then its
    /// aggregates.
    ///
    /// # Errors
    /// Returns error if a derived value overflows or cannot be written
    pub fn on_row_added(
        &self,
        store: &mut ValueStore,
        section: &SectionId,
        row: usize,
    ) -> Result<Vec<Change>, ComputeError> {
        let in_section: Vec<usize> = self
            .plan
            .order()
            .iter()
            .copied()
            .filter(|&i| {
                matches!(&self.derivations[i].scope, DerivationScope::Row { section: s } if s == section)
            })
            .collect();
        let mut changes = self.run(store, &in_section, Some(row))?;
        changes.extend(self.on_rows_changed(store, section)?);
        Ok(changes)
    }

    /// Recompute the aggregates over `section` after rows were appended or removed
    ///
    /// # Errors
    /// Returns error if a derived value overflows or cannot be written
    pub fn on_rows_changed(
        &self,
        store: &mut ValueStore,
        section: &SectionId,
    ) -> Result<Vec<Change>, ComputeError> {
        let affected = self.plan.affected_by_rows(section, &self.derivations);
        self.run(store, &affected, None)
    }

    /// Settle every derivation over every row
    ///
    /// # Errors
    /// Returns error if a derived value overflows or cannot be written
    pub fn recompute_all(&self, store: &mut ValueStore) -> Result<Vec<Change>, ComputeError> {
        self.run(store, self.plan.order(), None)
    }

    /// Run `indices` in order; row derivations touch only `row` if given
    fn run(
        &self,
        store: &mut ValueStore,
        indices: &[usize],
        row: Option<usize>,
    ) -> Result<Vec<Change>, ComputeError> {
        let mut changes = Vec::new();
        for &i in indices {
            let derivation = &self.derivations[i];
            match &derivation.scope {
                DerivationScope::Scalar => {
                    let path = FieldPath::scalar(derivation.target.clone());
                    changes.extend(apply(store, derivation, path)?);
                }
                DerivationScope::Row { section } => {
                    let rows = match row {
                        Some(r) => r..r + 1,
                        None => 0..store.section(section).map_or(0, TableSection::len),
                    };
                    for r in rows {
                        let path = FieldPath::cell(section.clone(), r, derivation.target.clone());
                        changes.extend(apply(store, derivation, path)?);
                    }
                }
            }
        }
        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "derived values updated");
        }
        Ok(changes)
    }
}

/// Evaluate and write one derived value; `None` if it was already current
fn apply(
    store: &mut ValueStore,
    derivation: &Derivation,
    path: FieldPath,
) -> Result<Option<Change>, ComputeError> {
    let value = evaluate(derivation, store, &path)?;
    let new = FieldValue::text(format_fixed(value, derivation.precision));
    if store.get(&path) == Some(&new) {
        return Ok(None);
    }
    let old = store.set(&path, new.clone())?;
    tracing::debug!(%path, %old, %new, "derived value recomputed");
    Ok(Some(Change { path, old, new }))
}
