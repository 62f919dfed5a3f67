//! Derivation dependency planning
//!
//! Builds a DAG from every derivation input to its output and fixes one
//! evaluation order for the whole schema. Recomputation after an edit runs the
//! derivations downstream of the edited field in that order.

use crate::derivation::{Derivation, Formula};
use crate::error::SchemaError;
use crate::key::SectionId;
use crate::rule::FieldTarget;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::HashMap;

/// Evaluation plan over a schema's derivations
#[derive(Debug, Clone)]
pub struct DependencyPlan {
    nodes: Vec<FieldTarget>,
    index: HashMap<FieldTarget, usize>,
    graph: DiGraphMap<usize, ()>,
    /// node -> derivation writing it
    producers: HashMap<usize, usize>,
    /// derivation indices in evaluation order
    order: Vec<usize>,
    /// derivation index -> position in `order`
    rank: HashMap<usize, usize>,
}

impl DependencyPlan {
    /// Build the plan
    ///
    /// # Errors
    /// - `DuplicateDerivation` if two derivations write the same field
    /// - `SelfReferentialDerivation` if a derivation reads its own output
    /// - `DerivationCycle` if derivations depend on each other in a loop
    pub fn build(derivations: &[Derivation]) -> Result<Self, SchemaError> {
        let mut plan = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            graph: DiGraphMap::new(),
            producers: HashMap::new(),
            order: Vec::new(),
            rank: HashMap::new(),
        };

        for (i, derivation) in derivations.iter().enumerate() {
            let output = derivation.output();
            let out = plan.intern(output.clone());
            if plan.producers.insert(out, i).is_some() {
                return Err(SchemaError::DuplicateDerivation(output));
            }
            for input in derivation.inputs() {
                if input == output {
                    return Err(SchemaError::SelfReferentialDerivation(output));
                }
                let from = plan.intern(input);
                plan.graph.add_edge(from, out, ());
            }
        }

        let sorted = toposort(&plan.graph, None)
            .map_err(|cycle| SchemaError::DerivationCycle(plan.nodes[cycle.node_id()].clone()))?;

        plan.order = sorted
            .into_iter()
            .filter_map(|node| plan.producers.get(&node).copied())
            .collect();
        plan.rank = plan
            .order
            .iter()
            .enumerate()
            .map(|(pos, &derivation)| (derivation, pos))
            .collect();

        Ok(plan)
    }

    /// Every derivation in evaluation order
    #[inline]
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Whether a derivation writes `target`
    #[must_use]
    pub fn is_derived(&self, target: &FieldTarget) -> bool {
        self.index
            .get(target)
            .is_some_and(|node| self.producers.contains_key(node))
    }

    /// Derivations to rerun after `target` changed, in evaluation order
    ///
    /// The derivation writing `target` itself is not included.
    #[must_use]
    pub fn affected_by(&self, target: &FieldTarget) -> Vec<usize> {
        match self.index.get(target) {
            Some(&node) => self.downstream([node]),
            None => Vec::new(),
        }
    }

    /// Column totals over `section` and everything depending on them
    ///
    /// This is what reruns when rows are appended or removed.
    #[must_use]
    pub fn affected_by_rows(&self, section: &SectionId, derivations: &[Derivation]) -> Vec<usize> {
        let starts: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, target)| target.section() == Some(section))
            .filter(|(node, _)| {
                self.graph
                    .neighbors(*node)
                    .filter_map(|out| self.producers.get(&out))
                    .any(|&d| {
                        matches!(&derivations[d].formula, Formula::ColumnTotal { section: s, .. } if s == section)
                    })
            })
            .map(|(node, _)| node)
            .collect();

        self.downstream(starts)
    }

    fn downstream(&self, starts: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut hit: Vec<usize> = Vec::new();
        for start in starts {
            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(node) = dfs.next(&self.graph) {
                if node == start {
                    continue;
                }
                if let Some(&derivation) = self.producers.get(&node) {
                    if !hit.contains(&derivation) {
                        hit.push(derivation);
                    }
                }
            }
        }
        hit.sort_by_key(|d| self.rank.get(d).copied().unwrap_or(usize::MAX));
        hit
    }

    fn intern(&mut self, target: FieldTarget) -> usize {
        if let Some(&node) = self.index.get(&target) {
            return node;
        }
        let node = self.nodes.len();
        self.nodes.push(target.clone());
        self.index.insert(target, node);
        self.graph.add_node(node);
        node
    }
}
