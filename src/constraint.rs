//! Subtree-presence constraints and their repair.
//!
//! A constraint demands that some pattern occurs below a node. Repair grafts
//! a copy of the pattern over a randomly chosen node of matching type, or of
//! matching class if no node has the pattern's type.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::ast::{NodeId, NodeKind, NodeType, Subtree, Tree};
use crate::error::NodeResult;
use crate::program::Program;

/// What a repair did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairOutcome {
    /// The constraint was unmet, so a repair was tried.
    pub attempted: bool,
    /// A node was replaced by a copy of the pattern.
    pub succeeded: bool,
}

/// Requires `pattern` to occur in the subtree of a node.
#[derive(Debug, Clone)]
pub struct MustContainSubtree {
    pattern: Subtree,
}

impl MustContainSubtree {
    /// Constraint requiring `pattern`.
    #[must_use]
    pub fn new(pattern: Subtree) -> Self {
        Self { pattern }
    }

    /// The required subtree.
    #[must_use]
    pub fn pattern(&self) -> &Subtree {
        &self.pattern
    }

    /// True if the pattern occurs under `node`.
    #[must_use]
    pub fn is_met(&self, tree: &Tree, node: NodeId) -> bool {
        tree.contains_subtree(node, &self.pattern.tree, self.pattern.root)
    }

    /// Make the constraint hold under `node` if it does not already.
    ///
    /// Candidates are the proper descendants of `node`, collected before
    /// anything is replaced. One node of the pattern's type is preferred;
    /// otherwise any node of the pattern's class is used.
    ///
    /// # Errors
    ///
    /// Propagates rewiring errors; a class-matched replacement cannot fail
    /// on a well-formed tree.
    pub fn repair<R: Rng + ?Sized>(
        &self,
        tree: &mut Tree,
        node: NodeId,
        rng: &mut R,
    ) -> NodeResult<RepairOutcome> {
        if self.is_met(tree, node) {
            return Ok(RepairOutcome::default());
        }

        let candidates: Vec<NodeId> = tree
            .preorder(node)
            .into_iter()
            .filter(|&id| id != node && tree.parent(id).is_some())
            .collect();
        let wanted_type = self.pattern.kind().node_type();
        let same_type: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&id| tree.node_type(id) == wanted_type)
            .collect();
        let same_class: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&id| tree.class(id) == self.pattern.class())
            .collect();

        let chosen = if same_type.is_empty() {
            same_class.choose(rng)
        } else {
            same_type.choose(rng)
        };
        let Some(link) = chosen.and_then(|&id| tree.parent(id)) else {
            return Ok(RepairOutcome {
                attempted: true,
                succeeded: false,
            });
        };

        let copy = tree.graft(&self.pattern.tree, self.pattern.root);
        tree.set_successor(link.node, link.slot, copy)?;
        Ok(RepairOutcome {
            attempted: true,
            succeeded: true,
        })
    }
}

/// Derives the (target, constraint) pair a node of some type imposes.
pub type ConstraintFactory = fn(&Tree, NodeId) -> (NodeId, MustContainSubtree);

/// Assigns constraint factories to node types.
#[derive(Debug, Clone, Default)]
pub struct ConstraintMapping {
    mapping: BTreeMap<NodeType, Vec<ConstraintFactory>>,
}

impl ConstraintMapping {
    /// A mapping with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules:
    ///
    /// - every `for` body reads the loop variable,
    /// - every program reads `input[0]`.
    #[must_use]
    pub fn standard() -> Self {
        let mut mapping = Self::new();
        mapping.add(NodeType::For, loop_body_reads_counter);
        mapping.add(NodeType::EntryPoint, program_reads_first_input);
        mapping
    }

    /// Register a factory for nodes of `node_type`.
    pub fn add(&mut self, node_type: NodeType, factory: ConstraintFactory) {
        self.mapping.entry(node_type).or_default().push(factory);
    }

    /// Constraints imposed by the node `id`.
    #[must_use]
    pub fn constraints(&self, tree: &Tree, id: NodeId) -> Vec<(NodeId, MustContainSubtree)> {
        self.mapping
            .get(&tree.node_type(id))
            .map(|factories| factories.iter().map(|factory| factory(tree, id)).collect())
            .unwrap_or_default()
    }

    /// Number of node types with at least one rule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// True if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

const FOR_COUNTER_SLOT: usize = 0;
const FOR_BODY_SLOT: usize = 2;

/// `var[<counter expression>]` must appear in the loop body.
fn loop_body_reads_counter(tree: &Tree, id: NodeId) -> (NodeId, MustContainSubtree) {
    let counter = tree.successors(id)[FOR_COUNTER_SLOT];
    let body = tree.successors(id)[FOR_BODY_SLOT];
    let mut pattern = Tree::new();
    let index = pattern.graft(tree, counter);
    let root = pattern.assemble(NodeKind::ValueGetter, &[index]);
    (body, MustContainSubtree::new(Subtree::new(pattern, root)))
}

fn program_reads_first_input(_tree: &Tree, id: NodeId) -> (NodeId, MustContainSubtree) {
    (id, MustContainSubtree::new(Subtree::from_kind(NodeKind::NumInput(0))))
}

/// Totals from [`Program::repair`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Constraints evaluated.
    pub checked: usize,
    /// Constraints that were unmet.
    pub attempted: usize,
    /// Unmet constraints that were repaired.
    pub repaired: usize,
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checked, {} unmet, {} repaired",
            self.checked, self.attempted, self.repaired
        )
    }
}

impl Program {
    /// Apply every constraint `mapping` derives from the program's nodes.
    ///
    /// The node list is collected once, before the first repair.
    ///
    /// # Errors
    ///
    /// Propagates rewiring errors from [`MustContainSubtree::repair`].
    pub fn repair<R: Rng + ?Sized>(
        &mut self,
        mapping: &ConstraintMapping,
        rng: &mut R,
    ) -> NodeResult<RepairReport> {
        let mut report = RepairReport::default();
        for id in self.all_nodes() {
            for (target, constraint) in mapping.constraints(self.tree(), id) {
                report.checked += 1;
                let outcome = constraint.repair(self.tree_mut(), target, rng)?;
                report.attempted += usize::from(outcome.attempted);
                report.repaired += usize::from(outcome.succeeded);
            }
        }
        Ok(report)
    }
}
