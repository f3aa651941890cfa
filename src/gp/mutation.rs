//! Point mutation for program trees.
//!
//! A mutation picks one node of the program uniformly, picks one of its slots
//! uniformly, and replaces whatever hangs there with a freshly grown subtree.
//! Slot-less nodes make the mutation a no-op.

use log::trace;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::generation::random_tree;
use super::profile::TypeDistribution;
use crate::ast::{NodeId, ParentLink};
use crate::error::NodeResult;
use crate::program::Program;

/// Configuration for mutation operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Depth of the subtree grown into the mutated slot.
    pub subtree_depth: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { subtree_depth: 3 }
    }
}

/// Where a mutation landed.
pub type MutationSite = ParentLink;

/// Replace one random slot of `program` with a fresh random subtree.
///
/// The candidate nodes are collected before anything is replaced. The new
/// subtree is drawn from `distribution` conditioned on the owning node's
/// type. Returns `None` when the chosen node has no slots.
///
/// # Errors
///
/// Propagates [`crate::NodeError`] from rewiring. Generation always grows a
/// subtree of the slot's class, so this only fails on a corrupted tree.
pub fn point_mutation<D, R>(
    program: &mut Program,
    distribution: &D,
    config: &MutationConfig,
    rng: &mut R,
) -> NodeResult<Option<MutationSite>>
where
    D: TypeDistribution + ?Sized,
    R: Rng + ?Sized,
{
    let nodes: Vec<NodeId> = program.all_nodes();
    let Some(&node) = nodes.choose(rng) else {
        return Ok(None);
    };

    let tree = program.tree_mut();
    let specs = tree.slot_specs(node);
    if specs.is_empty() {
        return Ok(None);
    }
    let slot = rng.gen_range(0..specs.len());
    let class = specs[slot].class;
    let owner = tree.node_type(node);

    let replacement = random_tree(tree, class, distribution, config.subtree_depth, Some(owner), rng);
    tree.set_successor(node, slot, replacement)?;
    trace!("mutated slot {slot} of {owner}");
    Ok(Some(MutationSite { node, slot }))
}
