//! Node-type frequency profiles.
//!
//! A profile counts how often each node type occurs in a corpus and samples
//! new types in proportion to those counts. The relativized profile keeps a
//! separate count table for the children of every parent type.

// Relative frequencies are reported as floats
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::ast::{NodeClass, NodeKind, NodeType, TypeTable};
use crate::program::Program;

/// Corpus size below which relativized observations are up-weighted.
pub const MIN_CORPUS_PROGRAMS: usize = 100;

/// Anything that can pick a node type for a slot.
pub trait TypeDistribution {
    /// Pick a type of `class` for a slot owned by a node of type `parent`.
    fn random_type<R: Rng + ?Sized>(
        &self,
        class: NodeClass,
        parent: Option<NodeType>,
        rng: &mut R,
    ) -> NodeType;
}

/// Flat per-type counts.
#[derive(Debug, Clone)]
pub struct FrequencyProfile {
    counts: [u64; NodeType::COUNT],
    /// Sum of counts over the sampleable types of each class.
    class_totals: [u64; 3],
    /// Sampleable types of each class, most frequent first.
    ordered: [Vec<NodeType>; 3],
}

impl FrequencyProfile {
    /// A profile with every count at zero. Sampling falls back to uniform.
    #[must_use]
    pub fn empty(table: &TypeTable) -> Self {
        Self {
            counts: [0; NodeType::COUNT],
            class_totals: [0; 3],
            ordered: NodeClass::ALL.map(|class| table.generable(class).to_vec()),
        }
    }

    /// One occurrence of every type.
    #[must_use]
    pub fn uniform(table: &TypeTable) -> Self {
        Self::from_types(table, std::iter::empty(), true)
    }

    /// Count the given types, optionally seeding one occurrence of each.
    #[must_use]
    pub fn from_types<I>(table: &TypeTable, types: I, one_of_each: bool) -> Self
    where
        I: IntoIterator<Item = NodeType>,
    {
        Self::weighted(table, types, 1, one_of_each)
    }

    /// Count every reachable node of every program.
    #[must_use]
    pub fn from_programs(table: &TypeTable, programs: &[Program], one_of_each: bool) -> Self {
        let types = programs.iter().flat_map(|program| {
            program
                .all_nodes()
                .into_iter()
                .map(|id| program.tree().node_type(id))
        });
        Self::from_types(table, types, one_of_each)
    }

    fn weighted<I>(table: &TypeTable, types: I, weight: u64, one_of_each: bool) -> Self
    where
        I: IntoIterator<Item = NodeType>,
    {
        let mut profile = Self::empty(table);
        for node_type in types {
            profile.add(node_type, weight);
        }
        if one_of_each {
            for node_type in NodeType::ALL {
                profile.add(node_type, 1);
            }
        }
        profile.sort_by_frequency();
        profile
    }

    fn add(&mut self, node_type: NodeType, amount: u64) {
        // Entry points are structural, never generated.
        if node_type == NodeType::EntryPoint {
            return;
        }
        self.counts[node_type.index()] += amount;
        if node_type.is_generable() {
            self.class_totals[node_type.class().index()] += amount;
        }
    }

    fn sort_by_frequency(&mut self) {
        let counts = self.counts;
        for types in &mut self.ordered {
            types.sort_by_key(|t| std::cmp::Reverse(counts[t.index()]));
        }
    }

    /// Absolute count of a type.
    #[must_use]
    pub fn frequency(&self, node_type: NodeType) -> u64 {
        self.counts[node_type.index()]
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Share of all counted nodes that have this type, in `[0, 1]`.
    #[must_use]
    pub fn relative_frequency(&self, node_type: NodeType) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.frequency(node_type) as f64 / total as f64
    }

    /// Sampleable types of a class, most frequent first.
    #[must_use]
    pub fn types(&self, class: NodeClass) -> &[NodeType] {
        &self.ordered[class.index()]
    }

    /// Inverse-CDF sample over the class's counts.
    ///
    /// With no counts for the class the choice is uniform.
    pub fn sample<R: Rng + ?Sized>(&self, class: NodeClass, rng: &mut R) -> NodeType {
        let types = self.types(class);
        let total = self.class_totals[class.index()];
        if total == 0 {
            return types
                .choose(rng)
                .copied()
                .unwrap_or_else(|| NodeKind::default_leaf(class).node_type());
        }

        let mut ticket = rng.gen_range(0..total);
        for &node_type in types {
            let count = self.frequency(node_type);
            if ticket < count {
                return node_type;
            }
            ticket -= count;
        }
        NodeKind::default_leaf(class).node_type()
    }
}

impl TypeDistribution for FrequencyProfile {
    fn random_type<R: Rng + ?Sized>(
        &self,
        class: NodeClass,
        _parent: Option<NodeType>,
        rng: &mut R,
    ) -> NodeType {
        self.sample(class, rng)
    }
}

impl fmt::Display for FrequencyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<NodeType> = NodeType::ALL
            .into_iter()
            .filter(|&t| t != NodeType::EntryPoint)
            .collect();
        types.sort_by_key(|t| std::cmp::Reverse(self.frequency(*t)));
        for node_type in types {
            writeln!(
                f,
                "{:<16}{:>8}{:>9.2}%",
                node_type.name(),
                self.frequency(node_type),
                self.relative_frequency(node_type) * 100.0
            )?;
        }
        Ok(())
    }
}

/// Parent-conditioned profile with a flat fallback.
#[derive(Debug, Clone)]
pub struct RelativizedProfile {
    flat: FrequencyProfile,
    by_parent: BTreeMap<NodeType, FrequencyProfile>,
}

impl RelativizedProfile {
    /// Learn from a corpus.
    ///
    /// Every profile is smoothed with one occurrence of each type. When the
    /// corpus has fewer than [`MIN_CORPUS_PROGRAMS`] programs, each observed
    /// child counts `MIN_CORPUS_PROGRAMS - len` times so the smoothing does not
    /// drown the observations.
    #[must_use]
    pub fn from_programs(table: &TypeTable, programs: &[Program]) -> Self {
        let weight = if programs.len() < MIN_CORPUS_PROGRAMS {
            (MIN_CORPUS_PROGRAMS - programs.len()) as u64
        } else {
            1
        };

        let mut children: BTreeMap<NodeType, Vec<NodeType>> = BTreeMap::new();
        for program in programs {
            let tree = program.tree();
            for id in program.all_nodes() {
                let successors = tree.successors(id);
                if successors.is_empty() {
                    continue;
                }
                children
                    .entry(tree.node_type(id))
                    .or_default()
                    .extend(successors.iter().map(|&child| tree.node_type(child)));
            }
        }

        Self {
            flat: FrequencyProfile::from_programs(table, programs, true),
            by_parent: children
                .into_iter()
                .map(|(parent, kids)| (parent, FrequencyProfile::weighted(table, kids, weight, true)))
                .collect(),
        }
    }

    /// The unconditioned fallback.
    #[must_use]
    pub fn flat(&self) -> &FrequencyProfile {
        &self.flat
    }

    /// Child profile of a parent type, if the corpus contained that parent.
    #[must_use]
    pub fn for_parent(&self, parent: NodeType) -> Option<&FrequencyProfile> {
        self.by_parent.get(&parent)
    }
}

impl TypeDistribution for RelativizedProfile {
    fn random_type<R: Rng + ?Sized>(
        &self,
        class: NodeClass,
        parent: Option<NodeType>,
        rng: &mut R,
    ) -> NodeType {
        parent
            .and_then(|p| self.for_parent(p))
            .unwrap_or(&self.flat)
            .sample(class, rng)
    }
}

impl fmt::Display for RelativizedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== all nodes ==")?;
        write!(f, "{}", self.flat)?;
        for (parent, profile) in &self.by_parent {
            writeln!(f, "== children of {parent} ==")?;
            let mut types: Vec<NodeType> = NodeType::ALL
                .into_iter()
                .filter(|&t| t != NodeType::EntryPoint && profile.frequency(t) > 1)
                .collect();
            types.sort_by_key(|t| std::cmp::Reverse(profile.frequency(*t)));
            for node_type in types {
                writeln!(
                    f,
                    "{:<16}{:>9.2}%",
                    node_type.name(),
                    profile.relative_frequency(node_type) * 100.0
                )?;
            }
        }
        Ok(())
    }
}
