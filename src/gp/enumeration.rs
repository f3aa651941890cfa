//! Lazy exhaustive enumeration of trees by depth.
//!
//! The number of trees grows doubly exponentially with depth, so enumeration
//! is an iterator that builds one tree per call and never materializes a
//! level. Children are combined odometer style: the last slot turns fastest.

use crate::ast::{NodeClass, NodeKind, NodeType, Subtree, Tree, TypeTable};

/// Payload values tried for constants and input indices.
const ENUMERATED_PAYLOADS: i32 = 2;

/// Every concrete instantiation of a slot-less type.
#[must_use]
pub fn instantiations(node_type: NodeType) -> Vec<NodeKind> {
    match node_type {
        NodeType::NumConst => (0..ENUMERATED_PAYLOADS).map(NodeKind::NumConst).collect(),
        NodeType::NumInput => (0..ENUMERATED_PAYLOADS).map(NodeKind::NumInput).collect(),
        NodeType::BoolConst => vec![NodeKind::BoolConst(false), NodeKind::BoolConst(true)],
        other => vec![other.prototype()],
    }
}

fn terminal_kinds(table: &TypeTable, class: NodeClass) -> Vec<NodeKind> {
    table
        .terminals(class)
        .iter()
        .flat_map(|&t| instantiations(t))
        .collect()
}

/// Number of trees [`TreeEnumerator`] yields, saturating at `u64::MAX`.
#[must_use]
pub fn count_trees(table: &TypeTable, class: NodeClass, depth: usize) -> u64 {
    // counts[c] holds the count for class c at the previous depth.
    let mut counts = [1u64; 3];
    for level in 1..=depth {
        counts = NodeClass::ALL.map(|c| {
            let terminals = terminal_kinds(table, c).len() as u64;
            if level == 1 {
                return terminals;
            }
            table.nonterminals(c).iter().fold(terminals, |total, t| {
                let combinations = t.slots().iter().fold(1u64, |product, spec| {
                    product.saturating_mul(counts[spec.class.index()])
                });
                total.saturating_add(combinations)
            })
        });
    }
    counts[class.index()]
}

/// Yields every tree of a class up to a depth.
///
/// Depth 0 yields the class's default leaf. Depth 1 yields every
/// instantiation of the class's terminal types. Deeper levels yield the
/// terminals again, then each non-terminal type with every combination of
/// children enumerated one level shallower.
#[derive(Debug)]
pub struct TreeEnumerator<'t> {
    table: &'t TypeTable,
    class: NodeClass,
    depth: usize,
    terminals: std::vec::IntoIter<NodeKind>,
    nonterminal: usize,
    odometer: Option<Odometer<'t>>,
}

impl<'t> TreeEnumerator<'t> {
    /// Start enumerating trees of `class` at `depth`.
    #[must_use]
    pub fn new(table: &'t TypeTable, class: NodeClass, depth: usize) -> Self {
        let terminals = if depth == 0 {
            vec![NodeKind::default_leaf(class)]
        } else {
            terminal_kinds(table, class)
        };
        Self {
            table,
            class,
            depth,
            terminals: terminals.into_iter(),
            nonterminal: 0,
            odometer: None,
        }
    }

    /// The class being enumerated.
    #[must_use]
    pub fn class(&self) -> NodeClass {
        self.class
    }

    /// The depth being enumerated.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Iterator for TreeEnumerator<'_> {
    type Item = Subtree;

    fn next(&mut self) -> Option<Subtree> {
        if let Some(kind) = self.terminals.next() {
            return Some(Subtree::from_kind(kind));
        }
        if self.depth < 2 {
            return None;
        }

        let nonterminals = self.table.nonterminals(self.class);
        loop {
            if let Some(odometer) = &mut self.odometer {
                if odometer.turn() {
                    return Some(odometer.assemble());
                }
                self.odometer = None;
                self.nonterminal += 1;
            }
            let &node_type = nonterminals.get(self.nonterminal)?;
            self.odometer = Some(Odometer::new(self.table, node_type, self.depth - 1));
        }
    }
}

/// One wheel per slot of a non-terminal node.
#[derive(Debug)]
struct Odometer<'t> {
    kind: NodeKind,
    wheels: Vec<TreeEnumerator<'t>>,
    current: Vec<Subtree>,
    started: bool,
}

impl<'t> Odometer<'t> {
    fn new(table: &'t TypeTable, node_type: NodeType, child_depth: usize) -> Self {
        let mut wheels: Vec<TreeEnumerator<'t>> = node_type
            .slots()
            .iter()
            .map(|spec| TreeEnumerator::new(table, spec.class, child_depth))
            .collect();
        // Every class has at least one terminal, so no wheel starts empty.
        let current = wheels.iter_mut().filter_map(Iterator::next).collect();
        Self {
            kind: node_type.prototype(),
            wheels,
            current,
            started: false,
        }
    }

    /// Move to the next combination. False once every combination was seen.
    fn turn(&mut self) -> bool {
        if !self.started {
            self.started = true;
            return self.current.len() == self.wheels.len();
        }
        for slot in (0..self.wheels.len()).rev() {
            if let Some(next) = self.wheels[slot].next() {
                self.current[slot] = next;
                return true;
            }
            let wheel = &self.wheels[slot];
            let mut restarted = TreeEnumerator::new(wheel.table, wheel.class, wheel.depth);
            match restarted.next() {
                Some(first) => self.current[slot] = first,
                None => return false,
            }
            self.wheels[slot] = restarted;
        }
        false
    }

    fn assemble(&self) -> Subtree {
        let mut tree = Tree::new();
        let children: Vec<_> = self
            .current
            .iter()
            .map(|child| tree.graft(&child.tree, child.root))
            .collect();
        let root = tree.assemble(self.kind, &children);
        Subtree::new(tree, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_zero_is_default_leaf() {
        let table = TypeTable::new();
        let trees: Vec<Subtree> = TreeEnumerator::new(&table, NodeClass::Boolean, 0).collect();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].kind(), NodeKind::BoolConst(false));
    }

    #[test]
    fn test_depth_one_is_terminal_instantiations() {
        let table = TypeTable::new();
        let kinds: Vec<NodeKind> = TreeEnumerator::new(&table, NodeClass::Numeric, 1)
            .map(|t| t.kind())
            .collect();
        assert!(kinds.contains(&NodeKind::NumConst(0)));
        assert!(kinds.contains(&NodeKind::NumConst(1)));
        assert!(kinds.contains(&NodeKind::NumInput(0)));
        assert!(kinds.contains(&NodeKind::NumInput(1)));
        assert!(kinds.iter().all(|k| k.node_type().is_terminal()));

        let directives: Vec<Subtree> = TreeEnumerator::new(&table, NodeClass::Directive, 1).collect();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].kind(), NodeKind::Terminal);
    }

    #[test]
    fn test_count_matches_enumeration() {
        let table = TypeTable::new();
        for class in NodeClass::ALL {
            for depth in 0..3 {
                let counted = count_trees(&table, class, depth);
                let enumerated = TreeEnumerator::new(&table, class, depth).count() as u64;
                assert_eq!(counted, enumerated, "{class} at depth {depth}");
            }
        }
    }

    #[test]
    fn test_trees_are_distinct_and_bounded() {
        let table = TypeTable::new();
        let trees: Vec<Subtree> = TreeEnumerator::new(&table, NodeClass::Directive, 2).collect();
        for (i, a) in trees.iter().enumerate() {
            assert!(a.depth() <= 2);
            for b in &trees[i + 1..] {
                assert!(!a.same_structure(b));
            }
        }
    }

    #[test]
    fn test_finds_set_output_of_second_input() {
        let table = TypeTable::new();
        let found = TreeEnumerator::new(&table, NodeClass::Directive, 2).any(|t| {
            t.kind() == NodeKind::SetOutput
                && t.tree.kind(t.tree.successors(t.root)[1]) == NodeKind::NumInput(1)
        });
        assert!(found);
    }

    #[test]
    fn test_deep_enumeration_is_lazy() {
        let table = TypeTable::new();
        assert!(count_trees(&table, NodeClass::Directive, 4) > 1_000_000);
        let first: Vec<Subtree> = TreeEnumerator::new(&table, NodeClass::Directive, 4)
            .take(50)
            .collect();
        assert_eq!(first.len(), 50);
    }

    #[test]
    fn test_count_saturates() {
        let table = TypeTable::new();
        assert_eq!(count_trees(&table, NodeClass::Directive, 12), u64::MAX);
    }
}
