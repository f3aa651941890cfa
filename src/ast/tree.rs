//! Arena storage for program trees.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. A node's
//! children are fixed by its type's slot signature; each node also records
//! the slot it was last attached to so mutations can rewire in place.
//!
//! # Sharing
//!
//! [`Tree::set_successor`] attaches whatever node it is given. Attaching a node
//! that already hangs under another slot makes the two slots share one
//! subtree, and later edits through either path are visible through both.
//! Callers that need an independent copy use [`Tree::deep_copy`] first.
//! [`Tree::shallow_clone`] shares children on purpose.

use std::fmt;

use super::kind::NodeKind;
use super::node_type::{NodeClass, NodeType, SlotSpec};
use crate::error::{NodeError, NodeResult};

/// Largest slot count of any node type.
pub const MAX_SLOTS: usize = 4;

/// Index of a node inside a [`Tree`].
///
/// Ids are only meaningful for the tree that issued them; using one with a
/// different tree panics or addresses an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    const NULL: NodeId = NodeId(u32::MAX);

    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// The owning node.
    pub node: NodeId,
    /// Slot index within the owner.
    pub slot: usize,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    children: [NodeId; MAX_SLOTS],
    parent: Option<ParentLink>,
}

impl Node {
    fn children(&self) -> &[NodeId] {
        &self.children[..self.kind.node_type().arity()]
    }
}

/// A node arena. One tree may hold several disjoint roots.
///
/// Rewiring can leave unreachable nodes behind; they are ignored by every
/// traversal and dropped when a subtree is [extracted](Tree::extract).
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    // The arena never approaches u32::MAX nodes.
    #[allow(clippy::cast_possible_truncation)]
    fn push_linked(&mut self, kind: NodeKind, children: [NodeId; MAX_SLOTS]) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let arity = kind.node_type().arity();
        for (slot, child) in children[..arity].iter().enumerate() {
            self.nodes[child.index()].parent = Some(ParentLink { node: id, slot });
        }
        self.nodes.push(Node {
            kind,
            children,
            parent: None,
        });
        id
    }

    // === Construction ===

    /// Allocate the default leaf of a class: `NumConst(0)`, `BoolConst(false)`
    /// or `Terminal`.
    pub fn default_leaf(&mut self, class: NodeClass) -> NodeId {
        self.push_linked(NodeKind::default_leaf(class), [NodeId::NULL; MAX_SLOTS])
    }

    /// Allocate a node of `kind` with every slot holding its default leaf.
    pub fn create_kind(&mut self, kind: NodeKind) -> NodeId {
        let mut children = [NodeId::NULL; MAX_SLOTS];
        for (child, spec) in children.iter_mut().zip(kind.node_type().slots()) {
            *child = self.default_leaf(spec.class);
        }
        self.push_linked(kind, children)
    }

    /// Allocate a node of `node_type` with a zeroed payload and default leaves.
    pub fn create_node(&mut self, node_type: NodeType) -> NodeId {
        self.create_kind(node_type.prototype())
    }

    /// Allocate a node of `kind` over existing children.
    ///
    /// A directive may omit its trailing next-directive child, which then
    /// defaults to `Terminal`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::ArityMismatch`] if the child count does not fit
    /// the type and [`NodeError::TypeMismatch`] if a child has the wrong
    /// class for its slot.
    pub fn build(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeResult<NodeId> {
        let node_type = kind.node_type();
        let slots = node_type.slots();
        let omits_next = node_type.next_slot().is_some() && children.len() + 1 == slots.len();
        if children.len() != slots.len() && !omits_next {
            return Err(NodeError::ArityMismatch {
                node_type,
                expected: slots.len(),
                found: children.len(),
            });
        }
        for (spec, &child) in slots.iter().zip(children) {
            let node_class = self.class(child);
            if spec.class != node_class {
                return Err(NodeError::TypeMismatch {
                    slot_class: spec.class,
                    node_class,
                });
            }
        }

        let mut linked = [NodeId::NULL; MAX_SLOTS];
        linked[..children.len()].copy_from_slice(children);
        if omits_next {
            linked[children.len()] = self.default_leaf(NodeClass::Directive);
        }
        Ok(self.push_linked(kind, linked))
    }

    /// Allocate a node over children already known to match its signature.
    pub(crate) fn assemble(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        debug_assert_eq!(children.len(), kind.node_type().arity());
        debug_assert!(
            kind.node_type()
                .slots()
                .iter()
                .zip(children)
                .all(|(spec, &c)| spec.class == self.class(c))
        );
        let mut linked = [NodeId::NULL; MAX_SLOTS];
        linked[..children.len()].copy_from_slice(children);
        self.push_linked(kind, linked)
    }

    /// Link directives so each one's next slot points at the following one.
    ///
    /// The last directive keeps its current successor.
    ///
    /// # Errors
    ///
    /// Fails if any element is not a directive with a next slot.
    pub fn chain(&mut self, directives: &[NodeId]) -> NodeResult<()> {
        for pair in directives.windows(2) {
            self.set_next_directive(pair[0], pair[1])?;
        }
        Ok(())
    }

    // === Access ===

    /// Variant and payload of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Type discriminant of a node.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).kind.node_type()
    }

    /// Evaluation class of a node.
    #[must_use]
    pub fn class(&self, id: NodeId) -> NodeClass {
        self.node(id).kind.class()
    }

    /// Slot signature of a node.
    #[must_use]
    pub fn slot_specs(&self, id: NodeId) -> &'static [SlotSpec] {
        self.node_type(id).slots()
    }

    /// Number of slots of a node.
    #[must_use]
    pub fn slot_count(&self, id: NodeId) -> usize {
        self.node_type(id).arity()
    }

    /// Children in slot order.
    #[must_use]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Child in slot `index`, if the slot exists.
    #[must_use]
    pub fn successor(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.successors(id).get(index).copied()
    }

    /// Slot the node was most recently attached to.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<ParentLink> {
        self.node(id).parent
    }

    /// The directive executed after this one.
    ///
    /// `None` for `Terminal` and for non-directives.
    #[must_use]
    pub fn next_directive(&self, id: NodeId) -> Option<NodeId> {
        let slot = self.node_type(id).next_slot()?;
        Some(self.node(id).children[slot])
    }

    // === Rewiring ===

    /// Attach `child` under slot `index` of `parent`.
    ///
    /// The previous occupant is detached but stays allocated. See the module
    /// docs for what happens when `child` is already attached elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::SlotOutOfRange`] for a bad index and
    /// [`NodeError::TypeMismatch`] if `child` has the wrong class.
    pub fn set_successor(&mut self, parent: NodeId, index: usize, child: NodeId) -> NodeResult<()> {
        let node_type = self.node_type(parent);
        let spec = node_type
            .slots()
            .get(index)
            .ok_or(NodeError::SlotOutOfRange {
                node_type,
                index,
                slots: node_type.arity(),
            })?;
        let node_class = self.class(child);
        if spec.class != node_class {
            return Err(NodeError::TypeMismatch {
                slot_class: spec.class,
                node_class,
            });
        }

        let link = ParentLink {
            node: parent,
            slot: index,
        };
        let previous = self.node(parent).children[index];
        if self.node(previous).parent == Some(link) {
            self.nodes[previous.index()].parent = None;
        }
        self.nodes[parent.index()].children[index] = child;
        self.nodes[child.index()].parent = Some(link);
        Ok(())
    }

    /// Replace the next directive of `id`.
    ///
    /// # Errors
    ///
    /// Fails with [`NodeError::SlotOutOfRange`] if `id` has no next slot and
    /// [`NodeError::TypeMismatch`] if `next` is not a directive.
    pub fn set_next_directive(&mut self, id: NodeId, next: NodeId) -> NodeResult<()> {
        let node_type = self.node_type(id);
        let slot = node_type.next_slot().ok_or(NodeError::SlotOutOfRange {
            node_type,
            index: node_type.arity(),
            slots: node_type.arity(),
        })?;
        self.set_successor(id, slot, next)
    }

    // === Copying ===

    /// New node with the same kind whose slots point at the same children.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let Node { kind, children, .. } = self.node(id).clone();
        self.append_unlinked(kind, children)
    }

    // The arena never approaches u32::MAX nodes.
    #[allow(clippy::cast_possible_truncation)]
    fn append_unlinked(&mut self, kind: NodeKind, children: [NodeId; MAX_SLOTS]) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            children,
            parent: None,
        });
        id
    }

    /// Structurally identical, fully independent copy of the subtree at `id`.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        self.copy_post_order(None, id)
    }

    /// Copy a subtree of another arena into this one.
    pub fn graft(&mut self, source: &Tree, root: NodeId) -> NodeId {
        self.copy_post_order(Some(source), root)
    }

    /// Copy the reachable part of the subtree at `root` into a fresh, compact arena.
    #[must_use]
    pub fn extract(&self, root: NodeId) -> Subtree {
        let mut tree = Tree::with_capacity(self.node_count(root));
        let root = tree.graft(self, root);
        Subtree { tree, root }
    }

    /// Post-order copy; `source == None` copies within `self`.
    ///
    /// Every occurrence of a shared node is copied separately, so the result
    /// never shares.
    fn copy_post_order(&mut self, source: Option<&Tree>, root: NodeId) -> NodeId {
        let read = |tree: &Tree, id: NodeId| {
            let node = tree.node(id);
            (node.kind, node.children)
        };

        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        let mut copied: Vec<NodeId> = Vec::new();
        let mut last = root;
        while let Some(top) = stack.last_mut() {
            let (id, cursor) = *top;
            let (kind, children) = read(source.unwrap_or(&*self), id);
            let arity = kind.node_type().arity();
            if cursor < arity {
                top.1 += 1;
                stack.push((children[cursor], 0));
                continue;
            }
            stack.pop();
            let start = copied.len() - arity;
            let mut linked = [NodeId::NULL; MAX_SLOTS];
            linked[..arity].copy_from_slice(&copied[start..]);
            copied.truncate(start);
            last = self.push_linked(kind, linked);
            copied.push(last);
        }
        last
    }

    // === Comparison ===

    /// True if two nodes have the same variant and payload.
    ///
    /// Children are not compared.
    #[must_use]
    pub fn is_equal(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        self.kind(id) == other.kind(other_id)
    }

    /// True if the subtrees at `id` and `other_id` have identical shape and kinds.
    #[must_use]
    pub fn same_structure(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let left = self.preorder(id);
        let right = other.preorder(other_id);
        left.len() == right.len()
            && left
                .iter()
                .zip(&right)
                .all(|(&a, &b)| self.is_equal(a, other, b))
    }

    /// True if `pattern` occurs somewhere under `id`.
    ///
    /// A node matches when it equals the pattern root and each of its
    /// children contains the corresponding pattern child. Pattern children
    /// may therefore match deeper than one level below.
    #[must_use]
    pub fn contains_subtree(&self, id: NodeId, pattern: &Tree, pattern_root: NodeId) -> bool {
        if self.is_equal(id, pattern, pattern_root)
            && self
                .successors(id)
                .iter()
                .zip(pattern.successors(pattern_root))
                .all(|(&child, &want)| self.contains_subtree(child, pattern, want))
        {
            return true;
        }
        self.successors(id)
            .iter()
            .any(|&child| self.contains_subtree(child, pattern, pattern_root))
    }

    // === Traversal ===

    /// Nodes reachable from `root`, parents before children, slots in order.
    #[must_use]
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.successors(id).iter().rev());
        }
        order
    }

    /// Number of nodes reachable from `root`, counting shared nodes per path.
    #[must_use]
    pub fn node_count(&self, root: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend_from_slice(self.successors(id));
        }
        count
    }

    /// Longest root-to-leaf path, counting nodes. A leaf has depth 1.
    #[must_use]
    pub fn depth(&self, root: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(root, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.successors(id).iter().map(|&c| (c, depth + 1)));
        }
        deepest
    }
}

/// A standalone tree: an arena plus the root it was built for.
///
/// Generation and enumeration hand these out; callers graft them into
/// a program's arena.
#[derive(Debug, Clone)]
pub struct Subtree {
    /// Backing arena.
    pub tree: Tree,
    /// Root node in `tree`.
    pub root: NodeId,
}

impl Subtree {
    /// Wrap an arena and one of its nodes.
    #[must_use]
    pub fn new(tree: Tree, root: NodeId) -> Self {
        Self { tree, root }
    }

    /// A single node of `kind` with default leaves in its slots.
    #[must_use]
    pub fn from_kind(kind: NodeKind) -> Self {
        let mut tree = Tree::with_capacity(1 + kind.node_type().arity());
        let root = tree.create_kind(kind);
        Self { tree, root }
    }

    /// Kind of the root.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.root)
    }

    /// Class of the root.
    #[must_use]
    pub fn class(&self) -> NodeClass {
        self.tree.class(self.root)
    }

    /// Reachable node count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.node_count(self.root)
    }

    /// Depth of the tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth(self.root)
    }

    /// True if both trees have the same shape and kinds.
    #[must_use]
    pub fn same_structure(&self, other: &Subtree) -> bool {
        self.tree.same_structure(self.root, &other.tree, other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus(tree: &mut Tree, a: i32, b: i32) -> NodeId {
        let a = tree.create_kind(NodeKind::NumConst(a));
        let b = tree.create_kind(NodeKind::NumConst(b));
        tree.build(NodeKind::Plus, &[a, b]).unwrap()
    }

    #[test]
    fn test_create_node_fills_default_leaves() {
        let mut tree = Tree::new();
        let node = tree.create_node(NodeType::IfElse);
        let kinds: Vec<NodeKind> = tree.successors(node).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::BoolConst(false),
                NodeKind::Terminal,
                NodeKind::Terminal,
                NodeKind::Terminal
            ]
        );
        for (slot, &child) in tree.successors(node).iter().enumerate() {
            assert_eq!(tree.parent(child), Some(ParentLink { node, slot }));
        }
    }

    #[test]
    fn test_create_node_matches_slot_layout_for_every_type() {
        let mut tree = Tree::new();
        for node_type in NodeType::ALL {
            let node = tree.create_node(node_type);
            assert_eq!(tree.node_type(node), node_type);
            assert_eq!(tree.class(node), node_type.class());

            let specs = node_type.slots();
            let children = tree.successors(node);
            assert_eq!(children.len(), specs.len(), "{node_type}");
            for (slot, (spec, &child)) in specs.iter().zip(children).enumerate() {
                assert_eq!(tree.class(child), spec.class, "{node_type} slot {slot}");
                assert_eq!(tree.parent(child), Some(ParentLink { node, slot }));
            }
        }
    }

    #[test]
    fn test_build_rejects_wrong_class() {
        let mut tree = Tree::new();
        let cond = tree.create_kind(NodeKind::BoolConst(true));
        let err = tree.build(NodeKind::Plus, &[cond, cond]).unwrap_err();
        assert_eq!(
            err,
            NodeError::TypeMismatch {
                slot_class: NodeClass::Numeric,
                node_class: NodeClass::Boolean
            }
        );
    }

    #[test]
    fn test_build_rejects_wrong_arity() {
        let mut tree = Tree::new();
        let a = tree.create_kind(NodeKind::NumConst(1));
        let err = tree.build(NodeKind::Plus, &[a]).unwrap_err();
        assert!(matches!(err, NodeError::ArityMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_build_defaults_omitted_next() {
        let mut tree = Tree::new();
        let index = tree.create_kind(NodeKind::NumConst(0));
        let value = tree.create_kind(NodeKind::NumConst(7));
        let set = tree.build(NodeKind::SetOutput, &[index, value]).unwrap();
        let next = tree.next_directive(set).unwrap();
        assert_eq!(tree.kind(next), NodeKind::Terminal);
        assert_eq!(tree.next_directive(next), None);
    }

    #[test]
    fn test_set_successor_checks_slot_and_class() {
        let mut tree = Tree::new();
        let node = plus(&mut tree, 1, 2);
        let stop = tree.default_leaf(NodeClass::Directive);
        assert!(matches!(
            tree.set_successor(node, 0, stop),
            Err(NodeError::TypeMismatch { .. })
        ));
        let three = tree.create_kind(NodeKind::NumConst(3));
        assert!(matches!(
            tree.set_successor(node, 2, three),
            Err(NodeError::SlotOutOfRange { index: 2, slots: 2, .. })
        ));
        tree.set_successor(node, 1, three).unwrap();
        assert_eq!(tree.successor(node, 1), Some(three));
        assert_eq!(tree.parent(three), Some(ParentLink { node, slot: 1 }));
    }

    #[test]
    fn test_next_directive_requires_next_slot() {
        let mut tree = Tree::new();
        let stop = tree.default_leaf(NodeClass::Directive);
        let other = tree.default_leaf(NodeClass::Directive);
        assert!(tree.set_next_directive(stop, other).is_err());
        let value = tree.create_kind(NodeKind::NumConst(0));
        assert_eq!(tree.next_directive(value), None);
    }

    #[test]
    fn test_chain_links_in_order() {
        let mut tree = Tree::new();
        let a = tree.create_node(NodeType::Increment);
        let b = tree.create_node(NodeType::Decrement);
        let c = tree.create_node(NodeType::RemoveLast);
        tree.chain(&[a, b, c]).unwrap();
        assert_eq!(tree.next_directive(a), Some(b));
        assert_eq!(tree.next_directive(b), Some(c));
        assert_eq!(tree.kind(tree.next_directive(c).unwrap()), NodeKind::Terminal);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut tree = Tree::new();
        let original = plus(&mut tree, 1, 2);
        let copy = tree.deep_copy(original);
        assert_ne!(original, copy);
        assert!(tree.same_structure(original, &tree, copy));

        let nine = tree.create_kind(NodeKind::NumConst(9));
        tree.set_successor(copy, 0, nine).unwrap();
        let first = tree.successor(original, 0).unwrap();
        assert_eq!(tree.kind(first), NodeKind::NumConst(1));
    }

    #[test]
    fn test_deep_copy_unshares_aliased_children() {
        let mut tree = Tree::new();
        let node = plus(&mut tree, 1, 2);
        let left = tree.successor(node, 0).unwrap();
        tree.set_successor(node, 1, left).unwrap();
        let copy = tree.deep_copy(node);
        let children = tree.successors(copy);
        assert_ne!(children[0], children[1]);
    }

    #[test]
    fn test_shallow_clone_shares_children() {
        let mut tree = Tree::new();
        let node = plus(&mut tree, 4, 5);
        let clone = tree.shallow_clone(node);
        assert_eq!(tree.successors(node), tree.successors(clone));
        assert_eq!(tree.parent(tree.successor(node, 0).unwrap()).unwrap().node, node);
    }

    #[test]
    fn test_extract_drops_garbage() {
        let mut tree = Tree::new();
        let node = plus(&mut tree, 1, 2);
        for _ in 0..5 {
            let replacement = tree.create_kind(NodeKind::NumConst(3));
            tree.set_successor(node, 0, replacement).unwrap();
        }
        let sub = tree.extract(node);
        assert_eq!(sub.tree.len(), 3);
        assert_eq!(sub.node_count(), 3);
        assert!(tree.same_structure(node, &sub.tree, sub.root));
    }

    #[test]
    fn test_contains_subtree_matches_nested_pattern() {
        let mut tree = Tree::new();
        let inner = plus(&mut tree, 1, 2);
        let three = tree.create_kind(NodeKind::NumConst(3));
        let outer = tree.build(NodeKind::Multiply, &[three, inner]).unwrap();

        let mut pattern = Tree::new();
        let p = plus(&mut pattern, 1, 2);
        assert!(tree.contains_subtree(outer, &pattern, p));

        let mut other = Tree::new();
        let q = plus(&mut other, 2, 1);
        assert!(!tree.contains_subtree(outer, &other, q));
    }

    #[test]
    fn test_contains_subtree_searches_below_partial_match() {
        // Plus(Plus(1, 2), 0) contains Plus(1, 2) even though the outer Plus
        // only partially matches.
        let mut tree = Tree::new();
        let inner = plus(&mut tree, 1, 2);
        let zero = tree.create_kind(NodeKind::NumConst(0));
        let outer = tree.build(NodeKind::Plus, &[inner, zero]).unwrap();

        let mut pattern = Tree::new();
        let p = plus(&mut pattern, 1, 2);
        assert!(tree.contains_subtree(outer, &pattern, p));
    }

    #[test]
    fn test_preorder_and_depth() {
        let mut tree = Tree::new();
        let inner = plus(&mut tree, 1, 2);
        let neg = tree.build(NodeKind::Sqr, &[inner]).unwrap();
        let order: Vec<NodeKind> = tree.preorder(neg).iter().map(|&id| tree.kind(id)).collect();
        assert_eq!(
            order,
            vec![NodeKind::Sqr, NodeKind::Plus, NodeKind::NumConst(1), NodeKind::NumConst(2)]
        );
        assert_eq!(tree.depth(neg), 3);
        assert_eq!(tree.node_count(neg), 4);
    }
}
