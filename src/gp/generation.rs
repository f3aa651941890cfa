//! Random tree generation driven by a type distribution.

use rand::Rng;

use super::profile::TypeDistribution;
use crate::ast::{NodeClass, NodeId, NodeKind, NodeType, Subtree, Tree};
use crate::program::Program;

/// Exclusive upper bound of random constant and input-index payloads.
pub const PAYLOAD_RANGE: i32 = 10;

/// A kind of `node_type` with a random payload where it has one.
pub fn random_kind<R: Rng + ?Sized>(node_type: NodeType, rng: &mut R) -> NodeKind {
    match node_type {
        NodeType::NumConst => NodeKind::NumConst(rng.gen_range(0..PAYLOAD_RANGE)),
        NodeType::NumInput => NodeKind::NumInput(rng.gen_range(0..PAYLOAD_RANGE)),
        NodeType::BoolConst => NodeKind::BoolConst(rng.gen_bool(0.5)),
        other => other.prototype(),
    }
}

/// Grow a random tree of `class` inside `tree` and return its root.
///
/// At depth 0 the class's default leaf is emitted. Otherwise a type is drawn
/// from `distribution` (conditioned on `parent`) and every slot is filled
/// with a tree one level shallower.
pub fn random_tree<D, R>(
    tree: &mut Tree,
    class: NodeClass,
    distribution: &D,
    depth: usize,
    parent: Option<NodeType>,
    rng: &mut R,
) -> NodeId
where
    D: TypeDistribution + ?Sized,
    R: Rng + ?Sized,
{
    if depth == 0 {
        return tree.default_leaf(class);
    }

    let node_type = distribution.random_type(class, parent, rng);
    let kind = random_kind(node_type, rng);
    let children: Vec<NodeId> = node_type
        .slots()
        .iter()
        .map(|spec| random_tree(tree, spec.class, distribution, depth - 1, Some(node_type), rng))
        .collect();
    tree.assemble(kind, &children)
}

/// A random tree in its own arena.
pub fn random_subtree<D, R>(
    class: NodeClass,
    distribution: &D,
    depth: usize,
    parent: Option<NodeType>,
    rng: &mut R,
) -> Subtree
where
    D: TypeDistribution + ?Sized,
    R: Rng + ?Sized,
{
    let mut tree = Tree::new();
    let root = random_tree(&mut tree, class, distribution, depth, parent, rng);
    Subtree::new(tree, root)
}

/// A program whose body is a random directive tree.
pub fn random_program<D, R>(distribution: &D, depth: usize, rng: &mut R) -> Program
where
    D: TypeDistribution + ?Sized,
    R: Rng + ?Sized,
{
    let mut tree = Tree::new();
    let body = random_tree(
        &mut tree,
        NodeClass::Directive,
        distribution,
        depth,
        Some(NodeType::EntryPoint),
        rng,
    );
    Program::with_body(tree, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeTable;
    use crate::gp::profile::FrequencyProfile;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_depth_zero_is_default_leaf() {
        let profile = FrequencyProfile::uniform(&TypeTable::new());
        let mut rng = SmallRng::seed_from_u64(1);
        for class in NodeClass::ALL {
            let subtree = random_subtree(class, &profile, 0, None, &mut rng);
            assert_eq!(subtree.kind(), NodeKind::default_leaf(class));
        }
    }

    #[test]
    fn test_depth_is_bounded() {
        let profile = FrequencyProfile::uniform(&TypeTable::new());
        let mut rng = SmallRng::seed_from_u64(2);
        for depth in 1..6 {
            for _ in 0..20 {
                let subtree = random_subtree(NodeClass::Directive, &profile, depth, None, &mut rng);
                assert!(subtree.depth() <= depth + 1);
                assert_eq!(subtree.class(), NodeClass::Directive);
            }
        }
    }

    #[test]
    fn test_slots_match_their_class() {
        let profile = FrequencyProfile::uniform(&TypeTable::new());
        let mut rng = SmallRng::seed_from_u64(3);
        let subtree = random_subtree(NodeClass::Directive, &profile, 5, None, &mut rng);
        for id in subtree.tree.preorder(subtree.root) {
            let specs = subtree.tree.slot_specs(id);
            for (spec, &child) in specs.iter().zip(subtree.tree.successors(id)) {
                assert_eq!(spec.class, subtree.tree.class(child));
            }
        }
    }

    #[test]
    fn test_random_payloads_in_range() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..100 {
            match random_kind(NodeType::NumConst, &mut rng) {
                NodeKind::NumConst(v) => assert!((0..PAYLOAD_RANGE).contains(&v)),
                other => panic!("unexpected kind {other:?}"),
            }
        }
        assert_eq!(random_kind(NodeType::Plus, &mut rng), NodeKind::Plus);
    }

    #[test]
    fn test_random_program_is_runnable() {
        let profile = FrequencyProfile::uniform(&TypeTable::new());
        let mut rng = SmallRng::seed_from_u64(5);
        let mut interp = crate::interpreter::Interpreter::default();
        for _ in 0..50 {
            let program = random_program(&profile, 4, &mut rng);
            assert_eq!(program.tree().kind(program.entry()), NodeKind::EntryPoint);
            interp.reset();
            let _ = program.execute(&mut interp);
        }
    }
}
