//! Program container: one arena with a single entry point.

use std::fmt;

use crate::ast::{NodeClass, NodeId, NodeKind, NodeView, Subtree, Tree};
use crate::error::{NodeError, NodeResult};
use crate::interpreter::{Interpreter, RunReport};
use crate::samples::TrainingSample;

/// An executable program.
///
/// The entry point is the root; its only slot holds the first real
/// directive. Cloning copies the reachable tree into a fresh compact arena,
/// so a clone never shares nodes with its source.
#[derive(Debug)]
pub struct Program {
    tree: Tree,
    entry: NodeId,
}

impl Program {
    /// The empty program: an entry point followed by `Terminal`.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree::new();
        let entry = tree.create_kind(NodeKind::EntryPoint);
        Self { tree, entry }
    }

    /// A program whose body is `body`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::TypeMismatch`] if `body` is not a directive.
    pub fn from_body(body: &Subtree) -> NodeResult<Self> {
        let mut tree = Tree::with_capacity(body.tree.len() + 1);
        let first = tree.graft(&body.tree, body.root);
        let entry = tree.build(NodeKind::EntryPoint, &[first])?;
        Ok(Self { tree, entry })
    }

    /// Adopt `tree` and chain `directives` after a new entry point.
    ///
    /// The last directive keeps its own successor, which defaults to
    /// `Terminal` for freshly built nodes.
    ///
    /// # Errors
    ///
    /// Fails if any element is not a directive that can be chained.
    pub fn from_sequence(mut tree: Tree, directives: &[NodeId]) -> NodeResult<Self> {
        if let Some(&first) = directives.first() {
            let class = tree.class(first);
            if class != NodeClass::Directive {
                return Err(NodeError::TypeMismatch {
                    slot_class: NodeClass::Directive,
                    node_class: class,
                });
            }
        }
        tree.chain(directives)?;
        let entry = match directives.first() {
            Some(&first) => tree.build(NodeKind::EntryPoint, &[first])?,
            None => tree.create_kind(NodeKind::EntryPoint),
        };
        Ok(Self { tree, entry })
    }

    /// Wrap a body already allocated in `tree`.
    pub(crate) fn with_body(mut tree: Tree, first: NodeId) -> Self {
        debug_assert_eq!(tree.class(first), NodeClass::Directive);
        let entry = tree.assemble(NodeKind::EntryPoint, &[first]);
        Self { tree, entry }
    }

    /// The entry point node.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// First directive after the entry point.
    #[must_use]
    pub fn first_directive(&self) -> NodeId {
        // The entry point always has exactly one slot.
        self.tree.successors(self.entry)[0]
    }

    /// Backing arena.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Backing arena, for in-place rewiring.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Every reachable node in preorder, starting with the entry point.
    #[must_use]
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.tree.preorder(self.entry)
    }

    /// Number of reachable nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.node_count(self.entry)
    }

    /// Depth of the tree below the entry point.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth(self.first_directive())
    }

    /// Run the program against the interpreter's current store.
    pub fn execute(&self, interpreter: &mut Interpreter) -> RunReport {
        interpreter.run(&self.tree, self.entry)
    }

    /// Reset the store, load the sample's inputs, run, and copy the outputs
    /// the sample expects into `sample.real`.
    pub fn evaluate(&self, sample: &mut TrainingSample, interpreter: &mut Interpreter) -> RunReport {
        interpreter.reset();
        interpreter.set_inputs(&sample.inputs);
        let report = self.execute(interpreter);
        sample.real.clear();
        sample
            .real
            .extend((0..sample.desired.len()).map(|i| interpreter.output(i)));
        report
    }

    /// True if both programs have the same shape and node kinds.
    #[must_use]
    pub fn same_structure(&self, other: &Program) -> bool {
        self.tree.same_structure(self.entry, &other.tree, other.entry)
    }

    /// Serializable nested view for external renderers.
    #[must_use]
    pub fn view(&self) -> NodeView {
        self.tree.view(self.entry)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Program {
    fn clone(&self) -> Self {
        let Subtree { tree, root } = self.tree.extract(self.entry);
        Self { tree, entry: root }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree.render(self.entry))
    }
}
