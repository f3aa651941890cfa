//! Typed program trees.
//!
//! A program is a tree of nodes in three classes: numeric expressions,
//! boolean expressions and directives (statements). Each node type declares a
//! fixed list of typed slots, and a directive's last slot links to the next
//! directive, so a statement sequence is a right-leaning chain that ends in
//! `Terminal`.
//!
//! ```text
//! EntryPoint
//!   └─ next: SetOutput
//!              ├─ output index: 0
//!              ├─ value:        Plus(input[0], input[1])
//!              └─ next:         Terminal
//! ```

mod kind;
mod node_type;
mod render;
mod tree;

pub use kind::NodeKind;
pub use node_type::{NodeClass, NodeType, SlotSpec, TypeTable};
pub use render::{NodeView, SlotView};
pub use tree::{MAX_SLOTS, NodeId, ParentLink, Subtree, Tree};
