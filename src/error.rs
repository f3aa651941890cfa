//! Error types for building and rewiring program trees.
//!
//! Only structural misuse is an error. Degenerate runtime values (division by
//! zero, empty lists, out-of-range indices) have defined results and never
//! surface here.

use std::fmt;

use crate::ast::{NodeClass, NodeType};

/// Structural errors raised while assembling or rewiring a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A node was assigned into a slot that requires a different class.
    TypeMismatch {
        /// The class the slot accepts.
        slot_class: NodeClass,
        /// The class of the rejected node.
        node_class: NodeClass,
    },
    /// A slot index beyond the arity of the node.
    SlotOutOfRange {
        /// Type of the node owning the slots.
        node_type: NodeType,
        /// The requested slot index.
        index: usize,
        /// Number of slots the node has.
        slots: usize,
    },
    /// A node was built with the wrong number of children.
    ArityMismatch {
        /// Type of the node being built.
        node_type: NodeType,
        /// Number of slots the type declares.
        expected: usize,
        /// Number of children supplied.
        found: usize,
    },
    /// A node type name that does not name any variant.
    UnknownNodeType(String),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::TypeMismatch {
                slot_class,
                node_class,
            } => write!(f, "type mismatch: slot expects {slot_class}, got {node_class}"),
            NodeError::SlotOutOfRange {
                node_type,
                index,
                slots,
            } => write!(f, "slot {index} out of range for {node_type} ({slots} slots)"),
            NodeError::ArityMismatch {
                node_type,
                expected,
                found,
            } => write!(f, "{node_type} takes {expected} children, got {found}"),
            NodeError::UnknownNodeType(name) => write!(f, "unknown node type: {name}"),
        }
    }
}

impl std::error::Error for NodeError {}

/// Result type for tree construction and rewiring.
pub type NodeResult<T> = Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = NodeError::TypeMismatch {
            slot_class: NodeClass::Numeric,
            node_class: NodeClass::Directive,
        };
        let msg = err.to_string();
        assert!(msg.contains("numeric"));
        assert!(msg.contains("directive"));
    }

    #[test]
    fn test_arity_mismatch_display() {
        let err = NodeError::ArityMismatch {
            node_type: NodeType::Plus,
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "Plus takes 2 children, got 1");
    }
}
