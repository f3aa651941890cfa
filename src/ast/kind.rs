//! Node payloads.

use serde::{Deserialize, Serialize};

use super::node_type::{NodeClass, NodeType};

/// A node variant together with its payload.
///
/// Only inputs and constants carry data; every other variant is fully
/// described by its type and its children. Variants mirror [`NodeType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// `input[i]` for a fixed index `i`.
    NumInput(i32),
    /// Integer literal.
    NumConst(i32),
    /// Rounded `log2`, 0 for non-positive arguments.
    Log,
    /// Rounded sine.
    Sin,
    /// Rounded tangent.
    Tan,
    /// Wrapping square.
    Sqr,
    /// Rounded square root, 0 for negative arguments.
    Sqrt,
    /// Wrapping addition.
    Plus,
    /// Wrapping subtraction.
    Minus,
    /// Division, 0 when the divisor is 0.
    Div,
    /// Remainder, the dividend when the divisor is 0.
    Mod,
    /// Wrapping multiplication.
    Multiply,
    /// Random integer in `0..limit`.
    Rand,
    /// `var[i]`.
    ValueGetter,
    /// Length of `list[i]`.
    ListSizeGetter,
    /// `list[i][j]` with a wrapped `j`.
    ListGetValue,
    /// Front of `list[i]`, 0 when empty.
    ListGetFirst,
    /// Back of `list[i]`, 0 when empty.
    ListGetLast,
    /// 1 for true, 0 for false.
    Bool2Num,

    /// Boolean literal.
    BoolConst(bool),
    /// `a == b`.
    Equals,
    /// `a < b`.
    Less,
    /// `a <= b`.
    LessEq,
    /// Logical and of both operands.
    And,
    /// Logical or of both operands.
    Or,
    /// Exclusive or.
    Xor,
    /// Negation.
    Not,

    /// `for var[i] < limit { body }`.
    For,
    /// `foreach var[i] in list[j] { body }`. `var[i]` receives each element
    /// value; the position in the list is tracked internally, not in a
    /// variable.
    Foreach,
    /// `while cond { body }`.
    While,
    /// Push to the back of a list.
    AddLast,
    /// Push to the front of a list.
    AddFirst,
    /// Pop the front of a list.
    RemoveFirst,
    /// Pop the back of a list.
    RemoveLast,
    /// `if cond { body }`.
    If,
    /// `if cond { a } else { b }`.
    IfElse,
    /// `var[i] := value`.
    Assign,
    /// `var[i] += 1`.
    Increment,
    /// `var[i] -= 1`.
    Decrement,
    /// `output[i] := value`.
    SetOutput,
    /// End of a directive chain.
    Terminal,
    /// Program entry marker.
    EntryPoint,
}

impl NodeKind {
    /// Discriminant of this kind.
    #[must_use]
    pub const fn node_type(self) -> NodeType {
        match self {
            NodeKind::NumInput(_) => NodeType::NumInput,
            NodeKind::NumConst(_) => NodeType::NumConst,
            NodeKind::Log => NodeType::Log,
            NodeKind::Sin => NodeType::Sin,
            NodeKind::Tan => NodeType::Tan,
            NodeKind::Sqr => NodeType::Sqr,
            NodeKind::Sqrt => NodeType::Sqrt,
            NodeKind::Plus => NodeType::Plus,
            NodeKind::Minus => NodeType::Minus,
            NodeKind::Div => NodeType::Div,
            NodeKind::Mod => NodeType::Mod,
            NodeKind::Multiply => NodeType::Multiply,
            NodeKind::Rand => NodeType::Rand,
            NodeKind::ValueGetter => NodeType::ValueGetter,
            NodeKind::ListSizeGetter => NodeType::ListSizeGetter,
            NodeKind::ListGetValue => NodeType::ListGetValue,
            NodeKind::ListGetFirst => NodeType::ListGetFirst,
            NodeKind::ListGetLast => NodeType::ListGetLast,
            NodeKind::Bool2Num => NodeType::Bool2Num,
            NodeKind::BoolConst(_) => NodeType::BoolConst,
            NodeKind::Equals => NodeType::Equals,
            NodeKind::Less => NodeType::Less,
            NodeKind::LessEq => NodeType::LessEq,
            NodeKind::And => NodeType::And,
            NodeKind::Or => NodeType::Or,
            NodeKind::Xor => NodeType::Xor,
            NodeKind::Not => NodeType::Not,
            NodeKind::For => NodeType::For,
            NodeKind::Foreach => NodeType::Foreach,
            NodeKind::While => NodeType::While,
            NodeKind::AddLast => NodeType::AddLast,
            NodeKind::AddFirst => NodeType::AddFirst,
            NodeKind::RemoveFirst => NodeType::RemoveFirst,
            NodeKind::RemoveLast => NodeType::RemoveLast,
            NodeKind::If => NodeType::If,
            NodeKind::IfElse => NodeType::IfElse,
            NodeKind::Assign => NodeType::Assign,
            NodeKind::Increment => NodeType::Increment,
            NodeKind::Decrement => NodeType::Decrement,
            NodeKind::SetOutput => NodeType::SetOutput,
            NodeKind::Terminal => NodeType::Terminal,
            NodeKind::EntryPoint => NodeType::EntryPoint,
        }
    }

    /// Evaluation class of this kind.
    #[must_use]
    pub const fn class(self) -> NodeClass {
        self.node_type().class()
    }

    /// The payload-free default leaf for a class.
    #[must_use]
    pub const fn default_leaf(class: NodeClass) -> Self {
        match class {
            NodeClass::Numeric => NodeKind::NumConst(0),
            NodeClass::Boolean => NodeKind::BoolConst(false),
            NodeClass::Directive => NodeKind::Terminal,
        }
    }
}

impl NodeType {
    /// The kind of this type with a zeroed payload.
    #[must_use]
    pub const fn prototype(self) -> NodeKind {
        match self {
            NodeType::NumInput => NodeKind::NumInput(0),
            NodeType::NumConst => NodeKind::NumConst(0),
            NodeType::Log => NodeKind::Log,
            NodeType::Sin => NodeKind::Sin,
            NodeType::Tan => NodeKind::Tan,
            NodeType::Sqr => NodeKind::Sqr,
            NodeType::Sqrt => NodeKind::Sqrt,
            NodeType::Plus => NodeKind::Plus,
            NodeType::Minus => NodeKind::Minus,
            NodeType::Div => NodeKind::Div,
            NodeType::Mod => NodeKind::Mod,
            NodeType::Multiply => NodeKind::Multiply,
            NodeType::Rand => NodeKind::Rand,
            NodeType::ValueGetter => NodeKind::ValueGetter,
            NodeType::ListSizeGetter => NodeKind::ListSizeGetter,
            NodeType::ListGetValue => NodeKind::ListGetValue,
            NodeType::ListGetFirst => NodeKind::ListGetFirst,
            NodeType::ListGetLast => NodeKind::ListGetLast,
            NodeType::Bool2Num => NodeKind::Bool2Num,
            NodeType::BoolConst => NodeKind::BoolConst(false),
            NodeType::Equals => NodeKind::Equals,
            NodeType::Less => NodeKind::Less,
            NodeType::LessEq => NodeKind::LessEq,
            NodeType::And => NodeKind::And,
            NodeType::Or => NodeKind::Or,
            NodeType::Xor => NodeKind::Xor,
            NodeType::Not => NodeKind::Not,
            NodeType::For => NodeKind::For,
            NodeType::Foreach => NodeKind::Foreach,
            NodeType::While => NodeKind::While,
            NodeType::AddLast => NodeKind::AddLast,
            NodeType::AddFirst => NodeKind::AddFirst,
            NodeType::RemoveFirst => NodeKind::RemoveFirst,
            NodeType::RemoveLast => NodeKind::RemoveLast,
            NodeType::If => NodeKind::If,
            NodeType::IfElse => NodeKind::IfElse,
            NodeType::Assign => NodeKind::Assign,
            NodeType::Increment => NodeKind::Increment,
            NodeType::Decrement => NodeKind::Decrement,
            NodeType::SetOutput => NodeKind::SetOutput,
            NodeType::Terminal => NodeKind::Terminal,
            NodeType::EntryPoint => NodeKind::EntryPoint,
        }
    }
}
