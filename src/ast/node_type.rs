//! Node discriminants, evaluation classes and slot signatures.
//!
//! Every [`NodeType`] declares a fixed list of [`SlotSpec`]s. The slot layout
//! never changes after a node is created, so the table here is the single
//! source of truth for arity and child classes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Evaluation category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    /// Evaluates to an integer.
    Numeric,
    /// Evaluates to a boolean.
    Boolean,
    /// Executes against the runtime store.
    Directive,
}

impl NodeClass {
    /// All classes, in table order.
    pub const ALL: [NodeClass; 3] = [NodeClass::Numeric, NodeClass::Boolean, NodeClass::Directive];

    /// Dense index for per-class tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            NodeClass::Numeric => 0,
            NodeClass::Boolean => 1,
            NodeClass::Directive => 2,
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeClass::Numeric => "numeric",
            NodeClass::Boolean => "boolean",
            NodeClass::Directive => "directive",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeClass {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeClass::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| NodeError::UnknownNodeType(s.to_string()))
    }
}

/// A typed child socket declared by a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// Class a child must have to be accepted.
    pub class: NodeClass,
    /// Human-readable role of the slot.
    pub description: &'static str,
}

impl SlotSpec {
    const fn new(class: NodeClass, description: &'static str) -> Self {
        Self { class, description }
    }
}

const NEXT: SlotSpec = SlotSpec::new(NodeClass::Directive, "next directive");

const NO_SLOTS: &[SlotSpec] = &[];
const NUM_ARGUMENT: &[SlotSpec] = &[SlotSpec::new(NodeClass::Numeric, "argument")];
const NUM_PAIR: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "first argument"),
    SlotSpec::new(NodeClass::Numeric, "second argument"),
];
const BOOL_ARGUMENT: &[SlotSpec] = &[SlotSpec::new(NodeClass::Boolean, "argument")];
const BOOL_PAIR: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Boolean, "first argument"),
    SlotSpec::new(NodeClass::Boolean, "second argument"),
];
const VARIABLE_READ: &[SlotSpec] = &[SlotSpec::new(NodeClass::Numeric, "variable index")];
const LIST_READ: &[SlotSpec] = &[SlotSpec::new(NodeClass::Numeric, "list index")];
const LIST_ITEM_READ: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "list index"),
    SlotSpec::new(NodeClass::Numeric, "item index"),
];
const FOR_SLOTS: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "iterator variable index"),
    SlotSpec::new(NodeClass::Numeric, "limit value"),
    SlotSpec::new(NodeClass::Directive, "body"),
    NEXT,
];
const FOREACH_SLOTS: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "iterator variable index"),
    SlotSpec::new(NodeClass::Numeric, "list index"),
    SlotSpec::new(NodeClass::Directive, "body"),
    NEXT,
];
const CONDITIONAL_BODY: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Boolean, "condition"),
    SlotSpec::new(NodeClass::Directive, "body"),
    NEXT,
];
const IF_ELSE_SLOTS: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Boolean, "condition"),
    SlotSpec::new(NodeClass::Directive, "if-branch"),
    SlotSpec::new(NodeClass::Directive, "else-branch"),
    NEXT,
];
const LIST_WRITE: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "list index"),
    SlotSpec::new(NodeClass::Numeric, "new value"),
    NEXT,
];
const LIST_REMOVE: &[SlotSpec] = &[SlotSpec::new(NodeClass::Numeric, "list index"), NEXT];
const ASSIGN_SLOTS: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "variable index"),
    SlotSpec::new(NodeClass::Numeric, "new value"),
    NEXT,
];
const VARIABLE_STEP: &[SlotSpec] = &[SlotSpec::new(NodeClass::Numeric, "variable index"), NEXT];
const SET_OUTPUT_SLOTS: &[SlotSpec] = &[
    SlotSpec::new(NodeClass::Numeric, "output index"),
    SlotSpec::new(NodeClass::Numeric, "value"),
    NEXT,
];
const ENTRY_SLOTS: &[SlotSpec] = &[NEXT];

/// Concrete node variant discriminant.
///
/// The payload-carrying counterpart is [`NodeKind`](super::NodeKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    // === Numeric ===
    /// Reads an input value.
    NumInput,
    /// Integer constant.
    NumConst,
    /// Rounded base-2 logarithm.
    Log,
    /// Rounded sine.
    Sin,
    /// Rounded tangent.
    Tan,
    /// Square.
    Sqr,
    /// Rounded square root.
    Sqrt,
    /// Addition.
    Plus,
    /// Subtraction.
    Minus,
    /// Protected integer division.
    Div,
    /// Protected remainder.
    Mod,
    /// Multiplication.
    Multiply,
    /// Random integer below a limit.
    Rand,
    /// Reads a variable.
    ValueGetter,
    /// Reads the length of a list.
    ListSizeGetter,
    /// Reads a list element.
    ListGetValue,
    /// Reads the first list element.
    ListGetFirst,
    /// Reads the last list element.
    ListGetLast,
    /// Boolean to 1/0.
    Bool2Num,

    // === Boolean ===
    /// Boolean literal. Legacy: never produced by profile sampling.
    BoolConst,
    /// Numeric equality.
    Equals,
    /// Numeric less-than.
    Less,
    /// Numeric less-or-equal.
    LessEq,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Exclusive or.
    Xor,
    /// Negation.
    Not,

    // === Directives ===
    /// Counting loop.
    For,
    /// Loop over list elements.
    Foreach,
    /// Conditional loop.
    While,
    /// Append to a list.
    AddLast,
    /// Prepend to a list.
    AddFirst,
    /// Drop the first list element.
    RemoveFirst,
    /// Drop the last list element.
    RemoveLast,
    /// Conditional.
    If,
    /// Two-way conditional.
    IfElse,
    /// Variable assignment.
    Assign,
    /// Variable increment.
    Increment,
    /// Variable decrement.
    Decrement,
    /// Writes an output value.
    SetOutput,
    /// End of a directive chain.
    Terminal,
    /// Program entry marker.
    EntryPoint,
}

impl NodeType {
    /// Number of variants.
    pub const COUNT: usize = 42;

    /// Every variant, in declaration order.
    pub const ALL: [NodeType; NodeType::COUNT] = [
        NodeType::NumInput,
        NodeType::NumConst,
        NodeType::Log,
        NodeType::Sin,
        NodeType::Tan,
        NodeType::Sqr,
        NodeType::Sqrt,
        NodeType::Plus,
        NodeType::Minus,
        NodeType::Div,
        NodeType::Mod,
        NodeType::Multiply,
        NodeType::Rand,
        NodeType::ValueGetter,
        NodeType::ListSizeGetter,
        NodeType::ListGetValue,
        NodeType::ListGetFirst,
        NodeType::ListGetLast,
        NodeType::Bool2Num,
        NodeType::BoolConst,
        NodeType::Equals,
        NodeType::Less,
        NodeType::LessEq,
        NodeType::And,
        NodeType::Or,
        NodeType::Xor,
        NodeType::Not,
        NodeType::For,
        NodeType::Foreach,
        NodeType::While,
        NodeType::AddLast,
        NodeType::AddFirst,
        NodeType::RemoveFirst,
        NodeType::RemoveLast,
        NodeType::If,
        NodeType::IfElse,
        NodeType::Assign,
        NodeType::Increment,
        NodeType::Decrement,
        NodeType::SetOutput,
        NodeType::Terminal,
        NodeType::EntryPoint,
    ];

    /// Dense index into per-type tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Evaluation class of this type.
    #[must_use]
    pub const fn class(self) -> NodeClass {
        match self {
            NodeType::NumInput
            | NodeType::NumConst
            | NodeType::Log
            | NodeType::Sin
            | NodeType::Tan
            | NodeType::Sqr
            | NodeType::Sqrt
            | NodeType::Plus
            | NodeType::Minus
            | NodeType::Div
            | NodeType::Mod
            | NodeType::Multiply
            | NodeType::Rand
            | NodeType::ValueGetter
            | NodeType::ListSizeGetter
            | NodeType::ListGetValue
            | NodeType::ListGetFirst
            | NodeType::ListGetLast
            | NodeType::Bool2Num => NodeClass::Numeric,

            NodeType::BoolConst
            | NodeType::Equals
            | NodeType::Less
            | NodeType::LessEq
            | NodeType::And
            | NodeType::Or
            | NodeType::Xor
            | NodeType::Not => NodeClass::Boolean,

            NodeType::For
            | NodeType::Foreach
            | NodeType::While
            | NodeType::AddLast
            | NodeType::AddFirst
            | NodeType::RemoveFirst
            | NodeType::RemoveLast
            | NodeType::If
            | NodeType::IfElse
            | NodeType::Assign
            | NodeType::Increment
            | NodeType::Decrement
            | NodeType::SetOutput
            | NodeType::Terminal
            | NodeType::EntryPoint => NodeClass::Directive,
        }
    }

    /// Slot signature of this type.
    #[must_use]
    pub const fn slots(self) -> &'static [SlotSpec] {
        match self {
            NodeType::NumInput | NodeType::NumConst | NodeType::BoolConst | NodeType::Terminal => {
                NO_SLOTS
            }
            NodeType::Log
            | NodeType::Sin
            | NodeType::Tan
            | NodeType::Sqr
            | NodeType::Sqrt
            | NodeType::Rand => NUM_ARGUMENT,
            NodeType::Plus
            | NodeType::Minus
            | NodeType::Div
            | NodeType::Mod
            | NodeType::Multiply
            | NodeType::Equals
            | NodeType::Less
            | NodeType::LessEq => NUM_PAIR,
            NodeType::ValueGetter => VARIABLE_READ,
            NodeType::ListSizeGetter | NodeType::ListGetFirst | NodeType::ListGetLast => LIST_READ,
            NodeType::ListGetValue => LIST_ITEM_READ,
            NodeType::Bool2Num | NodeType::Not => BOOL_ARGUMENT,
            NodeType::And | NodeType::Or | NodeType::Xor => BOOL_PAIR,
            NodeType::For => FOR_SLOTS,
            NodeType::Foreach => FOREACH_SLOTS,
            NodeType::While | NodeType::If => CONDITIONAL_BODY,
            NodeType::IfElse => IF_ELSE_SLOTS,
            NodeType::AddLast | NodeType::AddFirst => LIST_WRITE,
            NodeType::RemoveFirst | NodeType::RemoveLast => LIST_REMOVE,
            NodeType::Assign => ASSIGN_SLOTS,
            NodeType::Increment | NodeType::Decrement => VARIABLE_STEP,
            NodeType::SetOutput => SET_OUTPUT_SLOTS,
            NodeType::EntryPoint => ENTRY_SLOTS,
        }
    }

    /// Number of slots.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.slots().len()
    }

    /// True for types without slots.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.arity() == 0
    }

    /// Index of the chained "next directive" slot, if the type has one.
    #[must_use]
    pub const fn next_slot(self) -> Option<usize> {
        match self.class() {
            NodeClass::Directive if self.arity() > 0 => Some(self.arity() - 1),
            _ => None,
        }
    }

    /// True for types that random generation may pick.
    ///
    /// The entry point occurs exactly once per program and the boolean literal
    /// is kept only for compatibility.
    #[must_use]
    pub const fn is_generable(self) -> bool {
        !matches!(self, NodeType::EntryPoint | NodeType::BoolConst)
    }

    /// Variant name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NodeType::NumInput => "NumInput",
            NodeType::NumConst => "NumConst",
            NodeType::Log => "Log",
            NodeType::Sin => "Sin",
            NodeType::Tan => "Tan",
            NodeType::Sqr => "Sqr",
            NodeType::Sqrt => "Sqrt",
            NodeType::Plus => "Plus",
            NodeType::Minus => "Minus",
            NodeType::Div => "Div",
            NodeType::Mod => "Mod",
            NodeType::Multiply => "Multiply",
            NodeType::Rand => "Rand",
            NodeType::ValueGetter => "ValueGetter",
            NodeType::ListSizeGetter => "ListSizeGetter",
            NodeType::ListGetValue => "ListGetValue",
            NodeType::ListGetFirst => "ListGetFirst",
            NodeType::ListGetLast => "ListGetLast",
            NodeType::Bool2Num => "Bool2Num",
            NodeType::BoolConst => "BoolConst",
            NodeType::Equals => "Equals",
            NodeType::Less => "Less",
            NodeType::LessEq => "LessEq",
            NodeType::And => "And",
            NodeType::Or => "Or",
            NodeType::Xor => "Xor",
            NodeType::Not => "Not",
            NodeType::For => "For",
            NodeType::Foreach => "Foreach",
            NodeType::While => "While",
            NodeType::AddLast => "AddLast",
            NodeType::AddFirst => "AddFirst",
            NodeType::RemoveFirst => "RemoveFirst",
            NodeType::RemoveLast => "RemoveLast",
            NodeType::If => "If",
            NodeType::IfElse => "IfElse",
            NodeType::Assign => "Assign",
            NodeType::Increment => "Increment",
            NodeType::Decrement => "Decrement",
            NodeType::SetOutput => "SetOutput",
            NodeType::Terminal => "Terminal",
            NodeType::EntryPoint => "EntryPoint",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeType {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| NodeError::UnknownNodeType(s.to_string()))
    }
}

/// Per-class type lists, computed once and shared by reference.
///
/// Lists are ordered by arity (stable with respect to declaration order),
/// which makes exhaustive enumeration emit small trees first.
#[derive(Debug, Clone)]
pub struct TypeTable {
    by_class: [Vec<NodeType>; 3],
    generable: [Vec<NodeType>; 3],
    terminals: [Vec<NodeType>; 3],
    nonterminals: [Vec<NodeType>; 3],
}

impl TypeTable {
    /// Build the table.
    #[must_use]
    pub fn new() -> Self {
        let mut ordered = NodeType::ALL.to_vec();
        ordered.sort_by_key(|t| t.arity());

        let per_class = |keep: &dyn Fn(NodeType) -> bool| {
            NodeClass::ALL.map(|class| {
                ordered
                    .iter()
                    .copied()
                    .filter(|t| t.class() == class && *t != NodeType::EntryPoint && keep(*t))
                    .collect::<Vec<_>>()
            })
        };

        Self {
            by_class: per_class(&|_| true),
            generable: per_class(&NodeType::is_generable),
            terminals: per_class(&NodeType::is_terminal),
            nonterminals: per_class(&|t| !t.is_terminal()),
        }
    }

    /// All types of a class except the entry point.
    #[must_use]
    pub fn types(&self, class: NodeClass) -> &[NodeType] {
        &self.by_class[class.index()]
    }

    /// Types random generation may pick for a class.
    #[must_use]
    pub fn generable(&self, class: NodeClass) -> &[NodeType] {
        &self.generable[class.index()]
    }

    /// Slot-less types of a class.
    #[must_use]
    pub fn terminals(&self, class: NodeClass) -> &[NodeType] {
        &self.terminals[class.index()]
    }

    /// Types of a class that have at least one slot, entry point excluded.
    #[must_use]
    pub fn nonterminals(&self, class: NodeClass) -> &[NodeType] {
        &self.nonterminals[class.index()]
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
