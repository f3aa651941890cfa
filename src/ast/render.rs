//! Human-readable views of trees: short labels, pseudo-source, and a
//! serializable nested view.

use std::fmt::Write as _;

use serde::Serialize;

use super::kind::NodeKind;
use super::node_type::{NodeClass, NodeType};
use super::tree::{NodeId, Tree};

impl NodeKind {
    /// Short display label.
    #[must_use]
    pub fn label(self) -> String {
        let text = match self {
            NodeKind::NumInput(i) => return format!("input[{i}]"),
            NodeKind::NumConst(c) => return c.to_string(),
            NodeKind::BoolConst(b) => return b.to_string(),
            NodeKind::Log => "log2",
            NodeKind::Sin => "sin",
            NodeKind::Tan => "tan",
            NodeKind::Sqr => "sqr",
            NodeKind::Sqrt => "sqrt",
            NodeKind::Plus => "+",
            NodeKind::Minus => "-",
            NodeKind::Div => "/",
            NodeKind::Mod => "%",
            NodeKind::Multiply => "*",
            NodeKind::Rand => "rand",
            NodeKind::ValueGetter => "var",
            NodeKind::ListSizeGetter => "len",
            NodeKind::ListGetValue => "item",
            NodeKind::ListGetFirst => "first",
            NodeKind::ListGetLast => "last",
            NodeKind::Bool2Num => "num",
            NodeKind::Equals => "==",
            NodeKind::Less => "<",
            NodeKind::LessEq => "<=",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Xor => "xor",
            NodeKind::Not => "not",
            NodeKind::For => "for",
            NodeKind::Foreach => "foreach",
            NodeKind::While => "while",
            NodeKind::AddLast => "push_back",
            NodeKind::AddFirst => "push_front",
            NodeKind::RemoveFirst => "pop_front",
            NodeKind::RemoveLast => "pop_back",
            NodeKind::If => "if",
            NodeKind::IfElse => "if-else",
            NodeKind::Assign => ":=",
            NodeKind::Increment => "++",
            NodeKind::Decrement => "--",
            NodeKind::SetOutput => "output",
            NodeKind::Terminal => "end",
            NodeKind::EntryPoint => "start",
        };
        text.to_string()
    }
}

impl Tree {
    /// Label of a single node.
    #[must_use]
    pub fn label(&self, id: NodeId) -> String {
        self.kind(id).label()
    }

    /// Render the subtree at `root` as indented pseudo-source.
    ///
    /// Expressions print inline; directive chains print one statement per
    /// line with nested bodies indented.
    #[must_use]
    pub fn render(&self, root: NodeId) -> String {
        let mut writer = SourceWriter {
            tree: self,
            out: String::new(),
        };
        match self.class(root) {
            NodeClass::Directive => writer.block(root, 0),
            _ => {
                writer.expr(root);
                writer.out.push('\n');
            }
        }
        writer.out
    }

    /// Serializable nested view of the subtree at `root`.
    #[must_use]
    pub fn view(&self, root: NodeId) -> NodeView {
        NodeView {
            node_type: self.node_type(root),
            class: self.class(root),
            label: self.label(root),
            slots: self
                .slot_specs(root)
                .iter()
                .zip(self.successors(root))
                .map(|(spec, &child)| SlotView {
                    description: spec.description,
                    node: self.view(child),
                })
                .collect(),
        }
    }
}

/// A node with its slots, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    /// Node type.
    pub node_type: NodeType,
    /// Evaluation class.
    pub class: NodeClass,
    /// Display label.
    pub label: String,
    /// Children in slot order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotView>,
}

/// One filled slot in a [`NodeView`].
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    /// Role of the slot.
    pub description: &'static str,
    /// The child.
    pub node: NodeView,
}

struct SourceWriter<'a> {
    tree: &'a Tree,
    out: String,
}

impl SourceWriter<'_> {
    fn child(&self, id: NodeId, slot: usize) -> NodeId {
        self.tree.successors(id)[slot]
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("    ");
        }
    }

    fn expr(&mut self, id: NodeId) {
        let tree = self.tree;
        let kind = tree.kind(id);
        let children = tree.successors(id);
        match (kind, children) {
            (_, []) => self.out.push_str(&kind.label()),
            (
                NodeKind::Plus
                | NodeKind::Minus
                | NodeKind::Div
                | NodeKind::Mod
                | NodeKind::Multiply
                | NodeKind::Equals
                | NodeKind::Less
                | NodeKind::LessEq
                | NodeKind::And
                | NodeKind::Or
                | NodeKind::Xor,
                &[lhs, rhs],
            ) => {
                self.out.push('(');
                self.expr(lhs);
                let _ = write!(self.out, " {} ", kind.label());
                self.expr(rhs);
                self.out.push(')');
            }
            (NodeKind::ListGetValue, &[list, item]) => {
                self.out.push_str("list[");
                self.expr(list);
                self.out.push_str("][");
                self.expr(item);
                self.out.push(']');
            }
            (NodeKind::ValueGetter, &[index]) => {
                self.out.push_str("var[");
                self.expr(index);
                self.out.push(']');
            }
            _ => {
                self.out.push_str(&kind.label());
                self.out.push('(');
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(child);
                }
                self.out.push(')');
            }
        }
    }

    /// Print a directive chain starting at `id`, stopping at `Terminal`.
    fn block(&mut self, mut id: NodeId, depth: usize) {
        loop {
            let kind = self.tree.kind(id);
            match kind {
                NodeKind::Terminal => return,
                NodeKind::EntryPoint => {}
                NodeKind::For | NodeKind::Foreach => {
                    self.indent(depth);
                    let _ = write!(self.out, "{} var[", kind.label());
                    self.expr(self.child(id, 0));
                    self.out.push_str(if kind == NodeKind::For { "] < " } else { "] in list[" });
                    self.expr(self.child(id, 1));
                    self.out.push_str(if kind == NodeKind::For { " {\n" } else { "] {\n" });
                    self.body(self.child(id, 2), depth);
                }
                NodeKind::While | NodeKind::If => {
                    self.indent(depth);
                    let _ = write!(self.out, "{} ", kind.label());
                    self.expr(self.child(id, 0));
                    self.out.push_str(" {\n");
                    self.body(self.child(id, 1), depth);
                }
                NodeKind::IfElse => {
                    self.indent(depth);
                    self.out.push_str("if ");
                    self.expr(self.child(id, 0));
                    self.out.push_str(" {\n");
                    self.block(self.child(id, 1), depth + 1);
                    self.indent(depth);
                    self.out.push_str("} else {\n");
                    self.body(self.child(id, 2), depth);
                }
                NodeKind::Assign => {
                    self.indent(depth);
                    self.out.push_str("var[");
                    self.expr(self.child(id, 0));
                    self.out.push_str("] := ");
                    self.expr(self.child(id, 1));
                    self.out.push('\n');
                }
                NodeKind::Increment | NodeKind::Decrement => {
                    self.indent(depth);
                    self.out.push_str("var[");
                    self.expr(self.child(id, 0));
                    let _ = writeln!(self.out, "]{}", kind.label());
                }
                NodeKind::SetOutput => {
                    self.indent(depth);
                    self.out.push_str("output[");
                    self.expr(self.child(id, 0));
                    self.out.push_str("] := ");
                    self.expr(self.child(id, 1));
                    self.out.push('\n');
                }
                _ => {
                    // List edits: every slot but the last is an expression.
                    self.indent(depth);
                    let _ = write!(self.out, "{} list[", kind.label());
                    let tree = self.tree;
                    let args = tree.successors(id);
                    let exprs = &args[..args.len() - 1];
                    for (i, &arg) in exprs.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str("], ");
                        }
                        self.expr(arg);
                    }
                    if exprs.len() == 1 {
                        self.out.push(']');
                    }
                    self.out.push('\n');
                }
            }
            match self.tree.next_directive(id) {
                Some(next) => id = next,
                None => return,
            }
        }
    }

    fn body(&mut self, first: NodeId, depth: usize) {
        self.block(first, depth + 1);
        self.indent(depth);
        self.out.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(NodeKind::NumConst(-3).label(), "-3");
        assert_eq!(NodeKind::NumInput(1).label(), "input[1]");
        assert_eq!(NodeKind::BoolConst(true).label(), "true");
        assert_eq!(NodeKind::Terminal.label(), "end");
    }

    #[test]
    fn test_render_set_output() {
        let mut tree = Tree::new();
        let index = tree.create_kind(NodeKind::NumConst(0));
        let a = tree.create_kind(NodeKind::NumInput(0));
        let b = tree.create_kind(NodeKind::NumInput(1));
        let sum = tree.build(NodeKind::Plus, &[a, b]).unwrap();
        let set = tree.build(NodeKind::SetOutput, &[index, sum]).unwrap();
        let entry = tree.build(NodeKind::EntryPoint, &[set]).unwrap();
        assert_eq!(tree.render(entry), "output[0] := (input[0] + input[1])\n");
    }

    #[test]
    fn test_render_nested_body() {
        let mut tree = Tree::new();
        let cond = tree.create_kind(NodeKind::BoolConst(true));
        let var = tree.create_kind(NodeKind::NumConst(2));
        let inc = tree.build(NodeKind::Increment, &[var]).unwrap();
        let branch = tree.build(NodeKind::If, &[cond, inc]).unwrap();
        assert_eq!(tree.render(branch), "if true {\n    var[2]++\n}\n");
    }

    #[test]
    fn test_render_list_edits() {
        let mut tree = Tree::new();
        let list = tree.create_kind(NodeKind::NumConst(1));
        let value = tree.create_kind(NodeKind::NumConst(5));
        let push = tree.build(NodeKind::AddLast, &[list, value]).unwrap();
        let list = tree.create_kind(NodeKind::NumConst(1));
        let pop = tree.build(NodeKind::RemoveFirst, &[list]).unwrap();
        tree.chain(&[push, pop]).unwrap();
        assert_eq!(tree.render(push), "push_back list[1], 5\npop_front list[1]\n");
    }

    #[test]
    fn test_view_serializes_slots() {
        let mut tree = Tree::new();
        let node = tree.create_node(NodeType::Not);
        let json = serde_json::to_value(tree.view(node)).unwrap();
        assert_eq!(json["node_type"], "Not");
        assert_eq!(json["class"], "boolean");
        assert_eq!(json["slots"][0]["description"], "argument");
        assert_eq!(json["slots"][0]["node"]["label"], "false");
    }
}
