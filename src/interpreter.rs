//! Tree-walking interpreter.
//!
//! Expressions are evaluated recursively; directive chains are walked
//! iteratively. Execution never fails: degenerate arithmetic has defined
//! results, loops stop at `loop_limit` iterations, and a run stops silently
//! once it has executed `step_budget` directives.

mod store;

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub use store::InterpreterConfig;
use store::Store;

use crate::ast::{NodeId, NodeKind, Tree};

/// Summary of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Directives executed.
    pub steps: u64,
    /// True if the step budget ran out before the chain ended.
    pub out_of_fuel: bool,
}

/// Evaluates trees against a runtime store.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: InterpreterConfig,
    store: Store,
    rng: SmallRng,
    fuel: u64,
    starved: bool,
}

// Float results saturate; NaN maps to 0.
#[allow(clippy::cast_possible_truncation)]
fn round_to_i32(x: f64) -> i32 {
    x.round_ties_even() as i32
}

impl Interpreter {
    /// Create an interpreter with an empty store.
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            store: Store::new(&config),
            rng: SmallRng::seed_from_u64(config.seed),
            fuel: config.step_budget,
            starved: false,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Clear variables, lists and outputs and refill the step budget.
    pub fn reset(&mut self) {
        self.store.reset();
        self.refuel();
    }

    fn refuel(&mut self) {
        self.fuel = self.config.step_budget;
        self.starved = false;
    }

    /// Replace the input vector.
    pub fn set_inputs(&mut self, inputs: &[i32]) {
        self.store.set_inputs(inputs);
    }

    /// All output slots.
    #[must_use]
    pub fn outputs(&self) -> &[i32] {
        self.store.outputs()
    }

    /// Output slot `index`, or 0 beyond the output limit.
    #[must_use]
    pub fn output(&self, index: usize) -> i32 {
        self.store.outputs().get(index).copied().unwrap_or(0)
    }

    /// Current value of variable `index` (wrapped).
    #[must_use]
    pub fn variable(&self, index: i32) -> i32 {
        self.store.variable(index)
    }

    /// Current contents of list `index` (wrapped).
    #[must_use]
    pub fn list(&self, index: i32) -> &VecDeque<i32> {
        self.store.list(index)
    }

    /// Execute the chain starting at `entry` with a full step budget.
    ///
    /// The store is not reset.
    pub fn run(&mut self, tree: &Tree, entry: NodeId) -> RunReport {
        self.refuel();
        self.execute_all(tree, entry);
        RunReport {
            steps: self.config.step_budget - self.fuel,
            out_of_fuel: self.starved,
        }
    }

    // === Expressions ===

    /// Evaluate a numeric expression.
    pub fn eval_numeric(&mut self, tree: &Tree, id: NodeId) -> i32 {
        let args = tree.successors(id);
        match tree.kind(id) {
            NodeKind::NumConst(value) => value,
            NodeKind::NumInput(index) => self.store.input(index),
            NodeKind::Log => {
                let x = self.eval_numeric(tree, args[0]);
                if x <= 0 { 0 } else { round_to_i32(f64::from(x).log2()) }
            }
            NodeKind::Sin => round_to_i32(f64::from(self.eval_numeric(tree, args[0])).sin()),
            NodeKind::Tan => round_to_i32(f64::from(self.eval_numeric(tree, args[0])).tan()),
            NodeKind::Sqr => {
                let x = self.eval_numeric(tree, args[0]);
                x.wrapping_mul(x)
            }
            NodeKind::Sqrt => {
                let x = self.eval_numeric(tree, args[0]);
                if x < 0 { 0 } else { round_to_i32(f64::from(x).sqrt()) }
            }
            NodeKind::Plus => {
                let a = self.eval_numeric(tree, args[0]);
                a.wrapping_add(self.eval_numeric(tree, args[1]))
            }
            NodeKind::Minus => {
                let a = self.eval_numeric(tree, args[0]);
                a.wrapping_sub(self.eval_numeric(tree, args[1]))
            }
            NodeKind::Multiply => {
                let a = self.eval_numeric(tree, args[0]);
                a.wrapping_mul(self.eval_numeric(tree, args[1]))
            }
            NodeKind::Div => {
                let divisor = self.eval_numeric(tree, args[1]);
                if divisor == 0 {
                    return 0;
                }
                self.eval_numeric(tree, args[0]).wrapping_div(divisor)
            }
            NodeKind::Mod => {
                let dividend = self.eval_numeric(tree, args[0]);
                if dividend == 0 {
                    return 0;
                }
                let divisor = self.eval_numeric(tree, args[1]);
                if divisor == 0 {
                    return dividend;
                }
                dividend.wrapping_rem(divisor)
            }
            NodeKind::Rand => {
                let limit = self.eval_numeric(tree, args[0]);
                if limit <= 0 { 0 } else { self.rng.gen_range(0..limit) }
            }
            NodeKind::ValueGetter => {
                let index = self.eval_numeric(tree, args[0]);
                self.store.variable(index)
            }
            NodeKind::ListSizeGetter => {
                let index = self.eval_numeric(tree, args[0]);
                i32::try_from(self.store.list(index).len()).unwrap_or(i32::MAX)
            }
            NodeKind::ListGetValue => {
                let index = self.eval_numeric(tree, args[0]);
                let item = self.eval_numeric(tree, args[1]);
                self.store.list_item(index, item)
            }
            NodeKind::ListGetFirst => {
                let index = self.eval_numeric(tree, args[0]);
                self.store.list(index).front().copied().unwrap_or(0)
            }
            NodeKind::ListGetLast => {
                let index = self.eval_numeric(tree, args[0]);
                self.store.list(index).back().copied().unwrap_or(0)
            }
            NodeKind::Bool2Num => i32::from(self.eval_bool(tree, args[0])),
            // Slot typing keeps other classes out of numeric positions.
            _ => 0,
        }
    }

    /// Evaluate a boolean expression. Both operands are always evaluated.
    pub fn eval_bool(&mut self, tree: &Tree, id: NodeId) -> bool {
        let args = tree.successors(id);
        match tree.kind(id) {
            NodeKind::BoolConst(value) => value,
            NodeKind::Equals => {
                let a = self.eval_numeric(tree, args[0]);
                a == self.eval_numeric(tree, args[1])
            }
            NodeKind::Less => {
                let a = self.eval_numeric(tree, args[0]);
                a < self.eval_numeric(tree, args[1])
            }
            NodeKind::LessEq => {
                let a = self.eval_numeric(tree, args[0]);
                a <= self.eval_numeric(tree, args[1])
            }
            NodeKind::And => {
                let a = self.eval_bool(tree, args[0]);
                let b = self.eval_bool(tree, args[1]);
                a && b
            }
            NodeKind::Or => {
                let a = self.eval_bool(tree, args[0]);
                let b = self.eval_bool(tree, args[1]);
                a || b
            }
            NodeKind::Xor => {
                let a = self.eval_bool(tree, args[0]);
                let b = self.eval_bool(tree, args[1]);
                a ^ b
            }
            NodeKind::Not => !self.eval_bool(tree, args[0]),
            _ => false,
        }
    }

    // === Directives ===

    fn has_fuel(&self) -> bool {
        self.fuel > 0
    }

    /// Run `id` and every directive chained after it.
    pub fn execute_all(&mut self, tree: &Tree, id: NodeId) {
        let mut current = Some(id);
        while let Some(directive) = current {
            if !self.has_fuel() {
                self.starved = true;
                return;
            }
            self.execute(tree, directive);
            current = tree.next_directive(directive);
        }
    }

    /// Run one directive without following its next slot.
    ///
    /// Bodies and branches run to the end of their own chain.
    pub fn execute(&mut self, tree: &Tree, id: NodeId) {
        if !self.has_fuel() {
            self.starved = true;
            return;
        }
        self.fuel -= 1;

        let args = tree.successors(id);
        let loop_limit = self.config.loop_limit;
        match tree.kind(id) {
            NodeKind::For => {
                let limit = self.eval_numeric(tree, args[1]);
                let index = self.eval_numeric(tree, args[0]);
                let slot = self.store.variable_slot(index);
                let mut counter = 0;
                while counter < loop_limit && self.has_fuel() && self.store.variable_at(slot) < limit {
                    self.execute_all(tree, args[2]);
                    let var = self.store.variable_mut(slot);
                    *var = var.wrapping_add(1);
                    counter += 1;
                }
            }
            // The element position is an internal counter, not a store
            // variable, so the body cannot skip or repeat elements by
            // writing to one. The loop variable receives the element value.
            NodeKind::Foreach => {
                let index = self.eval_numeric(tree, args[0]);
                let slot = self.store.variable_slot(index);
                let list_index = self.eval_numeric(tree, args[1]);
                let list = self.store.list_slot(list_index);
                let mut position = 0;
                while position < loop_limit && self.has_fuel() {
                    // The body may grow or shrink the list.
                    let Some(&value) = self.store.list_at(list).get(position) else {
                        break;
                    };
                    *self.store.variable_mut(slot) = value;
                    self.execute_all(tree, args[2]);
                    position += 1;
                }
            }
            NodeKind::While => {
                let mut counter = 0;
                while self.eval_bool(tree, args[0]) && counter < loop_limit && self.has_fuel() {
                    self.execute_all(tree, args[1]);
                    counter += 1;
                }
            }
            NodeKind::If => {
                if self.eval_bool(tree, args[0]) {
                    self.execute_all(tree, args[1]);
                }
            }
            NodeKind::IfElse => {
                let branch = if self.eval_bool(tree, args[0]) { args[1] } else { args[2] };
                self.execute_all(tree, branch);
            }
            NodeKind::AddLast => {
                let index = self.eval_numeric(tree, args[0]);
                let value = self.eval_numeric(tree, args[1]);
                self.store.list_mut(index).push_back(value);
            }
            NodeKind::AddFirst => {
                let index = self.eval_numeric(tree, args[0]);
                let value = self.eval_numeric(tree, args[1]);
                self.store.list_mut(index).push_front(value);
            }
            NodeKind::RemoveFirst => {
                let index = self.eval_numeric(tree, args[0]);
                self.store.list_mut(index).pop_front();
            }
            NodeKind::RemoveLast => {
                let index = self.eval_numeric(tree, args[0]);
                self.store.list_mut(index).pop_back();
            }
            NodeKind::Assign => {
                let index = self.eval_numeric(tree, args[0]);
                let slot = self.store.variable_slot(index);
                let value = self.eval_numeric(tree, args[1]);
                *self.store.variable_mut(slot) = value;
            }
            NodeKind::Increment => {
                let index = self.eval_numeric(tree, args[0]);
                let slot = self.store.variable_slot(index);
                let var = self.store.variable_mut(slot);
                *var = var.wrapping_add(1);
            }
            NodeKind::Decrement => {
                let index = self.eval_numeric(tree, args[0]);
                let slot = self.store.variable_slot(index);
                let var = self.store.variable_mut(slot);
                *var = var.wrapping_sub(1);
            }
            NodeKind::SetOutput => {
                let index = self.eval_numeric(tree, args[0]);
                let value = self.eval_numeric(tree, args[1]);
                self.store.set_output(index, value);
            }
            // Terminal and EntryPoint do nothing; expressions never occupy
            // directive positions.
            _ => {}
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeClass, NodeType};

    fn num(tree: &mut Tree, value: i32) -> NodeId {
        tree.create_kind(NodeKind::NumConst(value))
    }

    fn binary(kind: NodeKind, a: i32, b: i32) -> i32 {
        let mut tree = Tree::new();
        let a = num(&mut tree, a);
        let b = num(&mut tree, b);
        let node = tree.build(kind, &[a, b]).unwrap();
        Interpreter::default().eval_numeric(&tree, node)
    }

    fn unary(kind: NodeKind, a: i32) -> i32 {
        let mut tree = Tree::new();
        let a = num(&mut tree, a);
        let node = tree.build(kind, &[a]).unwrap();
        Interpreter::default().eval_numeric(&tree, node)
    }

    #[test]
    fn test_protected_division() {
        assert_eq!(binary(NodeKind::Div, 7, 0), 0);
        assert_eq!(binary(NodeKind::Div, 7, 2), 3);
        assert_eq!(binary(NodeKind::Div, i32::MIN, -1), i32::MIN);
        assert_eq!(binary(NodeKind::Mod, 7, 0), 7);
        assert_eq!(binary(NodeKind::Mod, 0, 5), 0);
        assert_eq!(binary(NodeKind::Mod, 7, 3), 1);
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(binary(NodeKind::Plus, i32::MAX, 1), i32::MIN);
        assert_eq!(binary(NodeKind::Minus, i32::MIN, 1), i32::MAX);
        assert_eq!(unary(NodeKind::Sqr, 65536), 0);
    }

    #[test]
    fn test_math_functions() {
        assert_eq!(unary(NodeKind::Log, 8), 3);
        assert_eq!(unary(NodeKind::Log, 0), 0);
        assert_eq!(unary(NodeKind::Log, -4), 0);
        assert_eq!(unary(NodeKind::Sqrt, 16), 4);
        assert_eq!(unary(NodeKind::Sqrt, 15), 4);
        assert_eq!(unary(NodeKind::Sqrt, -1), 0);
        assert_eq!(unary(NodeKind::Sin, 2), 1);
        assert_eq!(unary(NodeKind::Tan, 1), 2);
        assert_eq!(unary(NodeKind::Rand, 0), 0);
        assert_eq!(unary(NodeKind::Rand, -5), 0);
    }

    #[test]
    fn test_rand_stays_below_limit() {
        let mut tree = Tree::new();
        let limit = num(&mut tree, 3);
        let node = tree.build(NodeKind::Rand, &[limit]).unwrap();
        let mut interp = Interpreter::default();
        for _ in 0..100 {
            let value = interp.eval_numeric(&tree, node);
            assert!((0..3).contains(&value));
        }
    }

    #[test]
    fn test_empty_list_reads_zero() {
        let mut tree = Tree::new();
        let list = num(&mut tree, 5);
        let first = tree.build(NodeKind::ListGetFirst, &[list]).unwrap();
        let list = num(&mut tree, 5);
        let item = num(&mut tree, 3);
        let value = tree.build(NodeKind::ListGetValue, &[list, item]).unwrap();
        let mut interp = Interpreter::default();
        assert_eq!(interp.eval_numeric(&tree, first), 0);
        assert_eq!(interp.eval_numeric(&tree, value), 0);
    }

    #[test]
    fn test_boolean_operators() {
        let mut tree = Tree::new();
        let t = tree.create_kind(NodeKind::BoolConst(true));
        let f = tree.create_kind(NodeKind::BoolConst(false));
        let xor = tree.build(NodeKind::Xor, &[t, f]).unwrap();
        let t2 = tree.create_kind(NodeKind::BoolConst(true));
        let f2 = tree.create_kind(NodeKind::BoolConst(false));
        let and = tree.build(NodeKind::And, &[t2, f2]).unwrap();
        let a = num(&mut tree, 2);
        let b = num(&mut tree, 2);
        let le = tree.build(NodeKind::LessEq, &[a, b]).unwrap();
        let mut interp = Interpreter::default();
        assert!(interp.eval_bool(&tree, xor));
        assert!(!interp.eval_bool(&tree, and));
        assert!(interp.eval_bool(&tree, le));
    }

    #[test]
    fn test_for_counts_to_limit() {
        // for var[0] < 10 { var[1]++ }
        let mut tree = Tree::new();
        let counter = num(&mut tree, 1);
        let body = tree.build(NodeKind::Increment, &[counter]).unwrap();
        let index = num(&mut tree, 0);
        let limit = num(&mut tree, 10);
        let for_loop = tree.build(NodeKind::For, &[index, limit, body]).unwrap();

        let mut interp = Interpreter::default();
        interp.run(&tree, for_loop);
        assert_eq!(interp.variable(0), 10);
        assert_eq!(interp.variable(1), 10);
    }

    #[test]
    fn test_infinite_while_stops_at_loop_limit() {
        let mut tree = Tree::new();
        let cond = tree.create_kind(NodeKind::BoolConst(true));
        let var = num(&mut tree, 0);
        let body = tree.build(NodeKind::Increment, &[var]).unwrap();
        let spin = tree.build(NodeKind::While, &[cond, body]).unwrap();

        let mut interp = Interpreter::default();
        let report = interp.run(&tree, spin);
        assert_eq!(interp.variable(0), 1000);
        assert!(!report.out_of_fuel);
        // The while, 1000 body runs of two directives, and the trailing end.
        assert_eq!(report.steps, 2002);
    }

    #[test]
    fn test_nested_loops_stop_at_step_budget() {
        let mut tree = Tree::new();
        let var = num(&mut tree, 0);
        let inner_body = tree.build(NodeKind::Increment, &[var]).unwrap();
        let cond = tree.create_kind(NodeKind::BoolConst(true));
        let inner = tree.build(NodeKind::While, &[cond, inner_body]).unwrap();
        let cond = tree.create_kind(NodeKind::BoolConst(true));
        let outer = tree.build(NodeKind::While, &[cond, inner]).unwrap();

        let mut interp = Interpreter::new(InterpreterConfig {
            step_budget: 5000,
            ..InterpreterConfig::default()
        });
        let report = interp.run(&tree, outer);
        assert!(report.out_of_fuel);
        assert_eq!(report.steps, 5000);
    }

    #[test]
    fn test_foreach_visits_every_element() {
        // push_back list[2] 3, 4, 5; foreach var[0] in list[2] { var[1] := var[1] + var[0] }
        let mut tree = Tree::new();
        let mut pushes = Vec::new();
        for value in [3, 4, 5] {
            let list = num(&mut tree, 2);
            let value = num(&mut tree, value);
            pushes.push(tree.build(NodeKind::AddLast, &[list, value]).unwrap());
        }
        let target = num(&mut tree, 1);
        let acc_index = num(&mut tree, 1);
        let acc = tree.build(NodeKind::ValueGetter, &[acc_index]).unwrap();
        let item_index = num(&mut tree, 0);
        let item = tree.build(NodeKind::ValueGetter, &[item_index]).unwrap();
        let sum = tree.build(NodeKind::Plus, &[acc, item]).unwrap();
        let body = tree.build(NodeKind::Assign, &[target, sum]).unwrap();
        let var = num(&mut tree, 0);
        let list = num(&mut tree, 2);
        let each = tree.build(NodeKind::Foreach, &[var, list, body]).unwrap();
        pushes.push(each);
        tree.chain(&pushes).unwrap();

        let mut interp = Interpreter::default();
        interp.run(&tree, pushes[0]);
        assert_eq!(interp.variable(1), 12);
        assert_eq!(interp.list(2).len(), 3);
    }

    #[test]
    fn test_if_else_runs_one_branch_then_continues() {
        let mut tree = Tree::new();
        let cond = tree.create_kind(NodeKind::BoolConst(false));
        let then_var = num(&mut tree, 0);
        let then_branch = tree.build(NodeKind::Increment, &[then_var]).unwrap();
        let else_var = num(&mut tree, 1);
        let else_branch = tree.build(NodeKind::Increment, &[else_var]).unwrap();
        let branch = tree.build(NodeKind::IfElse, &[cond, then_branch, else_branch]).unwrap();
        let out = num(&mut tree, 0);
        let value = num(&mut tree, 42);
        let set = tree.build(NodeKind::SetOutput, &[out, value]).unwrap();
        tree.chain(&[branch, set]).unwrap();

        let mut interp = Interpreter::default();
        interp.run(&tree, branch);
        assert_eq!(interp.variable(0), 0);
        assert_eq!(interp.variable(1), 1);
        assert_eq!(interp.output(0), 42);
    }

    #[test]
    fn test_execute_does_not_follow_next() {
        let mut tree = Tree::new();
        let first = tree.create_node(NodeType::Increment);
        let second = tree.create_node(NodeType::Increment);
        tree.chain(&[first, second]).unwrap();
        let mut interp = Interpreter::default();
        interp.execute(&tree, first);
        assert_eq!(interp.variable(0), 1);
        interp.execute_all(&tree, first);
        assert_eq!(interp.variable(0), 3);
    }

    #[test]
    fn test_list_edits() {
        let mut tree = Tree::new();
        let mut chain = Vec::new();
        for (kind, value) in [(NodeKind::AddLast, 1), (NodeKind::AddFirst, 2), (NodeKind::AddLast, 3)] {
            let list = num(&mut tree, 0);
            let value = num(&mut tree, value);
            chain.push(tree.build(kind, &[list, value]).unwrap());
        }
        let list = num(&mut tree, 0);
        chain.push(tree.build(NodeKind::RemoveLast, &[list]).unwrap());
        let list = num(&mut tree, 0);
        chain.push(tree.build(NodeKind::RemoveFirst, &[list]).unwrap());
        tree.chain(&chain).unwrap();

        let mut interp = Interpreter::default();
        interp.run(&tree, chain[0]);
        assert_eq!(interp.list(0).iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut tree = Tree::new();
        let set = tree.create_node(NodeType::Increment);
        let mut interp = Interpreter::default();
        interp.run(&tree, set);
        assert_eq!(interp.variable(0), 1);
        interp.reset();
        assert_eq!(interp.variable(0), 0);
        let stop = tree.default_leaf(NodeClass::Directive);
        let report = interp.run(&tree, stop);
        assert_eq!(report.steps, 1);
    }
}
