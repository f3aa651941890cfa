//! Runtime store: variables, lists, inputs and outputs.
//!
//! Every accessor wraps its index into range instead of failing. Negative
//! indices wrap upward (`-1` addresses the last slot).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Size limits of the runtime store and execution caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Number of numeric variables.
    pub variables_limit: usize,
    /// Number of lists.
    pub lists_limit: usize,
    /// Number of output slots.
    pub outputs_limit: usize,
    /// Iteration cap of a single loop execution.
    pub loop_limit: usize,
    /// Directives executed per run before execution stops.
    pub step_budget: u64,
    /// Seed of the generator behind `Rand` nodes.
    pub seed: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            variables_limit: 1000,
            lists_limit: 100,
            outputs_limit: 1000,
            loop_limit: 1000,
            step_budget: 1_000_000,
            seed: 0,
        }
    }
}

/// Map any integer index into `0..len`. `len` must be non-zero.
fn wrap(index: i32, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    usize::try_from(i64::from(index).rem_euclid(len)).unwrap_or(0)
}

/// Mutable state a program reads and writes.
#[derive(Debug, Clone)]
pub(super) struct Store {
    variables: Vec<i32>,
    lists: Vec<VecDeque<i32>>,
    inputs: Vec<i32>,
    outputs: Vec<i32>,
}

impl Store {
    pub(super) fn new(config: &InterpreterConfig) -> Self {
        Self {
            variables: vec![0; config.variables_limit.max(1)],
            lists: vec![VecDeque::new(); config.lists_limit.max(1)],
            inputs: Vec::new(),
            outputs: vec![0; config.outputs_limit.max(1)],
        }
    }

    /// Zero variables and outputs and empty every list, keeping capacity.
    pub(super) fn reset(&mut self) {
        self.variables.fill(0);
        self.outputs.fill(0);
        for list in &mut self.lists {
            list.clear();
        }
    }

    pub(super) fn set_inputs(&mut self, inputs: &[i32]) {
        self.inputs.clear();
        self.inputs.extend_from_slice(inputs);
    }

    /// Input at `index` modulo the input count; 0 when there are no inputs.
    pub(super) fn input(&self, index: i32) -> i32 {
        if self.inputs.is_empty() {
            return 0;
        }
        self.inputs[wrap(index, self.inputs.len())]
    }

    /// Wrapped slot of variable `index`.
    pub(super) fn variable_slot(&self, index: i32) -> usize {
        wrap(index, self.variables.len())
    }

    pub(super) fn variable(&self, index: i32) -> i32 {
        self.variables[self.variable_slot(index)]
    }

    pub(super) fn variable_at(&self, slot: usize) -> i32 {
        self.variables[slot]
    }

    pub(super) fn variable_mut(&mut self, slot: usize) -> &mut i32 {
        &mut self.variables[slot]
    }

    /// Wrapped slot of list `index`.
    pub(super) fn list_slot(&self, index: i32) -> usize {
        wrap(index, self.lists.len())
    }

    pub(super) fn list(&self, index: i32) -> &VecDeque<i32> {
        &self.lists[self.list_slot(index)]
    }

    pub(super) fn list_at(&self, slot: usize) -> &VecDeque<i32> {
        &self.lists[slot]
    }

    pub(super) fn list_mut(&mut self, index: i32) -> &mut VecDeque<i32> {
        let slot = self.list_slot(index);
        &mut self.lists[slot]
    }

    /// Element `item` of list `index`, wrapped by the list length.
    ///
    /// Empty lists and negative item indices read as 0.
    pub(super) fn list_item(&self, index: i32, item: i32) -> i32 {
        let list = self.list(index);
        if list.is_empty() || item < 0 {
            return 0;
        }
        list[wrap(item, list.len())]
    }

    pub(super) fn set_output(&mut self, index: i32, value: i32) {
        let slot = wrap(index, self.outputs.len());
        self.outputs[slot] = value;
    }

    pub(super) fn outputs(&self) -> &[i32] {
        &self.outputs
    }
}
