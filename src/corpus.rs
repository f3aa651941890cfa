//! Hand-written reference programs.
//!
//! These seed frequency profiles with realistic node statistics and double
//! as end-to-end interpreter fixtures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, NodeKind, Tree};
use crate::error::NodeResult;
use crate::program::Program;

/// The programs in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorpusProgram {
    /// Sum of the even numbers below `input[0]`.
    SumEverySecond,
    /// Steps for the 3n+1 sequence starting at `input[0]` to reach 1.
    CollatzSteps,
    /// 1 if `input[0]` has no divisor in `2..=sqrt(input[0])`, else 0.
    Primality,
}

impl CorpusProgram {
    /// Every corpus program.
    pub const ALL: [CorpusProgram; 3] = [
        CorpusProgram::SumEverySecond,
        CorpusProgram::CollatzSteps,
        CorpusProgram::Primality,
    ];

    /// Build the program.
    ///
    /// # Errors
    ///
    /// Propagates construction errors; the shipped programs are well typed.
    pub fn build(self) -> NodeResult<Program> {
        let mut author = Author::default();
        let body = match self {
            CorpusProgram::SumEverySecond => author.sum_every_second()?,
            CorpusProgram::CollatzSteps => author.collatz_steps()?,
            CorpusProgram::Primality => author.primality()?,
        };
        Program::from_sequence(author.tree, &body)
    }
}

impl fmt::Display for CorpusProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorpusProgram::SumEverySecond => "sum-every-second",
            CorpusProgram::CollatzSteps => "collatz",
            CorpusProgram::Primality => "primality",
        };
        f.write_str(name)
    }
}

/// Build every corpus program.
///
/// # Errors
///
/// Propagates construction errors.
pub fn programs() -> NodeResult<Vec<Program>> {
    CorpusProgram::ALL.into_iter().map(CorpusProgram::build).collect()
}

#[derive(Default)]
struct Author {
    tree: Tree,
}

impl Author {
    fn num(&mut self, value: i32) -> NodeId {
        self.tree.create_kind(NodeKind::NumConst(value))
    }

    fn input(&mut self, index: i32) -> NodeId {
        self.tree.create_kind(NodeKind::NumInput(index))
    }

    fn var(&mut self, index: i32) -> NodeResult<NodeId> {
        let index = self.num(index);
        self.tree.build(NodeKind::ValueGetter, &[index])
    }

    fn node(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeResult<NodeId> {
        self.tree.build(kind, children)
    }

    /// `var[index] := value`
    fn assign(&mut self, index: i32, value: NodeId) -> NodeResult<NodeId> {
        let index = self.num(index);
        self.node(NodeKind::Assign, &[index, value])
    }

    fn increment(&mut self, index: i32) -> NodeResult<NodeId> {
        let index = self.num(index);
        self.node(NodeKind::Increment, &[index])
    }

    /// `output[0] := var[index]`
    fn output_var(&mut self, index: i32) -> NodeResult<NodeId> {
        let slot = self.num(0);
        let value = self.var(index)?;
        self.node(NodeKind::SetOutput, &[slot, value])
    }

    /// Link a body and return its head.
    fn block(&mut self, directives: &[NodeId]) -> NodeResult<NodeId> {
        self.tree.chain(directives)?;
        Ok(directives[0])
    }

    fn sum_every_second(&mut self) -> NodeResult<Vec<NodeId>> {
        // for var[0] < input[0] { push_back list[0], var[0] }
        let list = self.num(0);
        let item = self.var(0)?;
        let fill = self.node(NodeKind::AddLast, &[list, item])?;
        let counter = self.num(0);
        let limit = self.input(0);
        let fill_loop = self.node(NodeKind::For, &[counter, limit, fill])?;

        let zero = self.num(0);
        let init_index = self.assign(1, zero)?;
        let zero = self.num(0);
        let init_sum = self.assign(2, zero)?;

        // while var[1] < len(list[0]) { var[2] := var[2] + list[0][var[1]]; var[1]++; var[1]++ }
        let position = self.var(1)?;
        let list = self.num(0);
        let size = self.node(NodeKind::ListSizeGetter, &[list])?;
        let more = self.node(NodeKind::Less, &[position, size])?;
        let sum = self.var(2)?;
        let list = self.num(0);
        let position = self.var(1)?;
        let item = self.node(NodeKind::ListGetValue, &[list, position])?;
        let added = self.node(NodeKind::Plus, &[sum, item])?;
        let accumulate = self.assign(2, added)?;
        let step = self.increment(1)?;
        let step_again = self.increment(1)?;
        let body = self.block(&[accumulate, step, step_again])?;
        let sum_loop = self.node(NodeKind::While, &[more, body])?;

        let report = self.output_var(2)?;
        Ok(vec![fill_loop, init_index, init_sum, sum_loop, report])
    }

    fn collatz_steps(&mut self) -> NodeResult<Vec<NodeId>> {
        let start = self.input(0);
        let init_value = self.assign(0, start)?;
        let zero = self.num(0);
        let init_steps = self.assign(1, zero)?;

        // while not(var[0] == 1)
        let value = self.var(0)?;
        let one = self.num(1);
        let at_one = self.node(NodeKind::Equals, &[value, one])?;
        let running = self.node(NodeKind::Not, &[at_one])?;

        // if var[0] % 2 == 0 { var[0] := var[0] / 2 } else { var[0] := var[0] * 3 + 1 }
        let value = self.var(0)?;
        let two = self.num(2);
        let parity = self.node(NodeKind::Mod, &[value, two])?;
        let zero = self.num(0);
        let even = self.node(NodeKind::Equals, &[parity, zero])?;
        let value = self.var(0)?;
        let two = self.num(2);
        let half = self.node(NodeKind::Div, &[value, two])?;
        let halve = self.assign(0, half)?;
        let value = self.var(0)?;
        let three = self.num(3);
        let tripled = self.node(NodeKind::Multiply, &[value, three])?;
        let one = self.num(1);
        let grown = self.node(NodeKind::Plus, &[tripled, one])?;
        let grow = self.assign(0, grown)?;
        let step = self.node(NodeKind::IfElse, &[even, halve, grow])?;
        let count = self.increment(1)?;
        let body = self.block(&[step, count])?;
        let walk = self.node(NodeKind::While, &[running, body])?;

        let report = self.output_var(1)?;
        Ok(vec![init_value, init_steps, walk, report])
    }

    fn primality(&mut self) -> NodeResult<Vec<NodeId>> {
        let number = self.input(0);
        let init_number = self.assign(0, number)?;
        let two = self.num(2);
        let init_divisor = self.assign(1, two)?;
        let one = self.num(1);
        let init_flag = self.assign(2, one)?;

        // while var[1] <= var[0] / var[1] and var[2] == 1
        let divisor = self.var(1)?;
        let number = self.var(0)?;
        let divisor_again = self.var(1)?;
        let bound = self.node(NodeKind::Div, &[number, divisor_again])?;
        let in_range = self.node(NodeKind::LessEq, &[divisor, bound])?;
        let flag = self.var(2)?;
        let one = self.num(1);
        let still_prime = self.node(NodeKind::Equals, &[flag, one])?;
        let running = self.node(NodeKind::And, &[in_range, still_prime])?;

        // if var[0] % var[1] == 0 { var[2] := 0 }; var[1]++
        let number = self.var(0)?;
        let divisor = self.var(1)?;
        let remainder = self.node(NodeKind::Mod, &[number, divisor])?;
        let zero = self.num(0);
        let divides = self.node(NodeKind::Equals, &[remainder, zero])?;
        let zero = self.num(0);
        let clear = self.assign(2, zero)?;
        let check = self.node(NodeKind::If, &[divides, clear])?;
        let next = self.increment(1)?;
        let body = self.block(&[check, next])?;
        let search = self.node(NodeKind::While, &[running, body])?;

        let report = self.output_var(2)?;
        Ok(vec![init_number, init_divisor, init_flag, search, report])
    }
}
