// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Progbreed: program synthesis by search over typed expression trees.
//!
//! Programs are trees of typed nodes (numeric expressions, boolean
//! expressions and directives) stored in an arena. An interpreter runs them
//! against a bounded store of variables, lists and outputs, and search
//! algorithms look for a program that maps every training input to its
//! expected output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Search (random, mutation, enum)   │
//! ├─────────────────────────────────────┤
//! │  Profiles │ Generation │ Mutation   │
//! ├─────────────────────────────────────┤
//! │  Program │ Constraints │ Samples    │
//! ├─────────────────────────────────────┤
//! │     Interpreter (bounded store)     │
//! ├─────────────────────────────────────┤
//! │      Typed node arena (ast)         │
//! └─────────────────────────────────────┘
//! ```

pub mod ast;
pub mod constraint;
pub mod corpus;
pub mod error;
pub mod gp;
pub mod interpreter;
pub mod program;
pub mod samples;

pub use ast::{NodeClass, NodeId, NodeKind, NodeType, Subtree, Tree, TypeTable};
pub use constraint::{ConstraintMapping, MustContainSubtree, RepairOutcome, RepairReport};
pub use error::{NodeError, NodeResult};
pub use interpreter::{Interpreter, InterpreterConfig, RunReport};
pub use program::Program;
pub use samples::{SampleGenerator, Task, TrainingSample};
