//! CLI command implementations for progbreed.

pub(crate) mod enumerate;
pub(crate) mod profile;
pub(crate) mod run;
pub(crate) mod search;

use clap::ValueEnum;
use progbreed::corpus::CorpusProgram;
use progbreed::samples::Task;
use std::error::Error;
use std::fmt;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Task to synthesize a program for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TaskArg {
    /// Output the single input.
    Copy,
    /// Output 1.
    AlwaysOne,
    /// Output the larger of two inputs.
    MaxOfTwo,
    /// Output 1 for primes, else 0.
    Primality,
    /// Output the number of 3n+1 steps to reach 1.
    Collatz,
}

impl From<TaskArg> for Task {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Copy => Task::SimpleCopy,
            TaskArg::AlwaysOne => Task::AlwaysOne,
            TaskArg::MaxOfTwo => Task::MaximumOfTwo,
            TaskArg::Primality => Task::PrimalityTest,
            TaskArg::Collatz => Task::CollatzSteps,
        }
    }
}

/// Search algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum AlgorithmArg {
    /// Independent random programs.
    Random,
    /// Point-mutation hill climbing.
    Mutation,
    /// Exhaustive enumeration by depth.
    Enumeration,
}

/// Node-type distribution used to grow programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ProfileArg {
    /// Every type equally likely.
    Uniform,
    /// Flat frequencies learned from the corpus.
    Corpus,
    /// Frequencies conditioned on the parent type.
    Relativized,
}

/// Corpus program to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ProgramArg {
    /// Sum of the even numbers below the input.
    SumEverySecond,
    /// Collatz step count.
    Collatz,
    /// Primality test.
    Primality,
}

impl From<ProgramArg> for CorpusProgram {
    fn from(arg: ProgramArg) -> Self {
        match arg {
            ProgramArg::SumEverySecond => CorpusProgram::SumEverySecond,
            ProgramArg::Collatz => CorpusProgram::CollatzSteps,
            ProgramArg::Primality => CorpusProgram::Primality,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<progbreed::NodeError> for CliError {
    fn from(e: progbreed::NodeError) -> Self {
        Self::new(format!("invalid program tree: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

impl From<indicatif::style::TemplateError> for CliError {
    fn from(e: indicatif::style::TemplateError) -> Self {
        Self::new(format!("progress template: {e}"))
    }
}
