//! Fitness evaluation against training samples.
//!
//! A program's fitness is the percentage of samples in a batch for which
//! every expected output matches.

// Fitness is reported as a percentage
#![allow(clippy::cast_precision_loss)]

use crate::interpreter::{Interpreter, InterpreterConfig};
use crate::program::Program;
use crate::samples::{SampleGenerator, TrainingSample};

/// Scores programs on batches drawn from a sample generator.
#[derive(Debug, Clone)]
pub struct Evaluator {
    interpreter: Interpreter,
    batch_size: usize,
    evaluated: u64,
}

impl Evaluator {
    /// Evaluator drawing `batch_size` samples per score.
    #[must_use]
    pub fn new(config: InterpreterConfig, batch_size: usize) -> Self {
        Self {
            interpreter: Interpreter::new(config),
            batch_size,
            evaluated: 0,
        }
    }

    /// Samples drawn per score.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of programs scored so far.
    #[must_use]
    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }

    /// Draw a fresh batch and score `program` on it.
    pub fn score<G>(&mut self, program: &Program, generator: &mut G) -> f64
    where
        G: SampleGenerator + ?Sized,
    {
        let mut batch: Vec<TrainingSample> =
            (0..self.batch_size).map(|_| generator.next_sample()).collect();
        self.score_batch(program, &mut batch)
    }

    /// Score `program` on a fixed batch, filling in each sample's real outputs.
    ///
    /// An empty batch scores 0.
    pub fn score_batch(&mut self, program: &Program, batch: &mut [TrainingSample]) -> f64 {
        self.evaluated += 1;
        if batch.is_empty() {
            return 0.0;
        }
        let mut correct = 0usize;
        for sample in batch.iter_mut() {
            program.evaluate(sample, &mut self.interpreter);
            if sample.is_correct() {
                correct += 1;
            }
        }
        correct as f64 * 100.0 / batch.len() as f64
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(InterpreterConfig::default(), 100)
    }
}
