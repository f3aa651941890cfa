//! Exhaustive search over programs of increasing depth.

use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use super::enumeration::{TreeEnumerator, count_trees};
use super::fitness::Evaluator;
use super::search::{PERFECT_SCORE, SearchAlgorithm, SearchOutcome};
use crate::ast::{NodeClass, TypeTable};
use crate::interpreter::InterpreterConfig;
use crate::program::Program;
use crate::samples::SampleGenerator;

/// Configuration for [`EnumerationSearch`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnumerationSearchConfig {
    /// Samples per evaluation.
    pub batch_size: usize,
    /// Last depth to enumerate. `None` keeps going until time runs out.
    pub max_depth: Option<usize>,
    /// Limits of the interpreter that runs candidates.
    pub interpreter: InterpreterConfig,
}

impl Default for EnumerationSearchConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            max_depth: None,
            interpreter: InterpreterConfig::default(),
        }
    }
}

/// Scores every directive tree of depth 1, then 2, and so on.
#[derive(Debug)]
pub struct EnumerationSearch<G> {
    config: EnumerationSearchConfig,
    generator: G,
    table: TypeTable,
    evaluator: Evaluator,
}

impl<G: SampleGenerator> EnumerationSearch<G> {
    /// Create a search over the full node vocabulary.
    #[must_use]
    pub fn new(config: EnumerationSearchConfig, generator: G) -> Self {
        Self {
            config,
            generator,
            table: TypeTable::new(),
            evaluator: Evaluator::new(config.interpreter, config.batch_size),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EnumerationSearchConfig {
        &self.config
    }
}

impl<G: SampleGenerator> SearchAlgorithm for EnumerationSearch<G> {
    fn name(&self) -> &'static str {
        "enumeration"
    }

    fn search(&mut self, time_limit: Duration) -> SearchOutcome {
        let start = Instant::now();
        let evaluated_before = self.evaluator.evaluated();
        let mut outcome = SearchOutcome::default();
        info!(
            "enumeration search: batch {}, max depth {:?}, limit {time_limit:?}",
            self.config.batch_size, self.config.max_depth
        );

        let mut depth = 0;
        'levels: while self.config.max_depth.is_none_or(|max| depth < max) {
            depth += 1;
            outcome.iterations += 1;
            info!(
                "depth {depth}: {} candidate trees",
                count_trees(&self.table, NodeClass::Directive, depth)
            );

            for body in TreeEnumerator::new(&self.table, NodeClass::Directive, depth) {
                if start.elapsed() >= time_limit {
                    break 'levels;
                }
                let program = match Program::from_body(&body) {
                    Ok(program) => program,
                    Err(e) => {
                        error!("skipping enumerated tree: {e}");
                        continue;
                    }
                };
                let score = self.evaluator.score(&program, &mut self.generator);
                if outcome.offer(&program, score) {
                    info!("new best {score:.1}% at depth {depth}");
                    debug!("best program:\n{program}");
                }
                if score >= PERFECT_SCORE {
                    outcome.solved = true;
                    break 'levels;
                }
            }
        }

        outcome.evaluated = self.evaluator.evaluated() - evaluated_before;
        outcome.elapsed = start.elapsed();
        info!(
            "enumeration search finished: best {:.1}% at depth {depth} after {} programs",
            outcome.best_score, outcome.evaluated
        );
        outcome
    }
}
