//! Random search: sample fresh programs and keep the best.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::fitness::Evaluator;
use super::generation::random_program;
use super::profile::TypeDistribution;
use super::search::{PERFECT_SCORE, SearchAlgorithm, SearchOutcome};
use crate::interpreter::InterpreterConfig;
use crate::samples::SampleGenerator;

/// Configuration for [`RandomSearch`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RandomSearchConfig {
    /// Depth of every generated program.
    pub max_depth: usize,
    /// Samples per evaluation.
    pub batch_size: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Limits of the interpreter that runs candidates.
    pub interpreter: InterpreterConfig,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            batch_size: 128,
            seed: 0,
            interpreter: InterpreterConfig::default(),
        }
    }
}

/// Generates independent random programs until one solves every sample.
#[derive(Debug)]
pub struct RandomSearch<G, D> {
    config: RandomSearchConfig,
    generator: G,
    distribution: D,
    evaluator: Evaluator,
    rng: SmallRng,
}

impl<G, D> RandomSearch<G, D>
where
    G: SampleGenerator,
    D: TypeDistribution,
{
    /// Create a search drawing node types from `distribution`.
    #[must_use]
    pub fn new(config: RandomSearchConfig, generator: G, distribution: D) -> Self {
        Self {
            config,
            generator,
            distribution,
            evaluator: Evaluator::new(config.interpreter, config.batch_size),
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }
}

impl<G, D> SearchAlgorithm for RandomSearch<G, D>
where
    G: SampleGenerator,
    D: TypeDistribution,
{
    fn name(&self) -> &'static str {
        "random"
    }

    fn search(&mut self, time_limit: Duration) -> SearchOutcome {
        let start = Instant::now();
        let evaluated_before = self.evaluator.evaluated();
        let mut outcome = SearchOutcome::default();
        info!(
            "random search: depth {}, batch {}, limit {time_limit:?}",
            self.config.max_depth, self.config.batch_size
        );

        // The first candidate is scored unconditionally
        loop {
            outcome.iterations += 1;
            let candidate = random_program(&self.distribution, self.config.max_depth, &mut self.rng);
            let score = self.evaluator.score(&candidate, &mut self.generator);
            if outcome.offer(&candidate, score) {
                info!("new best {score:.1}% after {} programs", outcome.iterations);
                debug!("best program:\n{candidate}");
            }
            if score >= PERFECT_SCORE {
                outcome.solved = true;
                break;
            }
            if start.elapsed() >= time_limit {
                break;
            }
        }

        outcome.evaluated = self.evaluator.evaluated() - evaluated_before;
        outcome.elapsed = start.elapsed();
        info!(
            "random search finished: best {:.1}%, {} programs in {:?}",
            outcome.best_score, outcome.evaluated, outcome.elapsed
        );
        outcome
    }
}
