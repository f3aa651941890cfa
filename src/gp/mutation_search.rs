//! Random-mutation hill climbing.
//!
//! One current program is kept. Each generation scores several mutated
//! clones of it plus one freshly generated program, then a selection
//! operator picks the survivor that becomes the next current program.

use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::fitness::Evaluator;
use super::generation::random_program;
use super::mutation::{MutationConfig, point_mutation};
use super::profile::TypeDistribution;
use super::search::{SearchAlgorithm, SearchOutcome};
use super::selection::{Selection, SelectionStats};
use crate::interpreter::InterpreterConfig;
use crate::program::Program;
use crate::samples::SampleGenerator;

/// Configuration for [`MutationSearch`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationSearchConfig {
    /// Mutated clones scored per generation.
    pub mutations_per_step: usize,
    /// Samples per evaluation.
    pub batch_size: usize,
    /// Depth of the initial program.
    pub initial_depth: usize,
    /// Depth of the fresh program injected each generation.
    pub fresh_depth: usize,
    /// Score in percent at which the search stops.
    pub success_threshold: f64,
    /// How the survivor is picked.
    pub selection: Selection,
    /// Mutation configuration.
    pub mutation: MutationConfig,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Limits of the interpreter that runs candidates.
    pub interpreter: InterpreterConfig,
}

impl Default for MutationSearchConfig {
    fn default() -> Self {
        Self {
            mutations_per_step: 5,
            batch_size: 100,
            initial_depth: 3,
            fresh_depth: 3,
            success_threshold: 99.0,
            selection: Selection::Roulette,
            mutation: MutationConfig::default(),
            seed: 0,
            interpreter: InterpreterConfig::default(),
        }
    }
}

/// Hill climbing by point mutation with one random immigrant per generation.
#[derive(Debug)]
pub struct MutationSearch<G, D> {
    config: MutationSearchConfig,
    generator: G,
    distribution: D,
    evaluator: Evaluator,
    rng: SmallRng,
}

impl<G, D> MutationSearch<G, D>
where
    G: SampleGenerator,
    D: TypeDistribution,
{
    /// Create a search drawing node types from `distribution`.
    #[must_use]
    pub fn new(config: MutationSearchConfig, generator: G, distribution: D) -> Self {
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
    pub fn config(&self) -> &MutationSearchConfig {
        &self.config
    }

    /// Mutated clones of `current` followed by one fresh program.
    fn offspring(&mut self, current: &Program) -> Vec<Program> {
        let mut candidates = Vec::with_capacity(self.config.mutations_per_step + 1);
        for _ in 0..self.config.mutations_per_step {
            let mut mutant = current.clone();
            match point_mutation(&mut mutant, &self.distribution, &self.config.mutation, &mut self.rng) {
                Ok(_) => candidates.push(mutant),
                Err(e) => error!("discarding mutant: {e}"),
            }
        }
        candidates.push(random_program(
            &self.distribution,
            self.config.fresh_depth,
            &mut self.rng,
        ));
        candidates
    }
}

impl<G, D> SearchAlgorithm for MutationSearch<G, D>
where
    G: SampleGenerator,
    D: TypeDistribution,
{
    fn name(&self) -> &'static str {
        "mutation"
    }

    fn search(&mut self, time_limit: Duration) -> SearchOutcome {
        let start = Instant::now();
        let evaluated_before = self.evaluator.evaluated();
        let mut outcome = SearchOutcome::default();
        info!(
            "mutation search: {} mutants per step, batch {}, {:?} selection, limit {time_limit:?}",
            self.config.mutations_per_step, self.config.batch_size, self.config.selection
        );

        // Score the starting point so a best program always exists
        let mut current = random_program(&self.distribution, self.config.initial_depth, &mut self.rng);
        let initial = self.evaluator.score(&current, &mut self.generator);
        outcome.offer(&current, initial);
        outcome.solved = initial >= self.config.success_threshold;

        while !outcome.solved && start.elapsed() < time_limit {
            outcome.iterations += 1;
            let mut candidates = self.offspring(&current);
            let scores: Vec<f64> = candidates
                .iter()
                .map(|candidate| self.evaluator.score(candidate, &mut self.generator))
                .collect();

            debug!(
                "generation {}: {}",
                outcome.iterations,
                SelectionStats::from_scores(&scores)
            );

            for (candidate, &score) in candidates.iter().zip(&scores) {
                if outcome.offer(candidate, score) {
                    info!("new best {score:.1}% in generation {}", outcome.iterations);
                    debug!("best program:\n{candidate}");
                }
            }
            if outcome.best_score >= self.config.success_threshold {
                outcome.solved = true;
            }

            // Offspring always holds at least the fresh program
            if let Some(survivor) = self.config.selection.select(&scores, &mut self.rng) {
                current = candidates.swap_remove(survivor);
            }
        }

        outcome.evaluated = self.evaluator.evaluated() - evaluated_before;
        outcome.elapsed = start.elapsed();
        info!(
            "mutation search finished: best {:.1}% after {} generations in {:?}",
            outcome.best_score, outcome.iterations, outcome.elapsed
        );
        outcome
    }
}
