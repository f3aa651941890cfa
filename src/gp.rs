//! Program search.
//!
//! This module holds everything that produces candidate programs and decides
//! which ones to keep: frequency profiles learned from a corpus, random
//! generation, exhaustive enumeration, point mutation, selection, fitness
//! scoring, and the three search algorithms built on top of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  RandomSearch │ MutationSearch │ Enumeration │
//! ├─────────────────────────────────────────────┤
//! │  Selection │ Mutation │ Generation          │
//! ├─────────────────────────────────────────────┤
//! │  Frequency profiles │ Fitness (Evaluator)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use progbreed::gp::{FrequencyProfile, MutationSearch, MutationSearchConfig, SearchAlgorithm};
//! use progbreed::samples::{Task, TaskSamples};
//! use progbreed::TypeTable;
//!
//! let profile = FrequencyProfile::uniform(&TypeTable::new());
//! let generator = TaskSamples::new(Task::SimpleCopy, 1);
//! let mut search = MutationSearch::new(MutationSearchConfig::default(), generator, profile);
//! let outcome = search.search(Duration::from_secs(10));
//! println!("{:.1}%", outcome.best_score);
//! ```

mod enumeration;
mod enumeration_search;
mod fitness;
mod generation;
mod mutation;
mod mutation_search;
mod profile;
mod random_search;
mod search;
mod selection;

pub use enumeration::{TreeEnumerator, count_trees, instantiations};
pub use enumeration_search::{EnumerationSearch, EnumerationSearchConfig};
pub use fitness::Evaluator;
pub use generation::{PAYLOAD_RANGE, random_kind, random_program, random_subtree, random_tree};
pub use mutation::{MutationConfig, MutationSite, point_mutation};
pub use mutation_search::{MutationSearch, MutationSearchConfig};
pub use profile::{FrequencyProfile, MIN_CORPUS_PROGRAMS, RelativizedProfile, TypeDistribution};
pub use random_search::{RandomSearch, RandomSearchConfig};
pub use search::{PERFECT_SCORE, SearchAlgorithm, SearchOutcome, SearchSummary};
pub use selection::{
    DEFAULT_TOURNAMENT_SIZE, Selection, SelectionStats, roulette_select, tournament_select,
};
