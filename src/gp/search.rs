//! Common interface of the search algorithms.

use std::time::Duration;

use serde::Serialize;

use crate::program::Program;

/// Score at which a program counts as a full solution.
pub const PERFECT_SCORE: f64 = 100.0;

/// A time-budgeted program search.
pub trait SearchAlgorithm {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Search until a solution is found or `time_limit` elapses.
    ///
    /// The clock is checked between candidates, so a run overshoots the
    /// limit by at most one evaluation.
    fn search(&mut self, time_limit: Duration) -> SearchOutcome;
}

/// Result of one search run.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Best program seen, if any candidate was scored.
    pub best: Option<Program>,
    /// Score of `best`, in percent.
    pub best_score: f64,
    /// Number of programs scored.
    pub evaluated: u64,
    /// Outer iterations: samples, generations or depth levels.
    pub iterations: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// True if the run stopped because it reached its success threshold.
    pub solved: bool,
}

impl SearchOutcome {
    /// Keep `candidate` if it beats the current best. Returns true if kept.
    pub fn offer(&mut self, candidate: &Program, score: f64) -> bool {
        if self.best.is_some() && score <= self.best_score {
            return false;
        }
        self.best = Some(candidate.clone());
        self.best_score = score;
        true
    }

    /// Serializable summary without the program tree.
    #[must_use]
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            best_score: self.best_score,
            evaluated: self.evaluated,
            iterations: self.iterations,
            elapsed_ms: self.elapsed.as_millis(),
            solved: self.solved,
            program: self.best.as_ref().map(ToString::to_string),
        }
    }
}

/// Flat report of a [`SearchOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    /// Score of the best program, in percent.
    pub best_score: f64,
    /// Number of programs scored.
    pub evaluated: u64,
    /// Outer iterations.
    pub iterations: u64,
    /// Wall-clock milliseconds.
    pub elapsed_ms: u128,
    /// Whether the success threshold was reached.
    pub solved: bool,
    /// Rendered best program.
    pub program: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_keeps_strictly_better() {
        let mut outcome = SearchOutcome::default();
        let program = Program::new();
        assert!(outcome.offer(&program, 0.0));
        assert!(!outcome.offer(&program, 0.0));
        assert!(outcome.offer(&program, 12.5));
        assert!(!outcome.offer(&program, 10.0));
        assert!((outcome.best_score - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_renders_program() {
        let mut outcome = SearchOutcome::default();
        outcome.offer(&Program::new(), 50.0);
        let summary = outcome.summary();
        assert_eq!(summary.program.as_deref(), Some(""));
        assert!(!summary.solved);
    }
}
