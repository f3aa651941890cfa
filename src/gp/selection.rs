//! Selection operators.
//!
//! Selection decides which candidate survives a generation. Scores are
//! percentages of samples answered correctly. Roulette picks in proportion to
//! the score; tournament picks the best of `k` random draws.

// Score statistics divide by the population size
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::search::PERFECT_SCORE;

/// Default number of contestants in a tournament.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 5;

/// How a survivor is picked from a scored population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    /// Fitness-proportional.
    #[default]
    Roulette,
    /// Best of `size` uniform draws with replacement.
    Tournament {
        /// Number of contestants.
        size: usize,
    },
}

impl Selection {
    /// Tournament selection with the default size.
    #[must_use]
    pub const fn tournament() -> Self {
        Self::Tournament {
            size: DEFAULT_TOURNAMENT_SIZE,
        }
    }

    /// Pick an index into `fitness`. `None` only for an empty population.
    pub fn select<R: Rng + ?Sized>(&self, fitness: &[f64], rng: &mut R) -> Option<usize> {
        match *self {
            Self::Roulette => roulette_select(fitness, rng),
            Self::Tournament { size } => tournament_select(fitness, size, rng),
        }
    }
}

/// Roulette-wheel selection over non-negative fitness values.
///
/// Negative values count as zero. When nothing has positive fitness the pick
/// is uniform.
pub fn roulette_select<R: Rng + ?Sized>(fitness: &[f64], rng: &mut R) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }

    let total: f64 = fitness.iter().map(|f| f.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(rng.gen_range(0..fitness.len()));
    }

    let ticket = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, f) in fitness.iter().enumerate() {
        let weight = f.max(0.0);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = i;
        if ticket < cumulative {
            return Some(i);
        }
    }
    // Rounding can leave the ticket just past the final sum.
    Some(last_positive)
}

/// Best of `k` uniform draws with replacement. `k` is at least 1; ties keep
/// the earlier draw.
pub fn tournament_select<R: Rng + ?Sized>(scores: &[f64], k: usize, rng: &mut R) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    (0..k.max(1))
        .map(|_| rng.gen_range(0..scores.len()))
        .reduce(|winner, challenger| {
            if scores[challenger] > scores[winner] {
                challenger
            } else {
                winner
            }
        })
}

/// Score distribution of one generation, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SelectionStats {
    /// Highest score.
    pub best_score: f64,
    /// Average score.
    pub mean_score: f64,
    /// Lowest score.
    pub worst_score: f64,
    /// Population standard deviation of the scores.
    pub score_spread: f64,
    /// Candidates that answered every sample.
    pub perfect: usize,
}

impl SelectionStats {
    /// Summarize `scores`. An empty slice gives all zeros.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Self {
        let Some((&first, rest)) = scores.split_first() else {
            return Self::default();
        };
        let n = scores.len() as f64;
        let (best, worst, sum) = rest
            .iter()
            .fold((first, first, first), |(hi, lo, sum), &s| (hi.max(s), lo.min(s), sum + s));
        let mean = sum / n;
        let squared: f64 = scores.iter().map(|s| (s - mean) * (s - mean)).sum();

        Self {
            best_score: best,
            mean_score: mean,
            worst_score: worst,
            score_spread: (squared / n).sqrt(),
            perfect: scores.iter().filter(|&&s| s >= PERFECT_SCORE).count(),
        }
    }
}

impl fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "best {:.1}% mean {:.1}% worst {:.1}% spread {:.1} ({} perfect)",
            self.best_score, self.mean_score, self.worst_score, self.score_spread, self.perfect
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_tournament_favours_higher_scores() {
        let mut rng = SmallRng::seed_from_u64(42);
        let scores = [10.0, 50.0, 90.0, 20.0, 80.0];
        let mut wins = [0usize; 5];
        for _ in 0..1000 {
            wins[tournament_select(&scores, 3, &mut rng).unwrap()] += 1;
        }
        assert!(wins[2] > wins[4] && wins[4] > wins[1], "{wins:?}");
        assert!(wins[2] > 400, "{wins:?}");
    }

    #[test]
    fn test_tournament_of_one_is_uniform() {
        let mut rng = SmallRng::seed_from_u64(3);
        let scores = [0.0, 100.0];
        let picks_worst = (0..1000)
            .filter(|_| tournament_select(&scores, 1, &mut rng) == Some(0))
            .count();
        assert!((400..600).contains(&picks_worst), "{picks_worst}");
    }

    #[test]
    fn test_roulette_is_proportional() {
        let mut rng = SmallRng::seed_from_u64(7);
        let fitness = [10.0, 30.0, 60.0];
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            counts[roulette_select(&fitness, &mut rng).unwrap()] += 1;
        }
        assert!((800..1200).contains(&counts[0]), "{counts:?}");
        assert!((2600..3400).contains(&counts[1]), "{counts:?}");
        assert!((5500..6500).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    fn test_roulette_never_picks_zero_fitness() {
        let mut rng = SmallRng::seed_from_u64(8);
        let fitness = [0.0, 5.0, 0.0, 1.0];
        for _ in 0..1000 {
            let idx = roulette_select(&fitness, &mut rng).unwrap();
            assert!(idx == 1 || idx == 3);
        }
    }

    #[test]
    fn test_roulette_all_zero_is_uniform() {
        let mut rng = SmallRng::seed_from_u64(9);
        let fitness = [0.0; 4];
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[roulette_select(&fitness, &mut rng).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800), "{counts:?}");
    }

    #[test]
    fn test_empty_population_selects_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(roulette_select(&[], &mut rng), None);
        assert_eq!(tournament_select(&[], 3, &mut rng), None);
        assert_eq!(Selection::default().select(&[], &mut rng), None);
    }

    #[test]
    fn test_selection_dispatch() {
        let mut rng = SmallRng::seed_from_u64(2);
        let fitness = [1.0, 100.0];
        let selection = Selection::Tournament { size: 50 };
        assert_eq!(selection.select(&fitness, &mut rng), Some(1));
        assert_eq!(Selection::tournament(), Selection::Tournament { size: 5 });
    }

    #[test]
    fn test_stats_summarize_a_generation() {
        let stats = SelectionStats::from_scores(&[25.0, 100.0, 50.0, 75.0, 100.0]);
        assert!((stats.best_score - 100.0).abs() < 1e-9);
        assert!((stats.worst_score - 25.0).abs() < 1e-9);
        assert!((stats.mean_score - 70.0).abs() < 1e-9);
        assert!((stats.score_spread - 850.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(stats.perfect, 2);
        assert_eq!(
            stats.to_string(),
            "best 100.0% mean 70.0% worst 25.0% spread 29.2 (2 perfect)"
        );
        assert_eq!(SelectionStats::from_scores(&[]), SelectionStats::default());
    }
}
