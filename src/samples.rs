//! Training samples and the generators that produce them.
//!
//! A sample pairs an input vector with the outputs a correct program must
//! write. Search algorithms pull samples in batches; generators may be
//! infinite and stochastic.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Exclusive upper bound of randomly drawn task inputs.
pub const INPUT_RANGE: i32 = 1_000_000;

/// One input/output example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Values readable through `NumInput` nodes.
    pub inputs: Vec<i32>,
    /// Expected outputs, compared against output slots `0..desired.len()`.
    pub desired: Vec<i32>,
    /// Outputs the last evaluated program produced.
    pub real: Vec<i32>,
}

impl TrainingSample {
    /// Create a sample with zeroed real outputs.
    #[must_use]
    pub fn new(inputs: Vec<i32>, desired: Vec<i32>) -> Self {
        let real = vec![0; desired.len()];
        Self {
            inputs,
            desired,
            real,
        }
    }

    /// True if every real output matches its desired value.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.desired == self.real
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[i32]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}

impl fmt::Display for TrainingSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_values(f, &self.inputs)?;
        f.write_str("->")?;
        write_values(f, &self.desired)
    }
}

/// Source of training samples.
pub trait SampleGenerator {
    /// Produce the next sample.
    fn next_sample(&mut self) -> TrainingSample;

    /// Produce `count` samples.
    fn generate(&mut self, count: usize) -> Vec<TrainingSample> {
        (0..count).map(|_| self.next_sample()).collect()
    }

    /// Endless stream of samples.
    fn samples(&mut self) -> impl Iterator<Item = TrainingSample> + '_
    where
        Self: Sized,
    {
        std::iter::repeat_with(move || self.next_sample())
    }
}

/// Built-in synthesis tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Output the single input.
    SimpleCopy,
    /// Output 1 regardless of the input.
    AlwaysOne,
    /// Output the larger of two inputs.
    MaximumOfTwo,
    /// Output 1 if the input is prime, else 0.
    PrimalityTest,
    /// Output the number of 3n+1 steps needed to reach 1.
    CollatzSteps,
}

impl Task {
    /// Every task.
    pub const ALL: [Task; 5] = [
        Task::SimpleCopy,
        Task::AlwaysOne,
        Task::MaximumOfTwo,
        Task::PrimalityTest,
        Task::CollatzSteps,
    ];

    /// Number of inputs per sample.
    #[must_use]
    pub const fn input_count(self) -> usize {
        match self {
            Task::MaximumOfTwo => 2,
            _ => 1,
        }
    }

    /// Expected outputs for `inputs`.
    #[must_use]
    pub fn solve(self, inputs: &[i32]) -> Vec<i32> {
        let first = inputs.first().copied().unwrap_or(0);
        let answer = match self {
            Task::SimpleCopy => first,
            Task::AlwaysOne => 1,
            Task::MaximumOfTwo => inputs.iter().copied().max().unwrap_or(0),
            Task::PrimalityTest => i32::from(is_prime(first)),
            Task::CollatzSteps => collatz_steps(first),
        };
        vec![answer]
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::SimpleCopy => "copy",
            Task::AlwaysOne => "always-one",
            Task::MaximumOfTwo => "max-of-two",
            Task::PrimalityTest => "primality",
            Task::CollatzSteps => "collatz",
        };
        f.write_str(name)
    }
}

/// Trial division; numbers below 2 are not prime.
#[must_use]
pub fn is_prime(n: i32) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Steps of the 3n+1 sequence from `n` until it reaches 1. Values at or
/// below 1 take no steps.
#[must_use]
pub fn collatz_steps(n: i32) -> i32 {
    let mut value = i64::from(n);
    let mut steps = 0;
    while value > 1 {
        value = if value % 2 == 0 { value / 2 } else { value * 3 + 1 };
        steps += 1;
    }
    steps
}

/// Random samples of a [`Task`] with inputs uniform in `[0, INPUT_RANGE)`.
#[derive(Debug, Clone)]
pub struct TaskSamples {
    task: Task,
    rng: SmallRng,
}

impl TaskSamples {
    /// Seeded generator for `task`.
    #[must_use]
    pub fn new(task: Task, seed: u64) -> Self {
        Self {
            task,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The task being sampled.
    #[must_use]
    pub fn task(&self) -> Task {
        self.task
    }
}

impl SampleGenerator for TaskSamples {
    fn next_sample(&mut self) -> TrainingSample {
        let inputs: Vec<i32> = (0..self.task.input_count())
            .map(|_| self.rng.gen_range(0..INPUT_RANGE))
            .collect();
        let desired = self.task.solve(&inputs);
        TrainingSample::new(inputs, desired)
    }
}

/// Cycles through a fixed list of samples in order.
#[derive(Debug, Clone)]
pub struct FixedSamples {
    samples: Vec<TrainingSample>,
    position: usize,
}

impl FixedSamples {
    /// Wrap a corpus. An empty corpus yields empty samples.
    #[must_use]
    pub fn new(samples: Vec<TrainingSample>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Build a corpus from `(inputs, desired)` pairs.
    #[must_use]
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Vec<i32>>,
        B: Into<Vec<i32>>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(inputs, desired)| TrainingSample::new(inputs.into(), desired.into()))
                .collect(),
        )
    }

    /// Number of distinct samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the corpus is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleGenerator for FixedSamples {
    fn next_sample(&mut self) -> TrainingSample {
        let Some(sample) = self.samples.get(self.position) else {
            return TrainingSample::new(Vec::new(), Vec::new());
        };
        self.position = (self.position + 1) % self.samples.len();
        sample.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_correct_compares_outputs() {
        let mut sample = TrainingSample::new(vec![3], vec![3]);
        assert!(!sample.is_correct());
        sample.real[0] = 3;
        assert!(sample.is_correct());
    }

    #[test]
    fn test_sample_display() {
        let sample = TrainingSample::new(vec![1, 4], vec![4]);
        assert_eq!(sample.to_string(), "[1 4]->[4]");
    }

    #[test]
    fn test_primality() {
        let primes: Vec<i32> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_collatz_steps() {
        assert_eq!(collatz_steps(1), 0);
        assert_eq!(collatz_steps(0), 0);
        assert_eq!(collatz_steps(6), 8);
        assert_eq!(collatz_steps(27), 111);
    }

    #[test]
    fn test_max_of_two_keeps_generating() {
        let mut generator = TaskSamples::new(Task::MaximumOfTwo, 7);
        let batch = generator.generate(50);
        assert_eq!(batch.len(), 50);
        for sample in &batch {
            assert_eq!(sample.inputs.len(), 2);
            assert_eq!(sample.desired[0], sample.inputs[0].max(sample.inputs[1]));
            assert!(sample.inputs.iter().all(|&x| (0..INPUT_RANGE).contains(&x)));
        }
    }

    #[test]
    fn test_task_samples_are_seeded() {
        let a = TaskSamples::new(Task::CollatzSteps, 3).generate(5);
        let b = TaskSamples::new(Task::CollatzSteps, 3).generate(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_samples_cycle() {
        let mut fixed = FixedSamples::from_pairs([(vec![1], vec![2]), (vec![3], vec![4])]);
        let seen: Vec<i32> = fixed.samples().take(5).map(|s| s.inputs[0]).collect();
        assert_eq!(seen, vec![1, 3, 1, 3, 1]);
    }

    #[test]
    fn test_empty_fixed_samples() {
        let mut fixed = FixedSamples::new(Vec::new());
        assert!(fixed.is_empty());
        assert!(fixed.next_sample().desired.is_empty());
    }
}
