//! End-to-end tests: corpus programs, profiles, constraints and searches.
//!
//! Run with: cargo test --release end_to_end

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use progbreed::corpus::{self, CorpusProgram};
use progbreed::gp::{
    EnumerationSearch, EnumerationSearchConfig, FrequencyProfile, MutationSearch,
    MutationSearchConfig, PERFECT_SCORE, RandomSearch, RandomSearchConfig, RelativizedProfile,
    SearchAlgorithm, random_program,
};
use progbreed::samples::{FixedSamples, Task, TaskSamples, TrainingSample, collatz_steps, is_prime};
use progbreed::{
    ConstraintMapping, Interpreter, InterpreterConfig, MustContainSubtree, NodeKind, NodeType,
    Program, Subtree, Tree, TypeTable,
};

fn short_runs() -> InterpreterConfig {
    InterpreterConfig {
        step_budget: 10_000,
        ..InterpreterConfig::default()
    }
}

#[test]
fn test_corpus_programs_solve_their_tasks() {
    let mut interp = Interpreter::default();
    let collatz = CorpusProgram::CollatzSteps.build().unwrap();
    let primality = CorpusProgram::Primality.build().unwrap();

    for n in 1..60 {
        let mut sample = TrainingSample::new(vec![n], vec![collatz_steps(n)]);
        collatz.evaluate(&mut sample, &mut interp);
        assert!(sample.is_correct(), "collatz {sample}");

        let mut sample = TrainingSample::new(vec![n], vec![i32::from(is_prime(n))]);
        primality.evaluate(&mut sample, &mut interp);
        assert!(sample.is_correct(), "primality {sample}");
    }
}

#[test]
fn test_assign_then_output_copies_input() {
    // var[0] := input[0]; output[0] := var[0]
    let mut tree = Tree::new();
    let var = tree.create_kind(NodeKind::NumConst(0));
    let input = tree.create_kind(NodeKind::NumInput(0));
    let assign = tree.build(NodeKind::Assign, &[var, input]).unwrap();
    let slot = tree.create_kind(NodeKind::NumConst(0));
    let index = tree.create_kind(NodeKind::NumConst(0));
    let read = tree.build(NodeKind::ValueGetter, &[index]).unwrap();
    let set = tree.build(NodeKind::SetOutput, &[slot, read]).unwrap();
    let program = Program::from_sequence(tree, &[assign, set]).unwrap();

    let mut sample = TrainingSample::new(vec![42], vec![42]);
    program.evaluate(&mut sample, &mut Interpreter::default());
    assert_eq!(sample.real, vec![42]);
    assert!(sample.is_correct());
}

#[test]
fn test_for_loop_appends_once_per_iteration() {
    // for var[1] < input[0] { list[0].add_last(var[var[1]]) }
    let mut tree = Tree::new();
    let list = tree.create_kind(NodeKind::NumConst(0));
    let counter_index = tree.create_kind(NodeKind::NumConst(1));
    let counter = tree.build(NodeKind::ValueGetter, &[counter_index]).unwrap();
    let element = tree.build(NodeKind::ValueGetter, &[counter]).unwrap();
    let body = tree.build(NodeKind::AddLast, &[list, element]).unwrap();
    let loop_var = tree.create_kind(NodeKind::NumConst(1));
    let limit = tree.create_kind(NodeKind::NumInput(0));
    let looped = tree.build(NodeKind::For, &[loop_var, limit, body]).unwrap();
    let program = Program::from_sequence(tree, &[looped]).unwrap();

    let mut interp = Interpreter::default();
    interp.set_inputs(&[5]);
    let report = program.execute(&mut interp);
    assert!(!report.out_of_fuel);
    assert_eq!(interp.list(0).len(), 5);
    assert_eq!(interp.variable(1), 5);
}

#[test]
fn test_corpus_profile_reflects_corpus() {
    let table = TypeTable::new();
    let programs = corpus::programs().unwrap();
    let flat = FrequencyProfile::from_programs(&table, &programs, true);
    assert!(flat.frequency(NodeType::SetOutput) > 0);
    assert_eq!(flat.frequency(NodeType::EntryPoint), 0);

    let relativized = RelativizedProfile::from_programs(&table, &programs);
    assert!(relativized.for_parent(NodeType::For).is_some());
}

#[test]
fn test_program_json_view() {
    let program = CorpusProgram::SumEverySecond.build().unwrap();
    let json = serde_json::to_value(program.view()).unwrap();
    assert_eq!(json["node_type"], serde_json::to_value(NodeType::EntryPoint).unwrap());
    assert!(json["slots"].is_array());
    assert!(!program.to_string().is_empty());
}

#[test]
fn test_repair_reports_consistent_totals() {
    let table = TypeTable::new();
    let programs = corpus::programs().unwrap();
    let profile = RelativizedProfile::from_programs(&table, &programs);
    let mapping = ConstraintMapping::standard();
    let mut rng = SmallRng::seed_from_u64(11);

    for _ in 0..50 {
        let mut program = random_program(&profile, 3, &mut rng);
        let report = program.repair(&mapping, &mut rng).unwrap();
        assert!(report.checked >= 1);
        assert!(report.repaired <= report.attempted);
        assert!(report.attempted <= report.checked);
    }

    // Corpus programs already read input[0]; an empty mapping checks nothing.
    let reads_input = MustContainSubtree::new(Subtree::from_kind(NodeKind::NumInput(0)));
    let mut program = CorpusProgram::SumEverySecond.build().unwrap();
    let entry = program.entry();
    assert!(reads_input.is_met(program.tree(), entry));
    let report = program.repair(&ConstraintMapping::new(), &mut rng).unwrap();
    assert_eq!(report.checked, 0);
}

#[test]
fn test_enumeration_copies_larger_second_input() {
    // Every sample's maximum is input[1], so `output[0] := input[1]` fits.
    let corpus = FixedSamples::from_pairs([
        (vec![1, 4], vec![4]),
        (vec![2, 9], vec![9]),
        (vec![0, 3], vec![3]),
    ]);
    let config = EnumerationSearchConfig {
        batch_size: corpus.len(),
        interpreter: short_runs(),
        ..EnumerationSearchConfig::default()
    };
    let mut search = EnumerationSearch::new(config, corpus);
    let outcome = search.search(Duration::from_secs(30));
    assert!(outcome.solved);
    assert!((outcome.best_score - PERFECT_SCORE).abs() < f64::EPSILON);
    assert!(outcome.iterations <= 2);
}

#[test]
fn test_enumeration_solves_always_one() {
    let config = EnumerationSearchConfig {
        batch_size: 32,
        max_depth: Some(2),
        interpreter: short_runs(),
    };
    let mut search = EnumerationSearch::new(config, TaskSamples::new(Task::AlwaysOne, 4));
    let outcome = search.search(Duration::from_secs(30));
    assert!(outcome.solved, "best score {}", outcome.best_score);
}

#[test]
fn test_random_search_solves_always_one() {
    let profile = FrequencyProfile::uniform(&TypeTable::new());
    let config = RandomSearchConfig {
        max_depth: 2,
        batch_size: 16,
        seed: 8,
        interpreter: short_runs(),
    };
    let mut search = RandomSearch::new(config, TaskSamples::new(Task::AlwaysOne, 3), profile);
    let outcome = search.search(Duration::from_secs(20));
    assert!(outcome.solved, "best score {}", outcome.best_score);
    assert!(outcome.best.is_some());
}

#[test]
fn test_mutation_search_solves_simple_copy() {
    let profile = FrequencyProfile::uniform(&TypeTable::new());
    let mut config = MutationSearchConfig {
        batch_size: 20,
        initial_depth: 2,
        fresh_depth: 2,
        seed: 13,
        interpreter: short_runs(),
        ..MutationSearchConfig::default()
    };
    config.mutation.subtree_depth = 2;
    let mut search = MutationSearch::new(config, TaskSamples::new(Task::SimpleCopy, 6), profile);
    let outcome = search.search(Duration::from_secs(30));
    assert!(outcome.solved, "best score {}", outcome.best_score);
    assert!(outcome.best_score >= config.success_threshold);
}

#[test]
fn test_summary_serializes() {
    let mut search = EnumerationSearch::new(
        EnumerationSearchConfig {
            max_depth: Some(1),
            ..EnumerationSearchConfig::default()
        },
        TaskSamples::new(Task::SimpleCopy, 1),
    );
    let outcome = search.search(Duration::from_secs(5));
    let json = serde_json::to_value(outcome.summary()).unwrap();
    assert_eq!(json["evaluated"], 1);
    assert_eq!(json["solved"], false);
}
