//! Search command implementation.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;

use progbreed::ast::NodeView;
use progbreed::corpus;
use progbreed::gp::{
    EnumerationSearch, EnumerationSearchConfig, Evaluator, FrequencyProfile, MutationSearch,
    MutationSearchConfig, RandomSearch, RandomSearchConfig, RelativizedProfile, SearchAlgorithm,
    SearchSummary, TypeDistribution,
};
use progbreed::samples::{Task, TaskSamples};
use progbreed::{InterpreterConfig, TypeTable};

use super::{AlgorithmArg, CliError, OutputFormat, ProfileArg, TaskArg};

/// Samples used to re-check a solution on inputs the search never saw.
const HOLDOUT_SAMPLES: usize = 1000;

/// Options of the `search` command.
#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub(crate) task: TaskArg,
    pub(crate) algorithm: AlgorithmArg,
    pub(crate) seconds: u64,
    pub(crate) seed: u64,
    pub(crate) batch: Option<usize>,
    pub(crate) depth: Option<usize>,
    pub(crate) profile: ProfileArg,
    pub(crate) print_config: bool,
    pub(crate) format: OutputFormat,
}

#[derive(Serialize)]
struct SearchReport<'a> {
    task: Task,
    algorithm: &'a str,
    #[serde(flatten)]
    summary: SearchSummary,
    holdout_score: Option<f64>,
    tree: Option<NodeView>,
}

/// Execute the search command.
pub(crate) fn execute(args: &SearchArgs) -> Result<(), CliError> {
    let task = Task::from(args.task);
    let table = TypeTable::new();
    let programs = corpus::programs()?;

    let (mut search, config) = match args.profile {
        ProfileArg::Uniform => build(args, task, FrequencyProfile::uniform(&table))?,
        ProfileArg::Corpus => build(
            args,
            task,
            FrequencyProfile::from_programs(&table, &programs, true),
        )?,
        ProfileArg::Relativized => build(
            args,
            task,
            RelativizedProfile::from_programs(&table, &programs),
        )?,
    };

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    info!(
        "{} search on {task} for {}s (seed {})",
        search.name(),
        args.seconds,
        args.seed
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.set_message(format!("{} search on {task}", search.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let outcome = search.search(Duration::from_secs(args.seconds));
    spinner.finish_and_clear();
    info!("Search finished in {:.2?}", start.elapsed());

    // Re-score the winner on fresh inputs from a different seed.
    let holdout_score = outcome.best.as_ref().map(|program| {
        let mut evaluator = Evaluator::new(InterpreterConfig::default(), HOLDOUT_SAMPLES);
        let mut holdout = TaskSamples::new(task, args.seed.wrapping_add(1));
        evaluator.score(program, &mut holdout)
    });

    match args.format {
        OutputFormat::Text => {
            println!("Task:          {task}");
            println!("Algorithm:     {}", search.name());
            println!(
                "Best score:    {:.1}%{}",
                outcome.best_score,
                if outcome.solved { " (solved)" } else { "" }
            );
            if let Some(score) = holdout_score {
                println!("Holdout score: {score:.1}% on {HOLDOUT_SAMPLES} fresh samples");
            }
            println!(
                "Evaluated:     {} programs over {} iterations",
                outcome.evaluated, outcome.iterations
            );
            println!("Elapsed:       {:.2?}", outcome.elapsed);
            match &outcome.best {
                Some(program) => {
                    println!();
                    println!("{program}");
                }
                None => println!("No program was scored."),
            }
        }
        OutputFormat::Json => {
            let report = SearchReport {
                task,
                algorithm: search.name(),
                summary: outcome.summary(),
                holdout_score,
                tree: outcome.best.as_ref().map(progbreed::Program::view),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Build the chosen search and its effective configuration.
fn build<D>(
    args: &SearchArgs,
    task: Task,
    distribution: D,
) -> Result<(Box<dyn SearchAlgorithm>, serde_json::Value), CliError>
where
    D: TypeDistribution + 'static,
{
    let generator = TaskSamples::new(task, args.seed);
    let built: (Box<dyn SearchAlgorithm>, serde_json::Value) = match args.algorithm {
        AlgorithmArg::Random => {
            let mut config = RandomSearchConfig {
                seed: args.seed,
                ..RandomSearchConfig::default()
            };
            if let Some(batch) = args.batch {
                config.batch_size = batch;
            }
            if let Some(depth) = args.depth {
                config.max_depth = depth;
            }
            (
                Box::new(RandomSearch::new(config, generator, distribution)),
                serde_json::to_value(config)?,
            )
        }
        AlgorithmArg::Mutation => {
            let mut config = MutationSearchConfig {
                seed: args.seed,
                ..MutationSearchConfig::default()
            };
            if let Some(batch) = args.batch {
                config.batch_size = batch;
            }
            if let Some(depth) = args.depth {
                config.initial_depth = depth;
                config.fresh_depth = depth;
            }
            (
                Box::new(MutationSearch::new(config, generator, distribution)),
                serde_json::to_value(config)?,
            )
        }
        AlgorithmArg::Enumeration => {
            let mut config = EnumerationSearchConfig {
                max_depth: args.depth,
                ..EnumerationSearchConfig::default()
            };
            if let Some(batch) = args.batch {
                config.batch_size = batch;
            }
            (
                Box::new(EnumerationSearch::new(config, generator)),
                serde_json::to_value(config)?,
            )
        }
    };
    Ok(built)
}
