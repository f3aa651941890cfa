//! Progbreed CLI - search for programs that solve small integer tasks.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use progbreed::NodeClass;
use std::process::ExitCode;

/// Progbreed - program synthesis by random, mutation and exhaustive search
#[derive(Parser, Debug)]
#[command(name = "progbreed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a program solving a task
    Search {
        /// Task to solve
        #[arg(short, long, value_enum)]
        task: cli::TaskArg,

        /// Search algorithm
        #[arg(short, long, value_enum, default_value = "mutation")]
        algorithm: cli::AlgorithmArg,

        /// Time budget in seconds (default: 10)
        #[arg(long, default_value = "10")]
        seconds: u64,

        /// Random seed (default: 0)
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Samples per evaluation (default: algorithm specific)
        #[arg(short, long)]
        batch: Option<usize>,

        /// Depth of generated programs, or the last depth to enumerate
        #[arg(short, long)]
        depth: Option<usize>,

        /// Node-type distribution for generated programs
        #[arg(short, long, value_enum, default_value = "relativized")]
        profile: cli::ProfileArg,

        /// Print the effective configuration before searching
        #[arg(long)]
        print_config: bool,

        /// Output format: text or json
        #[arg(short, long, value_enum, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// List the trees of a class at a depth
    Enumerate {
        /// Node class: numeric, boolean or directive
        #[arg(short, long)]
        class: NodeClass,

        /// Enumeration depth
        #[arg(short, long)]
        depth: usize,

        /// Number of trees to print (default: 20)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the node-type frequency profile of the corpus
    Profile {
        /// Print the parent-conditioned profile
        #[arg(short, long)]
        relativized: bool,
    },

    /// Execute a corpus program
    Run {
        /// Program to run
        #[arg(short, long, value_enum)]
        program: cli::ProgramArg,

        /// Input values
        #[arg(short, long, num_args = 1.., allow_negative_numbers = true)]
        input: Vec<i32>,

        /// Output format: text or json
        #[arg(short, long, value_enum, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.command {
        Commands::Search {
            task,
            algorithm,
            seconds,
            seed,
            batch,
            depth,
            profile,
            print_config,
            format,
        } => cli::search::execute(&cli::search::SearchArgs {
            task,
            algorithm,
            seconds,
            seed,
            batch,
            depth,
            profile,
            print_config,
            format,
        }),

        Commands::Enumerate {
            class,
            depth,
            limit,
        } => cli::enumerate::execute(class, depth, limit),

        Commands::Profile { relativized } => cli::profile::execute(relativized),

        Commands::Run {
            program,
            input,
            format,
        } => cli::run::execute(program, &input, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
