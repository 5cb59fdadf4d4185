#![forbid(unsafe_code)]

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perron_core::{analyze, AnalyzeOptions, Edge, StateGraph, TransitionMatrix};
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    name = "perron",
    version,
    about = "perron: Markov chain structural and stationary analysis",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis over a chain file",
        long_about = "Classify states, compute periods, and solve for the steady-state \
                      vector when a unique one exists."
    )]
    Analyze(AnalyzeArgs),

    #[command(about = "Check that every transition matrix row sums to 1")]
    Validate(ValidateArgs),

    #[command(about = "Push a distribution through the chain a number of steps")]
    Steps(StepsArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Path to a JSON chain file: {"states": [...], "edges": [{"from", "to", "weight"}]}.
    input: PathBuf,

    /// Ignore weights and split each state's mass uniformly over its children.
    #[arg(long)]
    uniform: bool,

    /// Decimal places for the steady-state vector.
    #[arg(long, default_value_t = 4)]
    places: u32,

    /// Magnitude at or below which an elimination pivot counts as zero.
    #[arg(long, default_value_t = perron_core::DEFAULT_PIVOT_TOLERANCE)]
    pivot_tolerance: f64,

    /// Per-node revisit cap for periodicity cycle sampling.
    #[arg(long, default_value_t = perron_core::DEFAULT_REVISIT_CAP)]
    revisit_cap: u32,
}

#[derive(clap::Args, Debug)]
struct ValidateArgs {
    /// Path to a JSON chain file.
    input: PathBuf,

    /// Ignore weights and split each state's mass uniformly over its children.
    #[arg(long)]
    uniform: bool,
}

#[derive(clap::Args, Debug)]
struct StepsArgs {
    /// Path to a JSON chain file.
    input: PathBuf,

    /// Number of steps to propagate.
    #[arg(long, default_value_t = 1)]
    steps: usize,

    /// Initial distribution as comma-separated probabilities, one per state.
    /// Defaults to the uniform distribution.
    #[arg(long)]
    initial: Option<String>,

    /// Ignore weights and split each state's mass uniformly over its children.
    #[arg(long)]
    uniform: bool,
}

/// On-disk chain description.
#[derive(Debug, Deserialize)]
struct ChainFile {
    states: Vec<String>,
    edges: Vec<Edge>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("perron=debug,perron_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mode = OutputMode::from_flag(cli.json);
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Analyze(args) => {
            let chain = load_chain(&args.input)?;
            let options = AnalyzeOptions {
                uniform_successors: args.uniform,
                decimal_places: args.places,
                pivot_tolerance: args.pivot_tolerance,
                revisit_cap: args.revisit_cap,
            };
            let record = analyze(&chain.states, &chain.edges, &options)
                .context("analysis failed")?;
            output::render_analysis(&mut stdout, &record, mode)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => {
            let chain = load_chain(&args.input)?;
            let matrix = build_matrix(&chain, args.uniform)?;
            let validity = matrix.validate();
            output::render_validity(&mut stdout, &validity, mode)?;
            // Scripts branch on the exit code without parsing output.
            Ok(if validity.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Steps(args) => {
            let chain = load_chain(&args.input)?;
            let matrix = build_matrix(&chain, args.uniform)?;
            let initial = parse_initial(args.initial.as_deref(), chain.states.len())?;
            let distribution = matrix
                .propagate(&initial, args.steps)
                .context("propagation failed")?;
            output::render_distribution(&mut stdout, &chain.states, &distribution, mode)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_chain(path: &Path) -> Result<ChainFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read chain file {}", path.display()))?;
    let chain: ChainFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse chain file {}", path.display()))?;
    debug!(
        states = chain.states.len(),
        edges = chain.edges.len(),
        "loaded chain"
    );
    Ok(chain)
}

fn build_matrix(chain: &ChainFile, uniform: bool) -> Result<TransitionMatrix> {
    let graph = StateGraph::from_parts(&chain.states, &chain.edges)
        .context("chain violates the input contract")?;
    Ok(if uniform {
        TransitionMatrix::uniform(&graph)
    } else {
        TransitionMatrix::explicit(&graph)
    })
}

fn parse_initial(initial: Option<&str>, n: usize) -> Result<Vec<f64>> {
    match initial {
        None => {
            anyhow::ensure!(n > 0, "chain has no states");
            #[allow(clippy::cast_precision_loss)]
            Ok(vec![1.0 / n as f64; n])
        }
        Some(raw) => raw
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid probability `{part}`"))
            })
            .collect(),
    }
}
