//! algo-lab CLI - algorithm comparison labs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

mod dashboard;
mod error;
mod file_manager;
mod labs;
mod render;
mod visualize;

use algo_lab_core::{PeakAllocator, Preset, SortAlgorithm};
use labs::fibonacci::FibonacciRange;
use labs::graphs::GraphLab;
use labs::{LabContext, LabOutput, OutputFormat};
use visualize::VisualizeOptions;

#[global_allocator]
static ALLOCATOR: PeakAllocator = PeakAllocator::new();

/// algo-lab: measure and compare classical algorithms
#[derive(Parser, Debug)]
#[command(name = "algo-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory receiving one sub-directory of charts per lab
    #[arg(short, long, global = true, env = "ALGO_LAB_OUTPUT", default_value = "lab-output")]
    output: PathBuf,

    /// Seed for every generated input
    #[arg(long, global = true, env = "ALGO_LAB_SEED", default_value = "42")]
    seed: u64,

    /// Also measure peak heap usage (one extra run per cell)
    #[arg(long, global = true, default_value = "false")]
    track_memory: bool,

    /// Console format of the result tables
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Do not print tables, only write the output files
    #[arg(short, long, global = true, default_value = "false")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare the Fibonacci methods
    Fibonacci(FibonacciArgs),
    /// Compare the sorting algorithms across input patterns
    Sorting,
    /// Compare BFS and DFS across graph shapes
    Traversal,
    /// Compare Dijkstra and Floyd-Warshall across graph shapes
    ShortestPath,
    /// Compare Kruskal and Prim across graph shapes
    Mst,
    /// Run every lab
    All(FibonacciArgs),
    /// Animate a sorting algorithm in the terminal
    Visualize(VisualizeArgs),
}

#[derive(Parser, Debug)]
struct FibonacciArgs {
    /// Which list of n to sweep
    #[arg(short, long, value_enum, default_value = "low")]
    range: FibonacciRange,
}

#[derive(Parser, Debug)]
struct VisualizeArgs {
    /// heap, insertion, merge, quick or tim
    #[arg(short, long, default_value = "quick")]
    algorithm: SortAlgorithm,

    /// random, nearly-sorted, reversed or few-unique
    #[arg(short, long, default_value = "random")]
    preset: Preset,

    #[arg(short = 'n', long, default_value = "50")]
    size: usize,

    #[arg(long, default_value = "-10", allow_hyphen_values = true)]
    min: i64,

    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    max: i64,

    /// Milliseconds between frames
    #[arg(short, long, default_value = "30")]
    delay: u64,

    #[arg(long)]
    max_frames: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut ctx = LabContext::new(&cli.output, cli.seed, cli.format);
    if cli.track_memory {
        ctx = ctx.with_memory_probe(&ALLOCATOR);
    }
    if cli.quiet {
        ctx = ctx.quiet();
    }

    match cli.command {
        Commands::Fibonacci(args) => fibonacci_command(&ctx, args.range),
        Commands::Sorting => sorting_command(&ctx),
        Commands::Traversal => graph_command(&ctx, GraphLab::traversal()),
        Commands::ShortestPath => graph_command(&ctx, GraphLab::shortest_path()),
        Commands::Mst => graph_command(&ctx, GraphLab::mst()),
        Commands::All(args) => all_command(&ctx, args.range),
        Commands::Visualize(args) => visualize_command(args, cli.seed),
    }
}

fn publish(ctx: &LabContext<'_>, output: LabOutput) -> Result<()> {
    let index = labs::publish(ctx, &output)
        .with_context(|| format!("Failed to write {} output", output.name))?;
    info!("Dashboard: {}", index.display());
    Ok(())
}

fn fibonacci_command(ctx: &LabContext<'_>, range: FibonacciRange) -> Result<()> {
    let output = labs::fibonacci::run(ctx, range).context("Fibonacci lab failed")?;
    publish(ctx, output)
}

fn sorting_command(ctx: &LabContext<'_>) -> Result<()> {
    let output = labs::sorting::run(ctx).context("Sorting lab failed")?;
    publish(ctx, output)
}

fn graph_command(ctx: &LabContext<'_>, lab: GraphLab) -> Result<()> {
    let output = lab
        .run(ctx)
        .with_context(|| format!("{} lab failed", lab.title))?;
    publish(ctx, output)
}

fn all_command(ctx: &LabContext<'_>, range: FibonacciRange) -> Result<()> {
    info!("Running every lab into {}", ctx.output_dir().display());

    let results = [
        ("fibonacci", fibonacci_command(ctx, range)),
        ("sorting", sorting_command(ctx)),
        ("traversal", graph_command(ctx, GraphLab::traversal())),
        ("shortest-path", graph_command(ctx, GraphLab::shortest_path())),
        ("mst", graph_command(ctx, GraphLab::mst())),
    ];
    let total = results.len();
    let mut failed = Vec::new();
    for (name, result) in results {
        if let Err(e) = result {
            error!("{}: {:#}", name, e);
            failed.push(name);
        }
    }

    if failed.is_empty() {
        info!("All labs completed");
        Ok(())
    } else {
        anyhow::bail!("{} of {} labs failed: {}", failed.len(), total, failed.join(", "))
    }
}

fn visualize_command(args: VisualizeArgs, seed: u64) -> Result<()> {
    use rand::SeedableRng;

    let stdout = std::io::stdout();
    let options = VisualizeOptions {
        algorithm: args.algorithm,
        preset: args.preset,
        size: args.size,
        min: args.min,
        max: args.max,
        delay: Duration::from_millis(args.delay),
        max_frames: args.max_frames,
        clear: stdout.is_terminal(),
    };
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let frames =
        visualize::run(&options, &mut rng, &mut stdout.lock()).context("Visualizer failed")?;
    info!("Drew {} frames", frames);
    Ok(())
}
