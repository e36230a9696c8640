use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lumen: score LLM LED-allocation responses and relate accuracy to model size.
#[derive(Parser)]
#[command(
    name = "lumen",
    version,
    about = "Scoring and cross-model statistics for LLM LED-allocation responses"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Score every response, aggregate per model and run cross-model statistics.
    Evaluate(EvaluateArgs),
    /// Normalise a single raw response and print the result.
    Normalize(NormalizeArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "lumen.toml")]
    pub config: PathBuf,

    /// Override the responses JSON path from config.
    #[arg(short, long)]
    pub responses: Option<PathBuf>,

    /// Override the ground-truth JSON path from config.
    #[arg(short, long = "ground-truth")]
    pub ground_truth: Option<PathBuf>,

    /// Path for the JSON report. Printed to stdout when absent.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path for a Markdown summary table.
    #[arg(short, long)]
    pub summary: Option<PathBuf>,

    /// Override the bootstrap seed from config.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `normalize` subcommand.
#[derive(clap::Args)]
pub struct NormalizeArgs {
    /// File holding the raw response text.
    #[arg(short, long)]
    pub input: PathBuf,
}
