use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deterior equipment deterioration modeller.
#[derive(Parser)]
#[command(
    name = "deterior",
    version,
    about = "Equipment deterioration modelling with discrete-time Markov chains"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a TOML file describing the dataset format and fit settings.
    #[arg(short = 'f', long = "format", global = true)]
    pub format: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit a monotone model to an inspection dataset and save it.
    Build(BuildArgs),
    /// Score a saved model against an inspection dataset.
    Validate(ValidateArgs),
    /// Run k-fold cross-validation of the fitting procedure.
    Cross(CrossArgs),
    /// Project the state probabilities of an asset over time.
    Curve(CurveArgs),
    /// Export the transition matrix of a saved model as CSV.
    Matrix(MatrixArgs),
}

/// Arguments for the `build` subcommand.
#[derive(clap::Args)]
pub struct BuildArgs {
    /// Inspection dataset (.csv or .xlsx).
    pub dataset: PathBuf,

    /// Output model file (JSON).
    pub model: PathBuf,

    /// Override the global-search seed from the format file.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Saved model file (JSON).
    pub model: PathBuf,

    /// Inspection dataset (.csv or .xlsx).
    pub dataset: PathBuf,
}

/// Arguments for the `cross` subcommand.
#[derive(clap::Args)]
pub struct CrossArgs {
    /// Inspection dataset (.csv or .xlsx).
    pub dataset: PathBuf,

    /// Number of folds.
    #[arg(short, default_value_t = 5)]
    pub k: usize,

    /// Seed for shuffling records into folds.
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,
}

/// Arguments for the `curve` subcommand.
#[derive(clap::Args)]
pub struct CurveArgs {
    /// Saved model file (JSON).
    pub model: PathBuf,

    /// Initial state index.
    #[arg(long, default_value_t = 0)]
    pub state: usize,

    /// First projection time.
    #[arg(long, default_value_t = 0)]
    pub start: u32,

    /// Projection end time (exclusive).
    #[arg(long)]
    pub stop: u32,

    /// Time between projection points.
    #[arg(long, default_value_t = 1)]
    pub step: u32,

    /// Output CSV path; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `matrix` subcommand.
#[derive(clap::Args)]
pub struct MatrixArgs {
    /// Saved model file (JSON).
    pub model: PathBuf,

    /// Output CSV path; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
