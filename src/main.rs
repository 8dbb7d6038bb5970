mod build_cmd;
mod cli;
mod config;
mod convert;
mod cross_cmd;
mod curve_cmd;
mod input;
mod logging;
mod matrix_cmd;
mod validate_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::DeteriorConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = DeteriorConfig::load(cli.format.as_deref())?;
    match cli.command {
        Command::Build(args) => build_cmd::run(args, &config),
        Command::Validate(args) => validate_cmd::run(args, &config),
        Command::Cross(args) => cross_cmd::run(args, &config),
        Command::Curve(args) => curve_cmd::run(args),
        Command::Matrix(args) => matrix_cmd::run(args),
    }
}
