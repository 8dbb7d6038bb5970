//! Validate command: score a saved model against a dataset.

use anyhow::{Context, Result};
use tracing::info_span;

use deterior_evaluate::validate;
use deterior_markov::load_model;

use crate::cli::ValidateArgs;
use crate::config::DeteriorConfig;
use crate::convert;
use crate::input;

/// Print how well a saved model explains the dataset.
pub fn run(args: ValidateArgs, config: &DeteriorConfig) -> Result<()> {
    let _cmd = info_span!("validate").entered();
    let reader_cfg = convert::build_reader_config(&config.dataset)?;

    let model = load_model(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;
    let agg = input::load_dataset(&args.dataset, &reader_cfg)?;

    let result = validate(&model, &agg.transitions).context("validation failed")?;
    println!("Expectation: {}", result.expected);
    println!("Actual: {}", result.actual);
    println!("Variance: {}", result.variance);
    println!("Standard deviation: {}", result.std_dev);
    println!("Error: {:.2}%", result.error_pct);
    Ok(())
}
