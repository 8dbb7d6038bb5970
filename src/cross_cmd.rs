//! Cross command: k-fold cross-validation of the estimator.

use anyhow::{Context, Result};
use tracing::info_span;

use deterior_evaluate::{CrossValidationConfig, cross_validate};

use crate::cli::CrossArgs;
use crate::config::DeteriorConfig;
use crate::convert;
use crate::input;

/// Print per-fold and mean validation scores.
pub fn run(args: CrossArgs, config: &DeteriorConfig) -> Result<()> {
    let _cmd = info_span!("cross").entered();
    let reader_cfg = convert::build_reader_config(&config.dataset)?;
    let fit_cfg = convert::build_fit_config(&config.fit, None)?;
    let cv_cfg = CrossValidationConfig::new(args.k).with_seed(args.seed);

    let agg = input::load_dataset(&args.dataset, &reader_cfg)?;
    let summary =
        cross_validate(&agg.transitions, &cv_cfg, &fit_cfg).context("cross-validation failed")?;

    println!("Folds: {} (size {})", summary.n_folds, summary.fold_size);
    for fold in &summary.folds {
        println!(
            "Fold {}: variance {}, std {}, error {:.2}%",
            fold.fold, fold.validation.variance, fold.validation.std_dev, fold.validation.error_pct
        );
    }
    println!("Mean variance: {}", summary.mean_variance);
    println!("Mean standard deviation: {}", summary.mean_std_dev);
    println!("Mean error: {:.2}%", summary.mean_error_pct);
    Ok(())
}
