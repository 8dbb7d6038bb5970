//! k-fold cross-validation of the monotone estimator.

use deterior_dataset::{TransitionRecord, TransitionSet};
use deterior_fit::{FitConfig, FitResult, fit_monotone};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::EvaluateError;
use crate::validate::{ValidationResult, validate};

/// Fold count and shuffle seed for [`cross_validate`].
///
/// # Example
///
/// ```
/// use deterior_evaluate::CrossValidationConfig;
///
/// let config = CrossValidationConfig::new(10).with_seed(3);
/// assert!(config.validate().is_ok());
/// assert!(CrossValidationConfig::new(1).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossValidationConfig {
    k: usize,
    seed: u64,
}

impl CrossValidationConfig {
    /// Creates a configuration with `k` folds and seed 0.
    pub fn new(k: usize) -> Self {
        Self { k, seed: 0 }
    }

    /// Sets the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the requested fold count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the shuffle seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates this configuration.
    ///
    /// Returns [`EvaluateError::InvalidFolds`] if `k < 2`.
    pub fn validate(&self) -> Result<(), EvaluateError> {
        if self.k < 2 {
            return Err(EvaluateError::InvalidFolds { k: self.k });
        }
        Ok(())
    }
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Fit and score of one fold.
#[derive(Debug, Clone)]
pub struct FoldResult {
    /// Zero-based fold index.
    pub fold: usize,
    /// Records the model was trained on.
    pub train_size: usize,
    /// Records the model was scored on.
    pub test_size: usize,
    /// Optimiser outcome on the training records.
    pub fit: FitResult,
    /// Score on the held-out records.
    pub validation: ValidationResult,
}

/// Means over all folds of a successful cross-validation.
#[derive(Debug, Clone)]
pub struct CrossValidationSummary {
    /// Number of folds actually used (at most `k`).
    pub n_folds: usize,
    /// Records per fold; the last fold may be smaller.
    pub fold_size: usize,
    /// Per-fold results in fold order.
    pub folds: Vec<FoldResult>,
    /// Mean of the fold variances.
    pub mean_variance: f64,
    /// Mean of the fold standard deviations.
    pub mean_std_dev: f64,
    /// Mean of the fold percentage errors.
    pub mean_error_pct: f64,
}

/// Cross-validates the monotone estimator on `data`.
///
/// Records are shuffled with the configured seed and cut into folds of
/// `ceil(len / k)` records. Each fold is scored by a model fitted on all
/// the other folds. Folds are processed in parallel but reported in fold
/// order, and the run is aborted by the lowest-numbered fold whose fit
/// fails.
///
/// # Errors
///
/// Returns [`EvaluateError::InvalidFolds`] if `k < 2`,
/// [`EvaluateError::EmptyData`] if `data` is empty,
/// [`EvaluateError::FitFailed`] if any fold's fit does not converge, and
/// propagates configuration errors from the estimator.
pub fn cross_validate(
    data: &TransitionSet,
    config: &CrossValidationConfig,
    fit_config: &FitConfig,
) -> Result<CrossValidationSummary, EvaluateError> {
    config.validate()?;
    fit_config.validate()?;
    if data.is_empty() {
        return Err(EvaluateError::EmptyData);
    }

    let mut records = data.records().to_vec();
    records.shuffle(&mut StdRng::seed_from_u64(config.seed()));
    let folds = data.with_records(records).chunk_folds(config.k());
    let fold_size = data.len().div_ceil(config.k());
    info!(
        records = data.len(),
        folds = folds.len(),
        fold_size,
        "starting cross-validation"
    );

    let results: Vec<Result<FoldResult, EvaluateError>> = (0..folds.len())
        .into_par_iter()
        .map(|i| run_fold(i, &folds, fit_config))
        .collect();
    let folds = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    let n = folds.len() as f64;
    let mean = |f: fn(&FoldResult) -> f64| folds.iter().map(f).sum::<f64>() / n;
    let summary = CrossValidationSummary {
        n_folds: folds.len(),
        fold_size,
        mean_variance: mean(|f| f.validation.variance),
        mean_std_dev: mean(|f| f.validation.std_dev),
        mean_error_pct: mean(|f| f.validation.error_pct),
        folds,
    };
    info!(
        mean_variance = summary.mean_variance,
        mean_std_dev = summary.mean_std_dev,
        mean_error_pct = summary.mean_error_pct,
        "cross-validation finished"
    );
    Ok(summary)
}

fn run_fold(
    i: usize,
    folds: &[TransitionSet],
    fit_config: &FitConfig,
) -> Result<FoldResult, EvaluateError> {
    let test = &folds[i];
    let train_records: Vec<TransitionRecord> = folds
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .flat_map(|(_, f)| f.records().iter().copied())
        .collect();
    let train = test.with_records(train_records);

    let outcome = fit_monotone(&train.histogram(), fit_config)?;
    let Some(model) = outcome.model else {
        return Err(EvaluateError::FitFailed {
            fold: i,
            message: outcome.result.message,
        });
    };
    let validation = validate(&model, test)?;
    debug!(
        fold = i,
        train = train.len(),
        test = test.len(),
        variance = validation.variance,
        "fold scored"
    );

    Ok(FoldResult {
        fold: i,
        train_size: train.len(),
        test_size: test.len(),
        fit: outcome.result,
        validation,
    })
}
