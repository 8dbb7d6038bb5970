//! Fitting monotone deterioration models to transition histograms.

use std::fmt;

use deterior_dataset::Histogram;
use deterior_markov::MarkovModel;
use tracing::{info, warn};

use crate::config::FitConfig;
use crate::error::FitError;
use crate::evolution;
use crate::local;
use crate::loss::MonotoneLoss;

/// Which search produced a [`FitResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    /// Single-state model; nothing to search.
    Trivial,
    /// Nelder-Mead only.
    NelderMead,
    /// Differential evolution after the local search was escalated.
    DifferentialEvolution,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMethod::Trivial => "trivial",
            SearchMethod::NelderMead => "nelder-mead",
            SearchMethod::DifferentialEvolution => "differential-evolution",
        };
        f.write_str(name)
    }
}

/// Outcome of the optimiser.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Whether the chosen search converged.
    pub success: bool,
    /// Advance probabilities, one per non-absorbing state.
    pub params: Vec<f64>,
    /// Loss at `params`.
    pub loss: f64,
    /// Nelder-Mead iterations or evolution generations.
    pub iterations: u64,
    /// Solver stop reason.
    pub message: String,
    /// The search whose result is reported.
    pub method: SearchMethod,
}

/// A fitted model, present only when the search succeeded.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// The monotone model, `None` on failure.
    pub model: Option<MarkovModel>,
    /// Optimiser details.
    pub result: FitResult,
}

impl FitOutcome {
    /// Returns `true` if a model was produced.
    pub fn is_success(&self) -> bool {
        self.model.is_some()
    }
}

/// Fits monotone stay-or-advance models by bounded least squares.
///
/// Runs Nelder-Mead from the configured initial guess; when the resulting
/// loss exceeds the escalation threshold, the fit is redone by
/// differential evolution over `[0, 1]^(N-1)` and that result is reported
/// instead.
///
/// # Example
///
/// ```
/// use deterior_dataset::{Histogram, TransitionRecord};
/// use deterior_fit::{Estimator, FitConfig};
///
/// let records = [
///     TransitionRecord::new(0, 0, 1),
///     TransitionRecord::new(0, 0, 1),
///     TransitionRecord::new(0, 1, 1),
///     TransitionRecord::new(0, 1, 1),
/// ];
/// let histogram = Histogram::from_transitions(2, &records).unwrap();
/// let estimator = Estimator::new(FitConfig::default()).unwrap();
/// let outcome = estimator.fit(&histogram).unwrap();
///
/// assert!(outcome.result.success);
/// assert!((outcome.result.params[0] - 0.5).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct Estimator {
    config: FitConfig,
}

impl Estimator {
    /// Creates an estimator.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: FitConfig) -> Result<Self, FitError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Fits a monotone model to `histogram`.
    ///
    /// A failed search is not an error: the outcome then carries no model
    /// and `result.success` is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::NoStates`] for a zero-state histogram or
    /// [`FitError::Optimizer`] if the optimiser cannot be set up.
    pub fn fit(&self, histogram: &Histogram) -> Result<FitOutcome, FitError> {
        if histogram.n_state() == 0 {
            return Err(FitError::NoStates);
        }
        let loss = MonotoneLoss::new(histogram);
        let dim = loss.n_params();

        let result = if dim == 0 {
            FitResult {
                success: true,
                params: Vec::new(),
                loss: loss.evaluate(&[]),
                iterations: 0,
                message: "single-state model has no free parameters".to_string(),
                method: SearchMethod::Trivial,
            }
        } else {
            self.search(&loss, dim)?
        };

        let model = if result.success {
            Some(MarkovModel::monotone(&result.params)?)
        } else {
            None
        };
        info!(
            n_state = histogram.n_state(),
            method = %result.method,
            success = result.success,
            loss = result.loss,
            iterations = result.iterations,
            "fit finished"
        );
        Ok(FitOutcome { model, result })
    }

    fn search(&self, loss: &MonotoneLoss<'_>, dim: usize) -> Result<FitResult, FitError> {
        let start = vec![self.config.initial_guess(); dim];
        let local = local::nelder_mead(loss, &start, &self.config)?;
        let threshold = self.config.escalation_threshold();
        if local.loss <= threshold {
            return Ok(FitResult {
                success: local.converged,
                params: local.params,
                loss: local.loss,
                iterations: local.iterations,
                message: local.message,
                method: SearchMethod::NelderMead,
            });
        }

        warn!(
            loss = local.loss,
            threshold, "local search loss above threshold, escalating to global search"
        );
        let global = evolution::differential_evolution(loss, &self.config)?;
        Ok(FitResult {
            success: global.converged,
            params: global.params,
            loss: global.loss,
            iterations: global.generations,
            message: global.message,
            method: SearchMethod::DifferentialEvolution,
        })
    }
}

/// Fits a monotone model with `config`.
///
/// Shorthand for [`Estimator::new`] followed by [`Estimator::fit`].
pub fn fit_monotone(histogram: &Histogram, config: &FitConfig) -> Result<FitOutcome, FitError> {
    Estimator::new(config.clone())?.fit(histogram)
}
