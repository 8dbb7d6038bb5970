//! Configuration for monotone model fitting.

use std::time::Duration;

use crate::error::FitError;

/// Settings for the differential-evolution fallback.
///
/// # Example
///
/// ```
/// use deterior_fit::GlobalSearchConfig;
///
/// let config = GlobalSearchConfig::new()
///     .with_max_generations(200)
///     .with_mutation(0.6);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSearchConfig {
    /// Population members per free parameter.
    population_factor: usize,
    /// Lower bound on the population size.
    min_population: usize,
    /// Differential weight `F`.
    mutation: f64,
    /// Crossover probability `CR`.
    crossover: f64,
    /// Relative convergence tolerance on the population costs.
    tolerance: f64,
    /// Absolute convergence tolerance on the population costs.
    absolute_tolerance: f64,
    /// Generation limit.
    max_generations: usize,
}

impl GlobalSearchConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: population `15 × dim` (at least 5), `F = 0.8`, `CR = 0.7`,
    /// `tol = 0.01`, `atol = 1e-10`, 1000 generations.
    pub fn new() -> Self {
        Self {
            population_factor: 15,
            min_population: 5,
            mutation: 0.8,
            crossover: 0.7,
            tolerance: 0.01,
            absolute_tolerance: 1e-10,
            max_generations: 1000,
        }
    }

    /// Sets the population members per free parameter.
    pub fn with_population_factor(mut self, factor: usize) -> Self {
        self.population_factor = factor;
        self
    }

    /// Sets the minimum population size.
    pub fn with_min_population(mut self, min: usize) -> Self {
        self.min_population = min;
        self
    }

    /// Sets the differential weight.
    pub fn with_mutation(mut self, mutation: f64) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover(mut self, crossover: f64) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the relative convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the absolute convergence tolerance.
    pub fn with_absolute_tolerance(mut self, atol: f64) -> Self {
        self.absolute_tolerance = atol;
        self
    }

    /// Sets the generation limit.
    pub fn with_max_generations(mut self, max: usize) -> Self {
        self.max_generations = max;
        self
    }

    /// Returns the population members per free parameter.
    pub fn population_factor(&self) -> usize {
        self.population_factor
    }

    /// Returns the minimum population size.
    pub fn min_population(&self) -> usize {
        self.min_population
    }

    /// Returns the differential weight.
    pub fn mutation(&self) -> f64 {
        self.mutation
    }

    /// Returns the crossover probability.
    pub fn crossover(&self) -> f64 {
        self.crossover
    }

    /// Returns the relative convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the absolute convergence tolerance.
    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    /// Returns the generation limit.
    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    /// Returns the population size for `dim` free parameters.
    pub fn population_size(&self, dim: usize) -> usize {
        (self.population_factor * dim).max(self.min_population)
    }

    /// Validates this configuration.
    ///
    /// The population must allow three distinct partners per member, so the
    /// minimum population is at least 4.
    pub fn validate(&self) -> Result<(), FitError> {
        if self.population_factor == 0 {
            return Err(invalid("population_factor must be positive"));
        }
        if self.min_population < 4 {
            return Err(invalid(format!(
                "min_population must be at least 4, got {}",
                self.min_population
            )));
        }
        if !self.mutation.is_finite() || self.mutation <= 0.0 || self.mutation > 2.0 {
            return Err(invalid(format!(
                "mutation must be in (0, 2], got {}",
                self.mutation
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover) {
            return Err(invalid(format!(
                "crossover must be in [0, 1], got {}",
                self.crossover
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if !self.absolute_tolerance.is_finite() || self.absolute_tolerance < 0.0 {
            return Err(invalid(format!(
                "absolute_tolerance must be finite and non-negative, got {}",
                self.absolute_tolerance
            )));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be positive"));
        }
        Ok(())
    }
}

impl Default for GlobalSearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for fitting a monotone deterioration model.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use deterior_fit::FitConfig;
///
/// let config = FitConfig::new()
///     .with_initial_guess(0.5)
///     .with_seed(7)
///     .with_deadline(Duration::from_secs(30));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.initial_guess(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// Starting value for every advance probability.
    initial_guess: f64,
    /// Local-search loss above which the global search runs.
    escalation_threshold: f64,
    /// Initial simplex edge length.
    simplex_step: f64,
    /// Nelder-Mead convergence tolerance on simplex costs.
    sd_tolerance: f64,
    /// Nelder-Mead iteration limit.
    max_iters: u64,
    /// Differential-evolution settings.
    global: GlobalSearchConfig,
    /// Seed for the global search.
    seed: u64,
    /// Wall-clock bound on the global search.
    deadline: Option<Duration>,
}

impl FitConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: initial guess 0.1, escalation threshold 1.0, simplex step
    /// 0.1, sd tolerance 1e-10, 2000 iterations, seed 0, no deadline.
    pub fn new() -> Self {
        Self {
            initial_guess: 0.1,
            escalation_threshold: 1.0,
            simplex_step: 0.1,
            sd_tolerance: 1e-10,
            max_iters: 2000,
            global: GlobalSearchConfig::new(),
            seed: 0,
            deadline: None,
        }
    }

    /// Sets the starting value for every advance probability.
    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = guess;
        self
    }

    /// Sets the loss above which the global search runs.
    pub fn with_escalation_threshold(mut self, threshold: f64) -> Self {
        self.escalation_threshold = threshold;
        self
    }

    /// Sets the initial simplex edge length.
    pub fn with_simplex_step(mut self, step: f64) -> Self {
        self.simplex_step = step;
        self
    }

    /// Sets the Nelder-Mead convergence tolerance.
    pub fn with_sd_tolerance(mut self, tol: f64) -> Self {
        self.sd_tolerance = tol;
        self
    }

    /// Sets the Nelder-Mead iteration limit.
    pub fn with_max_iters(mut self, max: u64) -> Self {
        self.max_iters = max;
        self
    }

    /// Replaces the global-search settings.
    pub fn with_global(mut self, global: GlobalSearchConfig) -> Self {
        self.global = global;
        self
    }

    /// Sets the global-search seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bounds the global search by wall-clock time.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the starting value for every advance probability.
    pub fn initial_guess(&self) -> f64 {
        self.initial_guess
    }

    /// Returns the escalation threshold.
    pub fn escalation_threshold(&self) -> f64 {
        self.escalation_threshold
    }

    /// Returns the initial simplex edge length.
    pub fn simplex_step(&self) -> f64 {
        self.simplex_step
    }

    /// Returns the Nelder-Mead convergence tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Returns the Nelder-Mead iteration limit.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the global-search settings.
    pub fn global(&self) -> &GlobalSearchConfig {
        &self.global
    }

    /// Returns the global-search seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the global-search deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), FitError> {
        if !(0.0..=1.0).contains(&self.initial_guess) {
            return Err(invalid(format!(
                "initial_guess must be in [0, 1], got {}",
                self.initial_guess
            )));
        }
        if !self.escalation_threshold.is_finite() || self.escalation_threshold <= 0.0 {
            return Err(invalid(format!(
                "escalation_threshold must be finite and positive, got {}",
                self.escalation_threshold
            )));
        }
        if !self.simplex_step.is_finite() || self.simplex_step <= 0.0 || self.simplex_step > 1.0
        {
            return Err(invalid(format!(
                "simplex_step must be in (0, 1], got {}",
                self.simplex_step
            )));
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(invalid(format!(
                "sd_tolerance must be finite and positive, got {}",
                self.sd_tolerance
            )));
        }
        if self.max_iters == 0 {
            return Err(invalid("max_iters must be positive"));
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(invalid("deadline must be positive"));
        }
        self.global.validate()
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(reason: impl Into<String>) -> FitError {
    FitError::InvalidConfig {
        reason: reason.into(),
    }
}
