//! Bounded Nelder-Mead local search.
//!
//! Wraps the `argmin` crate. The simplex moves in unconstrained angles
//! `θ`, mapped onto the box by `p = sin²(θ)`. The map reaches both bounds
//! exactly and has no flat region outside them, so the simplex cannot
//! stall on clamped points.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use tracing::debug;

use crate::config::FitConfig;
use crate::error::FitError;
use crate::loss::{MonotoneLoss, clamp_unit};

/// Result of one local search.
#[derive(Debug, Clone)]
pub(crate) struct LocalOutcome {
    /// Best parameters, inside the box.
    pub params: Vec<f64>,
    /// Loss at `params`.
    pub loss: f64,
    /// Solver iterations used.
    pub iterations: u64,
    /// Whether the simplex converged.
    pub converged: bool,
    /// Why the solver stopped.
    pub message: String,
}

/// Runs Nelder-Mead from `start`.
pub(crate) fn nelder_mead(
    loss: &MonotoneLoss<'_>,
    start: &[f64],
    config: &FitConfig,
) -> Result<LocalOutcome, FitError> {
    let origin = to_angles(&clamp_unit(start));
    let simplex = initial_simplex(&origin, config.simplex_step());

    let solver = NelderMead::new(simplex).with_sd_tolerance(config.sd_tolerance())?;
    let result = Executor::new(LossCost { loss }, solver)
        .configure(|state| state.max_iters(config.max_iters()))
        .run()?;

    let state = result.state();
    let best = state.get_best_param().cloned().unwrap_or(origin);
    let params = to_unit(&best);
    let (converged, message) = match state.get_termination_status() {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
            (true, "local search converged".to_string())
        }
        TerminationStatus::Terminated(reason) => (false, format!("local search stopped: {reason}")),
        TerminationStatus::NotTerminated => (false, "local search did not terminate".to_string()),
    };
    let outcome = LocalOutcome {
        loss: loss.evaluate(&params),
        params,
        iterations: state.get_iter(),
        converged,
        message,
    };
    debug!(
        loss = outcome.loss,
        iterations = outcome.iterations,
        converged = outcome.converged,
        "nelder-mead finished"
    );
    Ok(outcome)
}

/// Maps angles onto `[0, 1]` with `sin²`.
fn to_unit(theta: &[f64]) -> Vec<f64> {
    theta.iter().map(|t| t.sin().powi(2)).collect()
}

/// Inverse of [`to_unit`] on `[0, 1]`, choosing `θ ∈ [0, π/2]`.
fn to_angles(params: &[f64]) -> Vec<f64> {
    params.iter().map(|p| p.sqrt().asin()).collect()
}

/// Builds a simplex of `dim + 1` vertices around `origin`, each extra
/// vertex moving one angle by `step`.
fn initial_simplex(origin: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(origin.len() + 1);
    simplex.push(origin.to_vec());
    for i in 0..origin.len() {
        let mut vertex = origin.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

/// Cost function for argmin, over angles.
struct LossCost<'a, 'h> {
    loss: &'a MonotoneLoss<'h>,
}

impl CostFunction for LossCost<'_, '_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.loss.evaluate(&to_unit(theta)))
    }
}
