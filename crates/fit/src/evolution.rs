//! Differential-evolution global search over the unit box.
//!
//! Strategy `best/1/bin` with deferred updating: every trial vector of a
//! generation is built from the previous population, then the whole batch
//! is evaluated in parallel and selection is applied. Random draws happen
//! on the calling thread in a fixed order, so results depend only on the
//! seed and never on the number of rayon workers.
//!
//! **Not part of the public API.**

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::FitConfig;
use crate::error::FitError;
use crate::local;
use crate::loss::MonotoneLoss;

/// Message reported when the wall-clock bound is hit.
pub(crate) const DEADLINE_MESSAGE: &str = "global search exceeded its deadline";

/// Result of one global search.
#[derive(Debug, Clone)]
pub(crate) struct EvolutionOutcome {
    /// Best parameters found.
    pub params: Vec<f64>,
    /// Loss at `params`.
    pub loss: f64,
    /// Generations evolved.
    pub generations: u64,
    /// Whether the population converged in time.
    pub converged: bool,
    /// Why the search stopped.
    pub message: String,
}

/// Runs differential evolution, polishing the winner with Nelder-Mead.
pub(crate) fn differential_evolution(
    loss: &MonotoneLoss<'_>,
    config: &FitConfig,
) -> Result<EvolutionOutcome, FitError> {
    let global = config.global();
    let dim = loss.n_params();
    let size = global.population_size(dim);
    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed());

    let mut population: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..dim).map(|_| rng.random::<f64>()).collect())
        .collect();
    let mut costs = evaluate_all(loss, &population);

    let mut generations = 0u64;
    let mut converged = false;
    let mut message = format!(
        "maximum number of generations ({}) reached",
        global.max_generations()
    );

    for _ in 0..global.max_generations() {
        if config.deadline().is_some_and(|d| started.elapsed() >= d) {
            message = DEADLINE_MESSAGE.to_string();
            break;
        }

        let best = best_index(&costs);
        let trials: Vec<Vec<f64>> = (0..size)
            .map(|i| trial_vector(&population, i, best, config, &mut rng))
            .collect();
        let trial_costs = evaluate_all(loss, &trials);

        for (i, (trial, cost)) in trials.into_iter().zip(trial_costs).enumerate() {
            if cost <= costs[i] {
                population[i] = trial;
                costs[i] = cost;
            }
        }
        generations += 1;

        let (mean, std) = mean_std(&costs);
        debug!(generation = generations, mean, std, "evolved population");
        if std <= global.absolute_tolerance() + global.tolerance() * mean.abs() {
            converged = true;
            message = format!("population converged after {generations} generations");
            break;
        }
    }

    if converged && config.deadline().is_some_and(|d| started.elapsed() >= d) {
        converged = false;
        message = DEADLINE_MESSAGE.to_string();
    }

    let best = best_index(&costs);
    let mut params = population[best].clone();
    let mut best_loss = costs[best];

    if converged {
        let polished = local::nelder_mead(loss, &params, config)?;
        if polished.loss < best_loss {
            debug!(before = best_loss, after = polished.loss, "polish improved best member");
            params = polished.params;
            best_loss = polished.loss;
        }
    }

    Ok(EvolutionOutcome {
        params,
        loss: best_loss,
        generations,
        converged,
        message,
    })
}

fn evaluate_all(loss: &MonotoneLoss<'_>, members: &[Vec<f64>]) -> Vec<f64> {
    members.par_iter().map(|x| loss.evaluate(x)).collect()
}

/// Index of the lowest cost; the first one wins ties.
fn best_index(costs: &[f64]) -> usize {
    costs
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bc), (i, &c)| {
            if c < bc { (i, c) } else { (bi, bc) }
        })
        .0
}

fn trial_vector(
    population: &[Vec<f64>],
    i: usize,
    best: usize,
    config: &FitConfig,
    rng: &mut StdRng,
) -> Vec<f64> {
    let global = config.global();
    let size = population.len();
    let r1 = pick_other(rng, size, &[i]);
    let r2 = pick_other(rng, size, &[i, r1]);

    let target = &population[i];
    let dim = target.len();
    let forced = rng.random_range(0..dim.max(1));
    (0..dim)
        .map(|j| {
            if j == forced || rng.random::<f64>() < global.crossover() {
                let v = population[best][j]
                    + global.mutation() * (population[r1][j] - population[r2][j]);
                if (0.0..=1.0).contains(&v) {
                    v
                } else {
                    rng.random::<f64>()
                }
            } else {
                target[j]
            }
        })
        .collect()
}

fn pick_other(rng: &mut StdRng, size: usize, exclude: &[usize]) -> usize {
    loop {
        let r = rng.random_range(0..size);
        if !exclude.contains(&r) {
            return r;
        }
    }
}

/// Population mean and standard deviation; infinite if any cost is.
fn mean_std(costs: &[f64]) -> (f64, f64) {
    let n = costs.len() as f64;
    let mean = costs.iter().sum::<f64>() / n;
    let var = costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
