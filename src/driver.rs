//! A ready-made driver loop.
//!
//! The swarm itself never decides when to stop. This module is one such
//! decision: iterate until an iteration cap, a fitness target, or a
//! stagnation limit is reached, and collect the history on the way.

use crate::error::PsoResult;
use crate::swarm::Swarm;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopCriteria {
    pub max_iterations: usize,
    /// Stop once the global best is at least this good
    pub target_fitness: Option<f64>,
    /// Stop after this many consecutive iterations without improvement
    pub stagnation_limit: Option<usize>,
}

impl Default for StopCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            target_fitness: None,
            stagnation_limit: None,
        }
    }
}

impl StopCriteria {
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxIterations,
    TargetReached,
    Stagnated,
}

/// The result of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_variables: Array1<f64>,
    pub best_fitness: f64,
    pub iterations: usize,
    /// Global best fitness after each iteration, starting with the initial swarm
    pub history: Vec<f64>,
    pub stop_reason: StopReason,
}

/// Drive `swarm` until one of `criteria` holds.
///
/// An evaluation failure ends the run with the error; the swarm is left
/// aborted.
pub fn run<A: Send + Sync>(swarm: &mut Swarm<A>, criteria: &StopCriteria) -> PsoResult<OptimizationResult> {
    let comparator = swarm.rules().comparator;
    let reached = |fitness: f64| {
        criteria
            .target_fitness
            .map_or(false, |target| !comparator.is_better(target, fitness))
    };

    let mut history = Vec::with_capacity(criteria.max_iterations + 1);
    history.push(swarm.global_best().fitness);

    let mut iterations = 0;
    let mut stagnant = 0;
    let mut stop_reason = StopReason::MaxIterations;

    if reached(swarm.global_best().fitness) {
        stop_reason = StopReason::TargetReached;
    } else {
        while iterations < criteria.max_iterations {
            let improved = swarm.run_iteration()?;
            iterations += 1;
            history.push(swarm.global_best().fitness);

            if iterations % 100 == 0 {
                tracing::debug!(
                    "PSO: iteration {}/{}, best {}",
                    iterations,
                    criteria.max_iterations,
                    swarm.global_best().fitness
                );
            }

            if reached(swarm.global_best().fitness) {
                stop_reason = StopReason::TargetReached;
                break;
            }

            stagnant = if improved { 0 } else { stagnant + 1 };
            if criteria.stagnation_limit.map_or(false, |limit| stagnant >= limit) {
                stop_reason = StopReason::Stagnated;
                break;
            }
        }
    }

    let best = swarm.global_best();
    tracing::info!(
        "PSO finished after {} iterations ({:?}): best fitness {}",
        iterations,
        stop_reason,
        best.fitness
    );

    Ok(OptimizationResult {
        best_variables: best.parameters.clone(),
        best_fitness: best.fitness,
        iterations,
        history,
        stop_reason,
    })
}
