//! A single particle: position, velocity and the best point it has visited

use crate::common::Comparator;
use crate::error::{ConfigError, PsoResult};
use crate::solution::Solution;
use crate::velocity::{SpeedParameters, VelocityPolicy};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

/// Swarm-wide settings every particle applies during a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRules {
    pub speed: SpeedParameters,
    pub policy: VelocityPolicy,
    pub comparator: Comparator,
    /// Optional per-component velocity cap, applied after the update rule
    pub max_velocity: Option<f64>,
}

impl Default for StepRules {
    fn default() -> Self {
        Self {
            speed: SpeedParameters::default(),
            policy: VelocityPolicy::Classic,
            comparator: Comparator::Minimize,
            max_velocity: None,
        }
    }
}

/// Inputs for building one particle. The solution must already be evaluated.
#[derive(Debug)]
pub struct ParticleCreationParameters<A = ()> {
    pub solution: Solution<A>,
    pub velocity: Array1<f64>,
}

impl<A> ParticleCreationParameters<A> {
    pub fn verify_values(&self) -> Result<(), ConfigError> {
        let expected = self.solution.dim();
        if expected == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.velocity.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                what: "Velocity",
                expected,
                actual: self.velocity.len(),
            });
        }
        if self.solution.bounds().dim() != expected {
            return Err(ConfigError::DimensionMismatch {
                what: "Bounds",
                expected,
                actual: self.solution.bounds().dim(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Particle<A = ()> {
    solution: Solution<A>,
    velocity: Array1<f64>,
    personal_best: Solution<A>,
    /// Completed steps, drives the inertia schedule
    elapsed: u32,
    rng: StdRng,
}

impl<A> Particle<A> {
    /// The personal best starts as an independent copy of the initial solution.
    pub fn new(params: ParticleCreationParameters<A>, rng: StdRng) -> Result<Self, ConfigError> {
        params.verify_values()?;
        let ParticleCreationParameters { solution, velocity } = params;
        Ok(Self {
            personal_best: solution.clone(),
            solution,
            velocity,
            elapsed: 0,
            rng,
        })
    }

    pub fn solution(&self) -> &Solution<A> {
        &self.solution
    }

    pub fn velocity(&self) -> &Array1<f64> {
        &self.velocity
    }

    pub fn personal_best(&self) -> &Solution<A> {
        &self.personal_best
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// The better of the current solution and the personal best
    pub fn best(&self, comparator: Comparator) -> &Solution<A> {
        if comparator.is_better(self.solution.fitness, self.personal_best.fitness) {
            &self.solution
        } else {
            &self.personal_best
        }
    }

    /// v[d] = ω·v[d] + c1·r1·(pbest[d] − x[d]) + c2·r2·(gbest[d] − x[d])
    ///
    /// r1 and r2 are drawn fresh for every dimension. ω is 1 for the classic
    /// policy and the scheduled inertia weight otherwise.
    pub fn update_velocity(&mut self, global_best: &Solution<A>, rules: &StepRules) {
        let momentum = rules.policy.momentum(self.elapsed);
        let SpeedParameters {
            personal_best_bias,
            global_best_bias,
        } = rules.speed;

        for d in 0..self.velocity.len() {
            let r1: f64 = self.rng.gen();
            let r2: f64 = self.rng.gen();
            let x = self.solution.parameters[d];

            let mut v = momentum * self.velocity[d]
                + personal_best_bias * r1 * (self.personal_best.parameters[d] - x)
                + global_best_bias * r2 * (global_best.parameters[d] - x);

            if let Some(vmax) = rules.max_velocity {
                v = v.clamp(-vmax, vmax);
            }
            self.velocity[d] = v;
        }
    }

    /// x[d] += v[d], clamped to the bounds. Velocity is left untouched, so a
    /// particle pinned at a bound stays there until its velocity turns around.
    pub fn update_position(&mut self) {
        self.solution.advance(&self.velocity);
    }

    /// One full move: velocity, position, evaluation, personal-best update.
    ///
    /// Returns whether the personal best improved. An evaluation failure
    /// leaves the particle moved but unscored; the caller must abandon the run.
    pub fn step_once(&mut self, global_best: &Solution<A>, rules: &StepRules) -> PsoResult<bool> {
        self.update_velocity(global_best, rules);
        self.update_position();
        self.solution.evaluate()?;

        let improved = rules
            .comparator
            .is_better(self.solution.fitness, self.personal_best.fitness);
        if improved {
            self.personal_best = self.solution.clone();
        }
        self.elapsed = self.elapsed.saturating_add(1);
        Ok(improved)
    }
}
