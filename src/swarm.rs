//! The swarm: population, neighborhoods and the iteration loop body

use crate::common::{Comparator, Objective, Problem};
use crate::error::{PsoError, PsoResult};
use crate::neighborhood::split_particles_in_sets;
use crate::params::SwarmConfig;
use crate::particle::{Particle, ParticleCreationParameters, StepRules};
use crate::solution::Solution;
use ndarray::Array1;
use rand::prelude::*;
use rayon::prelude::*;
use std::ops::Range;
use std::sync::Arc;

/// A population of particles searching one problem.
///
/// The driver owns the stopping rule: it calls [`Swarm::run_iteration`]
/// repeatedly and inspects [`Swarm::global_best`] in between.
#[derive(Debug)]
pub struct Swarm<A = ()> {
    particles: Vec<Particle<A>>,
    neighborhoods: Vec<Range<usize>>,
    global_best: Solution<A>,
    rules: StepRules,
    parallel: bool,
    iteration: u64,
    aborted: bool,
}

impl<A: Send + Sync> Swarm<A> {
    /// Validate `config`, then build and evaluate every particle.
    ///
    /// Nothing is sampled or evaluated when validation fails.
    pub fn new<O>(config: SwarmConfig, objective: O, aux: A) -> PsoResult<Self>
    where
        O: Objective<A> + 'static,
    {
        config.verify_values()?;
        let problem = Arc::new(Problem::new(objective, aux, config.bounds.clone()));
        Self::build(config, problem)
    }

    /// Closure form of [`Swarm::new`]
    pub fn from_fn<F>(config: SwarmConfig, objective: F, aux: A) -> PsoResult<Self>
    where
        F: Fn(&Array1<f64>, &A) -> f64 + Send + Sync + 'static,
    {
        Self::new(config, objective, aux)
    }

    fn build(config: SwarmConfig, problem: Arc<Problem<A>>) -> PsoResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let particles = Self::create_particles(&config, &problem, &mut rng)?;
        let neighborhoods = split_particles_in_sets(particles.len(), config.number_of_particle_sets);
        let global_best = best_of(&particles, config.comparator).clone();

        tracing::info!(
            "Swarm created: {} particles, dimension {}, {} neighborhood(s), {} policy, initial best {}",
            particles.len(),
            config.dimension,
            neighborhoods.len(),
            config.policy.name(),
            global_best.fitness
        );

        Ok(Self {
            particles,
            neighborhoods,
            global_best,
            rules: config.step_rules(),
            parallel: config.parallel,
            iteration: 0,
            aborted: false,
        })
    }

    /// One independently initialized particle per population slot.
    ///
    /// `config` must already have passed [`SwarmConfig::verify_values`].
    pub fn create_particles(
        config: &SwarmConfig,
        problem: &Arc<Problem<A>>,
        rng: &mut StdRng,
    ) -> PsoResult<Vec<Particle<A>>> {
        (0..config.population_size)
            .map(|_| -> PsoResult<Particle<A>> {
                let (position, velocity) = random_position_and_velocity(config, rng);
                let solution = Solution::evaluated(Arc::clone(problem), position)?;
                let particle_rng = StdRng::seed_from_u64(rng.gen());
                Ok(Particle::new(
                    ParticleCreationParameters { solution, velocity },
                    particle_rng,
                )?)
            })
            .collect()
    }

    /// Advance every particle once.
    ///
    /// Each neighborhood takes a snapshot of its best solution before any of
    /// its particles move; the swarm-wide best is refreshed only after all
    /// particles have stepped. Returns whether the global best improved.
    pub fn run_iteration(&mut self) -> PsoResult<bool> {
        if self.aborted {
            return Err(PsoError::Aborted);
        }

        if let Err(e) = self.step_neighborhoods() {
            tracing::warn!("Iteration {} failed, aborting run: {}", self.iteration, e);
            self.aborted = true;
            return Err(e);
        }

        let improved = self.refresh_global_best();
        self.iteration += 1;
        if improved {
            tracing::debug!(
                "Iteration {}: global best improved to {}",
                self.iteration,
                self.global_best.fitness
            );
        }
        Ok(improved)
    }

    fn step_neighborhoods(&mut self) -> PsoResult<()> {
        let rules = self.rules;
        for n in 0..self.neighborhoods.len() {
            let range = self.neighborhoods[n].clone();
            let snapshot = self.neighborhood_best(range.clone()).clone();
            let members = &mut self.particles[range];

            if self.parallel {
                members
                    .par_iter_mut()
                    .try_for_each(|p| p.step_once(&snapshot, &rules).map(|_| ()))?;
            } else {
                for p in members.iter_mut() {
                    p.step_once(&snapshot, &rules)?;
                }
            }
        }
        Ok(())
    }

    fn refresh_global_best(&mut self) -> bool {
        let candidate = best_of(&self.particles, self.rules.comparator);
        if self
            .rules
            .comparator
            .is_better(candidate.fitness, self.global_best.fitness)
        {
            self.global_best = candidate.clone();
            true
        } else {
            false
        }
    }
}

impl<A> Swarm<A> {
    /// Best current or personal-best solution among the particles in `range`
    pub fn neighborhood_best(&self, range: Range<usize>) -> &Solution<A> {
        best_of(&self.particles[range], self.rules.comparator)
    }

    pub fn global_best(&self) -> &Solution<A> {
        &self.global_best
    }

    pub fn particles(&self) -> &[Particle<A>] {
        &self.particles
    }

    pub fn neighborhoods(&self) -> &[Range<usize>] {
        &self.neighborhoods
    }

    /// Neighborhood index of the particle at `index`
    pub fn neighborhood_of(&self, index: usize) -> Option<usize> {
        self.neighborhoods.iter().position(|r| r.contains(&index))
    }

    pub fn rules(&self) -> &StepRules {
        &self.rules
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

/// Fresh position inside the bounds and velocity inside the velocity range.
fn random_position_and_velocity<R: Rng + ?Sized>(
    config: &SwarmConfig,
    rng: &mut R,
) -> (Array1<f64>, Array1<f64>) {
    let position = config.bounds.sample(rng);
    let velocity = config.velocity_range().sample(rng);
    (position, velocity)
}

/// Callers guarantee `particles` is non-empty.
fn best_of<A>(particles: &[Particle<A>], comparator: Comparator) -> &Solution<A> {
    let mut best = particles[0].best(comparator);
    for p in &particles[1..] {
        let candidate = p.best(comparator);
        if comparator.is_better(candidate.fitness, best.fitness) {
            best = candidate;
        }
    }
    best
}
