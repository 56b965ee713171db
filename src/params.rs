//! Swarm creation parameters
//!
//! Validated exactly once by [`SwarmConfig::verify_values`] before any
//! particle is built.

use crate::common::{Bounds, Comparator};
use crate::error::ConfigError;
use crate::particle::StepRules;
use crate::velocity::{InertiaSchedule, SpeedParameters, VelocityPolicy};
use serde::{Deserialize, Serialize};

/// Missing fields in a config file take their defaults; missing `bounds`
/// become `[-10, 10]` for each of `dimension` parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSwarmConfig")]
pub struct SwarmConfig {
    /// Number of parameters per solution (D)
    pub dimension: usize,
    /// Number of particles (N)
    pub population_size: usize,
    /// Search domain; particles are initialized and clamped inside it
    pub bounds: Bounds,
    /// Range for initial velocities; defaults to `bounds`
    pub initial_velocity: Option<Bounds>,
    pub speed: SpeedParameters,
    /// Contiguous neighborhoods sharing a best; 1 = global topology
    pub number_of_particle_sets: usize,
    pub comparator: Comparator,
    pub policy: VelocityPolicy,
    pub max_velocity: Option<f64>,
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Step particles of a neighborhood on the rayon pool
    pub parallel: bool,
}

const DEFAULT_MIN: f64 = -10.0;
const DEFAULT_MAX: f64 = 10.0;

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::new(2, 30, DEFAULT_MIN, DEFAULT_MAX)
    }
}

/// Deserialized form; bounds default from the dimension read alongside them
#[derive(Deserialize)]
#[serde(default)]
struct RawSwarmConfig {
    dimension: usize,
    population_size: usize,
    bounds: Option<Bounds>,
    initial_velocity: Option<Bounds>,
    speed: SpeedParameters,
    number_of_particle_sets: usize,
    comparator: Comparator,
    policy: VelocityPolicy,
    max_velocity: Option<f64>,
    seed: Option<u64>,
    parallel: bool,
}

impl Default for RawSwarmConfig {
    fn default() -> Self {
        let c = SwarmConfig::default();
        Self {
            dimension: c.dimension,
            population_size: c.population_size,
            bounds: None,
            initial_velocity: c.initial_velocity,
            speed: c.speed,
            number_of_particle_sets: c.number_of_particle_sets,
            comparator: c.comparator,
            policy: c.policy,
            max_velocity: c.max_velocity,
            seed: c.seed,
            parallel: c.parallel,
        }
    }
}

impl From<RawSwarmConfig> for SwarmConfig {
    fn from(raw: RawSwarmConfig) -> Self {
        Self {
            bounds: raw
                .bounds
                .unwrap_or_else(|| Bounds::uniform(raw.dimension, DEFAULT_MIN, DEFAULT_MAX)),
            dimension: raw.dimension,
            population_size: raw.population_size,
            initial_velocity: raw.initial_velocity,
            speed: raw.speed,
            number_of_particle_sets: raw.number_of_particle_sets,
            comparator: raw.comparator,
            policy: raw.policy,
            max_velocity: raw.max_velocity,
            seed: raw.seed,
            parallel: raw.parallel,
        }
    }
}

impl SwarmConfig {
    /// Classic global-topology swarm over `[min, max]^dimension`.
    ///
    /// Classic PSO keeps full momentum and has no velocity cap, so on its own
    /// it tends to overshoot; add [`SwarmConfig::with_inertia`] or
    /// [`SwarmConfig::with_max_velocity`] for convergent runs.
    pub fn new(dimension: usize, population_size: usize, min: f64, max: f64) -> Self {
        Self {
            dimension,
            population_size,
            bounds: Bounds::uniform(dimension, min, max),
            initial_velocity: None,
            speed: SpeedParameters::default(),
            number_of_particle_sets: 1,
            comparator: Comparator::Minimize,
            policy: VelocityPolicy::Classic,
            max_velocity: None,
            seed: None,
            parallel: false,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_initial_velocity(mut self, range: Bounds) -> Self {
        self.initial_velocity = Some(range);
        self
    }

    pub fn with_speed(mut self, personal_best_bias: f64, global_best_bias: f64) -> Self {
        self.speed = SpeedParameters {
            personal_best_bias,
            global_best_bias,
        };
        self
    }

    pub fn with_inertia(mut self, schedule: InertiaSchedule) -> Self {
        self.policy = VelocityPolicy::Inertia(schedule);
        self
    }

    pub fn with_particle_sets(mut self, sets: usize) -> Self {
        self.number_of_particle_sets = sets;
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_max_velocity(mut self, vmax: f64) -> Self {
        self.max_velocity = Some(vmax);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Range initial velocities are drawn from
    pub fn velocity_range(&self) -> &Bounds {
        self.initial_velocity.as_ref().unwrap_or(&self.bounds)
    }

    pub fn step_rules(&self) -> StepRules {
        StepRules {
            speed: self.speed,
            policy: self.policy,
            comparator: self.comparator,
            max_velocity: self.max_velocity,
        }
    }

    pub fn verify_values(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        verify_bounds("Bounds", &self.bounds, self.dimension)?;
        if let Some(range) = &self.initial_velocity {
            verify_bounds("Initial velocity range", range, self.dimension)?;
        }
        self.speed.verify_values()?;
        self.policy.verify_values()?;
        if self.number_of_particle_sets == 0 || self.number_of_particle_sets > self.population_size {
            return Err(ConfigError::InvalidParticleSets {
                sets: self.number_of_particle_sets,
                population: self.population_size,
            });
        }
        if let Some(vmax) = self.max_velocity {
            if !(vmax.is_finite() && vmax > 0.0) {
                return Err(ConfigError::InvalidMaxVelocity(vmax));
            }
        }
        Ok(())
    }
}

fn verify_bounds(what: &'static str, bounds: &Bounds, dimension: usize) -> Result<(), ConfigError> {
    for len in [bounds.lower.len(), bounds.upper.len()] {
        if len != dimension {
            return Err(ConfigError::DimensionMismatch {
                what,
                expected: dimension,
                actual: len,
            });
        }
    }
    for (index, (&min, &max)) in bounds.lower.iter().zip(bounds.upper.iter()).enumerate() {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::InvertedBounds { index, min, max });
        }
        // Uniform sampling needs a representable width
        if !(max - min).is_finite() {
            return Err(ConfigError::RangeOverflow { index, min, max });
        }
    }
    Ok(())
}
