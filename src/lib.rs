//! Particle swarm optimization engine.
//!
//! A population of particles searches a bounded real-valued space for the
//! best value of a user-supplied objective. Two velocity policies are
//! available: classic PSO and the linearly decaying inertia weight of
//! Shi & Eberhart (1998). Particles can be partitioned into contiguous
//! neighborhoods that each follow their own best.
//!
//! ```no_run
//! use swarm_pso::{run, InertiaSchedule, StopCriteria, Swarm, SwarmConfig};
//!
//! let config = SwarmConfig::new(2, 30, -10.0, 10.0)
//!     .with_inertia(InertiaSchedule::default())
//!     .with_seed(42);
//! let mut swarm = Swarm::from_fn(config, |x: &ndarray::Array1<f64>, _: &()| x.dot(x), ()).unwrap();
//! let result = run(&mut swarm, &StopCriteria::iterations(200)).unwrap();
//! println!("best {} at {:?}", result.best_fitness, result.best_variables);
//! ```

pub mod benchmarks;
pub mod common;
pub mod driver;
pub mod error;
pub mod neighborhood;
pub mod params;
pub mod particle;
pub mod solution;
pub mod swarm;
pub mod velocity;

/// Re-export common types
pub use common::*;
pub use driver::{run, OptimizationResult, StopCriteria, StopReason};
pub use error::{ConfigError, PsoError, PsoResult};
pub use neighborhood::split_particles_in_sets;
pub use params::SwarmConfig;
pub use particle::{Particle, ParticleCreationParameters, StepRules};
pub use solution::Solution;
pub use swarm::Swarm;
pub use velocity::{InertiaSchedule, SpeedParameters, VelocityPolicy};

/// Crate version string
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
