//! Error types for the swarm engine
//!
//! Two kinds exist: configuration errors, raised once while a swarm is being
//! constructed, and evaluation failures, raised when the objective produces
//! an unusable fitness. Neither is retried.

use thiserror::Error;

/// A rejected creation parameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Dimension must be greater than zero")]
    ZeroDimension,

    #[error("Population size must be greater than zero")]
    ZeroPopulation,

    #[error("{what} has {actual} components, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Bounds for parameter {index} are invalid: min {min} must be finite and below max {max}")]
    InvertedBounds { index: usize, min: f64, max: f64 },

    #[error("Bounds for parameter {index} span too wide a range to sample: [{min}, {max}]")]
    RangeOverflow { index: usize, min: f64, max: f64 },

    #[error("{name} bias must be finite and non-negative, got {value}")]
    NegativeBias { name: &'static str, value: f64 },

    #[error("Inertia bounds are invalid: require inertia_max ({max}) >= inertia_min ({min}) >= 0")]
    InvertedInertia { max: f64, min: f64 },

    #[error("Inertia max time must be greater than zero")]
    ZeroInertiaTime,

    #[error("Number of particle sets must be between 1 and the population size ({population}), got {sets}")]
    InvalidParticleSets { sets: usize, population: usize },

    #[error("Maximum velocity must be finite and positive, got {0}")]
    InvalidMaxVelocity(f64),
}

/// Errors surfaced by swarm construction and iteration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsoError {
    /// Invalid creation parameters; nothing was constructed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The objective returned a value that cannot be ordered
    #[error("Evaluation failure: objective returned {fitness} for {variables:?}")]
    Evaluation { fitness: f64, variables: Vec<f64> },

    /// A previous iteration failed part way; the swarm state is no longer consistent
    #[error("Run aborted after an evaluation failure")]
    Aborted,
}

pub type PsoResult<T> = Result<T, PsoError>;
