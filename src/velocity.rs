//! Velocity update policies
//!
//! Classic PSO keeps the full previous velocity as momentum. The inertia
//! variant (Shi & Eberhart, "A Modified Particle Swarm Optimizer", 1998)
//! scales that momentum by a weight that decays linearly over iterations,
//! so the swarm explores broadly first and exploits locally later.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Attraction strengths towards the personal and neighborhood bests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedParameters {
    pub personal_best_bias: f64,
    pub global_best_bias: f64,
}

/// Constriction-equivalent acceleration coefficient (Clerc & Kennedy)
pub const DEFAULT_BIAS: f64 = 1.49445;

impl Default for SpeedParameters {
    fn default() -> Self {
        Self {
            personal_best_bias: DEFAULT_BIAS,
            global_best_bias: DEFAULT_BIAS,
        }
    }
}

impl SpeedParameters {
    pub fn verify_values(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("Personal best", self.personal_best_bias),
            ("Global best", self.global_best_bias),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeBias { name, value });
            }
        }
        Ok(())
    }
}

/// Linear inertia decay from `inertia_max` to `inertia_min`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InertiaSchedule {
    pub inertia_max: f64,
    pub inertia_min: f64,
    /// Iteration at which the weight bottoms out at `inertia_min`
    pub inertia_max_time: u32,
}

impl Default for InertiaSchedule {
    fn default() -> Self {
        Self {
            inertia_max: 0.9,
            inertia_min: 0.4,
            inertia_max_time: 1000,
        }
    }
}

impl InertiaSchedule {
    pub fn verify_values(&self) -> Result<(), ConfigError> {
        let ordered = self.inertia_min.is_finite()
            && self.inertia_max.is_finite()
            && self.inertia_min >= 0.0
            && self.inertia_max >= self.inertia_min;
        if !ordered {
            return Err(ConfigError::InvertedInertia {
                max: self.inertia_max,
                min: self.inertia_min,
            });
        }
        if self.inertia_max_time == 0 {
            return Err(ConfigError::ZeroInertiaTime);
        }
        Ok(())
    }

    /// ω(t); held at `inertia_min` once `t >= inertia_max_time`.
    pub fn weight(&self, elapsed: u32) -> f64 {
        let t = elapsed.min(self.inertia_max_time) as f64;
        let horizon = self.inertia_max_time as f64;
        self.inertia_max - (self.inertia_max - self.inertia_min) * t / horizon
    }
}

/// How the momentum term of the velocity update is weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityPolicy {
    #[default]
    Classic,
    Inertia(InertiaSchedule),
}

impl VelocityPolicy {
    pub fn verify_values(&self) -> Result<(), ConfigError> {
        match self {
            VelocityPolicy::Classic => Ok(()),
            VelocityPolicy::Inertia(schedule) => schedule.verify_values(),
        }
    }

    /// Weight applied to the previous velocity at a particle's elapsed iteration
    pub fn momentum(&self, elapsed: u32) -> f64 {
        match self {
            VelocityPolicy::Classic => 1.0,
            VelocityPolicy::Inertia(schedule) => schedule.weight(elapsed),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VelocityPolicy::Classic => "classic",
            VelocityPolicy::Inertia(_) => "inertia",
        }
    }
}
