//! Standard test functions, all with a global minimum of 0.

use crate::common::Bounds;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub fn sphere(x: &Array1<f64>) -> f64 {
    x.dot(x)
}

pub fn rastrigin(x: &Array1<f64>) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.iter()
        .zip(x.iter().skip(1))
        .map(|(&a, &b)| 100.0 * (b - a * a).powi(2) + (1.0 - a).powi(2))
        .sum()
}

pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq = x.dot(x) / n;
    let sum_cos = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum::<f64>() / n;
    -20.0 * (-0.2 * sum_sq.sqrt()).exp() - sum_cos.exp() + 20.0 + std::f64::consts::E
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
}

impl Benchmark {
    pub fn evaluate(self, x: &Array1<f64>) -> f64 {
        match self {
            Benchmark::Sphere => sphere(x),
            Benchmark::Rastrigin => rastrigin(x),
            Benchmark::Rosenbrock => rosenbrock(x),
            Benchmark::Ackley => ackley(x),
        }
    }

    /// Conventional search domain
    pub fn bounds(self, dim: usize) -> Bounds {
        match self {
            Benchmark::Sphere => Bounds::uniform(dim, -100.0, 100.0),
            Benchmark::Rastrigin => Bounds::uniform(dim, -5.12, 5.12),
            Benchmark::Rosenbrock => Bounds::uniform(dim, -30.0, 30.0),
            Benchmark::Ackley => Bounds::uniform(dim, -32.768, 32.768),
        }
    }

    /// Where the minimum sits
    pub fn optimum(self, dim: usize) -> Array1<f64> {
        match self {
            Benchmark::Rosenbrock => Array1::ones(dim),
            _ => Array1::zeros(dim),
        }
    }
}
