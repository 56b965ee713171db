use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The function being optimized.
///
/// Maps a parameter vector plus opaque auxiliary data to a scalar fitness.
/// Implementations may be expensive; the engine evaluates each distinct
/// parameter vector at most once per iteration.
pub trait Objective<A = ()>: Send + Sync {
    fn evaluate(&self, variables: &Array1<f64>, aux: &A) -> f64;
}

impl<A, F> Objective<A> for F
where
    F: Fn(&Array1<f64>, &A) -> f64 + Send + Sync,
{
    fn evaluate(&self, variables: &Array1<f64>, aux: &A) -> f64 {
        self(variables, aux)
    }
}

/// Per-parameter search domain, `lower[d] <= x[d] <= upper[d]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsRepr", into = "BoundsRepr")]
pub struct Bounds {
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

/// Plain-list form used in config files
#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl From<BoundsRepr> for Bounds {
    fn from(repr: BoundsRepr) -> Self {
        Self::new(Array1::from(repr.lower), Array1::from(repr.upper))
    }
}

impl From<Bounds> for BoundsRepr {
    fn from(bounds: Bounds) -> Self {
        Self {
            lower: bounds.lower.to_vec(),
            upper: bounds.upper.to_vec(),
        }
    }
}

impl Bounds {
    pub fn new(lower: Array1<f64>, upper: Array1<f64>) -> Self {
        Self { lower, upper }
    }

    /// Same `[min, max]` range for every one of `dim` parameters
    pub fn uniform(dim: usize, min: f64, max: f64) -> Self {
        Self {
            lower: Array1::from_elem(dim, min),
            upper: Array1::from_elem(dim, max),
        }
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn contains(&self, variables: &Array1<f64>) -> bool {
        variables.len() == self.dim()
            && variables
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&x, (&lo, &hi))| lo <= x && x <= hi)
    }

    /// Clamp a single component to its bound pair
    pub fn clamp_component(&self, index: usize, value: f64) -> f64 {
        value.clamp(self.lower[index], self.upper[index])
    }

    /// Draw a fresh vector uniformly inside the bounds.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        Array1::from_shape_fn(self.dim(), |i| rng.gen_range(self.lower[i]..self.upper[i]))
    }
}

/// Everything a Solution needs to score itself: the objective, the aux data
/// handed to it untouched, and the domain.
pub struct Problem<A = ()> {
    objective: Arc<dyn Objective<A>>,
    aux: Arc<A>,
    pub bounds: Bounds,
}

impl<A> Problem<A> {
    pub fn new<O>(objective: O, aux: A, bounds: Bounds) -> Self
    where
        O: Objective<A> + 'static,
    {
        Self {
            objective: Arc::new(objective),
            aux: Arc::new(aux),
            bounds,
        }
    }

    /// Closure-friendly constructor; the signature drives closure inference.
    pub fn from_fn<F>(objective: F, aux: A, bounds: Bounds) -> Self
    where
        F: Fn(&Array1<f64>, &A) -> f64 + Send + Sync + 'static,
    {
        Self::new(objective, aux, bounds)
    }

    pub fn dim(&self) -> usize {
        self.bounds.dim()
    }

    pub fn aux(&self) -> &A {
        &self.aux
    }

    pub(crate) fn fitness(&self, variables: &Array1<f64>) -> f64 {
        self.objective.evaluate(variables, &self.aux)
    }
}

impl<A> fmt::Debug for Problem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Strict "is better than" ordering on fitness values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    #[default]
    Minimize,
    Maximize,
}

impl Comparator {
    /// True only when `a` is strictly better than `b`
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Comparator::Minimize => a < b,
            Comparator::Maximize => a > b,
        }
    }
}
