//! Candidate solution: a parameter vector and its cached fitness

use crate::common::{Bounds, Problem};
use crate::error::{PsoError, PsoResult};
use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

/// One point in the search space together with its fitness.
///
/// Fitness is only refreshed by [`Solution::evaluate`]. Anything that
/// mutates `parameters` must call it before the fitness is read again.
pub struct Solution<A = ()> {
    pub parameters: Array1<f64>,
    pub fitness: f64,
    problem: Arc<Problem<A>>,
}

impl<A> Solution<A> {
    /// Build an unevaluated solution. Fitness starts as NaN until evaluated.
    pub fn new(problem: Arc<Problem<A>>, parameters: Array1<f64>) -> Self {
        Self {
            parameters,
            fitness: f64::NAN,
            problem,
        }
    }

    /// Build and evaluate in one go
    pub fn evaluated(problem: Arc<Problem<A>>, parameters: Array1<f64>) -> PsoResult<Self> {
        let mut solution = Self::new(problem, parameters);
        solution.evaluate()?;
        Ok(solution)
    }

    /// Recompute fitness from the current parameters.
    ///
    /// A NaN result cannot be ordered and is reported as an evaluation failure.
    pub fn evaluate(&mut self) -> PsoResult<()> {
        let fitness = self.problem.fitness(&self.parameters);
        if fitness.is_nan() {
            tracing::warn!("Objective returned NaN for {:?}", self.parameters);
            return Err(PsoError::Evaluation {
                fitness,
                variables: self.parameters.to_vec(),
            });
        }
        self.fitness = fitness;
        Ok(())
    }

    /// Add `delta` to the parameters, clamping every component to its bounds.
    /// Fitness is left stale until the next [`Solution::evaluate`].
    pub fn advance(&mut self, delta: &Array1<f64>) {
        let bounds = &self.problem.bounds;
        for (d, x) in self.parameters.iter_mut().enumerate() {
            *x = bounds.clamp_component(d, *x + delta[d]);
        }
    }

    pub fn dim(&self) -> usize {
        self.parameters.len()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.problem.bounds
    }

    pub fn problem(&self) -> &Arc<Problem<A>> {
        &self.problem
    }
}

// Manual impl: `A` itself need not be Clone, only the Arc is shared.
impl<A> Clone for Solution<A> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            fitness: self.fitness,
            problem: Arc::clone(&self.problem),
        }
    }
}

impl<A> fmt::Debug for Solution<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("parameters", &self.parameters)
            .field("fitness", &self.fitness)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sphere_problem() -> Arc<Problem> {
        Arc::new(Problem::from_fn(
            |x: &Array1<f64>, _: &()| x.dot(x),
            (),
            Bounds::uniform(2, -10.0, 10.0),
        ))
    }

    #[test]
    fn test_evaluate_refreshes_fitness() {
        let mut solution = Solution::evaluated(sphere_problem(), array![1.0, 2.0]).unwrap();
        assert_eq!(solution.fitness, 5.0);

        solution.parameters[0] = 3.0;
        // Not recomputed on read
        assert_eq!(solution.fitness, 5.0);
        solution.evaluate().unwrap();
        assert_eq!(solution.fitness, 13.0);
    }

    #[test]
    fn test_advance_clamps_to_bounds() {
        let mut solution = Solution::new(sphere_problem(), array![9.0, -9.0]);
        solution.advance(&array![5.0, -0.5]);
        assert_eq!(solution.parameters, array![10.0, -9.5]);
        solution.advance(&array![-25.0, -25.0]);
        assert_eq!(solution.parameters, array![-10.0, -10.0]);
    }

    #[test]
    fn test_nan_fitness_is_evaluation_failure() {
        let problem = Arc::new(Problem::from_fn(
            |_: &Array1<f64>, _: &()| f64::NAN,
            (),
            Bounds::uniform(1, 0.0, 1.0),
        ));
        let err = Solution::evaluated(problem, array![0.5]).unwrap_err();
        assert!(matches!(err, PsoError::Evaluation { .. }));
    }

    #[test]
    fn test_clone_is_independent_and_shares_problem() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let problem = Arc::new(Problem::from_fn(
            move |x: &Array1<f64>, _: &()| {
                counter.fetch_add(1, Ordering::SeqCst);
                x.sum()
            },
            (),
            Bounds::uniform(2, -1.0, 1.0),
        ));

        let original = Solution::evaluated(problem, array![0.25, 0.25]).unwrap();
        let mut copy = original.clone();
        copy.parameters[1] = -0.5;
        copy.evaluate().unwrap();

        assert_eq!(original.fitness, 0.5);
        assert_eq!(copy.fitness, -0.25);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(original.problem(), copy.problem()));
    }
}
