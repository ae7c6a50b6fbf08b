//! Newton-Raphson convergence loop for linear least squares.
//!
//! Sign convention, derived once from the loss derivatives and applied
//! uniformly: with `g = ∇L(β)` and `H = ∇²L`, the Newton update is
//! `β ← β − H⁻¹g`. We obtain the step by solving `H · Δβ = −g` and **add** it.
//! (Source material for this tool disagreed on the sign per component; the
//! mixed-sign closed forms floating around are not reproduced here.)
//!
//! Because the loss is exactly quadratic with no regularization, `∇²L` is
//! constant across iterations and is computed once before the loop.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ConvergenceStatus, FitResult, Observation, TraceEvent};
use crate::math::design::{self, DesignError};
use crate::math::derivatives::{gradient, hessian};
use crate::math::solve::{LinearSolver, LuSolver};

/// Options controlling the convergence loop.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Step-norm threshold below which iteration stops.
    pub epsilon: f64,
    /// Maximum number of applied steps.
    pub max_iterations: usize,
    /// Step norms above this bound are treated as divergence.
    pub divergence_bound: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-3,
            max_iterations: 10_000,
            divergence_bound: 1e12,
        }
    }
}

/// Per-iteration observer callback. Receives each applied step; must not (and
/// cannot) influence the loop.
pub type TraceObserver<'a> = dyn FnMut(&TraceEvent<'_>) + 'a;

/// Fit a linear model to the observations with the default LU backend.
pub fn fit(observations: &[Observation], options: &FitOptions) -> Result<FitResult, DesignError> {
    fit_with(observations, options, &LuSolver, None)
}

/// Fit with an injected solver backend and optional trace observer.
///
/// Construction-time defects (empty input, ragged rows) are returned as
/// errors; everything the optimizer itself can run into (singular Hessian,
/// divergence, iteration exhaustion) lands in `FitResult::status`.
pub fn fit_with(
    observations: &[Observation],
    options: &FitOptions,
    solver: &dyn LinearSolver,
    observer: Option<&mut TraceObserver<'_>>,
) -> Result<FitResult, DesignError> {
    let design = design::build(observations)?;
    Ok(run_loop(&design.x, &design.y, options, solver, observer))
}

/// Drive the Newton iteration on a prebuilt design matrix.
///
/// Coefficients start at zero (a design choice, not data-derived). Each pass
/// computes the gradient at the current β, solves for the step, and applies
/// it. The first step is always applied; from the second pass on, a step norm
/// at or below epsilon means β already sits at the minimum, so the loop stops
/// without applying it. `iterations` counts applied steps.
pub fn run_loop(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    options: &FitOptions,
    solver: &dyn LinearSolver,
    mut observer: Option<&mut TraceObserver<'_>>,
) -> FitResult {
    let hess = hessian(x);
    let mut beta = DVector::<f64>::zeros(x.ncols());
    let mut iterations = 0usize;

    let status = loop {
        let grad = gradient(x, y, &beta);
        let step = match solver.solve(&hess, &(-&grad)) {
            Ok(step) => step,
            Err(_) => break ConvergenceStatus::SingularHessian,
        };

        let norm = step.norm();
        if !norm.is_finite() || norm > options.divergence_bound {
            break ConvergenceStatus::Diverged;
        }
        if iterations > 0 && norm <= options.epsilon {
            break ConvergenceStatus::Converged;
        }
        if iterations >= options.max_iterations {
            break ConvergenceStatus::MaxIterationsExceeded;
        }

        beta += &step;
        iterations += 1;

        if let Some(obs) = &mut observer {
            obs(&TraceEvent {
                iteration: iterations - 1,
                delta: step.as_slice(),
                step_norm: norm,
                coefficients: beta.as_slice(),
            });
        }
    };

    FitResult {
        coefficients: beta.iter().copied().collect(),
        iterations,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::solve::SingularHessianError;

    fn obs1(xs: &[f64], ys: &[f64]) -> Vec<Observation> {
        xs.iter()
            .zip(ys.iter())
            .map(|(&x, &y)| Observation::new(vec![x], y))
            .collect()
    }

    #[test]
    fn perfect_line_converges_in_one_iteration() {
        // y = 2x exactly; the loss is quadratic, so Newton lands on the
        // minimum with the first step.
        let obs = obs1(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]);
        let options = FitOptions {
            epsilon: 1e-6,
            ..FitOptions::default()
        };

        let fit = fit(&obs, &options).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::Converged);
        assert_eq!(fit.iterations, 1);
        assert!((fit.coefficients[0] - 0.0).abs() < 1e-9); // intercept
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-9); // slope
    }

    #[test]
    fn noisy_line_converges_within_two_iterations() {
        let obs = obs1(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[0.9, 3.2, 4.8, 7.1, 9.2, 10.8],
        );
        let fit = fit(&obs, &FitOptions::default()).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::Converged);
        assert!(fit.iterations <= 2);
    }

    #[test]
    fn multivariate_exact_fit_recovers_coefficients() {
        // y = 1 + 2·x1 − 3·x2
        let rows: &[(f64, f64)] = &[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (2.0, 1.0),
            (1.0, 2.0),
            (3.0, 2.0),
        ];
        let obs: Vec<Observation> = rows
            .iter()
            .map(|&(x1, x2)| Observation::new(vec![x1, x2], 1.0 + 2.0 * x1 - 3.0 * x2))
            .collect();

        let options = FitOptions {
            epsilon: 1e-9,
            ..FitOptions::default()
        };
        let fit = fit(&obs, &options).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::Converged);
        assert!(fit.iterations <= 2);
        assert!((fit.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-9);
        assert!((fit.coefficients[2] + 3.0).abs() < 1e-9);
    }

    #[test]
    fn underdetermined_data_reports_singular_hessian() {
        // n = 2 rows, p = 2 predictors: the 3×3 Hessian has rank at most 2.
        let obs = vec![
            Observation::new(vec![1.0, 0.0], 1.0),
            Observation::new(vec![0.0, 1.0], 1.0),
        ];
        let fit = fit(&obs, &FitOptions::default()).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::SingularHessian);
    }

    #[test]
    fn empty_input_is_a_design_error() {
        assert_eq!(
            fit(&[], &FitOptions::default()).unwrap_err(),
            DesignError::EmptyInput
        );
    }

    #[test]
    fn extra_iteration_capacity_does_not_change_a_converged_result() {
        let obs = obs1(&[1.0, 2.0, 3.0, 4.0], &[1.1, 2.2, 2.9, 4.1]);
        let small = FitOptions {
            epsilon: 1e-8,
            max_iterations: 10,
            ..FitOptions::default()
        };
        let large = FitOptions {
            max_iterations: 100_000,
            ..small.clone()
        };

        let a = fit(&obs, &small).unwrap();
        let b = fit(&obs, &large).unwrap();
        assert_eq!(a.status, ConvergenceStatus::Converged);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.coefficients, b.coefficients);
    }

    /// Solver stub that always returns the same step, so the loop never
    /// converges on its own.
    struct ConstantStep(f64);

    impl LinearSolver for ConstantStep {
        fn solve(
            &self,
            h: &DMatrix<f64>,
            _rhs: &DVector<f64>,
        ) -> Result<DVector<f64>, SingularHessianError> {
            Ok(DVector::from_element(h.nrows(), self.0))
        }
    }

    #[test]
    fn iteration_cap_is_reported() {
        let obs = obs1(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        let options = FitOptions {
            epsilon: 1e-6,
            max_iterations: 5,
            ..FitOptions::default()
        };
        let fit = fit_with(&obs, &options, &ConstantStep(1.0), None).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::MaxIterationsExceeded);
        assert_eq!(fit.iterations, 5);
    }

    #[test]
    fn non_finite_step_is_reported_as_divergence() {
        let obs = obs1(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        let fit = fit_with(
            &obs,
            &FitOptions::default(),
            &ConstantStep(f64::INFINITY),
            None,
        )
        .unwrap();
        assert_eq!(fit.status, ConvergenceStatus::Diverged);
        assert_eq!(fit.iterations, 0);
    }

    #[test]
    fn oversized_step_is_reported_as_divergence() {
        let obs = obs1(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        let options = FitOptions {
            divergence_bound: 10.0,
            ..FitOptions::default()
        };
        let fit = fit_with(&obs, &options, &ConstantStep(100.0), None).unwrap();
        assert_eq!(fit.status, ConvergenceStatus::Diverged);
    }

    #[test]
    fn observer_sees_every_applied_step_and_does_not_alter_the_result() {
        let obs = obs1(&[1.0, 2.0, 3.0, 4.0], &[2.1, 3.9, 6.2, 7.8]);
        let options = FitOptions {
            epsilon: 1e-9,
            ..FitOptions::default()
        };

        let mut events: Vec<(usize, f64)> = Vec::new();
        let mut record = |ev: &TraceEvent<'_>| {
            assert_eq!(ev.delta.len(), ev.coefficients.len());
            events.push((ev.iteration, ev.step_norm));
        };
        let traced = fit_with(&obs, &options, &LuSolver, Some(&mut record)).unwrap();
        let silent = fit(&obs, &options).unwrap();

        assert_eq!(events.len(), traced.iterations);
        assert_eq!(events[0].0, 0);
        assert_eq!(traced.coefficients, silent.coefficients);
        assert_eq!(traced.iterations, silent.iterations);
    }
}
