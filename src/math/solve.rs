//! Linear solves for the Newton step.
//!
//! The convergence loop asks a `LinearSolver` for `Δβ` such that
//! `H · Δβ = −∇L(β)`; keeping the solve behind a trait lets a different
//! numerical backend be substituted without touching the loop (and lets tests
//! inject misbehaving solvers).
//!
//! Implementation choices:
//! - The single-predictor case is a 2×2 system with a cheap closed-form
//!   solution, taken as an explicit fast path.
//! - The general case uses LU decomposition rather than explicit matrix
//!   inversion, for numerical stability.

use nalgebra::{DMatrix, DVector};

/// The Hessian determinant fell below the numerical tolerance.
///
/// Callers map this to `ConvergenceStatus::SingularHessian`; it is the only
/// way the loop can terminate without reaching the convergence threshold on
/// well-posed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingularHessianError;

impl std::fmt::Display for SingularHessianError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hessian is singular or numerically ill-conditioned")
    }
}

impl std::error::Error for SingularHessianError {}

/// A pluggable backend that solves `H · x = rhs`.
pub trait LinearSolver {
    fn solve(
        &self,
        h: &DMatrix<f64>,
        rhs: &DVector<f64>,
    ) -> Result<DVector<f64>, SingularHessianError>;
}

/// Default backend: closed-form 2×2 fast path, LU for higher dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuSolver;

impl LinearSolver for LuSolver {
    fn solve(
        &self,
        h: &DMatrix<f64>,
        rhs: &DVector<f64>,
    ) -> Result<DVector<f64>, SingularHessianError> {
        debug_assert_eq!(h.nrows(), h.ncols());
        debug_assert_eq!(h.nrows(), rhs.len());

        if h.nrows() == 2 {
            return solve_2x2(h, rhs);
        }

        let lu = h.clone().lu();
        let det = lu.determinant();
        if !det.is_finite() || det.abs() <= det_tolerance(h) {
            return Err(SingularHessianError);
        }

        let x = lu.solve(rhs).ok_or(SingularHessianError)?;
        if x.iter().all(|v| v.is_finite()) {
            Ok(x)
        } else {
            Err(SingularHessianError)
        }
    }
}

/// Closed-form solve for the two-parameter (intercept + one slope) system.
fn solve_2x2(h: &DMatrix<f64>, rhs: &DVector<f64>) -> Result<DVector<f64>, SingularHessianError> {
    let (a, b) = (h[(0, 0)], h[(0, 1)]);
    let (c, d) = (h[(1, 0)], h[(1, 1)]);

    let det = a * d - b * c;
    if !det.is_finite() || det.abs() <= det_tolerance(h) {
        return Err(SingularHessianError);
    }

    let x0 = (d * rhs[0] - b * rhs[1]) / det;
    let x1 = (a * rhs[1] - c * rhs[0]) / det;
    if x0.is_finite() && x1.is_finite() {
        Ok(DVector::from_column_slice(&[x0, x1]))
    } else {
        Err(SingularHessianError)
    }
}

/// Singularity threshold: machine epsilon scaled by the matrix norm and size.
fn det_tolerance(h: &DMatrix<f64>) -> f64 {
    f64::EPSILON * h.norm().max(1.0) * h.nrows() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lu_solves_identity() {
        let h = DMatrix::<f64>::identity(3, 3);
        let rhs = DVector::from_column_slice(&[1.0, 2.0, 3.0]);
        let x = LuSolver.solve(&h, &rhs).unwrap();
        assert!((&x - &rhs).norm() < 1e-12);
    }

    #[test]
    fn fast_path_matches_general_lu() {
        let h = DMatrix::from_row_slice(2, 2, &[2.0, 1.5, 1.5, 4.0]);
        let rhs = DVector::from_column_slice(&[-3.0, 7.0]);

        let fast = solve_2x2(&h, &rhs).unwrap();
        let lu = h.clone().lu().solve(&rhs).unwrap();
        assert!((&fast - &lu).norm() < 1e-12);
    }

    #[test]
    fn singular_2x2_is_rejected() {
        let h = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let rhs = DVector::from_column_slice(&[1.0, 1.0]);
        assert_eq!(LuSolver.solve(&h, &rhs), Err(SingularHessianError));
    }

    #[test]
    fn singular_3x3_is_rejected() {
        // Rank-2 matrix: third row is the sum of the first two.
        let h = DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0],
        );
        let rhs = DVector::from_column_slice(&[1.0, 1.0, 2.0]);
        assert_eq!(LuSolver.solve(&h, &rhs), Err(SingularHessianError));
    }

    #[test]
    fn lu_solves_well_posed_3x3() {
        let h = DMatrix::from_row_slice(
            3,
            3,
            &[4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0],
        );
        let expected = DVector::from_column_slice(&[1.0, -2.0, 0.5]);
        let rhs = &h * &expected;
        let x = LuSolver.solve(&h, &rhs).unwrap();
        assert!((&x - &expected).norm() < 1e-10);
    }
}
