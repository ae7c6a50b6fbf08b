//! Gradient and Hessian of the squared-error loss.
//!
//! For `L(β) = (1/n)·Σᵢ (yᵢ − xᵢᵀβ)²` over the augmented design matrix `X`
//! (intercept column included):
//!
//! ```text
//! ∇L(β)  = (2/n) · Xᵀ (Xβ − y)
//! ∇²L    = (2/n) · Xᵀ X
//! ```
//!
//! Written entry-wise this matches the component formulas: the intercept entry
//! of the Hessian is `H[0,0] = (2/n)·Σ 1 = 2`, the mixed entries are
//! `(2/n)·Σ xᵢⱼ`, and the slope block is `(2/n)·Σ xᵢⱼxᵢₖ`. Both functions are
//! pure; the Hessian does not depend on β at all for this loss.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Row count above which the Hessian accumulation switches to parallel
/// partial sums. The reduction is a plain matrix sum, so it is associative and
/// independent of how rayon splits the range.
const PAR_ROW_THRESHOLD: usize = 8192;

/// Gradient of the loss at `beta`. O(n·p).
pub fn gradient(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> DVector<f64> {
    let n = x.nrows() as f64;
    let residual = x * beta - y;
    (x.transpose() * residual) * (2.0 / n)
}

/// Hessian of the loss. O(n·p²); independent of the coefficients.
pub fn hessian(x: &DMatrix<f64>) -> DMatrix<f64> {
    let n = x.nrows();
    let k = x.ncols();
    let scale = 2.0 / n as f64;

    if n < PAR_ROW_THRESHOLD {
        return (x.transpose() * x) * scale;
    }

    let sum = (0..n)
        .into_par_iter()
        .fold(
            || DMatrix::<f64>::zeros(k, k),
            |mut acc, i| {
                let row = x.row(i);
                for j in 0..k {
                    for l in 0..k {
                        acc[(j, l)] += row[j] * row[l];
                    }
                }
                acc
            },
        )
        .reduce(|| DMatrix::<f64>::zeros(k, k), |a, b| a + b);

    sum * scale
}
