//! Descriptive statistics for a fitted model.
//!
//! These are independent of the optimizer: they only consume observations and
//! the frozen `FitResult`.

use crate::domain::{FitQuality, FitResult, Observation};

/// Pearson correlation coefficient between two equally sized samples:
///
/// ```text
///              n·Σxy − Σx·Σy
/// r = ─────────────────────────────────────
///     √( [n·Σx² − (Σx)²] · [n·Σy² − (Σy)²] )
/// ```
///
/// Returns `None` when either sample has no variance (the ratio is undefined).
pub fn correlation_coefficient(x: &[f64], y: &[f64]) -> Option<f64> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    if x.len() < 2 {
        return None;
    }

    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sum_x2 += xi * xi;
        sum_y2 += yi * yi;
        sum_xy += xi * yi;
        sum_x += xi;
        sum_y += yi;
    }

    let denom = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denom > 0.0 && denom.is_finite() {
        Some((n * sum_xy - sum_x * sum_y) / denom)
    } else {
        None
    }
}

/// Mean absolute error of the fitted model on the observations.
pub fn mean_absolute_error(observations: &[Observation], fit: &FitResult) -> f64 {
    let n = observations.len() as f64;
    observations
        .iter()
        .map(|obs| (obs.response - fit.predict(&obs.features)).abs())
        .sum::<f64>()
        / n
}

/// Root mean squared error of the fitted model on the observations.
pub fn rmse(observations: &[Observation], fit: &FitResult) -> f64 {
    let n = observations.len() as f64;
    let sse: f64 = observations
        .iter()
        .map(|obs| {
            let r = obs.response - fit.predict(&obs.features);
            r * r
        })
        .sum();
    (sse / n).sqrt()
}

/// Bundle the quality diagnostics for a fit.
///
/// The correlation coefficient is only defined for single-predictor data.
pub fn quality(observations: &[Observation], fit: &FitResult) -> FitQuality {
    let correlation = if fit.coefficients.len() == 2 {
        let x: Vec<f64> = observations.iter().map(|o| o.features[0]).collect();
        let y: Vec<f64> = observations.iter().map(|o| o.response).collect();
        correlation_coefficient(&x, &y)
    } else {
        None
    };

    FitQuality {
        correlation,
        mae: mean_absolute_error(observations, fit),
        rmse: rmse(observations, fit),
        n: observations.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConvergenceStatus;

    fn exact_fit() -> FitResult {
        FitResult {
            coefficients: vec![0.0, 2.0],
            iterations: 1,
            status: ConvergenceStatus::Converged,
        }
    }

    #[test]
    fn perfect_positive_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let r = correlation_coefficient(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_negative_correlation() {
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        let r = correlation_coefficient(&x, &y).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_has_no_correlation() {
        let x = [1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0];
        assert_eq!(correlation_coefficient(&x, &y), None);
    }

    #[test]
    fn mae_is_zero_for_an_exact_fit() {
        let obs = vec![
            Observation::new(vec![1.0], 2.0),
            Observation::new(vec![2.0], 4.0),
        ];
        assert!(mean_absolute_error(&obs, &exact_fit()) < 1e-12);
        assert!(rmse(&obs, &exact_fit()) < 1e-12);
    }

    #[test]
    fn mae_averages_absolute_residuals() {
        let obs = vec![
            Observation::new(vec![1.0], 3.0),  // residual 1
            Observation::new(vec![2.0], 2.0),  // residual -2
        ];
        let mae = mean_absolute_error(&obs, &exact_fit());
        assert!((mae - 1.5).abs() < 1e-12);
    }

    #[test]
    fn quality_skips_correlation_for_multivariate_fits() {
        let obs = vec![
            Observation::new(vec![1.0, 2.0], 3.0),
            Observation::new(vec![2.0, 1.0], 3.0),
            Observation::new(vec![0.0, 0.0], 0.0),
        ];
        let fit = FitResult {
            coefficients: vec![0.0, 1.0, 1.0],
            iterations: 1,
            status: ConvergenceStatus::Converged,
        };
        let q = quality(&obs, &fit);
        assert_eq!(q.correlation, None);
        assert_eq!(q.n, 3);
    }
}
