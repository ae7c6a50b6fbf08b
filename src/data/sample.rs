//! Synthetic noisy-linear sample generation.
//!
//! Useful for trying the fitter without an external CSV: points are drawn
//! uniformly over an x range and perturbed with Gaussian noise around a known
//! line, deterministically for a given seed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// Parameters of the generated dataset.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    pub slope: f64,
    pub intercept: f64,
    /// Standard deviation of the Gaussian noise added to each response.
    pub noise_sd: f64,
    pub x_min: f64,
    pub x_max: f64,
}

/// Generate `(x, y)` points around `y = slope·x + intercept`.
pub fn generate_sample(spec: &SampleSpec) -> Result<Vec<(f64, f64)>, AppError> {
    if spec.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(spec.x_min.is_finite() && spec.x_max.is_finite() && spec.x_max > spec.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if !(spec.noise_sd.is_finite() && spec.noise_sd >= 0.0) {
        return Err(AppError::new(2, "Noise standard deviation must be finite and >= 0."));
    }
    if !(spec.slope.is_finite() && spec.intercept.is_finite()) {
        return Err(AppError::new(2, "Slope and intercept must be finite."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    // A zero standard deviation is valid and yields exact points on the line.
    let normal = Normal::new(0.0, spec.noise_sd)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut points = Vec::with_capacity(spec.count);
    for _ in 0..spec.count {
        let x = rng.gen_range(spec.x_min..=spec.x_max);
        let y = spec.slope * x + spec.intercept + normal.sample(&mut rng);
        points.push((x, y));
    }

    Ok(points)
}

/// Write generated points to a two-column CSV with an `x,y` header.
pub fn write_sample_csv(path: &Path, points: &[(f64, f64)]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create sample CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "x,y")
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for &(x, y) in points {
        writeln!(file, "{x:.10},{y:.10}")
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}
