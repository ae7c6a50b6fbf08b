//! Read/write model JSON files.
//!
//! Model JSON is the "portable" representation of a fitted model:
//! - coefficients + convergence outcome
//! - quality diagnostics
//! - a precomputed fitted-line grid for quick re-plotting (p = 1 only)
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitQuality, FitResult, LineGrid, ModelFile};
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// Number of samples along the fitted-line grid.
const GRID_POINTS: usize = 101;

/// Write a model JSON file.
pub fn write_model_json(
    path: &Path,
    fit: &FitResult,
    quality: &FitQuality,
    ingest: &IngestedData,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create model JSON '{}': {e}", path.display()),
        )
    })?;

    let line = if fit.coefficients.len() == 2 {
        let (x_min, x_max) = ingest.stats.x_ranges[0];
        Some(build_line_grid(fit, x_min, x_max, GRID_POINTS))
    } else {
        None
    };

    let model = ModelFile {
        tool: "nfit".to_string(),
        x_labels: ingest.x_labels.clone(),
        y_label: ingest.y_label.clone(),
        coefficients: fit.coefficients.clone(),
        iterations: fit.iterations,
        status: fit.status,
        quality: quality.clone(),
        line,
    };

    serde_json::to_writer_pretty(file, &model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open model JSON '{}': {e}", path.display()),
        )
    })?;
    let model: ModelFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    Ok(model)
}

fn build_line_grid(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> LineGrid {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }

    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let xi = x0 + u * (x1 - x0);
        x.push(xi);
        y.push(fit.predict(&[xi]));
    }

    LineGrid { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConvergenceStatus, Observation};
    use crate::io::ingest::DatasetStats;

    #[test]
    fn model_json_round_trips() {
        let ingest = IngestedData {
            observations: vec![
                Observation::new(vec![0.0], 1.0),
                Observation::new(vec![4.0], 9.0),
            ],
            x_labels: vec!["x".to_string()],
            y_label: "y".to_string(),
            stats: DatasetStats {
                n_points: 2,
                x_ranges: vec![(0.0, 4.0)],
                y_min: 1.0,
                y_max: 9.0,
            },
            row_errors: vec![],
            rows_read: 2,
            rows_used: 2,
        };
        let fit = FitResult {
            coefficients: vec![1.0, 2.0],
            iterations: 1,
            status: ConvergenceStatus::Converged,
        };
        let quality = crate::report::metrics::quality(&ingest.observations, &fit);

        let path = std::env::temp_dir().join("newton-fit-model-test.json");
        write_model_json(&path, &fit, &quality, &ingest).unwrap();
        let model = read_model_json(&path).unwrap();

        assert_eq!(model.tool, "nfit");
        assert_eq!(model.coefficients, vec![1.0, 2.0]);
        assert_eq!(model.status, ConvergenceStatus::Converged);

        let line = model.line.unwrap();
        assert_eq!(line.x.len(), 101);
        assert!((line.x[0] - 0.0).abs() < 1e-12);
        assert!((line.y[0] - 1.0).abs() < 1e-12);
        assert!((line.y[100] - 9.0).abs() < 1e-12);
    }
}
