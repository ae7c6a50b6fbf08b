//! Scatter + regression line rendering to PNG via Plotters.
//!
//! Only single-predictor data is plottable; callers skip the plot (with a
//! terminal note) for multivariate fits.
//!
//! We build Plotters with a minimal feature set and no font backend, so the
//! chart intentionally draws no text: observed points, the fitted line, and
//! the chart frame only.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FitResult, LineGrid, ModelFile};
use crate::error::AppError;

/// Render observed points plus the fitted line for a single-predictor fit.
pub fn render_regression_png(
    path: &Path,
    points: &[(f64, f64)],
    fit: &FitResult,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    debug_assert_eq!(fit.coefficients.len(), 2);

    let (x0, x1) = padded_range(points.iter().map(|&(x, _)| x));
    let line: Vec<(f64, f64)> = [x0, x1]
        .iter()
        .map(|&x| (x, fit.predict(&[x])))
        .collect();

    let (y0, y1) = padded_range(
        points
            .iter()
            .map(|&(_, y)| y)
            .chain(line.iter().map(|&(_, y)| y)),
    );

    draw(path, points, &line, (x0, x1), (y0, y1), width, height)
}

/// Render a previously exported model (fitted-line grid only, no points).
pub fn render_model_png(
    path: &Path,
    model: &ModelFile,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let Some(LineGrid { x, y }) = &model.line else {
        return Err(AppError::new(
            2,
            "Model JSON has no fitted-line grid (multivariate fits are not plottable).",
        ));
    };

    let line: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let (x0, x1) = padded_range(line.iter().map(|&(x, _)| x));
    let (y0, y1) = padded_range(line.iter().map(|&(_, y)| y));

    draw(path, &[], &line, (x0, x1), (y0, y1), width, height)
}

fn draw(
    path: &Path,
    points: &[(f64, f64)],
    line: &[(f64, f64)],
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let width = width.max(64);
    let height = height.max(64);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    // No label areas are configured, so zero labels keeps the mesh text-free
    // (we carry no font backend).
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(line.iter().copied(), &RED))
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn plot_err(e: impl std::fmt::Display) -> AppError {
    AppError::new(2, format!("Failed to render plot: {e}"))
}

/// Pad a value range so points don't sit on the chart border. Degenerate
/// ranges (all equal, or empty) widen to a usable span.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }

    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}
