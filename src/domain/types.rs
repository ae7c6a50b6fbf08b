//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single row of the dataset: p predictor values and one response.
///
/// Values are expected to be finite; ingestion filters rows that are not.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub features: Vec<f64>,
    pub response: f64,
}

impl Observation {
    pub fn new(features: Vec<f64>, response: f64) -> Self {
        Self { features, response }
    }
}

/// State of the Newton-Raphson convergence loop.
///
/// `Running` is the initial state; every other state is terminal. A
/// `FitResult` produced by the loop always carries a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    Running,
    /// The step norm dropped to or below epsilon.
    Converged,
    /// The step norm became non-finite or exceeded the divergence bound.
    Diverged,
    /// The iteration cap was reached before convergence.
    MaxIterationsExceeded,
    /// The Hessian was singular (or numerically indistinguishable from it).
    SingularHessian,
}

impl ConvergenceStatus {
    pub fn is_terminal(self) -> bool {
        self != ConvergenceStatus::Running
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ConvergenceStatus::Running => "running",
            ConvergenceStatus::Converged => "converged",
            ConvergenceStatus::Diverged => "diverged",
            ConvergenceStatus::MaxIterationsExceeded => "max iterations exceeded",
            ConvergenceStatus::SingularHessian => "singular hessian",
        }
    }
}

/// Immutable snapshot of a finished fit.
///
/// `coefficients[0]` is the intercept; `coefficients[j]` (j >= 1) is the slope
/// of the j-th predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub coefficients: Vec<f64>,
    pub iterations: usize,
    pub status: ConvergenceStatus,
}

impl FitResult {
    pub fn converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }

    /// Predict `y = β0 + Σ βj · xj` for a feature vector.
    ///
    /// `features` must have length `coefficients.len() - 1`.
    pub fn predict(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len() + 1, self.coefficients.len());
        self.coefficients[0]
            + self.coefficients[1..]
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Per-iteration diagnostic snapshot handed to the trace observer.
///
/// Purely observational: observers must not (and cannot) affect the loop.
#[derive(Debug, Clone, Copy)]
pub struct TraceEvent<'a> {
    /// Zero-based index of the step that was just applied.
    pub iteration: usize,
    /// The applied step Δβ.
    pub delta: &'a [f64],
    /// ‖Δβ‖₂.
    pub step_norm: f64,
    /// Coefficients after applying the step.
    pub coefficients: &'a [f64],
}

/// Fit quality diagnostics computed on the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    /// Pearson correlation coefficient; only defined for single-predictor data.
    pub correlation: Option<f64>,
    pub mae: f64,
    pub rmse: f64,
    pub n: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    /// Zero-based predictor column indices.
    pub x_cols: Vec<usize>,
    /// Zero-based response column index.
    pub y_col: usize,

    /// Step-norm convergence threshold.
    pub epsilon: f64,
    /// Iteration cap for the convergence loop.
    pub max_iterations: usize,

    pub describe: bool,
    /// Print a trace line per iteration.
    pub show_iterations: bool,

    pub plot: bool,
    pub plot_path: Option<PathBuf>,
    pub plot_width: u32,
    pub plot_height: u32,

    pub export_results: Option<PathBuf>,
    pub export_model: Option<PathBuf>,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub x_labels: Vec<String>,
    pub y_label: String,
    pub coefficients: Vec<f64>,
    pub iterations: usize,
    pub status: ConvergenceStatus,
    pub quality: FitQuality,
    /// Precomputed fitted-line grid (single-predictor fits only).
    pub line: Option<LineGrid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
