//! Shared "fit pipeline" logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> design/fit -> quality metrics
//!
//! The CLI can then focus on presentation (printing, plotting, exports).

use crate::domain::{FitConfig, FitQuality, FitResult};
use crate::error::AppError;
use crate::fit::newton::{self, FitOptions, TraceObserver};
use crate::io::ingest::{self, IngestedData};
use crate::math::solve::LuSolver;
use crate::report::metrics;

/// All computed outputs of a single `nfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: FitResult,
    pub quality: FitQuality,
}

/// Execute the full fitting pipeline and return the computed outputs.
///
/// The optional observer receives one event per applied Newton step; it is
/// diagnostic only and cannot affect the fit.
pub fn run_fit(
    config: &FitConfig,
    observer: Option<&mut TraceObserver<'_>>,
) -> Result<RunOutput, AppError> {
    if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
        return Err(AppError::new(2, "Epsilon must be finite and > 0."));
    }
    if config.max_iterations == 0 {
        return Err(AppError::new(2, "Max iterations must be > 0."));
    }

    let ingest = ingest::load_observations(config)?;

    let options = FitOptions {
        epsilon: config.epsilon,
        max_iterations: config.max_iterations,
        ..FitOptions::default()
    };
    let fit = newton::fit_with(&ingest.observations, &options, &LuSolver, observer)
        .map_err(|e| AppError::new(3, format!("Cannot build design matrix: {e}")))?;

    let quality = metrics::quality(&ingest.observations, &fit);

    Ok(RunOutput {
        ingest,
        fit,
        quality,
    })
}
