//! Export per-observation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::FitResult;
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// Write per-observation results (features, observed, fitted, residual) to CSV.
pub fn write_results_csv(
    path: &Path,
    ingest: &IngestedData,
    fit: &FitResult,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    let mut header = ingest.x_labels.join(",");
    header.push_str(&format!(",{},y_fit,residual", ingest.y_label));
    writeln!(file, "{header}")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for obs in &ingest.observations {
        let y_fit = fit.predict(&obs.features);
        let features: Vec<String> = obs.features.iter().map(|v| format!("{v:.10}")).collect();
        writeln!(
            file,
            "{},{:.10},{:.10},{:.10}",
            features.join(","),
            obs.response,
            y_fit,
            obs.response - y_fit,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
