//! CSV ingest and normalization.
//!
//! This module is responsible for turning a CSV file into a clean set of
//! `(features, response)` observations that are safe to fit.
//!
//! Design goals:
//! - **Column selection**: arbitrary predictor columns + one response column
//! - **Header detection**: a first row whose selected cells don't all parse
//!   as numbers is treated as labels, not data
//! - **Row-level validation**: skip bad rows, but report what happened
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;

use csv::StringRecord;

use crate::domain::{FitConfig, Observation};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Summary stats about the observations actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    /// (min, max) per predictor column, in `x_cols` order.
    pub x_ranges: Vec<(f64, f64)>,
    pub y_min: f64,
    pub y_max: f64,
}

/// Ingest output: observations + captured labels + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    /// Labels for the predictor columns (header row or `col{idx}` fallback).
    pub x_labels: Vec<String>,
    /// Label for the response column.
    pub y_label: String,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize CSV rows to `Observation`s.
pub fn load_observations(config: &FitConfig) -> Result<IngestedData, AppError> {
    validate_columns(&config.x_cols, config.y_col)?;

    let file = File::open(&config.csv_path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open CSV '{}': {e}", config.csv_path.display()),
        )
    })?;

    // We do our own header detection, so the reader treats every record as data.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut x_labels: Vec<String> = config.x_cols.iter().map(|c| format!("col{c}")).collect();
    let mut y_label = format!("col{}", config.y_col);

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows_read += 1;
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        // First record: header if the selected cells don't all parse as numbers.
        if idx == 0 {
            if let Some(labels) = try_header_labels(&record, &config.x_cols, config.y_col) {
                (x_labels, y_label) = labels;
                continue;
            }
        }

        rows_read += 1;
        match parse_row(&record, &config.x_cols, config.y_col) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = observations.len();
    let stats = compute_stats(&observations, config.x_cols.len()).ok_or_else(|| {
        AppError::new(3, "No valid rows remain after parsing/filtering.")
    })?;

    Ok(IngestedData {
        observations,
        x_labels,
        y_label,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn validate_columns(x_cols: &[usize], y_col: usize) -> Result<(), AppError> {
    if x_cols.is_empty() {
        return Err(AppError::new(2, "At least one predictor column is required."));
    }
    for (i, &c) in x_cols.iter().enumerate() {
        if c == y_col {
            return Err(AppError::new(
                2,
                format!("Predictor column {c} is also the response column."),
            ));
        }
        if x_cols[..i].contains(&c) {
            return Err(AppError::new(2, format!("Duplicate predictor column {c}.")));
        }
    }
    Ok(())
}

/// If the first record looks like a header (at least one selected cell is not
/// numeric), return the captured labels.
fn try_header_labels(
    record: &StringRecord,
    x_cols: &[usize],
    y_col: usize,
) -> Option<(Vec<String>, String)> {
    let mut selected = x_cols.to_vec();
    selected.push(y_col);

    let all_numeric = selected.iter().all(|&c| {
        record
            .get(c)
            .map(|s| s.parse::<f64>().is_ok())
            .unwrap_or(false)
    });
    if all_numeric {
        return None;
    }

    let label_at = |c: usize| {
        record
            .get(c)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("col{c}"))
    };

    let x_labels = x_cols.iter().map(|&c| label_at(c)).collect();
    Some((x_labels, label_at(y_col)))
}

fn parse_row(
    record: &StringRecord,
    x_cols: &[usize],
    y_col: usize,
) -> Result<Observation, String> {
    let mut features = Vec::with_capacity(x_cols.len());
    for &c in x_cols {
        features.push(parse_cell(record, c)?);
    }
    let response = parse_cell(record, y_col)?;
    Ok(Observation::new(features, response))
}

fn parse_cell(record: &StringRecord, col: usize) -> Result<f64, String> {
    let raw = record
        .get(col)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value in column {col}."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Unparsable value '{raw}' in column {col}."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value in column {col}."))
    }
}

fn compute_stats(observations: &[Observation], p: usize) -> Option<DatasetStats> {
    if observations.is_empty() {
        return None;
    }

    let mut x_ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); p];
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for obs in observations {
        for (j, &v) in obs.features.iter().enumerate() {
            x_ranges[j].0 = x_ranges[j].0.min(v);
            x_ranges[j].1 = x_ranges[j].1.max(v);
        }
        y_min = y_min.min(obs.response);
        y_max = y_max.max(obs.response);
    }

    Some(DatasetStats {
        n_points: observations.len(),
        x_ranges,
        y_min,
        y_max,
    })
}
