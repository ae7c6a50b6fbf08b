//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FitConfig, FitQuality, FitResult, TraceEvent};
use crate::io::ingest::IngestedData;

/// Format the full run summary (dataset stats + fit outcome + metrics).
pub fn format_run_summary(
    ingest: &IngestedData,
    fit: &FitResult,
    quality: &FitQuality,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== nfit - Newton-Raphson linear regression ===\n");
    out.push_str(&format!("Input: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Y: {} | range=[{:.3}, {:.3}]\n",
        ingest.y_label, ingest.stats.y_min, ingest.stats.y_max
    ));
    for (label, (lo, hi)) in ingest.x_labels.iter().zip(ingest.stats.x_ranges.iter()) {
        out.push_str(&format!("X: {label} | range=[{lo:.3}, {hi:.3}]\n"));
    }

    out.push_str(&format!(
        "\nStatus: {} after {} iteration(s) (epsilon={})\n",
        fit.status.display_name(),
        fit.iterations,
        config.epsilon
    ));
    out.push_str(&format!(
        "Regression line: {}\n",
        format_equation(fit, &ingest.x_labels)
    ));
    if let Some(r) = quality.correlation {
        out.push_str(&format!("Correlation Coefficient: {r:.8}\n"));
    }
    out.push_str(&format!("MAE: {:.8}\n", quality.mae));
    out.push_str(&format!("RMSE: {:.8}\n", quality.rmse));

    out
}

/// Render the fitted model as an equation.
///
/// Single-predictor fits use the familiar `y = m·x + b` form; higher
/// dimensions list the intercept first.
pub fn format_equation(fit: &FitResult, x_labels: &[String]) -> String {
    let c = &fit.coefficients;
    if c.len() == 2 {
        return format!("y = {:.8}·x + {:.8}", c[1], c[0]);
    }

    let mut out = format!("y = {:.8}", c[0]);
    for (j, coef) in c[1..].iter().enumerate() {
        let label = x_labels
            .get(j)
            .map(String::as_str)
            .unwrap_or("x");
        let sign = if *coef < 0.0 { '-' } else { '+' };
        out.push_str(&format!(" {sign} {:.8}·{label}", coef.abs()));
    }
    out
}

/// Format the `--describe` preview: header labels plus up to five rows.
pub fn format_describe(ingest: &IngestedData) -> String {
    let mut out = String::new();
    out.push_str(&ingest.x_labels.join("\t"));
    out.push('\t');
    out.push_str(&ingest.y_label);
    out.push('\n');

    for obs in ingest.observations.iter().take(5) {
        for v in &obs.features {
            out.push_str(&format!("{v:.3}\t"));
        }
        out.push_str(&format!("{:.3}\n", obs.response));
    }

    out
}

/// Format a single trace line for `--show` output.
pub fn format_trace_line(ev: &TraceEvent<'_>) -> String {
    format!(
        "Iteration: {}\tΔβ: {}\t|Δβ|: {:.8}\tβ: {}",
        ev.iteration,
        fmt_vec(ev.delta),
        ev.step_norm,
        fmt_vec(ev.coefficients),
    )
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.8}")).collect();
    format!("[{}]", parts.join(", "))
}
