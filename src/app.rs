//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the ingest + fit pipeline
//! - prints reports/traces
//! - writes the plot and optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::sample::{self, SampleSpec};
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `nfit` binary.
pub fn run() -> Result<(), AppError> {
    // We want `nfit -i data.csv` to behave like `nfit fit -i data.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the original tool's single-command UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;

    let mut print_trace = |ev: &crate::domain::TraceEvent<'_>| {
        println!("{}", crate::report::format_trace_line(ev));
    };
    let observer: Option<&mut crate::fit::TraceObserver<'_>> = if config.show_iterations {
        Some(&mut print_trace)
    } else {
        None
    };

    if config.show_iterations {
        println!("Stepping the gradient:");
    }
    let run = pipeline::run_fit(&config, observer)?;

    if config.describe {
        println!("\n{}", crate::report::format_describe(&run.ingest));
    }

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.fit, &run.quality, &config)
    );

    if run.fit.converged() {
        if config.plot {
            if run.fit.coefficients.len() == 2 {
                let points: Vec<(f64, f64)> = run
                    .ingest
                    .observations
                    .iter()
                    .map(|o| (o.features[0], o.response))
                    .collect();
                let plot_path = config
                    .plot_path
                    .clone()
                    .unwrap_or_else(|| default_plot_path(&config.csv_path));
                crate::plot::render_regression_png(
                    &plot_path,
                    &points,
                    &run.fit,
                    config.plot_width,
                    config.plot_height,
                )?;
                println!("Plot written to {}", plot_path.display());
            } else {
                println!("(plot skipped: only single-predictor fits are plottable)");
            }
        }

        if let Some(path) = &config.export_results {
            crate::io::export::write_results_csv(path, &run.ingest, &run.fit)?;
        }
        if let Some(path) = &config.export_model {
            crate::io::model::write_model_json(path, &run.fit, &run.quality, &run.ingest)?;
        }

        Ok(())
    } else {
        Err(AppError::new(
            4,
            format!("Fit did not converge: {}.", run.fit.status.display_name()),
        ))
    }
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let model = crate::io::model::read_model_json(&args.model)?;
    crate::plot::render_model_png(&args.output, &model, args.width, args.height)?;
    println!("Plot written to {}", args.output.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        count: args.count,
        seed: args.seed,
        slope: args.slope,
        intercept: args.intercept,
        noise_sd: args.noise,
        x_min: args.x_min,
        x_max: args.x_max,
    };
    let points = sample::generate_sample(&spec)?;
    sample::write_sample_csv(&args.output, &points)?;
    println!(
        "Wrote {} points around y = {}·x + {} to {}",
        points.len(),
        spec.slope,
        spec.intercept,
        args.output.display()
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    Ok(FitConfig {
        csv_path: args.input.clone(),
        x_cols: parse_columns(&args.x_cols)?,
        y_col: args.y_col,
        epsilon: args.epsilon,
        max_iterations: args.max_iterations,
        describe: args.describe,
        show_iterations: args.show,
        plot: !args.no_plot,
        plot_path: args.output.clone(),
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_model: args.export_model.clone(),
    })
}

/// Parse the comma-separated predictor column list (e.g. `0` or `1,3,4`).
fn parse_columns(colstr: &str) -> Result<Vec<usize>, AppError> {
    let mut cols = Vec::new();
    for part in colstr.split(',') {
        let part = part.trim();
        let col = part.parse::<usize>().map_err(|_| {
            AppError::new(
                2,
                format!("Invalid columns string '{colstr}': '{part}' is not a column index."),
            )
        })?;
        cols.push(col);
    }
    Ok(cols)
}

/// Default plot path: the input path with a `.png` extension.
fn default_plot_path(csv_path: &std::path::Path) -> PathBuf {
    csv_path.with_extension("png")
}

/// Rewrite argv so `nfit` defaults to `nfit fit`.
///
/// Rules:
/// - `nfit -i data.csv ...`      -> `nfit fit -i data.csv ...`
/// - `nfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
