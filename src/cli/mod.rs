//! Command-line parsing for the Newton-Raphson regression fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nfit", version, about = "Linear regression via Newton-Raphson iteration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a line to CSV data, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported model JSON.
    Plot(PlotArgs),
    /// Generate a synthetic noisy-linear CSV for trying the fitter.
    Sample(SampleArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV path.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Output image path (defaults to the input path with a .png extension).
    #[arg(short = 'o', long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Comma-separated zero-based predictor column indices.
    #[arg(short = 'c', long, default_value = "0", value_name = "COLS")]
    pub x_cols: String,

    /// Zero-based response column index.
    #[arg(short = 'y', long, default_value_t = 1)]
    pub y_col: usize,

    /// Step-norm convergence threshold.
    #[arg(short = 'e', long, default_value_t = 0.001)]
    pub epsilon: f64,

    /// Iteration cap for the convergence loop.
    #[arg(long, default_value_t = 10_000)]
    pub max_iterations: usize,

    /// Print header labels and the first five rows of the data used.
    #[arg(short = 'd', long)]
    pub describe: bool,

    /// Print a trace line for each iteration of the regression process.
    #[arg(short = 's', long)]
    pub show: bool,

    /// Skip writing the regression plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (pixels).
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Plot height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Export per-observation results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fitted model (coefficients + diagnostics + line grid) to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,
}

/// Options for plotting a saved model.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Model JSON file produced by `nfit fit --export-model`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Output image path.
    #[arg(short = 'o', long, value_name = "PNG")]
    pub output: PathBuf,

    /// Plot width (pixels).
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Plot height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

/// Options for generating a synthetic sample CSV.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of points to generate.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed for reproducible samples.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// True slope of the underlying line.
    #[arg(long, default_value_t = 2.0)]
    pub slope: f64,

    /// True intercept of the underlying line.
    #[arg(long, default_value_t = 0.0)]
    pub intercept: f64,

    /// Gaussian noise standard deviation.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Minimum x value.
    #[arg(long, default_value_t = 0.0)]
    pub x_min: f64,

    /// Maximum x value.
    #[arg(long, default_value_t = 10.0)]
    pub x_max: f64,
}
