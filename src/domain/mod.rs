//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input observations (`Observation`)
//! - convergence-loop state (`ConvergenceStatus`, `TraceEvent`)
//! - fit outputs (`FitResult`, `FitQuality`)
//! - run configuration (`FitConfig`) and the model JSON schema (`ModelFile`)

pub mod types;

pub use types::*;
