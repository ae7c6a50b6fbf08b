//! Newton-Raphson fitting.
//!
//! Responsibilities:
//!
//! - drive the convergence loop over gradient + Hessian evaluations
//! - map solver failures and divergence into terminal statuses
//! - expose the per-iteration trace hook

pub mod newton;

pub use newton::*;
