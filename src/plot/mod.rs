//! PNG rendering of the fitted regression.

pub mod png;

pub use png::*;
