//! Mathematical core: design matrix, loss derivatives, and linear solves.

pub mod derivatives;
pub mod design;
pub mod solve;

pub use derivatives::*;
pub use design::*;
pub use solve::*;
