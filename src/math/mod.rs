//! Mathematical core: quadratic least squares and curve evaluation.

pub mod quadratic;
pub mod regression;

pub use quadratic::*;
pub use regression::*;
