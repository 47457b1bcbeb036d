//! Convergence driver for the training animation.
//!
//! - `step`: one exponential-interpolation tick plus configurable rates
//! - `trainer`: the `Idle → Running → Converged` state machine around it

pub mod step;
pub mod trainer;

pub use step::*;
pub use trainer::*;
