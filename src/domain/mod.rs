//! Domain types used throughout the program.
//!
//! This module defines:
//!
//! - observations and the quadratic model (`DataPoint`, `Coefficients`)
//! - fit diagnostics (`FitQuality`, `PointResidual`)
//! - the exported curve schema (`CurveFile`)
//! - the resolved run configuration (`DemoConfig`)

pub mod types;

pub use types::*;
