//! `dosefit` library crate.
//!
//! The binary (`dosefit`) is a thin wrapper around this library so that:
//!
//! - the regression and training core is testable without spawning processes
//! - front-ends (CLI, TUI) share one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod train;
pub mod tui;
