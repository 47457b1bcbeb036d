//! Command-line parsing for the dose-response trainer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the regression/training code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::i18n::Language;
use crate::train::{DEFAULT_RATE, DEFAULT_TOL_A, DEFAULT_TOL_B, DEFAULT_TOL_C};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dosefit", version, about = "Quadratic dose-response model trainer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (default when no subcommand is given).
    Tui(CommonArgs),
    /// Fit the point set, print the formula, fit quality and a plot, and optionally export.
    Fit(FitArgs),
    /// Run the convergence animation synchronously and print progress.
    Train(TrainArgs),
    /// Fit, train to convergence, and print the predicted response at a dose.
    Predict(PredictArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options shared by every command that works on a point set.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Load points from a CSV with `dose,response[,id]` columns instead of the seed set.
    #[arg(long, value_name = "CSV", conflicts_with = "random")]
    pub points: Option<PathBuf>,

    /// Add a point, given as `DOSE,RESPONSE`. May be repeated.
    #[arg(long, value_name = "X,Y", value_parser = parse_pair)]
    pub add: Vec<(f64, f64)>,

    /// Replace the seed set with N synthetic noisy points around the seed trend.
    #[arg(long, value_name = "N")]
    pub random: Option<usize>,

    /// Random seed for `--random`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Noise standard deviation (mmHg) for `--random`.
    #[arg(long, default_value_t = 4.0)]
    pub noise: f64,

    /// Display language. Falls back to `DOSEFIT_LANG`, then English.
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Fraction of the remaining gap closed per training step.
    #[arg(long, default_value_t = DEFAULT_RATE)]
    pub rate: f64,

    /// Convergence threshold for the curvature coefficient `a`.
    #[arg(long = "tol-a", default_value_t = DEFAULT_TOL_A)]
    pub tol_a: f64,

    /// Convergence threshold for the linear coefficient `b`.
    #[arg(long = "tol-b", default_value_t = DEFAULT_TOL_B)]
    pub tol_b: f64,

    /// Convergence threshold for the intercept `c`.
    #[arg(long = "tol-c", default_value_t = DEFAULT_TOL_C)]
    pub tol_c: f64,
}

/// Terminal plot options for commands that print a plot.
#[derive(Debug, Args, Clone)]
pub struct PlotOpts {
    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 70)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub plot: PlotOpts,

    /// Export per-point results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fitted curve (coefficients + quality + sampled grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub plot: PlotOpts,

    /// Print a progress line every N steps (0 prints only the final line).
    #[arg(long, default_value_t = 20)]
    pub report_every: u64,

    /// Give up after this many steps.
    #[arg(long, default_value_t = 10_000)]
    pub max_ticks: u64,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub plot: PlotOpts,

    /// Dose (mg) to predict for; clamped to the prediction range, must be finite.
    #[arg(long, default_value_t = 20.0)]
    pub dose: f64,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve JSON file produced by `dosefit fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 70)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Parse `DOSE,RESPONSE` (whitespace around either number is ignored).
fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DOSE,RESPONSE, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad dose '{x}': {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad response '{y}': {e}"))?;
    Ok((x, y))
}
