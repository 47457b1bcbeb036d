//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value through the fitting/training core
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::train::Rates;

/// Valid dose range (mg) for user-entered points.
pub const DOSE_MIN: f64 = 0.0;
pub const DOSE_MAX: f64 = 60.0;

/// Valid response range (mmHg) for user-entered points.
pub const RESPONSE_MIN: f64 = 0.0;
pub const RESPONSE_MAX: f64 = 250.0;

/// The prediction slider covers `[0, PREDICTION_MAX]` mg in unit steps.
pub const PREDICTION_MAX: f64 = 50.0;

/// Chart viewport shared by the TUI chart and curve exports.
pub const CHART_X: [f64; 2] = [0.0, 55.0];
pub const CHART_Y: [f64; 2] = [60.0, 200.0];

/// One observation: a dose and the measured response.
///
/// Points are immutable once created; the set is edited by adding new points
/// or deleting existing ones by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: String,
    /// Dose (mg).
    pub x: f64,
    /// Response (mmHg).
    pub y: f64,
}

impl DataPoint {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }
}

/// Coefficients of `y = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coefficients {
    /// Curvature.
    pub a: f64,
    /// Linear slope at `x = 0`.
    pub b: f64,
    /// Intercept.
    pub c: f64,
}

impl Coefficients {
    /// Degenerate-fit result.
    pub const ZERO: Coefficients = Coefficients { a: 0.0, b: 0.0, c: 0.0 };

    /// Untrained starting point: a flat line at 160 mmHg.
    pub const BASELINE: Coefficients = Coefficients { a: 0.0, b: 0.0, c: 160.0 };

    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Summary stats about a point set.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub dose_min: f64,
    pub dose_max: f64,
    pub response_min: f64,
    pub response_max: f64,
}

/// Goodness-of-fit summary for a coefficient triple against a point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    /// `None` when the responses have zero variance (R² undefined).
    pub r_squared: Option<f64>,
    pub n: usize,
}

/// Fitted value and residual for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointResidual {
    pub point: DataPoint,
    pub fitted: f64,
    pub residual: f64,
}

/// Sampled curve stored alongside the coefficients in curve JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub dose: Vec<f64>,
    pub response: Vec<f64>,
}

/// On-disk representation of a fitted curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Local>,
    pub coefficients: Coefficients,
    pub fit_quality: FitQuality,
    pub grid: CurveGrid,
}

/// Everything a single CLI/TUI run needs, resolved from arguments and `.env`.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub language: Language,
    pub rates: Rates,
    /// Load points from this CSV instead of the seed set.
    pub points_csv: Option<PathBuf>,
    /// Extra `(dose, response)` points appended after loading.
    pub extra_points: Vec<(f64, f64)>,
    /// Replace the seed set with `n` synthetic noisy points.
    pub random_count: Option<usize>,
    pub random_seed: u64,
    pub random_noise: f64,
    /// Dose at which to report a prediction.
    pub dose: f64,
    /// Training progress is printed every `report_every` ticks (0 = only the final line).
    pub report_every: u64,
    /// Hard cap on ticks for the synchronous training loop.
    pub max_ticks: u64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            rates: Rates::default(),
            points_csv: None,
            extra_points: Vec::new(),
            random_count: None,
            random_seed: 42,
            random_noise: 4.0,
            dose: 20.0,
            report_every: 20,
            max_ticks: 10_000,
            plot: true,
            plot_width: 70,
            plot_height: 20,
            export_results: None,
            export_curve: None,
        }
    }
}
