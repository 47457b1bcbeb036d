//! Reporting utilities: residuals, fit quality, and formatted terminal output.

use crate::domain::{Coefficients, DataPoint, FitQuality, PointResidual};
use crate::math::evaluate;

pub mod format;

pub use format::*;

/// Fitted values and residuals (`observed - fitted`) for each point.
pub fn compute_residuals(points: &[DataPoint], coeffs: &Coefficients) -> Vec<PointResidual> {
    points
        .iter()
        .map(|p| {
            let fitted = evaluate(coeffs, p.x);
            PointResidual {
                point: p.clone(),
                fitted,
                residual: p.y - fitted,
            }
        })
        .collect()
}

/// SSE, RMSE and R² of `coeffs` over `points`.
pub fn fit_quality(points: &[DataPoint], coeffs: &Coefficients) -> FitQuality {
    let n = points.len();
    if n == 0 {
        return FitQuality {
            sse: 0.0,
            rmse: 0.0,
            r_squared: None,
            n: 0,
        };
    }

    let sse: f64 = compute_residuals(points, coeffs)
        .iter()
        .map(|r| r.residual * r.residual)
        .sum();
    let mean = points.iter().map(|p| p.y).sum::<f64>() / n as f64;
    let sst: f64 = points.iter().map(|p| (p.y - mean) * (p.y - mean)).sum();

    FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared: (sst > 0.0).then(|| 1.0 - sse / sst),
        n,
    }
}
