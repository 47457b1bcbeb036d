//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - the coefficient triple and its fit quality
//! - a generation timestamp
//! - a precomputed grid over the chart's dose range for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{CHART_X, Coefficients, CurveFile, CurveGrid, FitQuality};
use crate::error::AppError;
use crate::math::sample_curve;

/// One sample per mg across the chart range, endpoints included.
const GRID_POINTS: usize = 56;

pub fn build_curve_file(coeffs: &Coefficients, quality: &FitQuality) -> CurveFile {
    let (dose, response) = sample_curve(coeffs, CHART_X[0], CHART_X[1], GRID_POINTS)
        .into_iter()
        .unzip();
    CurveFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        generated: Local::now(),
        coefficients: *coeffs,
        fit_quality: quality.clone(),
        grid: CurveGrid { dose, response },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, coeffs: &Coefficients, quality: &FitQuality) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &build_curve_file(coeffs, quality))
        .map_err(|e| AppError::runtime(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid curve JSON: {e}")))?;
    if curve.grid.dose.len() != curve.grid.response.len() {
        return Err(AppError::input("Invalid curve JSON: grid columns differ in length."));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed_points;
    use crate::math::{evaluate, fit};
    use crate::report::fit_quality;

    #[test]
    fn grid_spans_chart_range() {
        let coeffs = Coefficients::new(0.1, -5.0, 180.0);
        let curve = build_curve_file(&coeffs, &fit_quality(&[], &coeffs));
        assert_eq!(curve.grid.dose.len(), GRID_POINTS);
        assert_eq!(curve.grid.dose[0], 0.0);
        assert_eq!(curve.grid.dose[GRID_POINTS - 1], 55.0);
        assert_eq!(curve.grid.response[10], evaluate(&coeffs, curve.grid.dose[10]));
    }

    #[test]
    fn write_then_read_curve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        let points = seed_points();
        let coeffs = fit(&points);
        let quality = fit_quality(&points, &coeffs);

        write_curve_json(&path, &coeffs, &quality).unwrap();
        let back = read_curve_json(&path).unwrap();
        assert_eq!(back.tool, "dosefit");
        assert!((back.coefficients.a - coeffs.a).abs() < 1e-12);
        assert!((back.coefficients.b - coeffs.b).abs() < 1e-12);
        assert!((back.coefficients.c - coeffs.c).abs() < 1e-9);
        assert_eq!(back.fit_quality.n, quality.n);
        assert_eq!(back.grid.dose.len(), GRID_POINTS);
    }

    #[test]
    fn rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"tool\": 3}").unwrap();
        assert!(read_curve_json(&path).is_err());
    }
}
