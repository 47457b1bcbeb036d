//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PointResidual;
use crate::error::AppError;

/// Write per-point results to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, residuals)
}

pub fn write_results<W: Write>(out: W, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["id", "dose", "response", "fitted", "residual"])
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        let p = &r.point;
        wtr.write_record([
            p.id.clone(),
            p.x.to_string(),
            p.y.to_string(),
            format!("{:.4}", r.fitted),
            format!("{:.4}", r.residual),
        ])
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coefficients, DataPoint};
    use crate::io::ingest::read_points_csv;
    use crate::report::compute_residuals;

    #[test]
    fn writes_header_and_rows() {
        let points = vec![DataPoint::new("p1", 10.0, 120.0), DataPoint::new("p2", 20.5, 110.0)];
        let rows = compute_residuals(&points, &Coefficients::new(0.0, 0.0, 115.0));
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "id,dose,response,fitted,residual\np1,10,120,115.0000,5.0000\np2,20.5,110,115.0000,-5.0000\n"
        );
    }

    #[test]
    fn export_can_be_read_back_as_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let points = crate::data::seed_points();
        write_results_csv(&path, &compute_residuals(&points, &Coefficients::BASELINE)).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let back = read_points_csv(file).unwrap();
        assert_eq!(back.points.points(), points.as_slice());
    }

    #[test]
    fn ids_with_commas_survive_export() {
        let csv = "id,dose,response\n\"a,b\",10,120\nplain,20,118\n";
        let ingested = read_points_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingested.points.len(), 2);

        let rows = compute_residuals(ingested.points.points(), &Coefficients::new(0.0, 0.0, 119.0));
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"a,b\",10,120,"), "{text}");

        let back = read_points_csv(text.as_bytes()).unwrap();
        assert!(back.row_errors.is_empty());
        assert_eq!(back.points, ingested.points);
    }
}
