//! CSV ingest of user point sets.
//!
//! Expected columns (header names are case-insensitive):
//!
//! - `dose` (or `x`), required
//! - `response` (or `y`, `bp`), required
//! - `id`, optional: generated as `row-<line>` when missing or blank
//!
//! Rows that fail to parse or fall outside the accepted ranges are skipped and
//! reported, the same way the input form would reject them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::{PointSet, parse_point};
use crate::domain::DataPoint;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct IngestedPoints {
    pub points: PointSet,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn load_points_csv(path: &Path) -> Result<IngestedPoints, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_points_csv(file)
        .map_err(|e| AppError::input(format!("{} ('{}')", e.message(), path.display())))
}

pub fn read_points_csv<R: Read>(reader: R) -> Result<IngestedPoints, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV header: {e}")))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (i, record) in rdr.records().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError { line, message: e.to_string() });
                continue;
            }
        };

        let dose = record.get(columns.dose).unwrap_or("");
        let response = record.get(columns.response).unwrap_or("");
        let (x, y) = match parse_point(dose, response) {
            Ok(xy) => xy,
            Err(e) => {
                row_errors.push(RowError { line, message: e.to_string() });
                continue;
            }
        };

        let id = columns
            .id
            .and_then(|c| record.get(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{line}"));

        if points.iter().any(|p: &DataPoint| p.id == id) {
            row_errors.push(RowError {
                line,
                message: format!("duplicate id '{id}'"),
            });
            continue;
        }
        points.push(DataPoint::new(id, x, y));
    }

    if !row_errors.is_empty() {
        log::warn!("skipped {} of {rows_read} CSV rows", row_errors.len());
    }

    Ok(IngestedPoints {
        points: PointSet::from_points(points),
        row_errors,
        rows_read,
    })
}

struct Columns {
    dose: usize,
    response: usize,
    id: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, AppError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let dose = find(&["dose", "x"])
            .ok_or_else(|| AppError::input("CSV is missing a 'dose' column."))?;
        let response = find(&["response", "y", "bp"])
            .ok_or_else(|| AppError::input("CSV is missing a 'response' column."))?;
        Ok(Self {
            dose,
            response,
            id: find(&["id"]),
        })
    }
}
