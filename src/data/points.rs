//! The editable point set.
//!
//! Points are kept sorted by dose for display; the fit does not care about
//! order. Range checks here mirror the input form: the fitting core itself
//! accepts any finite numbers.

use rand::Rng;
use thiserror::Error;

use crate::data::seed::seed_points;
use crate::domain::{DOSE_MAX, DOSE_MIN, DataPoint, DatasetStats, RESPONSE_MAX, RESPONSE_MIN};
use crate::error::AppError;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    #[error("dose and response must both be numbers")]
    NotANumber,
    #[error("dose {0} mg is outside [0, 60] mg")]
    DoseOutOfRange(f64),
    #[error("response {0} mmHg is outside [0, 250] mmHg")]
    ResponseOutOfRange(f64),
    #[error("no point with id '{0}'")]
    UnknownId(String),
}

impl From<PointError> for AppError {
    fn from(err: PointError) -> Self {
        AppError::input(err.to_string())
    }
}

/// Check a point against the accepted dose/response ranges.
pub fn validate_point(x: f64, y: f64) -> Result<(), PointError> {
    if !(x.is_finite() && y.is_finite()) {
        return Err(PointError::NotANumber);
    }
    if !(DOSE_MIN..=DOSE_MAX).contains(&x) {
        return Err(PointError::DoseOutOfRange(x));
    }
    if !(RESPONSE_MIN..=RESPONSE_MAX).contains(&y) {
        return Err(PointError::ResponseOutOfRange(y));
    }
    Ok(())
}

/// Parse raw text fields (as typed by a user) into a validated point.
pub fn parse_point(dose: &str, response: &str) -> Result<(f64, f64), PointError> {
    let x: f64 = dose.trim().parse().map_err(|_| PointError::NotANumber)?;
    let y: f64 = response.trim().parse().map_err(|_| PointError::NotANumber)?;
    validate_point(x, y)?;
    Ok((x, y))
}

/// Random opaque id: nine lowercase base-36 characters.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<DataPoint>,
}

impl PointSet {
    /// The fixed demonstration set.
    pub fn seeded() -> Self {
        Self::from_points(seed_points())
    }

    pub fn from_points(mut points: Vec<DataPoint>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DataPoint> {
        self.points.get(index)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    /// Validate and add a new point with a fresh random id.
    ///
    /// Returns the index at which the point landed.
    pub fn add<R: Rng + ?Sized>(&mut self, x: f64, y: f64, rng: &mut R) -> Result<usize, PointError> {
        validate_point(x, y)?;
        let mut id = random_id(rng);
        while self.contains_id(&id) {
            id = random_id(rng);
        }
        Ok(self.insert(DataPoint::new(id, x, y)))
    }

    /// Insert an already-built point, keeping dose order (after equal doses).
    ///
    /// No range validation: callers decide which points are acceptable.
    pub fn insert(&mut self, point: DataPoint) -> usize {
        let idx = self.points.partition_point(|p| p.x <= point.x);
        log::debug!("insert point {} at ({}, {})", point.id, point.x, point.y);
        self.points.insert(idx, point);
        idx
    }

    pub fn delete(&mut self, id: &str) -> Result<DataPoint, PointError> {
        let idx = self
            .points
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PointError::UnknownId(id.to_string()))?;
        let removed = self.points.remove(idx);
        log::debug!("deleted point {}", removed.id);
        Ok(removed)
    }

    /// Restore the fixed demonstration set.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    pub fn stats(&self) -> Option<DatasetStats> {
        let first = self.points.first()?;
        let mut stats = DatasetStats {
            n_points: self.points.len(),
            dose_min: first.x,
            dose_max: first.x,
            response_min: first.y,
            response_max: first.y,
        };
        for p in &self.points[1..] {
            stats.dose_min = stats.dose_min.min(p.x);
            stats.dose_max = stats.dose_max.max(p.x);
            stats.response_min = stats.response_min.min(p.y);
            stats.response_max = stats.response_max.max(p.y);
        }
        Some(stats)
    }
}
