//! Fixed demonstration data set.
//!
//! Ten hand-placed points following a U-shaped dose/response trend with its
//! trough around 26–32 mg. Resetting always restores exactly this set.

use crate::domain::DataPoint;

/// `(dose mg, response mmHg)` pairs, sorted by dose.
pub const SEED_DATA: [(f64, f64); 10] = [
    (4.0, 158.0),
    (9.0, 142.0),
    (14.0, 128.0),
    (20.0, 118.0),
    (26.0, 112.0),
    (32.0, 109.0),
    (37.0, 115.0),
    (43.0, 126.0),
    (48.0, 142.0),
    (53.0, 165.0),
];

/// The seed set with stable `fixed-<dose>` ids.
pub fn seed_points() -> Vec<DataPoint> {
    SEED_DATA
        .iter()
        .map(|&(x, y)| DataPoint::new(format!("fixed-{x}"), x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_stable_and_unique() {
        let points = seed_points();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0].id, "fixed-4");
        assert_eq!(points[9].id, "fixed-53");

        let mut ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn seed_is_identical_across_calls() {
        assert_eq!(seed_points(), seed_points());
    }
}
