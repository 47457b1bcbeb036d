//! Synthetic point sets around the seed trend.
//!
//! Doses are drawn uniformly, responses follow the quadratic fitted to the seed
//! set plus Gaussian noise. Everything is driven by a seeded `StdRng`, so the
//! same `(count, seed, noise)` always yields the same set.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::seed::seed_points;
use crate::domain::{DataPoint, RESPONSE_MAX, RESPONSE_MIN};
use crate::error::AppError;
use crate::math::{evaluate, fit};

/// Doses are sampled from this range (inside the chart viewport).
const SAMPLE_DOSE: (f64, f64) = (1.0, 55.0);

pub fn generate_sample(count: usize, seed: u64, noise: f64) -> Result<Vec<DataPoint>, AppError> {
    if count == 0 {
        return Err(AppError::input("Sample count must be > 0."));
    }
    if !(noise.is_finite() && noise >= 0.0) {
        return Err(AppError::input(format!("Invalid noise level {noise} (must be finite and >= 0).")));
    }

    let trend = fit(&seed_points());
    let normal = Normal::new(0.0, noise)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let x = round_to(rng.gen_range(SAMPLE_DOSE.0..=SAMPLE_DOSE.1), 2.0);
        let y = evaluate(&trend, x) + normal.sample(&mut rng);
        let y = round_to(y.clamp(RESPONSE_MIN, RESPONSE_MAX), 10.0);
        points.push(DataPoint::new(format!("sample-{:03}", i + 1), x, y));
    }
    log::debug!("generated {count} synthetic points (seed={seed}, noise={noise})");

    Ok(points)
}

/// Round to the nearest `1 / per_unit` (e.g. `per_unit = 2.0` gives half units).
fn round_to(v: f64, per_unit: f64) -> f64 {
    (v * per_unit).round() / per_unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::validate_point;

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(25, 9, 4.0).unwrap();
        let b = generate_sample(25, 9, 4.0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, generate_sample(25, 10, 4.0).unwrap());
    }

    #[test]
    fn samples_are_valid_points() {
        for p in generate_sample(200, 3, 30.0).unwrap() {
            assert!(validate_point(p.x, p.y).is_ok(), "{p:?}");
        }
    }

    #[test]
    fn noiseless_sample_lies_near_trend() {
        let trend = fit(&seed_points());
        for p in generate_sample(20, 1, 0.0).unwrap() {
            assert!((p.y - evaluate(&trend, p.x)).abs() <= 0.05 + 1e-9);
        }
    }

    #[test]
    fn noisy_sample_refits_close_to_seed_trough() {
        let points = generate_sample(60, 11, 3.0).unwrap();
        let coeffs = fit(&points);
        let (x, _) = crate::math::vertex(&coeffs).unwrap();
        assert!((22.0..=34.0).contains(&x), "vertex at {x}");
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(generate_sample(0, 1, 1.0).is_err());
        assert!(generate_sample(5, 1, -1.0).is_err());
        assert!(generate_sample(5, 1, f64::NAN).is_err());
    }
}
