//! Closed-form quadratic least squares.
//!
//! Fitting `y = a·x² + b·x + c` reduces to the 3×3 normal equations:
//!
//! ```text
//! [ Σx⁴  Σx³  Σx² ]   [a]   [Σx²y]
//! [ Σx³  Σx²  Σx  ] × [b] = [Σxy ]
//! [ Σx²  Σx   n   ]   [c]   [Σy  ]
//! ```
//!
//! The system is tiny and always 3×3, so we solve it with Cramer's rule rather
//! than a general decomposition. Degenerate inputs (fewer than three points, or
//! a numerically singular matrix) degrade to zero coefficients instead of
//! returning an error.

use nalgebra::{Matrix3, Vector3};

use crate::domain::{Coefficients, DataPoint};

/// Minimum number of points for a determined quadratic fit.
pub const MIN_POINTS: usize = 3;

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPS: f64 = 1e-9;

/// Power sums needed by the degree-2 normal equations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerSums {
    pub n: f64,
    pub sx: f64,
    pub sx2: f64,
    pub sx3: f64,
    pub sx4: f64,
    pub sy: f64,
    pub sxy: f64,
    pub sx2y: f64,
}

impl PowerSums {
    /// Accumulate all sums in a single pass, in input order.
    ///
    /// Summation order is fixed so that identical inputs give bit-identical sums.
    pub fn accumulate(points: &[DataPoint]) -> Self {
        let mut s = PowerSums {
            n: points.len() as f64,
            ..PowerSums::default()
        };
        for p in points {
            let x2 = p.x * p.x;
            s.sx += p.x;
            s.sx2 += x2;
            s.sx3 += x2 * p.x;
            s.sx4 += x2 * p.x * p.x;
            s.sy += p.y;
            s.sxy += p.x * p.y;
            s.sx2y += x2 * p.y;
        }
        s
    }

    pub fn normal_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.sx4, self.sx3, self.sx2, //
            self.sx3, self.sx2, self.sx, //
            self.sx2, self.sx, self.n,
        )
    }

    pub fn rhs(&self) -> Vector3<f64> {
        Vector3::new(self.sx2y, self.sxy, self.sy)
    }
}

/// Fit a quadratic to `points` by least squares.
///
/// Returns [`Coefficients::ZERO`] for fewer than [`MIN_POINTS`] points or when
/// the normal-equations determinant is below [`SINGULAR_EPS`] (e.g. every point
/// shares the same dose).
pub fn fit(points: &[DataPoint]) -> Coefficients {
    if points.len() < MIN_POINTS {
        return Coefficients::ZERO;
    }

    let sums = PowerSums::accumulate(points);
    let m = sums.normal_matrix();
    let r = sums.rhs();

    let d = det3(&m);
    if d.abs() < SINGULAR_EPS {
        log::debug!("singular normal matrix (det={d:e}) for {} points", points.len());
        return Coefficients::ZERO;
    }

    let cramer = |col: usize| {
        let mut replaced = m;
        replaced.set_column(col, &r);
        det3(&replaced) / d
    };

    Coefficients::new(cramer(0), cramer(1), cramer(2))
}

/// Cofactor expansion along the first row.
///
/// Written out explicitly so the operation order (and therefore rounding) is
/// fixed regardless of the linear-algebra backend.
fn det3(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed_points;
    use crate::math::evaluate;
    use nalgebra::{DMatrix, DVector};

    fn pts(raw: &[(f64, f64)]) -> Vec<DataPoint> {
        raw.iter()
            .enumerate()
            .map(|(i, &(x, y))| DataPoint::new(format!("p{i}"), x, y))
            .collect()
    }

    fn assert_close(got: Coefficients, want: Coefficients, tol: f64) {
        assert!((got.a - want.a).abs() < tol, "a: got {}, want {}", got.a, want.a);
        assert!((got.b - want.b).abs() < tol, "b: got {}, want {}", got.b, want.b);
        assert!((got.c - want.c).abs() < tol, "c: got {}, want {}", got.c, want.c);
    }

    #[test]
    fn recovers_exact_quadratic_from_three_points() {
        let want = Coefficients::new(2.0, -3.0, 5.0);
        let points = pts(&[(1.0, 4.0), (2.0, 7.0), (5.0, 40.0)]);
        assert_close(fit(&points), want, 1e-6);
    }

    #[test]
    fn recovers_exact_quadratic_with_negative_and_zero_doses() {
        let want = Coefficients::new(-0.5, 1.25, 80.0);
        let raw: Vec<(f64, f64)> = [-4.0, 0.0, 3.0, 7.5]
            .iter()
            .map(|&x| (x, evaluate(&want, x)))
            .collect();
        assert_close(fit(&pts(&raw)), want, 1e-6);
    }

    #[test]
    fn too_few_points_give_zero() {
        assert_eq!(fit(&[]), Coefficients::ZERO);
        assert_eq!(fit(&pts(&[(1.0, 2.0)])), Coefficients::ZERO);
        assert_eq!(fit(&pts(&[(1.0, 2.0), (3.0, 4.0)])), Coefficients::ZERO);
    }

    #[test]
    fn shared_dose_is_singular() {
        let points = pts(&[(10.0, 1.0), (10.0, 2.0), (10.0, 3.0), (10.0, 9.0)]);
        assert_eq!(fit(&points), Coefficients::ZERO);
    }

    #[test]
    fn two_distinct_doses_are_singular() {
        let points = pts(&[(2.0, 1.0), (2.0, 3.0), (4.0, 5.0), (4.0, 7.0)]);
        assert_eq!(fit(&points), Coefficients::ZERO);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let points = seed_points();
        let first = fit(&points);
        let second = fit(&points);
        assert_eq!(first.a.to_bits(), second.a.to_bits());
        assert_eq!(first.b.to_bits(), second.b.to_bits());
        assert_eq!(first.c.to_bits(), second.c.to_bits());
    }

    #[test]
    fn permutation_does_not_change_result() {
        let points = seed_points();
        let mut reversed = points.clone();
        reversed.reverse();
        let mut rotated = points.clone();
        rotated.rotate_left(3);

        let base = fit(&points);
        assert_close(fit(&reversed), base, 1e-9);
        assert_close(fit(&rotated), base, 1e-9);
    }

    #[test]
    fn matches_svd_least_squares_on_design_matrix() {
        let points = seed_points();
        let rows: Vec<f64> = points.iter().flat_map(|p| [p.x * p.x, p.x, 1.0]).collect();
        let x = DMatrix::from_row_slice(points.len(), 3, &rows);
        let y = DVector::from_iterator(points.len(), points.iter().map(|p| p.y));
        let beta = x.svd(true, true).solve(&y, 1e-12).unwrap();

        assert_close(fit(&points), Coefficients::new(beta[0], beta[1], beta[2]), 1e-6);
    }

    #[test]
    fn seed_set_has_trough_between_26_and_32() {
        let coeffs = fit(&seed_points());
        assert!(coeffs.a > 0.0, "seed fit should open upward: {coeffs:?}");

        let (x_min, _) = (0..=200)
            .map(|i| 20.0 + i as f64 * 0.1)
            .map(|x| (x, evaluate(&coeffs, x)))
            .fold((f64::NAN, f64::INFINITY), |best, (x, y)| if y < best.1 { (x, y) } else { best });

        assert!((26.0..=32.0).contains(&x_min), "minimum at x={x_min}");
    }

    #[test]
    fn power_sums_follow_input_order() {
        let sums = PowerSums::accumulate(&pts(&[(1.0, 2.0), (2.0, 3.0)]));
        assert_eq!(sums.n, 2.0);
        assert_eq!(sums.sx, 3.0);
        assert_eq!(sums.sx2, 5.0);
        assert_eq!(sums.sx3, 9.0);
        assert_eq!(sums.sx4, 17.0);
        assert_eq!(sums.sy, 5.0);
        assert_eq!(sums.sxy, 8.0);
        assert_eq!(sums.sx2y, 14.0);
    }
}
