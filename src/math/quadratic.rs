//! Evaluating and sampling a quadratic curve.

use crate::domain::Coefficients;

/// `a·x² + b·x + c`. No domain restriction on `x`.
pub fn evaluate(coeffs: &Coefficients, x: f64) -> f64 {
    coeffs.a * x * x + coeffs.b * x + coeffs.c
}

/// Stationary point `(x, y)` of the curve, or `None` for a straight line.
pub fn vertex(coeffs: &Coefficients) -> Option<(f64, f64)> {
    if coeffs.a == 0.0 {
        return None;
    }
    let x = -coeffs.b / (2.0 * coeffs.a);
    Some((x, evaluate(coeffs, x)))
}

/// `n` evenly spaced samples over `[x0, x1]` (endpoints included, `n >= 2`).
pub fn sample_curve(coeffs: &Coefficients, x0: f64, x1: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x0 + u * (x1 - x0);
            (x, evaluate(coeffs, x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_known_value() {
        let coeffs = Coefficients::new(2.0, -3.0, 5.0);
        assert_eq!(evaluate(&coeffs, 4.0), 25.0);
        assert_eq!(evaluate(&coeffs, 0.0), 5.0);
    }

    #[test]
    fn baseline_is_flat() {
        for x in [0.0, 12.5, 50.0, -3.0] {
            assert_eq!(evaluate(&Coefficients::BASELINE, x), 160.0);
        }
    }

    #[test]
    fn vertex_of_upward_parabola() {
        let (x, y) = vertex(&Coefficients::new(1.0, -6.0, 10.0)).unwrap();
        assert!((x - 3.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        assert!(vertex(&Coefficients::new(0.0, 2.0, 1.0)).is_none());
    }

    #[test]
    fn sample_curve_includes_endpoints() {
        let samples = sample_curve(&Coefficients::new(0.0, 1.0, 0.0), 0.0, 55.0, 56);
        assert_eq!(samples.len(), 56);
        assert_eq!(samples[0], (0.0, 0.0));
        assert_eq!(samples[55], (55.0, 55.0));
        assert_eq!(sample_curve(&Coefficients::ZERO, 0.0, 1.0, 0).len(), 2);
    }
}
