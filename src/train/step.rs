//! Exponential interpolation toward a fitted target.
//!
//! Each tick closes a fixed fraction `K` of the remaining gap for every
//! coefficient:
//!
//! ```text
//! next = current + (target - current) * K
//! ```
//!
//! Convergence is declared when every coefficient is within its own tolerance
//! of the target. The tolerances are scaled to the typical magnitude of each
//! coefficient (`a` is a small curvature, `c` a large intercept) so the three
//! settle in a comparable number of ticks.

use crate::domain::Coefficients;
use crate::error::AppError;

/// Fraction of the remaining gap closed per tick.
pub const DEFAULT_RATE: f64 = 0.05;
pub const DEFAULT_TOL_A: f64 = 1e-4;
pub const DEFAULT_TOL_B: f64 = 1e-3;
pub const DEFAULT_TOL_C: f64 = 1e-2;

/// Interpolation rate and per-coefficient convergence tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub rate: f64,
    pub tol_a: f64,
    pub tol_b: f64,
    pub tol_c: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            tol_a: DEFAULT_TOL_A,
            tol_b: DEFAULT_TOL_B,
            tol_c: DEFAULT_TOL_C,
        }
    }
}

impl Rates {
    /// Build a validated set of rates.
    ///
    /// `rate` must lie in `(0, 1]` and every tolerance must be finite and `> 0`;
    /// otherwise the loop could never converge.
    pub fn new(rate: f64, tol_a: f64, tol_b: f64, tol_c: f64) -> Result<Self, AppError> {
        if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
            return Err(AppError::input(format!(
                "Invalid interpolation rate {rate} (must be in (0, 1])."
            )));
        }
        for (name, tol) in [("a", tol_a), ("b", tol_b), ("c", tol_c)] {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(AppError::input(format!(
                    "Invalid tolerance for {name}: {tol} (must be finite and > 0)."
                )));
            }
        }
        Ok(Self {
            rate,
            tol_a,
            tol_b,
            tol_c,
        })
    }

    /// True when every coefficient of `current` is within tolerance of `target`.
    pub fn within(&self, current: &Coefficients, target: &Coefficients) -> bool {
        (target.a - current.a).abs() < self.tol_a
            && (target.b - current.b).abs() < self.tol_b
            && (target.c - current.c).abs() < self.tol_c
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next: Coefficients,
    pub done: bool,
}

/// One tick with the default rate and tolerances.
pub fn step(current: Coefficients, target: Coefficients) -> Step {
    step_with(current, target, &Rates::default())
}

/// One tick with explicit rates. `done` is measured after the move.
pub fn step_with(current: Coefficients, target: Coefficients, rates: &Rates) -> Step {
    let k = rates.rate;
    let next = Coefficients {
        a: current.a + (target.a - current.a) * k,
        b: current.b + (target.b - current.b) * k,
        c: current.c + (target.c - current.c) * k,
    };
    Step {
        done: rates.within(&next, &target),
        next,
    }
}

/// Analytic upper bound on the ticks needed to converge from `current`.
///
/// A gap `g` shrinks to `g·(1-K)ⁿ` after `n` ticks, so each coefficient needs the
/// smallest `n` with `g·(1-K)ⁿ < tol`. Coefficients already inside tolerance
/// contribute nothing; the first tick always counts.
pub fn ticks_bound(current: &Coefficients, target: &Coefficients, rates: &Rates) -> u64 {
    if rates.rate >= 1.0 {
        return 1;
    }
    let shrink = (1.0 - rates.rate).ln();
    let gaps = [
        ((target.a - current.a).abs(), rates.tol_a),
        ((target.b - current.b).abs(), rates.tol_b),
        ((target.c - current.c).abs(), rates.tol_c),
    ];

    gaps.iter()
        .map(|&(gap, tol)| {
            if gap < tol {
                1
            } else {
                ((tol / gap).ln() / shrink).floor() as u64 + 1
            }
        })
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_closes_five_percent_of_gap() {
        let s = step(Coefficients::new(0.0, 0.0, 160.0), Coefficients::new(1.0, -10.0, 100.0));
        assert!((s.next.a - 0.05).abs() < 1e-15);
        assert!((s.next.b + 0.5).abs() < 1e-15);
        assert!((s.next.c - 157.0).abs() < 1e-12);
        assert!(!s.done);
    }

    #[test]
    fn equal_current_and_target_is_done_immediately() {
        let c = Coefficients::new(0.3, -2.0, 140.0);
        let s = step(c, c);
        assert!(s.done);
        assert_eq!(s.next, c);
    }

    #[test]
    fn gaps_shrink_monotonically_until_done() {
        let target = Coefficients::new(0.0857, -4.84, 178.1);
        let mut current = Coefficients::BASELINE;
        let bound = ticks_bound(&current, &target, &Rates::default());

        let mut ticks = 0u64;
        loop {
            let before = [
                (target.a - current.a).abs(),
                (target.b - current.b).abs(),
                (target.c - current.c).abs(),
            ];
            let s = step(current, target);
            let after = [
                (target.a - s.next.a).abs(),
                (target.b - s.next.b).abs(),
                (target.c - s.next.c).abs(),
            ];
            for i in 0..3 {
                assert!(after[i] < before[i] || before[i] == 0.0);
            }
            current = s.next;
            ticks += 1;
            if s.done {
                break;
            }
            assert!(ticks <= bound + 1, "exceeded analytic bound {bound}");
        }
        assert!(ticks <= bound + 1);
        assert!(ticks > 100, "default pacing should take a visible number of ticks");
    }

    #[test]
    fn residual_keeps_shrinking_after_done() {
        let target = Coefficients::new(0.1, -5.0, 180.0);
        let mut current = Coefficients::BASELINE;
        loop {
            let s = step(current, target);
            current = s.next;
            if s.done {
                break;
            }
        }
        let gap_c = (target.c - current.c).abs();
        let again = step(current, target);
        assert!(again.done);
        assert!((target.c - again.next.c).abs() < gap_c);
        assert!((target.c - current.c).abs() < DEFAULT_TOL_C);
    }

    #[test]
    fn custom_rate_converges_faster() {
        let fast = Rates::new(0.5, 1e-4, 1e-3, 1e-2).unwrap();
        let target = Coefficients::new(0.1, -5.0, 180.0);
        assert!(ticks_bound(&Coefficients::BASELINE, &target, &fast) < 30);
        assert!(
            ticks_bound(&Coefficients::BASELINE, &target, &fast)
                < ticks_bound(&Coefficients::BASELINE, &target, &Rates::default())
        );
    }

    #[test]
    fn rates_validation() {
        assert!(Rates::new(0.0, 1e-4, 1e-3, 1e-2).is_err());
        assert!(Rates::new(1.5, 1e-4, 1e-3, 1e-2).is_err());
        assert!(Rates::new(0.05, 0.0, 1e-3, 1e-2).is_err());
        assert!(Rates::new(0.05, 1e-4, f64::NAN, 1e-2).is_err());
        assert_eq!(Rates::new(0.05, 1e-4, 1e-3, 1e-2).unwrap(), Rates::default());
    }

    #[test]
    fn full_rate_jumps_to_target() {
        let rates = Rates::new(1.0, 1e-4, 1e-3, 1e-2).unwrap();
        let target = Coefficients::new(0.2, 3.0, 90.0);
        let s = step_with(Coefficients::BASELINE, target, &rates);
        assert!(s.done);
        assert_eq!(ticks_bound(&Coefficients::BASELINE, &target, &rates), 1);
    }
}
