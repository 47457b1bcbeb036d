//! Formatted terminal output: the model formula, fit summaries, point tables.
//!
//! We keep formatting code in one place so:
//! - the math/training code stays free of presentation
//! - output changes are localized (important for snapshot tests)

use crate::domain::{Coefficients, DatasetStats, FitQuality, PointResidual};
use crate::i18n::Strings;

/// Magnitude of a coefficient as shown in the formula.
///
/// Tiny values switch to scientific notation so a coefficient that is still
/// moving during training never displays as a misleading `0.000`.
pub fn format_coefficient(v: f64) -> String {
    let abs = v.abs();
    if abs < 0.001 {
        // Exponent always carries a sign: `0.00e+0`, `1.23e-4`.
        let sci = format!("{abs:.2e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    } else {
        format!("{abs:.3}")
    }
}

/// Sign and magnitude of each term, in `a, b, c` order.
///
/// The leading `a` term carries no `+`; the others always show a sign.
pub fn formula_terms(coeffs: &Coefficients) -> [(&'static str, String); 3] {
    let sign = |v: f64, positive: &'static str| if v < 0.0 { "-" } else { positive };
    [
        (sign(coeffs.a, ""), format_coefficient(coeffs.a)),
        (sign(coeffs.b, "+"), format_coefficient(coeffs.b)),
        (sign(coeffs.c, "+"), format_coefficient(coeffs.c)),
    ]
}

/// `y = 0.086x² - 4.845x + 178.122`
pub fn format_formula(coeffs: &Coefficients) -> String {
    let [(sa, a), (sb, b), (sc, c)] = formula_terms(coeffs);
    format!("y = {sa}{a}x² {sb} {b}x {sc} {c}")
}

/// Predicted response as displayed: clamped at zero, one decimal.
pub fn format_response(y: f64) -> String {
    format!("{:.1}", y.max(0.0))
}

pub fn format_prediction(strings: &Strings, dose: f64, predicted: f64) -> String {
    format!(
        "{} @ {dose} {}: {} {}",
        strings.output_label,
        strings.dose_unit,
        format_response(predicted),
        strings.response_unit
    )
}

pub fn format_quality(strings: &Strings, quality: &FitQuality) -> String {
    let r2 = quality
        .r_squared
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}: n={} SSE={:.3} RMSE={:.3}{} R²={r2}",
        strings.quality_title, quality.n, quality.sse, quality.rmse, strings.response_unit
    )
}

/// One progress line for the synchronous training loop.
pub fn format_training_line(tick: u64, coeffs: &Coefficients) -> String {
    format!("step {tick:>5}  {}", format_formula(coeffs))
}

/// Dataset stats + fitted formula + quality.
pub fn format_run_summary(
    strings: &Strings,
    stats: Option<&DatasetStats>,
    target: &Coefficients,
    quality: &FitQuality,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", strings.summary_title));
    match stats {
        Some(s) => out.push_str(&format!(
            "{}: n={} | {}=[{:.1}, {:.1}]{} | {}=[{:.1}, {:.1}]{}\n",
            strings.table_title,
            s.n_points,
            strings.col_dose,
            s.dose_min,
            s.dose_max,
            strings.dose_unit,
            strings.col_response,
            s.response_min,
            s.response_max,
            strings.response_unit,
        )),
        None => out.push_str(&format!("{}\n", strings.no_data)),
    }

    if target.is_zero() {
        out.push_str(&format!("{}\n", strings.need_points));
    }
    out.push_str(&format!("{}: {}\n", strings.formula_title, format_formula(target)));
    out.push_str(&format!(
        "  a={:.6} b={:.6} c={:.6}\n",
        target.a, target.b, target.c
    ));
    if let Some((x, y)) = crate::math::vertex(target) {
        out.push_str(&format!("  vertex: ({x:.2} {}, {y:.2} {})\n", strings.dose_unit, strings.response_unit));
    }
    out.push_str(&format_quality(strings, quality));
    out.push('\n');

    out
}

/// Per-point table with fitted values and residuals.
pub fn format_point_table(strings: &Strings, rows: &[PointResidual]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str(strings.no_data);
        out.push('\n');
        return out;
    }

    out.push_str(
        format!(
            "{:<4} {:<12} {:>8} {:>10} {:>10} {:>10}",
            strings.col_id, "id", strings.col_dose, strings.col_response, strings.col_fitted, strings.col_residual
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<4} {:-<12} {:-<8} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", ""
    ));

    for (i, r) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<12} {:>8.1} {:>10.1} {:>10.2} {:>10.2}\n",
            i + 1,
            truncate(&r.point.id, 12),
            r.point.x,
            r.point.y,
            r.fitted,
            r.residual,
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed_points;
    use crate::i18n::{Language, strings};
    use crate::math::fit;
    use crate::report::{compute_residuals, fit_quality};

    #[test]
    fn coefficient_switches_to_scientific_when_tiny() {
        assert_eq!(format_coefficient(0.0857), "0.086");
        assert_eq!(format_coefficient(-4.8446), "4.845");
        assert_eq!(format_coefficient(0.000123), "1.23e-4");
        assert_eq!(format_coefficient(0.0), "0.00e+0");
        assert_eq!(format_coefficient(-0.0009), "9.00e-4");
    }

    #[test]
    fn formula_for_seed_fit() {
        let coeffs = fit(&seed_points());
        assert_eq!(format_formula(&coeffs), "y = 0.086x² - 4.845x + 178.122");
    }

    #[test]
    fn formula_signs() {
        let coeffs = Coefficients::new(-2.0, 3.0, -5.0);
        assert_eq!(format_formula(&coeffs), "y = -2.000x² + 3.000x - 5.000");
        assert_eq!(
            format_formula(&Coefficients::BASELINE),
            "y = 0.00e+0x² + 0.00e+0x + 160.000"
        );
    }

    #[test]
    fn response_is_clamped_at_zero() {
        assert_eq!(format_response(-12.3), "0.0");
        assert_eq!(format_response(115.52), "115.5");
    }

    #[test]
    fn prediction_line_is_localized() {
        let en = format_prediction(strings(Language::En), 20.0, 115.52);
        assert_eq!(en, "Predicted blood pressure @ 20 mg: 115.5 mmHg");
        let zh = format_prediction(strings(Language::Zh), 20.0, 115.52);
        assert!(zh.starts_with("预测血压"));
    }

    #[test]
    fn summary_mentions_formula_and_quality() {
        let points = seed_points();
        let target = fit(&points);
        let quality = fit_quality(&points, &target);
        let stats = crate::data::PointSet::seeded().stats();
        let s = format_run_summary(strings(Language::En), stats.as_ref(), &target, &quality);
        assert!(s.contains("y = 0.086x² - 4.845x + 178.122"));
        assert!(s.contains("n=10"));
        assert!(s.contains("vertex: (28.26 mg"));
        assert!(s.contains("R²=0.9898"));
    }

    #[test]
    fn summary_warns_on_degenerate_fit() {
        let points = &seed_points()[..2];
        let target = fit(points);
        let quality = fit_quality(points, &target);
        let s = format_run_summary(strings(Language::En), None, &target, &quality);
        assert!(s.contains("At least 3 points"));
    }

    #[test]
    fn point_table_lists_every_row() {
        let points = seed_points();
        let rows = compute_residuals(&points, &fit(&points));
        let table = format_point_table(strings(Language::En), &rows);
        assert_eq!(table.lines().count(), 2 + points.len());
        assert!(table.contains("fixed-26"));
        assert_eq!(
            format_point_table(strings(Language::En), &[]),
            "No data points.\n"
        );
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
