//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - optional prediction marker: `X`

use crate::domain::{CHART_X, Coefficients, CurveFile, DataPoint};
use crate::math::{evaluate, sample_curve};

/// Render points and the curve over the chart's dose range.
pub fn render_ascii_plot(
    points: &[DataPoint],
    coeffs: &Coefficients,
    width: usize,
    height: usize,
    prediction: Option<f64>,
) -> String {
    let (x_min, x_max) = (CHART_X[0], CHART_X[1]);
    let curve = sample_curve(coeffs, x_min, x_max, width.max(2));
    let marker = prediction.map(|x| (x, evaluate(coeffs, x)));
    render_plot(points, &curve, x_min, x_max, width, height, marker)
}

/// Render a plot from a saved curve JSON file (curve only, no overlay points).
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let (x_min, x_max) = dose_range(&curve.grid.dose).unwrap_or((CHART_X[0], CHART_X[1]));
    let curve_points: Vec<(f64, f64)> = curve
        .grid
        .dose
        .iter()
        .zip(curve.grid.response.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    render_plot(&[], &curve_points, x_min, x_max, width, height, None)
}

fn render_plot(
    points: &[DataPoint],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
    marker: Option<(f64, f64)>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // Determine y-range from observed points and curve points.
    let (y_min, y_max) = y_range(points, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for p in points {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    if let Some((mx, my)) = marker {
        let x = map_x(mx, x_min, x_max, width);
        let y = map_y(my, y_min, y_max, height);
        grid[y][x] = 'X';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dose=[{x_min:.1}, {x_max:.1}] mg | response=[{y_min:.2}, {y_max:.2}] mmHg\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn dose_range(doses: &[f64]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &x in doses {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(points: &[DataPoint], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && min_y == max_y {
        // Flat curve with no spread (e.g. the untrained baseline).
        Some((min_y - 1.0, max_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, gx, gy, '-');
        } else {
            grid[gy][gx] = '-';
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveGrid, FitQuality};

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![DataPoint::new("p1", 0.0, 100.0), DataPoint::new("p2", 55.0, 110.0)];
        let txt = render_ascii_plot(&points, &Coefficients::new(0.0, 0.0, 100.0), 10, 5, None);
        let expected = concat!(
            "Plot: dose=[0.0, 55.0] mg | response=[99.50, 110.50] mmHg\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn prediction_marker_overrides_curve() {
        let points = vec![DataPoint::new("p1", 0.0, 100.0), DataPoint::new("p2", 55.0, 110.0)];
        let txt = render_ascii_plot(&points, &Coefficients::new(0.0, 0.0, 100.0), 12, 5, Some(27.5));
        let last = txt.lines().last().unwrap();
        assert_eq!(last.chars().filter(|&c| c == 'X').count(), 1);
    }

    #[test]
    fn flat_baseline_still_renders() {
        let txt = render_ascii_plot(&[], &Coefficients::BASELINE, 20, 6, None);
        assert_eq!(txt.lines().count(), 7);
        assert!(txt.contains("--------------------"));
    }

    #[test]
    fn curve_file_plot_uses_grid_range() {
        let curve = CurveFile {
            tool: "dosefit".to_string(),
            generated: chrono::Local::now(),
            coefficients: Coefficients::new(0.0, 1.0, 0.0),
            fit_quality: FitQuality { sse: 0.0, rmse: 0.0, r_squared: None, n: 0 },
            grid: CurveGrid {
                dose: vec![10.0, 20.0, 30.0],
                response: vec![10.0, 20.0, 30.0],
            },
        };
        let txt = render_ascii_plot_from_curve_file(&curve, 10, 5);
        assert!(txt.starts_with("Plot: dose=[10.0, 30.0] mg"));
    }
}
