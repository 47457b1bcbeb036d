//! Plotters-powered dose-response chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct DoseChart<'a> {
    /// Line series for the current model curve.
    pub curve: &'a [(f64, f64)],
    /// Scatter series for the training points.
    pub points: &'a [(f64, f64)],
    /// Prediction marker `(dose, response)`, drawn as a drop line to the x axis.
    pub prediction: Option<(f64, f64)>,
    /// X bounds (dose, mg).
    pub x_bounds: [f64; 2],
    /// Y bounds (response, mmHg).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for DoseChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are noise at terminal resolution; axes are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let curve_color = RGBColor(0, 255, 255);
            let points_color = RGBColor(255, 64, 64);
            let marker_color = RGBColor(255, 255, 0);

            // Samples outside the viewport would be drawn past the axes.
            for run in visible_runs(self.curve, y0, y1) {
                chart.draw_series(LineSeries::new(run.iter().copied(), &curve_color))?;
            }

            // `Circle` radii are mis-scaled by the ratatui backend; a pixel reads as a dot.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), points_color)),
            )?;

            if let Some((x, y)) = self.prediction {
                let y = y.clamp(y0, y1);
                chart.draw_series(LineSeries::new([(x, y0), (x, y)], &marker_color))?;
                chart.draw_series(std::iter::once(Pixel::new((x, y), marker_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Split a sampled curve into maximal runs of consecutive samples inside `[y0, y1]`.
///
/// Each run is drawn as its own line, so a curve that leaves the viewport and
/// comes back is not bridged across the gap.
fn visible_runs(curve: &[(f64, f64)], y0: f64, y1: f64) -> Vec<&[(f64, f64)]> {
    curve
        .split(|&(_, y)| !(y >= y0 && y <= y1))
        .filter(|run| !run.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parabola(vertex_y: f64) -> Vec<(f64, f64)> {
        (0..=10)
            .map(|i| {
                let x = i as f64;
                (x, 4.0 * (x - 5.0).powi(2) + vertex_y)
            })
            .collect()
    }

    #[test]
    fn curve_inside_viewport_is_one_run() {
        let curve = parabola(10.0);
        let runs = visible_runs(&curve, 0.0, 200.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), curve.len());
    }

    #[test]
    fn dip_below_viewport_splits_the_curve() {
        // y = 4(x-5)^2 - 50 is below 0 for x in 2..=8.
        let curve = parabola(-50.0);
        let runs = visible_runs(&curve, 0.0, 200.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].last().map(|p| p.0), Some(1.0));
        assert_eq!(runs[1].first().map(|p| p.0), Some(9.0));
    }

    #[test]
    fn curve_outside_viewport_has_no_runs() {
        assert!(visible_runs(&parabola(500.0), 0.0, 200.0).is_empty());
        assert!(visible_runs(&[(0.0, f64::NAN)], 0.0, 200.0).is_empty());
    }
}
