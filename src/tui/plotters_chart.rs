//! Plotters-powered fault-risk chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
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
/// All series and bounds are computed outside the render call; x values are
/// days since `x_origin`.
pub struct RiskPlottersChart<'a> {
    /// Aggregated probability series.
    pub line: &'a [(f64, f64)],
    pub warnings: &'a [(f64, f64)],
    pub alarms: &'a [(f64, f64)],
    pub x_origin: NaiveDate,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for RiskPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let origin = self.x_origin;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("fault probability")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| super::fmt_day_offset(origin, *v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let warning_color = RGBColor(255, 255, 0); // yellow
            let alarm_color = RGBColor(255, 0, 0); // red

            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            // `Circle` radii are mis-scaled by the ratatui backend; a colored
            // `Pixel` is the reliable marker. Alarms go last so they stay on top.
            chart.draw_series(
                self.warnings
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), warning_color)),
            )?;
            chart.draw_series(
                self.alarms
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), alarm_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
