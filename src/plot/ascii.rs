//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - aggregated series: `-` line
//! - events at their own date and value: `W` (warning), `A` (alarm, drawn last)

use chrono::NaiveDate;

use crate::aggregate::ChartView;
use crate::calendar;
use crate::domain::{DateRange, Event, TimeSeriesPoint};

/// Render a chart view: series line plus event markers over the view's range.
pub fn render_ascii_plot(view: &ChartView, width: usize, height: usize) -> String {
    render_plot(
        &view.series,
        &view.events.warnings,
        &view.events.alarms,
        view.request.range,
        width,
        height,
    )
}

fn render_plot(
    series: &[TimeSeriesPoint],
    warnings: &[Event],
    alarms: &[Event],
    range: DateRange,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let values = series
        .iter()
        .map(|p| p.probability)
        .chain(warnings.iter().chain(alarms).map(|e| e.value));
    let Some((y_min, y_max)) = y_range(values) else {
        return format!("Plot: {} .. {} | no data\n", range.start, range.end);
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let y_min = y_min.max(0.0);

    let t_max = (calendar::days_between(range.start, range.end) as f64).max(1.0);
    let x_of = |date: NaiveDate| calendar::days_between(range.start, date) as f64;

    let mut grid = vec![vec![' '; width]; height];

    // Line first, so markers overlay it.
    let curve: Vec<(f64, f64)> = series.iter().map(|p| (x_of(p.date), p.probability)).collect();
    draw_curve(&mut grid, &curve, t_max, y_min, y_max);

    for (events, ch) in [(warnings, 'W'), (alarms, 'A')] {
        for e in events {
            let x = map_x(x_of(e.date), t_max, width);
            let y = map_y(e.value, y_min, y_max, height);
            grid[y][x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} .. {} | p=[{y_min:.4}, {y_max:.4}]\n",
        range.start, range.end
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for y in values {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: open a small band around it.
        Some((min_y - 0.01, max_y + 0.01))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid.first().map_or(0, |row| row.len());
    if width == 0 {
        return;
    }

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
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
