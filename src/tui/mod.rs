//! Ratatui-based terminal UI.
//!
//! The TUI loads a generated dataset once and lets the user pick a turbine,
//! component, range preset and granularity. Every change re-aggregates the
//! in-memory series and redraws the chart and event list. Data problems are
//! shown in the status line; only terminal failures end the session.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::aggregate::{ChartView, ViewRequest};
use crate::app::pipeline::{DEFAULT_PRESET, Dataset};
use crate::calendar;
use crate::domain::{DEFAULT_VIEW_COMPONENT, Granularity, RangePreset, component_key};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::RiskPlottersChart;

/// Start the TUI on the dataset in `dir`.
pub fn run(dir: PathBuf) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dir);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

const FIELD_TURBINE: usize = 0;
const FIELD_COMPONENT: usize = 1;
const FIELD_PRESET: usize = 2;
const FIELD_GRANULARITY: usize = 3;
const FIELD_COUNT: usize = 4;

struct App {
    dir: PathBuf,
    dataset: Option<Dataset>,
    turbine_idx: usize,
    component_idx: usize,
    preset: RangePreset,
    granularity: Granularity,
    selected_field: usize,
    status: String,
    view: Option<ChartView>,
}

impl App {
    fn new(dir: PathBuf) -> Self {
        let mut app = Self {
            dir,
            dataset: None,
            turbine_idx: 0,
            component_idx: 0,
            preset: DEFAULT_PRESET,
            granularity: DEFAULT_PRESET.default_granularity(),
            selected_field: 0,
            status: String::new(),
            view: None,
        };
        app.reload();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('g') => {
                self.granularity = self.granularity.next();
                self.rebuild_view();
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: isize) {
        let Some(dataset) = &self.dataset else {
            self.status = "No dataset loaded (r to retry).".to_string();
            return;
        };
        match self.selected_field {
            FIELD_TURBINE => {
                self.turbine_idx = step_index(self.turbine_idx, dataset.metadata.turbine_ids.len(), delta);
            }
            FIELD_COMPONENT => {
                self.component_idx = step_index(self.component_idx, dataset.metadata.components.len(), delta);
            }
            FIELD_PRESET => {
                self.preset = if delta >= 0 { self.preset.next() } else { self.preset.prev() };
                // A preset brings its own granularity, like the quick-range buttons.
                self.granularity = self.preset.default_granularity();
            }
            FIELD_GRANULARITY => {
                self.granularity = if delta >= 0 {
                    self.granularity.next()
                } else {
                    self.granularity.prev()
                };
            }
            _ => {}
        }
        self.rebuild_view();
    }

    /// (Re)load the dataset from disk, keeping the selection where possible.
    fn reload(&mut self) {
        match Dataset::load(&self.dir) {
            Ok(dataset) => {
                let meta = &dataset.metadata;
                if self.dataset.is_none() {
                    self.component_idx = meta
                        .components
                        .iter()
                        .position(|c| component_key(c) == component_key(DEFAULT_VIEW_COMPONENT))
                        .unwrap_or(0);
                }
                self.turbine_idx = self.turbine_idx.min(meta.turbine_ids.len().saturating_sub(1));
                self.component_idx = self.component_idx.min(meta.components.len().saturating_sub(1));
                let loaded = format!(
                    "Loaded {} ({} .. {}, {} events)",
                    self.dir.display(),
                    meta.start_date,
                    meta.end_date,
                    dataset.events.len()
                );
                self.dataset = Some(dataset);
                self.rebuild_view();
                if self.view.as_ref().is_some_and(|v| !v.series.is_empty()) {
                    self.status = loaded;
                }
            }
            Err(err) => {
                self.dataset = None;
                self.view = None;
                self.status = err.to_string();
            }
        }
    }

    fn current_request(&self) -> Option<ViewRequest> {
        let dataset = self.dataset.as_ref()?;
        let meta = &dataset.metadata;
        let turbine_id = *meta.turbine_ids.get(self.turbine_idx)?;
        let component = component_key(meta.components.get(self.component_idx)?);
        Some(ViewRequest {
            turbine_id,
            component,
            range: self.preset.resolve(meta),
            granularity: self.granularity,
        })
    }

    fn rebuild_view(&mut self) {
        let (Some(dataset), Some(request)) = (&self.dataset, self.current_request()) else {
            self.view = None;
            return;
        };
        let view = dataset.view(&request);
        self.status = if view.series.is_empty() {
            format!("No data for turbine {} {}", request.turbine_id, request.component)
        } else {
            format!(
                "Turbine {} {}: {} points, {} events",
                request.turbine_id,
                request.component,
                view.series.len(),
                view.events.len()
            )
        };
        self.view = Some(view);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("trisk", Style::default().fg(Color::Cyan)),
            Span::raw(" - turbine fault risk"),
        ]));

        let detail = match &self.view {
            Some(view) => {
                let r = &view.request;
                let summary = view
                    .summary()
                    .map(|s| format!("n={} max={:.4} mean={:.4}", s.n_points, s.max, s.mean))
                    .unwrap_or_else(|| "no data".to_string());
                format!(
                    "turbine: {} | component: {} | {} .. {} | {} | {summary}",
                    r.turbine_id,
                    r.component,
                    r.range.start,
                    r.range.end,
                    r.granularity.display_name()
                )
            }
            None => format!("dataset: {}", self.dir.display()),
        };
        lines.push(Line::from(Span::styled(detail, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_chart(frame, columns[0]);
        self.draw_settings(frame, side[0]);
        self.draw_events(frame, side[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Fault probability").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = &self.view else {
            let msg = Paragraph::new("No dataset loaded. Run `trisk generate`, then press r.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let data = chart_series(view);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = RiskPlottersChart {
            line: &data.line,
            warnings: &data.warnings,
            alarms: &data.alarms,
            x_origin: data.origin,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, data.origin, data.x_bounds, data.y_bounds);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (turbine, component) = match &self.dataset {
            Some(d) => (
                d.metadata
                    .turbine_ids
                    .get(self.turbine_idx)
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                d.metadata
                    .components
                    .get(self.component_idx)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        let items = vec![
            ListItem::new(format!("Turbine: {turbine}")),
            ListItem::new(format!("Component: {component}")),
            ListItem::new(format!("Range: {}", self.preset.display_name())),
            ListItem::new(format!("Granularity: {}", self.granularity.display_name())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_events(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        let mut title = "Events".to_string();
        if let Some(view) = &self.view {
            title = format!(
                "Events ({} A / {} W)",
                view.events.alarms.len(),
                view.events.warnings.len()
            );
            let alarm = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
            let warning = Style::default().fg(Color::Yellow);
            for (events, tag, style) in [(&view.events.alarms, "A", alarm), (&view.events.warnings, "W", warning)] {
                for e in events.iter() {
                    items.push(ListItem::new(Line::from(vec![
                        Span::styled(tag, style),
                        Span::raw(format!(" {} {:.4}", e.date, e.value)),
                    ])));
                }
            }
        }
        if items.is_empty() {
            items.push(ListItem::new(Span::styled("(none)", Style::default().fg(Color::Gray))));
        }

        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  g granularity  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn step_index(current: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

/// Chart-ready series: x is days since `origin` (the range start).
#[derive(Debug, Clone, PartialEq)]
struct ChartData {
    line: Vec<(f64, f64)>,
    warnings: Vec<(f64, f64)>,
    alarms: Vec<(f64, f64)>,
    origin: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(view: &ChartView) -> ChartData {
    let range = view.request.range;
    let origin = range.start;
    let x_of = |date: NaiveDate| calendar::days_between(origin, date) as f64;

    let line: Vec<(f64, f64)> = view.series.iter().map(|p| (x_of(p.date), p.probability)).collect();
    let warnings: Vec<(f64, f64)> = view.events.warnings.iter().map(|e| (x_of(e.date), e.value)).collect();
    let alarms: Vec<(f64, f64)> = view.events.alarms.iter().map(|e| (x_of(e.date), e.value)).collect();

    let x_bounds = [0.0, (calendar::days_between(range.start, range.end) as f64).max(1.0)];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in line.iter().chain(&warnings).chain(&alarms) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = y_max.max(0.0) + 0.1;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [(y_min - pad).max(0.0), y_max + pad];

    ChartData {
        line,
        warnings,
        alarms,
        origin,
        x_bounds,
        y_bounds,
    }
}

fn fmt_day_offset(origin: NaiveDate, days: f64) -> String {
    match calendar::add_days(origin, days.max(0.0).round() as u64) {
        Some(date) => date.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 7,
        right: 6,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    origin: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 4usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_day_offset(origin, x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 || start + label_len > inner.x + inner.width {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("p(fault)")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1).max(8),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
