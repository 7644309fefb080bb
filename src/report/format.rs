//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - synthesis and aggregation code stays free of presentation
//! - output changes are localized (and covered by the tests below)

use crate::aggregate::{ChartView, EventSplit};
use crate::app::check::CheckReport;
use crate::app::pipeline::GenerationSummary;
use crate::domain::{Event, TimeSeriesPoint};

/// One-line result of a `generate` run, followed by where it went.
pub fn format_generation_summary(summary: &GenerationSummary) -> String {
    let meta = &summary.metadata;
    let mut out = String::new();
    out.push_str(&format!(
        "Generated data for {} turbines and {} components over {} days\n",
        meta.turbine_ids.len(),
        meta.components.len(),
        meta.total_days
    ));
    out.push_str(&format!("Window: {} .. {} (end exclusive)\n", meta.start_date, meta.end_date));
    out.push_str(&format!(
        "Events: {} alarms, {} warnings\n",
        summary.alarms, summary.warnings
    ));
    out.push_str(&format!("Output: {}\n", summary.out_dir.display()));
    out
}

/// Header block for a chart view.
pub fn format_view_summary(view: &ChartView) -> String {
    let r = &view.request;
    let mut out = String::new();

    out.push_str("=== trisk - Fault risk view ===\n");
    out.push_str(&format!("Turbine: {} | Component: {}\n", r.turbine_id, r.component));
    out.push_str(&format!(
        "Range: {} .. {} | Granularity: {}\n",
        r.range.start,
        r.range.end,
        r.granularity.display_name()
    ));
    match view.summary() {
        Some(s) => out.push_str(&format!(
            "Points: n={} (from {} daily) | p=[{:.4}, {:.4}] mean={:.4}\n",
            s.n_points, view.raw_points, s.min, s.max, s.mean
        )),
        None => out.push_str("Points: no data for this selection\n"),
    }
    out.push_str(&format!(
        "Events: {} alarms, {} warnings\n",
        view.events.alarms.len(),
        view.events.warnings.len()
    ));
    out
}

/// Aggregated series as a two-column table.
pub fn format_series_table(series: &[TimeSeriesPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>11}\n", "date", "probability"));
    out.push_str(&format!("{:-<10} {:-<11}\n", "", ""));
    for p in series {
        out.push_str(&format!("{:<10} {:>11.4}\n", p.date, p.probability));
    }
    out
}

/// Alarms first, then warnings, each sorted by date.
pub fn format_events(events: &EventSplit) -> String {
    let mut out = String::new();

    out.push_str(&format!("Alarms ({}):\n", events.alarms.len()));
    out.push_str(&format_event_table(&events.alarms));
    out.push('\n');

    out.push_str(&format!("Warnings ({}):\n", events.warnings.len()));
    out.push_str(&format_event_table(&events.warnings));

    out
}

fn format_event_table(rows: &[Event]) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>7} {:<14} {:>6}\n", "date", "turbine", "component", "value"));
    out.push_str(&format!("{:-<10} {:-<7} {:-<14} {:-<6}\n", "", "", "", ""));
    for e in rows {
        out.push_str(&format!(
            "{:<10} {:>7} {:<14} {:>6.4}\n",
            e.date,
            e.turbine_id,
            truncate(&e.component, 14),
            e.value
        ));
    }
    out
}

pub fn format_check_report(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Checked {} turbines, {} series ({} points), {} events\n",
        report.turbines, report.series, report.points, report.events
    ));
    if report.is_ok() {
        out.push_str("OK\n");
        return out;
    }
    out.push_str(&format!("{} problems:\n", report.problems.len()));
    for p in &report.problems {
        out.push_str(&format!("- {p}\n"));
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
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use crate::domain::{EventKind, Metadata};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn generation_summary_leads_with_counts() {
        let summary = GenerationSummary {
            out_dir: PathBuf::from("data/simulated"),
            metadata: Metadata {
                start_date: d(2015, 6, 10),
                end_date: d(2025, 6, 10),
                total_days: 3653,
                components: vec!["Tower".to_string(); 9],
                turbine_ids: vec![1, 2, 3, 4],
            },
            alarms: 12,
            warnings: 30,
        };
        let text = format_generation_summary(&summary);
        assert!(text.starts_with("Generated data for 4 turbines and 9 components over 3653 days\n"));
        assert!(text.contains("12 alarms, 30 warnings"));
    }

    #[test]
    fn event_tables() {
        let split = EventSplit {
            alarms: vec![Event {
                date: d(2024, 3, 5),
                value: 0.97,
                kind: EventKind::Alarm,
                component: "Transmission".to_string(),
                turbine_id: 4,
            }],
            warnings: Vec::new(),
        };
        let text = format_events(&split);
        assert!(text.contains("Alarms (1):"));
        assert!(text.contains("2024-03-05       4 Transmission   0.9700"));
        assert!(text.contains("Warnings (0):\n  (none)"));
    }

    #[test]
    fn series_table_rows() {
        let text = format_series_table(&[TimeSeriesPoint::new(d(2024, 1, 15), 0.5)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "2024-01-15      0.5000");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Transformer", 5), "Tran.");
        assert_eq!(truncate("Yaw", 5), "Yaw");
    }
}
