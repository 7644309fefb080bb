//! Export a chart view to CSV.
//!
//! One row per displayed point, with the number of alarms/warnings dated inside
//! that point's bucket (or on that day, for daily views).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::aggregate::{ChartView, bucket_key, display_date};
use crate::domain::{Event, Granularity, TimeSeriesPoint};
use crate::error::AppError;

pub fn write_view_csv(path: &Path, view: &ChartView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "turbine_id,component,granularity,date,probability,alarms,warnings")
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    let request = &view.request;
    for point in &view.series {
        writeln!(
            out,
            "{},{},{},{},{:.4},{},{}",
            request.turbine_id,
            csv_field(&request.component),
            request.granularity.display_name(),
            point.date,
            point.probability,
            count_in_bucket(&view.events.alarms, point, request.granularity),
            count_in_bucket(&view.events.warnings, point, request.granularity),
        )
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Quote a free-text field when it would otherwise break the row.
fn csv_field(raw: &str) -> std::borrow::Cow<'_, str> {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\"")).into()
    } else {
        raw.into()
    }
}

fn count_in_bucket(events: &[Event], point: &TimeSeriesPoint, granularity: Granularity) -> usize {
    events
        .iter()
        .filter(|e| {
            let anchor = match bucket_key(e.date, granularity) {
                Some(key) => display_date(key, granularity),
                None => Some(e.date),
            };
            anchor == Some(point.date)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::aggregate::{EventSplit, ViewRequest};
    use crate::domain::{DateRange, EventKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn csv_rows_carry_event_counts() {
        let alarm = Event {
            date: d(2024, 3, 20),
            value: 0.97,
            kind: EventKind::Alarm,
            component: "Tower".to_string(),
            turbine_id: 1,
        };
        let view = ChartView {
            request: ViewRequest {
                turbine_id: 1,
                component: "tower".to_string(),
                range: DateRange::new(d(2024, 1, 1), d(2024, 4, 30)),
                granularity: Granularity::Month,
            },
            series: vec![
                TimeSeriesPoint::new(d(2024, 2, 15), 0.02),
                TimeSeriesPoint::new(d(2024, 3, 15), 0.31),
            ],
            events: EventSplit {
                alarms: vec![alarm],
                warnings: Vec::new(),
            },
            raw_points: 60,
        };

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("view.csv");
        write_view_csv(&path, &view).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,tower,month,2024-02-15,0.0200,0,0");
        assert_eq!(lines[2], "1,tower,month,2024-03-15,0.3100,1,0");
    }

    #[test]
    fn component_with_delimiters_is_quoted() {
        let view = ChartView {
            request: ViewRequest {
                turbine_id: 3,
                component: "gear, \"main\"".to_string(),
                range: DateRange::new(d(2024, 1, 1), d(2024, 1, 1)),
                granularity: Granularity::Day,
            },
            series: vec![TimeSeriesPoint::new(d(2024, 1, 1), 0.5)],
            events: EventSplit::default(),
            raw_points: 1,
        };

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("view.csv");
        write_view_csv(&path, &view).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("3,\"gear, \"\"main\"\"\",day,2024-01-01,0.5000,0,0")
        );
        assert_eq!(csv_field("tower"), "tower");
    }
}
