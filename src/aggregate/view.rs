//! Chart views: one component of one turbine, sliced, aggregated and paired
//! with its events.

use crate::aggregate::filter::{EventFilter, EventSplit, filter_events};
use crate::aggregate::series::{aggregate, slice_range};
use crate::domain::{DateRange, Event, Granularity, TimeSeriesPoint, TurbineFile};

/// What a consumer asked to see.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub turbine_id: u32,
    pub component: String,
    pub range: DateRange,
    pub granularity: Granularity,
}

/// Ready-to-render data for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub request: ViewRequest,
    pub series: Vec<TimeSeriesPoint>,
    pub events: EventSplit,
    /// Daily points that fell inside the range, before aggregation.
    pub raw_points: usize,
}

impl ChartView {
    pub fn summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::of(&self.series)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub n_points: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesSummary {
    pub fn of(series: &[TimeSeriesPoint]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for p in series {
            min = min.min(p.probability);
            max = max.max(p.probability);
            sum += p.probability;
        }
        Some(Self {
            n_points: series.len(),
            min,
            max,
            mean: sum / series.len() as f64,
        })
    }
}

/// Build a view from loaded data.
///
/// A missing turbine file or component key is "no data": the series comes back
/// empty. Events are filtered independently, so markers survive even then.
pub fn build_view(turbine: Option<&TurbineFile>, events: &[Event], request: &ViewRequest) -> ChartView {
    let daily = match turbine.and_then(|t| t.component(&request.component)) {
        Some(series) => slice_range(series, request.range),
        None => {
            log::debug!(
                "no series for turbine {} component '{}'",
                request.turbine_id,
                request.component
            );
            Vec::new()
        }
    };

    let filter = EventFilter {
        range: request.range,
        turbine_id: Some(request.turbine_id),
        component: request.component.clone(),
    };

    ChartView {
        request: request.clone(),
        series: aggregate(&daily, request.granularity),
        events: filter_events(events, &filter),
        raw_points: daily.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{ComponentSeriesMap, EventKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn turbine() -> TurbineFile {
        let series: Vec<TimeSeriesPoint> = (0..60u64)
            .map(|i| TimeSeriesPoint::new(crate::calendar::add_days(d(2024, 1, 1), i).unwrap(), 0.25))
            .collect();
        let mut components = ComponentSeriesMap::new();
        components.insert("tower".to_string(), series);
        TurbineFile {
            turbine_id: 1,
            components,
        }
    }

    fn request(component: &str, granularity: Granularity) -> ViewRequest {
        ViewRequest {
            turbine_id: 1,
            component: component.to_string(),
            range: DateRange::new(d(2024, 1, 10), d(2024, 2, 10)),
            granularity,
        }
    }

    #[test]
    fn view_slices_then_aggregates() {
        let events = vec![Event {
            date: d(2024, 1, 20),
            value: 0.9,
            kind: EventKind::Alarm,
            component: "Tower".to_string(),
            turbine_id: 1,
        }];
        let view = build_view(Some(&turbine()), &events, &request("Tower", Granularity::Month));
        assert_eq!(view.raw_points, 32);
        assert_eq!(
            view.series,
            vec![
                TimeSeriesPoint::new(d(2024, 1, 15), 0.25),
                TimeSeriesPoint::new(d(2024, 2, 15), 0.25),
            ]
        );
        assert_eq!(view.events.alarms.len(), 1);

        let summary = view.summary().unwrap();
        assert_eq!(summary.n_points, 2);
        assert!((summary.mean - 0.25).abs() < 1e-12);
    }

    #[test]
    fn missing_component_or_turbine_is_empty() {
        let view = build_view(Some(&turbine()), &[], &request("rotor", Granularity::Day));
        assert!(view.series.is_empty());
        assert!(view.summary().is_none());

        let view = build_view(None, &[], &request("tower", Granularity::Week));
        assert!(view.series.is_empty());
        assert_eq!(view.raw_points, 0);
    }
    #[test]
    fn non_ascii_component_keeps_its_events() {
        let mut file = turbine();
        let series = file.components.remove("tower").unwrap();
        file.components.insert(crate::domain::component_key("Ölkühler"), series);
        let events = vec![Event {
            date: d(2024, 1, 20),
            value: 0.25,
            kind: EventKind::Alarm,
            component: "Ölkühler".to_string(),
            turbine_id: 1,
        }];

        let view = build_view(Some(&file), &events, &request("ölkühler", Granularity::Day));
        assert_eq!(view.raw_points, 32);
        assert_eq!(view.events.alarms.len(), 1);
    }
}
