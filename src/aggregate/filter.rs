//! Event selection for a chart window.

use crate::domain::{DateRange, Event, EventKind, component_key};

/// Which events belong on a chart.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub range: DateRange,
    /// `None` keeps events from every turbine.
    pub turbine_id: Option<u32>,
    /// Compared case-insensitively against `Event::component`.
    pub component: String,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.range.contains(event.date)
            && self.turbine_id.is_none_or(|id| id == event.turbine_id)
            && component_key(&event.component) == component_key(&self.component)
    }
}

/// Filtered events, split by kind for separate rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSplit {
    pub alarms: Vec<Event>,
    pub warnings: Vec<Event>,
}

impl EventSplit {
    pub fn len(&self) -> usize {
        self.alarms.len() + self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keep the events matching `filter`, sorted by date within each kind.
pub fn filter_events(events: &[Event], filter: &EventFilter) -> EventSplit {
    let mut split = EventSplit::default();
    for event in events.iter().filter(|e| filter.matches(e)) {
        match event.kind {
            EventKind::Alarm => split.alarms.push(event.clone()),
            EventKind::Warning => split.warnings.push(event.clone()),
        }
    }
    split.alarms.sort_by_key(|e| e.date);
    split.warnings.sort_by_key(|e| e.date);
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(date: NaiveDate, kind: EventKind, component: &str, turbine_id: u32) -> Event {
        Event {
            date,
            value: 0.8,
            kind,
            component: component.to_string(),
            turbine_id,
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            event(d(2024, 5, 1), EventKind::Alarm, "Tower", 1),
            event(d(2024, 4, 1), EventKind::Warning, "Tower", 1),
            event(d(2024, 3, 1), EventKind::Alarm, "Tower", 1),
            event(d(2024, 5, 2), EventKind::Alarm, "Tower", 2),
            event(d(2024, 5, 3), EventKind::Alarm, "Yaw", 1),
            event(d(2023, 1, 1), EventKind::Alarm, "Tower", 1),
        ]
    }

    #[test]
    fn filters_by_range_turbine_and_component() {
        let filter = EventFilter {
            range: DateRange::new(d(2024, 1, 1), d(2024, 5, 1)),
            turbine_id: Some(1),
            component: "tower".to_string(),
        };
        let split = filter_events(&sample(), &filter);
        let alarm_dates: Vec<NaiveDate> = split.alarms.iter().map(|e| e.date).collect();
        assert_eq!(alarm_dates, vec![d(2024, 3, 1), d(2024, 5, 1)]);
        assert_eq!(split.warnings.len(), 1);
        assert_eq!(split.len(), 3);
    }

    #[test]
    fn no_turbine_keeps_the_whole_fleet() {
        let filter = EventFilter {
            range: DateRange::new(d(2024, 1, 1), d(2024, 12, 31)),
            turbine_id: None,
            component: "TOWER".to_string(),
        };
        let split = filter_events(&sample(), &filter);
        assert_eq!(split.alarms.len(), 3);
    }

    #[test]
    fn component_match_is_exact() {
        let filter = EventFilter {
            range: DateRange::new(d(2020, 1, 1), d(2030, 1, 1)),
            turbine_id: None,
            component: "tow".to_string(),
        };
        assert!(filter_events(&sample(), &filter).is_empty());
    }

    #[test]
    fn non_ascii_component_matches_its_lowercase_key() {
        let events = vec![
            event(d(2024, 5, 1), EventKind::Alarm, "Ölkühler", 1),
            event(d(2024, 5, 2), EventKind::Warning, "ÖLKÜHLER", 1),
        ];
        let filter = EventFilter {
            range: DateRange::new(d(2024, 1, 1), d(2024, 12, 31)),
            turbine_id: Some(1),
            component: "ölkühler".to_string(),
        };
        let split = filter_events(&events, &filter);
        assert_eq!(split.alarms.len(), 1);
        assert_eq!(split.warnings.len(), 1);
    }
}
