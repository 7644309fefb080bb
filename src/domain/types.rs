//! Shared domain types.
//!
//! The persisted shapes (`TimeSeriesPoint`, `Event`, `TurbineFile`, `Metadata`)
//! serialize with camelCase field names and `YYYY-MM-DD` dates, matching the
//! documents the dashboard reads. Everything is created once per generation run
//! and treated as read-only afterwards.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::AppError;

/// Components in rank order. The rank feeds both the risk bias and the phase
/// offset of every pattern, so reordering changes every generated series.
pub const DEFAULT_COMPONENTS: [&str; 9] = [
    "Converter",
    "Generator",
    "Nacelle",
    "Rotor",
    "Tower",
    "Transformer",
    "Transmission",
    "Turbine",
    "Yaw",
];

pub const DEFAULT_TURBINE_IDS: [u32; 4] = [1, 2, 3, 4];

pub const DEFAULT_HISTORY_YEARS: u32 = 10;

/// Seed offsets are drawn from `0..DEFAULT_MAX_SEED_OFFSET`.
pub const DEFAULT_MAX_SEED_OFFSET: u32 = 30;

/// Component shown when a viewer has no explicit selection.
pub const DEFAULT_VIEW_COMPONENT: &str = "tower";

/// Recurring risk bumps shared by every series.
pub const DEFAULT_PATTERNS: [EventPattern; 3] = [
    EventPattern {
        period_days: 90,
        duration_days: 5,
        magnitude: 0.3,
        severity: Severity::Maintenance,
    },
    EventPattern {
        period_days: 180,
        duration_days: 8,
        magnitude: 0.6,
        severity: Severity::Minor,
    },
    EventPattern {
        period_days: 900,
        duration_days: 15,
        magnitude: 0.95,
        severity: Severity::Major,
    },
];

/// Round to the 4 decimal places used by every persisted probability.
pub fn round_probability(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// One daily (or bucketed) probability value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub probability: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, probability: f64) -> Self {
        Self { date, probability }
    }
}

/// Event kind as rendered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Alarm,
    Warning,
}

impl EventKind {
    pub fn display_name(self) -> &'static str {
        match self {
            EventKind::Alarm => "alarm",
            EventKind::Warning => "warning",
        }
    }
}

/// A discrete alarm/warning emitted at a pattern peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Display name of the component (e.g. `Tower`); match case-insensitively.
    pub component: String,
    pub turbine_id: u32,
}

/// Severity class of an event pattern.
///
/// Ordered from least to most severe so the worst of several simultaneous
/// peaks can be picked with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Maintenance,
    Minor,
    Major,
}

impl Severity {
    /// The event kind a peak of this severity may produce.
    pub fn event_kind(self) -> Option<EventKind> {
        match self {
            Severity::Maintenance => None,
            Severity::Minor => Some(EventKind::Warning),
            Severity::Major => Some(EventKind::Alarm),
        }
    }
}

/// A recurring fault-risk bump: every `period_days`, a window of
/// `duration_days` with a squared-bell increase peaking at `magnitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPattern {
    period_days: u32,
    duration_days: u32,
    magnitude: f64,
    severity: Severity,
}

impl EventPattern {
    pub fn new(
        period_days: u32,
        duration_days: u32,
        magnitude: f64,
        severity: Severity,
    ) -> Result<Self, AppError> {
        if period_days == 0 {
            return Err(AppError::usage("Pattern period must be > 0 days."));
        }
        if duration_days == 0 || duration_days > period_days {
            return Err(AppError::usage(format!(
                "Pattern duration must be in 1..={period_days} days (got {duration_days})."
            )));
        }
        if !(magnitude.is_finite() && magnitude > 0.0 && magnitude <= 1.0) {
            return Err(AppError::usage(format!(
                "Pattern magnitude must be in (0, 1] (got {magnitude})."
            )));
        }
        Ok(Self {
            period_days,
            duration_days,
            magnitude,
            severity,
        })
    }

    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Lowercase component name -> daily series, for one turbine.
pub type ComponentSeriesMap = BTreeMap<String, Vec<TimeSeriesPoint>>;

/// Case-folded component name. Map keys are stored in this form and every
/// component comparison goes through it.
pub fn component_key(name: &str) -> String {
    name.to_lowercase()
}

/// Contents of `turbine{id}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurbineFile {
    pub turbine_id: u32,
    pub components: ComponentSeriesMap,
}

impl TurbineFile {
    /// Series for a component, matched case-insensitively.
    pub fn component(&self, name: &str) -> Option<&[TimeSeriesPoint]> {
        self.components
            .get(&component_key(name))
            .map(|series| series.as_slice())
    }
}

/// Contents of `metadata.json`: the valid domain of every generated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub components: Vec<String>,
    pub turbine_ids: Vec<u32>,
}

impl Metadata {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            start_date: config.window.start(),
            end_date: config.window.end(),
            total_days: config.window.total_days(),
            components: config.components.clone(),
            turbine_ids: config.turbine_ids.clone(),
        }
    }
}

/// Half-open generation window: one point per day in `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        let days = calendar::days_between(start, end);
        if days <= 0 {
            return Err(AppError::usage(format!(
                "Generation window is empty: {start} .. {end}."
            )));
        }
        if days > i64::from(u32::MAX) {
            return Err(AppError::usage("Generation window is too long."));
        }
        Ok(Self { start, end })
    }

    /// Window of `years` calendar years ending at `end`.
    pub fn years_ending(end: NaiveDate, years: u32) -> Result<Self, AppError> {
        let start = calendar::years_before(end, years)
            .ok_or_else(|| AppError::usage(format!("Cannot go back {years} years from {end}.")))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn total_days(&self) -> u32 {
        calendar::days_between(self.start, self.end) as u32
    }

    /// Calendar day for day index `d` (`start + d`).
    pub fn day(&self, index: u32) -> Option<NaiveDate> {
        calendar::add_days(self.start, u64::from(index))
    }
}

/// Inclusive date range used to slice series and events for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Time granularity of a displayed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

/// Quick date-range selections, each with the granularity that suits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::Week,
        RangePreset::Month,
        RangePreset::Quarter,
        RangePreset::Year,
        RangePreset::All,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            RangePreset::Week => "last week",
            RangePreset::Month => "last month",
            RangePreset::Quarter => "last quarter",
            RangePreset::Year => "last year",
            RangePreset::All => "all",
        }
    }

    pub fn default_granularity(self) -> Granularity {
        match self {
            RangePreset::Week | RangePreset::Month => Granularity::Day,
            RangePreset::Quarter => Granularity::Week,
            RangePreset::Year => Granularity::Month,
            RangePreset::All => Granularity::Quarter,
        }
    }

    /// Resolve against the dataset, anchored at its end date.
    pub fn resolve(self, metadata: &Metadata) -> DateRange {
        let end = metadata.end_date;
        let start = match self {
            RangePreset::Week => calendar::sub_days(end, 7),
            RangePreset::Month => calendar::months_before(end, 1),
            RangePreset::Quarter => calendar::months_before(end, 3),
            RangePreset::Year => calendar::years_before(end, 1),
            RangePreset::All => Some(metadata.start_date),
        };
        let start = start.unwrap_or(metadata.start_date).max(metadata.start_date);
        DateRange::new(start, end)
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(len) as usize]
}

/// Everything the synthesizer needs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub window: DateWindow,
    /// Component display names in rank order.
    pub components: Vec<String>,
    pub turbine_ids: Vec<u32>,
    pub patterns: Vec<EventPattern>,
    /// Per-series seed offsets are drawn from `0..max_seed_offset`.
    pub max_seed_offset: u32,
}

impl GenerationConfig {
    /// Default fleet, components and patterns over a history ending at `end`.
    pub fn default_for(end: NaiveDate) -> Result<Self, AppError> {
        Ok(Self {
            window: DateWindow::years_ending(end, DEFAULT_HISTORY_YEARS)?,
            components: DEFAULT_COMPONENTS.iter().map(|c| c.to_string()).collect(),
            turbine_ids: DEFAULT_TURBINE_IDS.to_vec(),
            patterns: DEFAULT_PATTERNS.to_vec(),
            max_seed_offset: DEFAULT_MAX_SEED_OFFSET,
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.components.is_empty() {
            return Err(AppError::usage("At least one component is required."));
        }
        let mut seen = std::collections::HashSet::new();
        for c in &self.components {
            if c.trim().is_empty() {
                return Err(AppError::usage("Component names must not be empty."));
            }
            if !seen.insert(component_key(c)) {
                return Err(AppError::usage(format!("Duplicate component '{c}'.")));
            }
        }
        if self.turbine_ids.is_empty() {
            return Err(AppError::usage("At least one turbine id is required."));
        }
        if self.turbine_ids.contains(&0) {
            return Err(AppError::usage("Turbine ids must be >= 1."));
        }
        let mut ids = self.turbine_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.turbine_ids.len() {
            return Err(AppError::usage("Turbine ids must be unique."));
        }
        Ok(())
    }

    /// Zero-based rank of a component in the configured ordering.
    pub fn component_rank(&self, component: &str) -> Option<usize> {
        let key = component_key(component);
        self.components.iter().position(|c| component_key(c) == key)
    }

    pub fn max_turbine_id(&self) -> u32 {
        self.turbine_ids.iter().copied().max().unwrap_or(1)
    }
}
