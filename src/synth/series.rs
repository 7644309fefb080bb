//! Daily fault-probability synthesis for one (turbine, component) pair.

use crate::domain::{
    Event, EventKind, EventPattern, GenerationConfig, Severity, TimeSeriesPoint, round_probability,
};
use crate::error::AppError;
use crate::synth::random::RandomSource;

/// Noise floor: `BASE_FLOOR + uniform * BASE_SPREAD`.
const BASE_FLOOR: f64 = 0.01;
const BASE_SPREAD: f64 = 0.02;

/// Phase shift per component rank and per turbine id.
const COMPONENT_PHASE_STEP: u64 = 13;
const TURBINE_PHASE_STEP: u64 = 23;

/// Only patterns stronger than this can mark a peak (and hence an event).
const PEAK_MAGNITUDE_GATE: f64 = 0.4;

/// A minor peak becomes a warning when a fresh draw exceeds this.
const WARNING_DRAW_THRESHOLD: f64 = 0.7;

/// One synthesized series plus the events found at its peaks.
#[derive(Debug, Clone)]
pub struct SeriesOutput {
    pub series: Vec<TimeSeriesPoint>,
    pub events: Vec<Event>,
}

/// Where a given day falls inside a pattern's event window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternHit {
    pub increase: f64,
    pub is_peak: bool,
}

/// Evaluate `pattern` at a phase-adjusted day index.
///
/// Returns `None` outside the event window. Inside it, the increase follows a
/// squared linear bell centred at `duration / 2`.
pub fn pattern_hit(pattern: &EventPattern, adjusted_day: u64) -> Option<PatternHit> {
    let cycle_pos = adjusted_day % u64::from(pattern.period_days());
    if cycle_pos >= u64::from(pattern.duration_days()) {
        return None;
    }

    let center = f64::from(pattern.duration_days()) / 2.0;
    let pos = cycle_pos as f64;
    let peak_factor = 1.0 - (pos - center).abs() / center;
    let increase = pattern.magnitude() * peak_factor * peak_factor;
    let is_peak = center.floor() as u64 == cycle_pos && pattern.magnitude() > PEAK_MAGNITUDE_GATE;

    Some(PatternHit { increase, is_peak })
}

/// Phase offset shared by every pattern of one (component, turbine) series.
pub fn phase_offset(seed_offset: u32, component_rank: usize, turbine_id: u32) -> u64 {
    u64::from(seed_offset)
        + COMPONENT_PHASE_STEP * component_rank as u64
        + TURBINE_PHASE_STEP * u64::from(turbine_id)
}

/// Synthesize the daily series for one component of one turbine.
///
/// `component` must be one of `config.components` and `turbine_id` one of
/// `config.turbine_ids`; their positions drive the deterministic risk bias.
pub fn synthesize<R: RandomSource + ?Sized>(
    config: &GenerationConfig,
    component: &str,
    turbine_id: u32,
    seed_offset: u32,
    rng: &mut R,
) -> Result<SeriesOutput, AppError> {
    let rank = config
        .component_rank(component)
        .ok_or_else(|| AppError::usage(format!("Unknown component '{component}'.")))?;
    if !config.turbine_ids.contains(&turbine_id) {
        return Err(AppError::usage(format!("Unknown turbine id {turbine_id}.")));
    }
    // Events carry the configured display name, whatever casing was passed in.
    let display_name = config.components[rank].clone();

    let component_factor = (rank + 1) as f64 / config.components.len() as f64;
    let turbine_factor = f64::from(turbine_id) / f64::from(config.max_turbine_id());
    let identity_scale = (0.8 + component_factor * 0.4) * (0.8 + turbine_factor * 0.4);
    let offset = phase_offset(seed_offset, rank, turbine_id);

    let total_days = config.window.total_days();
    let mut series = Vec::with_capacity(total_days as usize);
    let mut events = Vec::new();

    for day in 0..total_days {
        let date = config.window.day(day).ok_or_else(|| {
            AppError::usage(format!("Day {day} overflows the calendar from {}.", config.window.start()))
        })?;

        let mut probability = (BASE_FLOOR + rng.next_unit() * BASE_SPREAD) * identity_scale;

        let mut peak: Option<Severity> = None;
        for pattern in &config.patterns {
            if let Some(hit) = pattern_hit(pattern, u64::from(day) + offset) {
                probability += hit.increase;
                if hit.is_peak {
                    peak = peak.max(Some(pattern.severity()));
                }
            }
        }

        let probability = round_probability(probability.clamp(0.0, 1.0));
        series.push(TimeSeriesPoint::new(date, probability));

        let Some(kind) = peak.and_then(Severity::event_kind) else {
            continue;
        };
        let emit = match kind {
            EventKind::Alarm => true,
            EventKind::Warning => rng.next_unit() > WARNING_DRAW_THRESHOLD,
        };
        if emit {
            events.push(Event {
                date,
                value: probability,
                kind,
                component: display_name.clone(),
                turbine_id,
            });
        }
    }

    Ok(SeriesOutput { series, events })
}
