//! Shared generate/load logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> per-turbine synthesis -> files, and files -> dataset -> chart view
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::aggregate::{ChartView, ViewRequest, build_view};
use crate::domain::{
    DEFAULT_VIEW_COMPONENT, DateRange, Event, EventKind, GenerationConfig, Granularity, Metadata,
    RangePreset, TurbineFile,
};
use crate::error::AppError;
use crate::io;
use crate::synth::{RandomSource, generate_turbine};

/// What a `generate` run produced.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub out_dir: PathBuf,
    pub metadata: Metadata,
    pub alarms: usize,
    pub warnings: usize,
}

/// Generate every turbine, then the event list, then the metadata.
///
/// Each turbine file is written as soon as it is computed; `metadata.json`
/// goes last, so its presence marks a complete dataset.
pub fn run_generate<R: RandomSource + ?Sized>(
    config: &GenerationConfig,
    out_dir: &Path,
    rng: &mut R,
) -> Result<GenerationSummary, AppError> {
    config.validate()?;
    io::ensure_dir(out_dir)?;

    let mut events: Vec<Event> = Vec::new();
    for &turbine_id in &config.turbine_ids {
        let out = generate_turbine(config, turbine_id, rng)?;
        io::write_turbine(out_dir, &out.file)?;
        log::info!(
            "turbine {turbine_id}: {} components, {} events",
            out.file.components.len(),
            out.events.len()
        );
        events.extend(out.events);
    }

    io::write_events(out_dir, &events)?;
    let metadata = Metadata::from_config(config);
    io::write_metadata(out_dir, &metadata)?;

    let alarms = events.iter().filter(|e| e.kind == EventKind::Alarm).count();
    Ok(GenerationSummary {
        out_dir: out_dir.to_path_buf(),
        metadata,
        alarms,
        warnings: events.len() - alarms,
    })
}

/// A loaded dataset: metadata, all events and every listed turbine file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub dir: PathBuf,
    pub metadata: Metadata,
    pub events: Vec<Event>,
    /// `None` when a turbine listed in the metadata has no file.
    pub turbines: BTreeMap<u32, Option<TurbineFile>>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let metadata = io::read_metadata(dir)?;
        let events = io::read_events(dir)?;
        let mut turbines = BTreeMap::new();
        for &id in &metadata.turbine_ids {
            let file = io::read_turbine(dir, id)?;
            if file.is_none() {
                log::warn!("turbine {id} is listed in metadata but has no file");
            }
            turbines.insert(id, file);
        }
        log::debug!(
            "loaded {} turbines, {} events from {}",
            turbines.len(),
            events.len(),
            dir.display()
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            metadata,
            events,
            turbines,
        })
    }

    pub fn turbine(&self, id: u32) -> Option<&TurbineFile> {
        self.turbines.get(&id).and_then(|t| t.as_ref())
    }

    pub fn view(&self, request: &ViewRequest) -> ChartView {
        build_view(self.turbine(request.turbine_id), &self.events, request)
    }
}

/// A consumer's selection before it is resolved against a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub turbine_id: Option<u32>,
    pub component: Option<String>,
    pub preset: Option<RangePreset>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub granularity: Option<Granularity>,
}

/// Preset used when neither a preset nor explicit dates are given.
pub const DEFAULT_PRESET: RangePreset = RangePreset::Year;

/// Resolve a selection into a concrete request.
///
/// - turbine: first id in the metadata
/// - component: `tower`
/// - range: the preset (default: last year); explicit `start`/`end` replace its ends
/// - granularity: the preset's granularity
pub fn resolve_request(metadata: &Metadata, selection: &Selection) -> Result<ViewRequest, AppError> {
    let turbine_id = match selection.turbine_id {
        Some(id) => id,
        None => metadata
            .turbine_ids
            .first()
            .copied()
            .ok_or_else(|| AppError::usage("Dataset lists no turbines."))?,
    };
    if !metadata.turbine_ids.contains(&turbine_id) {
        log::warn!("turbine {turbine_id} is not part of this dataset");
    }

    let component = selection
        .component
        .clone()
        .unwrap_or_else(|| DEFAULT_VIEW_COMPONENT.to_string());

    let preset = match (selection.preset, selection.start, selection.end) {
        (Some(p), _, _) => p,
        (None, None, None) => DEFAULT_PRESET,
        // Explicit dates without a preset start from the whole dataset.
        (None, _, _) => RangePreset::All,
    };
    let base = preset.resolve(metadata);
    let range = DateRange::new(
        selection.start.unwrap_or(base.start),
        selection.end.unwrap_or(base.end),
    );
    if range.start > range.end {
        return Err(AppError::usage(format!(
            "Range start {} is after range end {}.",
            range.start, range.end
        )));
    }

    Ok(ViewRequest {
        turbine_id,
        component,
        range,
        granularity: selection.granularity.unwrap_or(preset.default_granularity()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::domain::DateWindow;
    use crate::synth::source_from_seed;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn small_config() -> GenerationConfig {
        let mut config = GenerationConfig::default_for(d(2025, 6, 10)).unwrap();
        config.window = DateWindow::new(d(2023, 6, 10), d(2025, 6, 10)).unwrap();
        config.turbine_ids = vec![1, 2];
        config.components = vec!["Rotor".to_string(), "Tower".to_string()];
        config
    }

    #[test]
    fn generate_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("nested").join("out");
        let config = small_config();
        let mut rng = source_from_seed(Some(9));

        let summary = run_generate(&config, &out_dir, &mut rng).unwrap();
        assert_eq!(summary.metadata.total_days, 731);
        assert_eq!(summary.metadata.components, vec!["Rotor", "Tower"]);

        let dataset = Dataset::load(&out_dir).unwrap();
        assert_eq!(dataset.metadata, summary.metadata);
        assert_eq!(dataset.events.len(), summary.alarms + summary.warnings);
        let turbine = dataset.turbine(2).unwrap();
        assert_eq!(turbine.component("TOWER").unwrap().len(), 731);

        let selection = Selection::default();
        let request = resolve_request(&dataset.metadata, &selection).unwrap();
        assert_eq!(request.turbine_id, 1);
        assert_eq!(request.component, "tower");
        assert_eq!(request.granularity, Granularity::Month);
        assert_eq!(request.range, DateRange::new(d(2024, 6, 10), d(2025, 6, 10)));

        let view = dataset.view(&request);
        // 2024-06-10 ..= 2025-06-09 holds data; the end date itself is exclusive.
        assert_eq!(view.raw_points, 365);
        assert_eq!(view.series.len(), 13);
    }

    #[test]
    fn explicit_dates_override_preset_ends() {
        let metadata = Metadata::from_config(&small_config());
        let selection = Selection {
            start: Some(d(2024, 1, 1)),
            granularity: Some(Granularity::Week),
            ..Selection::default()
        };
        let request = resolve_request(&metadata, &selection).unwrap();
        assert_eq!(request.range, DateRange::new(d(2024, 1, 1), d(2025, 6, 10)));
        assert_eq!(request.granularity, Granularity::Week);

        let selection = Selection {
            preset: Some(RangePreset::Week),
            ..Selection::default()
        };
        let request = resolve_request(&metadata, &selection).unwrap();
        assert_eq!(request.range.start, d(2025, 6, 3));
        assert_eq!(request.granularity, Granularity::Day);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let metadata = Metadata::from_config(&small_config());
        let selection = Selection {
            start: Some(d(2025, 1, 1)),
            end: Some(d(2024, 1, 1)),
            ..Selection::default()
        };
        assert!(resolve_request(&metadata, &selection).is_err());
    }

    #[test]
    fn invalid_config_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut config = small_config();
        config.turbine_ids.clear();
        let mut rng = source_from_seed(Some(1));
        assert!(run_generate(&config, temp.path(), &mut rng).is_err());
        assert!(!temp.path().join(io::METADATA_FILE).exists());
    }
}
