//! Dataset verification for `trisk check`.
//!
//! Every problem is collected rather than stopping at the first, so one run
//! shows everything wrong with a directory.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::app::pipeline::Dataset;
use crate::calendar;
use crate::domain::{Metadata, TimeSeriesPoint, component_key};
use crate::io::turbine_file_name;

/// Outcome of checking a dataset.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub turbines: usize,
    pub series: usize,
    pub points: usize,
    pub events: usize,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

pub fn check_dataset(dataset: &Dataset) -> CheckReport {
    let meta = &dataset.metadata;
    let mut report = CheckReport::default();

    let span = calendar::days_between(meta.start_date, meta.end_date);
    if span != i64::from(meta.total_days) {
        report.problems.push(format!(
            "metadata: totalDays is {} but {} .. {} spans {span} days",
            meta.total_days, meta.start_date, meta.end_date
        ));
    }

    let expected_keys: HashSet<String> = meta.components.iter().map(|c| component_key(c)).collect();

    for (&id, file) in &dataset.turbines {
        let Some(file) = file else {
            report.problems.push(format!("turbine {id}: file missing"));
            continue;
        };
        report.turbines += 1;

        for key in file.components.keys() {
            if !expected_keys.contains(key) {
                report
                    .problems
                    .push(format!("turbine {id}: unexpected component '{key}'"));
            }
        }

        for component in &meta.components {
            let Some(series) = file.component(component) else {
                report
                    .problems
                    .push(format!("turbine {id}: component '{component}' missing"));
                continue;
            };
            report.series += 1;
            report.points += series.len();
            check_series(meta, series, &format!("turbine {id} {component}"), &mut report.problems);
        }
    }

    for id in unlisted_turbine_files(&dataset.dir, &meta.turbine_ids) {
        report
            .problems
            .push(format!("{}: turbine {id} is not listed in metadata", turbine_file_name(id)));
    }

    let mut seen = HashSet::new();
    for (i, event) in dataset.events.iter().enumerate() {
        report.events += 1;
        let label = format!("event #{i} ({} {} turbine {})", event.date, event.component, event.turbine_id);

        if !(0.0..=1.0).contains(&event.value) {
            report.problems.push(format!("{label}: value {} outside [0, 1]", event.value));
        }
        if event.date < meta.start_date || event.date >= meta.end_date {
            report.problems.push(format!("{label}: date outside the dataset window"));
        }
        if !meta.turbine_ids.contains(&event.turbine_id) {
            report.problems.push(format!("{label}: unknown turbine"));
        }
        if !expected_keys.contains(&component_key(&event.component)) {
            report.problems.push(format!("{label}: unknown component"));
        }
        let key = (event.turbine_id, component_key(&event.component), event.date);
        if !seen.insert(key) {
            report.problems.push(format!("{label}: more than one event on this day"));
        }

        let point = dataset
            .turbine(event.turbine_id)
            .and_then(|t| t.component(&event.component))
            .and_then(|s| s.iter().find(|p| p.date == event.date));
        if let Some(point) = point {
            if point.probability != event.value {
                report.problems.push(format!(
                    "{label}: value {} differs from series value {}",
                    event.value, point.probability
                ));
            }
        }
    }

    report
}

/// Ids of `turbine{id}.json` files in `dir` that `listed` does not name.
fn unlisted_turbine_files(dir: &Path, listed: &[u32]) -> Vec<u32> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot scan {} for turbine files: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut ids: Vec<u32> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let id = name.to_str()?.strip_prefix("turbine")?.strip_suffix(".json")?;
            id.parse::<u32>().ok()
        })
        .filter(|id| !listed.contains(id))
        .collect();
    ids.sort_unstable();
    ids
}

fn check_series(meta: &Metadata, series: &[TimeSeriesPoint], label: &str, problems: &mut Vec<String>) {
    if series.len() != meta.total_days as usize {
        problems.push(format!(
            "{label}: {} points, expected {}",
            series.len(),
            meta.total_days
        ));
    }
    for (i, point) in series.iter().enumerate() {
        let expected = calendar::add_days(meta.start_date, i as u64);
        if Some(point.date) != expected {
            problems.push(format!("{label}: point {i} is dated {}, not contiguous", point.date));
            // One break shifts every later date; report it once.
            break;
        }
    }
    if let Some(bad) = series.iter().find(|p| !(0.0..=1.0).contains(&p.probability)) {
        problems.push(format!(
            "{label}: probability {} on {} outside [0, 1]",
            bad.probability, bad.date
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::app::pipeline::run_generate;
    use crate::domain::{DateWindow, Event, EventKind, GenerationConfig};
    use crate::synth::source_from_seed;

    fn generated() -> (TempDir, Dataset) {
        let end = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut config = GenerationConfig::default_for(end).unwrap();
        config.window = DateWindow::years_ending(end, 3).unwrap();
        config.turbine_ids = vec![1, 2];
        let temp = TempDir::new().unwrap();
        let mut rng = source_from_seed(Some(5));
        run_generate(&config, temp.path(), &mut rng).unwrap();
        let dataset = Dataset::load(temp.path()).unwrap();
        (temp, dataset)
    }

    #[test]
    fn generated_dataset_passes() {
        let (_temp, dataset) = generated();
        let report = check_dataset(&dataset);
        assert!(report.is_ok(), "{:?}", report.problems);
        assert_eq!(report.turbines, 2);
        assert_eq!(report.series, 18);
        assert_eq!(report.points, 18 * dataset.metadata.total_days as usize);
        assert!(report.events > 0);
    }

    #[test]
    fn tampering_is_reported() {
        let (_temp, mut dataset) = generated();

        dataset.metadata.total_days += 1;
        if let Some(Some(file)) = dataset.turbines.get_mut(&2) {
            file.components.remove("yaw");
            if let Some(series) = file.components.get_mut("rotor") {
                series[10].probability = 1.5;
            }
        }
        dataset.events.push(Event {
            date: dataset.metadata.end_date,
            value: 0.5,
            kind: EventKind::Alarm,
            component: "Blade".to_string(),
            turbine_id: 9,
        });

        let report = check_dataset(&dataset);
        let all = report.problems.join("\n");
        assert!(all.contains("totalDays"), "{all}");
        assert!(all.contains("turbine 2: component 'Yaw' missing"), "{all}");
        assert!(all.contains("outside [0, 1]"), "{all}");
        assert!(all.contains("date outside the dataset window"), "{all}");
        assert!(all.contains("unknown turbine"), "{all}");
        assert!(all.contains("unknown component"), "{all}");
    }

    #[test]
    fn stray_turbine_file_is_reported() {
        let (temp, _) = generated();
        std::fs::copy(temp.path().join("turbine2.json"), temp.path().join("turbine7.json")).unwrap();
        std::fs::write(temp.path().join("turbine-notes.json"), "{}").unwrap();
        let dataset = Dataset::load(temp.path()).unwrap();

        let report = check_dataset(&dataset);
        assert_eq!(
            report.problems,
            vec!["turbine7.json: turbine 7 is not listed in metadata".to_string()]
        );
    }
}
