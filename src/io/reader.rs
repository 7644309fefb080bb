//! Load a generated dataset.
//!
//! Missing files are treated differently depending on what they hold:
//! - no `metadata.json` means there is no dataset at all (error)
//! - no `events.json` means no markers (empty list)
//! - no `turbine{id}.json` means no data for that turbine (`None`)
//!
//! A file that exists but does not parse is always an error.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::domain::{Event, Metadata, TurbineFile};
use crate::error::AppError;
use crate::io::writer::{EVENTS_FILE, METADATA_FILE, turbine_file_name};

pub fn read_metadata(dir: &Path) -> Result<Metadata, AppError> {
    let path = dir.join(METADATA_FILE);
    read_optional(&path)?.ok_or_else(|| {
        AppError::usage(format!(
            "No dataset in '{}' (missing {METADATA_FILE}). Run `trisk generate` first.",
            dir.display()
        ))
    })
}

pub fn read_events(dir: &Path) -> Result<Vec<Event>, AppError> {
    let path = dir.join(EVENTS_FILE);
    match read_optional(&path)? {
        Some(events) => Ok(events),
        None => {
            log::warn!("{} not found; continuing without events", path.display());
            Ok(Vec::new())
        }
    }
}

pub fn read_turbine(dir: &Path, turbine_id: u32) -> Result<Option<TurbineFile>, AppError> {
    let path = dir.join(turbine_file_name(turbine_id));
    let file: Option<TurbineFile> = read_optional(&path)?;
    if let Some(f) = &file {
        if f.turbine_id != turbine_id {
            return Err(AppError::usage(format!(
                "'{}' declares turbineId {} (expected {turbine_id}).",
                path.display(),
                f.turbine_id
            )));
        }
    }
    Ok(file)
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::usage(format!("Failed to open '{}': {e}", path.display())));
        }
    };
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::usage(format!("Invalid JSON in '{}': {e}", path.display())))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::domain::{ComponentSeriesMap, EventKind, TimeSeriesPoint};
    use crate::error::EXIT_USAGE;
    use crate::io::writer::{write_events, write_metadata, write_turbine};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn missing_files() {
        let temp = TempDir::new().unwrap();
        let err = read_metadata(temp.path()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(read_events(temp.path()).unwrap().is_empty());
        assert!(read_turbine(temp.path(), 1).unwrap().is_none());
    }

    #[test]
    fn written_dataset_reads_back() {
        let temp = TempDir::new().unwrap();
        let mut components = ComponentSeriesMap::new();
        components.insert("tower".to_string(), vec![TimeSeriesPoint::new(d(2024, 1, 1), 0.25)]);
        let turbine = TurbineFile {
            turbine_id: 2,
            components,
        };
        let events = vec![Event {
            date: d(2024, 1, 1),
            value: 0.25,
            kind: EventKind::Warning,
            component: "Tower".to_string(),
            turbine_id: 2,
        }];
        let metadata = Metadata {
            start_date: d(2024, 1, 1),
            end_date: d(2024, 1, 2),
            total_days: 1,
            components: vec!["Tower".to_string()],
            turbine_ids: vec![2],
        };

        write_turbine(temp.path(), &turbine).unwrap();
        write_events(temp.path(), &events).unwrap();
        write_metadata(temp.path(), &metadata).unwrap();

        assert_eq!(read_turbine(temp.path(), 2).unwrap(), Some(turbine));
        assert_eq!(read_events(temp.path()).unwrap(), events);
        assert_eq!(read_metadata(temp.path()).unwrap(), metadata);
    }

    #[test]
    fn malformed_file_fails_the_load() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("turbine1.json"),
            r#"{"turbineId":1,"components":{"tower":[{"date":"not-a-date","probability":0.1}]}}"#,
        )
        .unwrap();
        let err = read_turbine(temp.path(), 1).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn mismatched_turbine_id_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("turbine1.json"), r#"{"turbineId":3,"components":{}}"#).unwrap();
        assert!(read_turbine(temp.path(), 1).is_err());
    }
}
