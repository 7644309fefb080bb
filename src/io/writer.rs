//! Write the generated dataset.
//!
//! Layout of an output directory:
//! - `turbine{id}.json`: one `TurbineFile` per turbine
//! - `events.json`: every event of the run, in emission order
//! - `metadata.json`: the dataset's date domain and inventory
//!
//! Each document is written to a `.partial` sibling first and renamed into
//! place, so a reader never sees a half-written file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{Event, Metadata, TurbineFile};
use crate::error::AppError;

pub const EVENTS_FILE: &str = "events.json";
pub const METADATA_FILE: &str = "metadata.json";

pub fn turbine_file_name(turbine_id: u32) -> String {
    format!("turbine{turbine_id}.json")
}

pub fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::runtime(format!("Failed to create output directory '{}': {e}", dir.display())))
}

pub fn write_turbine(dir: &Path, file: &TurbineFile) -> Result<PathBuf, AppError> {
    let path = dir.join(turbine_file_name(file.turbine_id));
    write_json(&path, file)?;
    Ok(path)
}

pub fn write_events(dir: &Path, events: &[Event]) -> Result<PathBuf, AppError> {
    let path = dir.join(EVENTS_FILE);
    write_json(&path, &events)?;
    Ok(path)
}

pub fn write_metadata(dir: &Path, metadata: &Metadata) -> Result<PathBuf, AppError> {
    let path = dir.join(METADATA_FILE);
    write_json(&path, metadata)?;
    Ok(path)
}

/// Pretty-print `value` to `path`, replacing any existing file atomically.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let partial = partial_path(path);

    let file = File::create(&partial)
        .map_err(|e| AppError::runtime(format!("Failed to create '{}': {e}", partial.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| AppError::runtime(format!("Failed to write '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush '{}': {e}", path.display())))?;
    drop(writer);

    fs::rename(&partial, path).map_err(|e| {
        let _ = fs::remove_file(&partial);
        AppError::runtime(format!("Failed to finalize '{}': {e}", path.display()))
    })?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
