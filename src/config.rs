//! Environment-driven defaults.
//!
//! A `.env` file in the working directory is loaded once (if present); real
//! environment variables win over it.

use std::path::PathBuf;

/// Overrides the default dataset directory for every subcommand.
pub const DATA_DIR_ENV: &str = "TRISK_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data/simulated";

/// Dataset directory: explicit flag, then `TRISK_DATA_DIR`, then `data/simulated`.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    dotenvy::dotenv().ok();
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(value: Option<String>) -> PathBuf {
    match value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/x")));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn blank_env_falls_back_to_default() {
        assert_eq!(data_dir_from(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(data_dir_from(Some("  ".to_string())), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(data_dir_from(Some("out".to_string())), PathBuf::from("out"));
    }
}
