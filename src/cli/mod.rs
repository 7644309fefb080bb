//! Command-line parsing for the turbine fault-risk generator and viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from synthesis and aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Granularity, RangePreset};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trisk", version, about = "Wind turbine fault-risk series generator and viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate daily fault-probability series and events for every turbine.
    Generate(GenerateArgs),
    /// Print one component's aggregated series, with an ASCII plot.
    View(ViewArgs),
    /// List the alarms and warnings inside a window.
    Events(EventsArgs),
    /// Verify a generated dataset against its metadata.
    Check(DataDirArgs),
    /// Launch the interactive TUI.
    ///
    /// Loads the dataset once and re-aggregates on every selection change.
    Tui(DataDirArgs),
}

impl Command {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Tui(_) => "off",
            _ => "info",
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output directory (created if missing). Defaults to $TRISK_DATA_DIR or data/simulated.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Last (exclusive) day of the history, YYYY-MM-DD. Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Length of the history in calendar years.
    #[arg(long, default_value_t = crate::domain::DEFAULT_HISTORY_YEARS)]
    pub years: u32,

    /// Turbine ids, comma separated (default 1,2,3,4).
    #[arg(long, value_delimiter = ',')]
    pub turbines: Vec<u32>,

    /// Component display names in rank order, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub components: Vec<String>,

    /// Seed for reproducible output (omit for fresh randomness).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-series seed offsets are drawn from 0..N.
    #[arg(long, default_value_t = crate::domain::DEFAULT_MAX_SEED_OFFSET)]
    pub max_seed_offset: u32,
}

#[derive(Debug, Args, Clone)]
pub struct DataDirArgs {
    /// Dataset directory. Defaults to $TRISK_DATA_DIR or data/simulated.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Which slice of the dataset to look at.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    #[command(flatten)]
    pub data: DataDirArgs,

    /// Turbine id (defaults to the first turbine in the metadata).
    #[arg(short = 't', long)]
    pub turbine: Option<u32>,

    /// Component name, case-insensitive.
    #[arg(short = 'c', long, default_value = crate::domain::DEFAULT_VIEW_COMPONENT)]
    pub component: String,

    /// Quick range, anchored at the dataset end date.
    #[arg(short = 'p', long, value_enum)]
    pub preset: Option<RangePreset>,

    /// Range start (inclusive), YYYY-MM-DD. Overrides the preset's start.
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Range end (inclusive), YYYY-MM-DD. Overrides the preset's end.
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Aggregation granularity (defaults to the preset's granularity).
    #[arg(short = 'g', long, value_enum)]
    pub granularity: Option<Granularity>,

    /// Skip the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the aggregated series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EventsArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Include events from every turbine.
    #[arg(long, conflicts_with = "turbine")]
    pub all_turbines: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_lists() {
        let cli = Cli::parse_from([
            "trisk",
            "generate",
            "--turbines",
            "1,3",
            "--components",
            "Tower,Yaw",
            "--seed",
            "7",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.turbines, vec![1, 3]);
        assert_eq!(args.components, vec!["Tower".to_string(), "Yaw".to_string()]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.years, 10);
    }

    #[test]
    fn view_defaults() {
        let cli = Cli::parse_from(["trisk", "view", "-g", "week"]);
        let Command::View(args) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.selection.component, "tower");
        assert_eq!(args.granularity, Some(Granularity::Week));
        assert!(args.selection.preset.is_none());
        assert_eq!(Command::View(args).default_log_filter(), "info");
    }
}
