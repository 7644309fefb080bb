//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - generates and writes datasets
//! - loads datasets and builds chart views
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, DataDirArgs, EventsArgs, GenerateArgs, SelectionArgs, ViewArgs};
use crate::domain::{DateWindow, GenerationConfig};
use crate::error::AppError;

pub mod check;
pub mod pipeline;

use pipeline::{Dataset, Selection};

/// Entry point for the `trisk` binary.
pub fn run() -> Result<(), AppError> {
    // `trisk` and `trisk --data-dir X` behave like `trisk tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init(cli.command.default_log_filter());

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::View(args) => handle_view(args),
        Command::Events(args) => handle_events(args),
        Command::Check(args) => handle_check(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = generation_config_from_args(&args)?;
    let out_dir = crate::config::resolve_data_dir(args.out.clone());
    let mut rng = crate::synth::source_from_seed(args.seed);

    log::info!(
        "generating {} turbines x {} components, {} .. {}",
        config.turbine_ids.len(),
        config.components.len(),
        config.window.start(),
        config.window.end()
    );
    let summary = pipeline::run_generate(&config, &out_dir, &mut rng)?;

    print!("{}", crate::report::format_generation_summary(&summary));
    Ok(())
}

fn handle_view(args: ViewArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.selection.data)?;
    let mut selection = selection_from_args(&args.selection)?;
    selection.granularity = args.granularity;
    let request = pipeline::resolve_request(&dataset.metadata, &selection)?;
    let view = dataset.view(&request);

    println!("{}", crate::report::format_view_summary(&view));
    print!("{}", crate::report::format_series_table(&view.series));

    if !args.no_plot {
        println!();
        print!("{}", crate::plot::render_ascii_plot(&view, args.width, args.height));
    }

    if let Some(path) = &args.export {
        crate::io::write_view_csv(path, &view)?;
        log::info!("exported {} rows to {}", view.series.len(), path.display());
    }

    Ok(())
}

fn handle_events(args: EventsArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.selection.data)?;
    let selection = selection_from_args(&args.selection)?;
    let request = pipeline::resolve_request(&dataset.metadata, &selection)?;

    let filter = crate::aggregate::EventFilter {
        range: request.range,
        turbine_id: if args.all_turbines { None } else { Some(request.turbine_id) },
        component: request.component.clone(),
    };
    let split = crate::aggregate::filter_events(&dataset.events, &filter);

    println!(
        "{} | {} .. {}\n",
        request.component, request.range.start, request.range.end
    );
    print!("{}", crate::report::format_events(&split));
    Ok(())
}

fn handle_check(args: DataDirArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args)?;
    let report = check::check_dataset(&dataset);
    print!("{}", crate::report::format_check_report(&report));
    if report.is_ok() {
        Ok(())
    } else {
        Err(AppError::data(format!(
            "Dataset in '{}' failed {} checks.",
            dataset.dir.display(),
            report.problems.len()
        )))
    }
}

fn handle_tui(args: DataDirArgs) -> Result<(), AppError> {
    let dir = crate::config::resolve_data_dir(args.data_dir);
    crate::tui::run(dir)
}

fn load_dataset(args: &DataDirArgs) -> Result<Dataset, AppError> {
    let dir: PathBuf = crate::config::resolve_data_dir(args.data_dir.clone());
    Dataset::load(&dir)
}

pub fn generation_config_from_args(args: &GenerateArgs) -> Result<GenerationConfig, AppError> {
    let end = match &args.end_date {
        Some(raw) => crate::calendar::parse_day(raw)?,
        None => crate::calendar::today(),
    };
    if args.years == 0 {
        return Err(AppError::usage("--years must be at least 1."));
    }

    let mut config = GenerationConfig::default_for(end)?;
    config.window = DateWindow::years_ending(end, args.years)?;
    if !args.turbines.is_empty() {
        config.turbine_ids = args.turbines.clone();
    }
    if !args.components.is_empty() {
        config.components = args.components.iter().map(|c| c.trim().to_string()).collect();
    }
    config.max_seed_offset = args.max_seed_offset;
    config.validate()?;
    Ok(config)
}

fn selection_from_args(args: &SelectionArgs) -> Result<Selection, AppError> {
    let start = args.start.as_deref().map(crate::calendar::parse_day).transpose()?;
    let end = args.end.as_deref().map(crate::calendar::parse_day).transpose()?;
    Ok(Selection {
        turbine_id: args.turbine,
        component: Some(args.component.clone()),
        preset: args.preset,
        start,
        end,
        granularity: None,
    })
}

/// Rewrite argv so `trisk` defaults to `trisk tui`.
///
/// Rules:
/// - `trisk`                       -> `trisk tui`
/// - `trisk --data-dir X ...`      -> `trisk tui --data-dir X ...`
/// - `trisk --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "generate" | "view" | "events" | "check" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["trisk"])), argv(&["trisk", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["trisk", "--data-dir", "x"])),
            argv(&["trisk", "tui", "--data-dir", "x"])
        );
        assert_eq!(rewrite_args(argv(&["trisk", "--help"])), argv(&["trisk", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["trisk", "check"])),
            argv(&["trisk", "check"])
        );
    }

    #[test]
    fn generate_args_map_onto_config() {
        let cli = crate::cli::Cli::parse_from([
            "trisk",
            "generate",
            "--end-date",
            "2025-06-10",
            "--years",
            "2",
            "--turbines",
            "2,5",
            "--components",
            "Tower, Yaw",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = generation_config_from_args(&args).unwrap();
        assert_eq!(config.window.start(), NaiveDate::from_ymd_opt(2023, 6, 10).unwrap());
        assert_eq!(config.turbine_ids, vec![2, 5]);
        assert_eq!(config.components, vec!["Tower".to_string(), "Yaw".to_string()]);
        assert_eq!(config.max_turbine_id(), 5);
    }

    #[test]
    fn bad_generate_args_are_usage_errors() {
        let cli = crate::cli::Cli::parse_from(["trisk", "generate", "--end-date", "2025-02-30"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let err = generation_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
