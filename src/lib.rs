//! `turbine-risk` library crate.
//!
//! The binary (`trisk`) is a thin wrapper around this library so that:
//!
//! - synthesis and aggregation are testable without spawning processes
//! - the CLI and the TUI share one load/aggregate pipeline
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod synth;
pub mod tui;
