//! `env_logger` setup.
//!
//! `RUST_LOG` always wins; otherwise each command picks its own default filter
//! (the TUI runs with logging off so stderr does not scribble over the screen).

use env_logger::{Builder, Env};

pub fn init(default_filter: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
