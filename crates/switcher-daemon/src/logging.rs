//! Log setup: console plus a log file the tray can open

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Library crates log under `switcher_*`, this binary under its own name
const DEFAULT_DIRECTIVES: [&str; 2] = ["switcher=info", "afterburner_switcher=info"];

/// Install the global subscriber and return the log file path
pub fn init() -> Result<PathBuf> {
    let path = switcher_core::log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(filter(EnvFilter::from_default_env())?)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    Ok(path)
}

fn filter(base: EnvFilter) -> Result<EnvFilter> {
    let mut filter = base;
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}
