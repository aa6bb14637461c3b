//! Afterburner Switcher Core Library
//!
//! Decides which configured application is active and keeps MSI Afterburner
//! on the matching profile: config loading, target resolution, profile
//! decision, the transition gate and the scheduler loops that drive them.

pub mod config;
pub mod decision;
pub mod engine;
pub mod gate;
pub mod inspect;
pub mod launcher;
pub mod resolver;
pub mod scheduler;
pub mod targets;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, ConfigSnapshot, ConfigSource, FileConfig, MonitoringMode};
pub use decision::decide_profile;
pub use engine::{Engine, Notifier};
pub use gate::{Transition, TransitionGate};
pub use inspect::{ForegroundWindow, InspectError, Inspector, WindowEvent};
pub use launcher::{CommandLauncher, LaunchError, ProfileLauncher};
pub use resolver::{Detection, Resolution, Tier};
pub use targets::TargetSet;

use std::path::PathBuf;

/// Get the data directory for the switcher
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "afterburner-switcher", "afterburner-switcher")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            directories::BaseDirs::new()
                .map(|d| d.home_dir().join(".afterburner-switcher"))
                .unwrap_or_else(|| PathBuf::from(".afterburner-switcher"))
        })
}

/// Get the log file path
pub fn log_path() -> PathBuf {
    data_dir().join("switcher.log")
}

/// Default config location: `config.json` next to where the switcher runs
pub fn default_config_path() -> PathBuf {
    PathBuf::from(config::CONFIG_FILE)
}
