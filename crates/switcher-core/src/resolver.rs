//! Target resolution
//!
//! Decides which configured keyword, if any, is active right now. Three
//! detection tiers are tried in strict priority order and the first match
//! wins:
//!
//! 1. the foreground window (its title, then its process executable name)
//! 2. the list of running processes
//! 3. the titles of all visible windows
//!
//! A failing OS query never aborts resolution; that probe simply contributes
//! nothing and the next one runs.

use crate::inspect::{InspectError, Inspector};
use crate::targets::TargetSet;
use std::fmt;
use tracing::debug;

/// Outcome of one resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoMatch,
    Matched(String),
}

impl Resolution {
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Resolution::NoMatch => None,
            Resolution::Matched(keyword) => Some(keyword),
        }
    }

    /// Human-readable trigger label: the keyword, or "none"
    pub fn label(&self) -> &str {
        self.keyword().unwrap_or("none")
    }
}

/// A detection strategy, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Foreground,
    Process,
    Window,
}

/// Signature shared by every tier's probe
type Probe = fn(&dyn Inspector, &TargetSet) -> Option<String>;

impl Tier {
    /// All tiers, strongest signal first
    pub const ALL: [Tier; 3] = [Tier::Foreground, Tier::Process, Tier::Window];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Foreground => "foreground",
            Tier::Process => "process",
            Tier::Window => "window",
        }
    }

    fn probe(&self) -> Probe {
        match self {
            Tier::Foreground => probe_foreground,
            Tier::Process => probe_processes,
            Tier::Window => probe_windows,
        }
    }

    /// Run just this tier
    pub fn detect(&self, inspector: &dyn Inspector, targets: &TargetSet) -> Option<String> {
        (self.probe())(inspector, targets)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which tier matched which keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub tier: Tier,
    pub keyword: String,
}

/// Run the tiers in order and report the first match along with its tier
pub fn detect(inspector: &dyn Inspector, targets: &TargetSet) -> Option<Detection> {
    if targets.is_empty() {
        return None;
    }
    Tier::ALL.iter().find_map(|tier| {
        tier.detect(inspector, targets).map(|keyword| Detection {
            tier: *tier,
            keyword,
        })
    })
}

pub fn resolve(inspector: &dyn Inspector, targets: &TargetSet) -> Resolution {
    match detect(inspector, targets) {
        Some(detection) => {
            debug!("Matched '{}' via {} tier", detection.keyword, detection.tier);
            Resolution::Matched(detection.keyword)
        }
        None => Resolution::NoMatch,
    }
}

fn no_info<T>(what: &str, result: Result<T, InspectError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} probe returned no information: {}", what, e);
            None
        }
    }
}

fn probe_foreground(inspector: &dyn Inspector, targets: &TargetSet) -> Option<String> {
    let window = no_info("foreground window", inspector.foreground_window())?;

    if let Some(keyword) = targets.find_in(&window.title) {
        return Some(keyword.to_string());
    }

    if window.process_id == 0 {
        return None;
    }
    let exe = no_info("foreground process", inspector.process_name(window.process_id))?;
    targets.find_in(&exe).map(str::to_string)
}

fn probe_processes(inspector: &dyn Inspector, targets: &TargetSet) -> Option<String> {
    no_info("process list", inspector.process_names())?
        .iter()
        .find_map(|name| targets.find_in(name))
        .map(str::to_string)
}

fn probe_windows(inspector: &dyn Inspector, targets: &TargetSet) -> Option<String> {
    no_info("window list", inspector.visible_window_titles())?
        .iter()
        .find_map(|title| targets.find_in(title))
        .map(str::to_string)
}
