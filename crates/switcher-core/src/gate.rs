//! The transition gate: only launch the tool when the profile changes

use crate::launcher::ProfileLauncher;
use crate::resolver::Resolution;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{error, info};

/// An applied profile change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Previously applied profile, `None` on the first transition
    pub from: Option<String>,
    pub to: String,
    /// The keyword that caused the change, or "none"
    pub trigger: String,
    /// Whether the external tool was started successfully
    pub launched: bool,
    pub at: DateTime<Utc>,
}

impl Transition {
    /// Notification headline, e.g. "Detected: discord"
    pub fn title(&self) -> String {
        format!("Detected: {}", self.trigger)
    }

    /// Notification text, e.g. "Applied profile: -Profile2"
    pub fn body(&self) -> String {
        format!("Applied profile: {}", self.to)
    }
}

/// Tracks the last requested profile.
///
/// Starts out empty, so the first decision always goes through. State
/// advances on every attempted launch, failed or not: a broken tool path must
/// not cause a relaunch on every cycle.
#[derive(Debug, Default)]
pub struct TransitionGate {
    current: Option<String>,
}

impl TransitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Launch `desired` if it differs from the current profile.
    ///
    /// Returns the transition when one happened, `None` when nothing changed.
    pub fn maybe_apply(
        &mut self,
        desired: &str,
        outcome: &Resolution,
        launcher: &dyn ProfileLauncher,
        tool: &Path,
    ) -> Option<Transition> {
        if self.current.as_deref() == Some(desired) {
            return None;
        }

        let trigger = outcome.label().to_string();
        info!(
            "Running application detected: '{}', desired profile: {}",
            trigger, desired
        );

        let launched = match launcher.launch(tool, desired) {
            Ok(()) => {
                info!("Successfully applied profile: {}", desired);
                true
            }
            Err(e) => {
                error!("Failed to launch Afterburner with profile {}: {}", desired, e);
                false
            }
        };

        let from = self.current.replace(desired.to_string());
        Some(Transition {
            from,
            to: desired.to_string(),
            trigger,
            launched,
            at: Utc::now(),
        })
    }
}
