//! One evaluation cycle: reload config, resolve, decide, maybe apply

use crate::config::{self, ConfigError, ConfigSnapshot, ConfigSource};
use crate::gate::{Transition, TransitionGate};
use crate::inspect::Inspector;
use crate::launcher::ProfileLauncher;
use crate::resolver;
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort user notification about an applied profile
pub trait Notifier: Send {
    fn notify(&self, transition: &Transition) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Owns everything one evaluation needs.
///
/// The engine is driven from a single thread; the gate state is only reachable
/// through `&mut self`, so evaluations are serialized by construction.
pub struct Engine {
    config: Box<dyn ConfigSource>,
    inspector: Box<dyn Inspector>,
    launcher: Box<dyn ProfileLauncher>,
    notifier: Option<Box<dyn Notifier>>,
    gate: TransitionGate,
    snapshot: Arc<ConfigSnapshot>,
}

impl Engine {
    /// Create an engine, loading the initial config snapshot
    pub fn new(
        config: Box<dyn ConfigSource>,
        inspector: Box<dyn Inspector>,
        launcher: Box<dyn ProfileLauncher>,
    ) -> Result<Self, ConfigError> {
        let snapshot = Arc::new(config.load()?);
        Ok(Self {
            config,
            inspector,
            launcher,
            notifier: None,
            gate: TransitionGate::new(),
            snapshot,
        })
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The snapshot used by the most recent evaluation
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn current_profile(&self) -> Option<&str> {
        self.gate.current()
    }

    /// Reload the config, then resolve and apply against the fresh snapshot.
    ///
    /// A config error is returned as-is; the caller is expected to stop.
    pub fn evaluate(&mut self) -> Result<Option<Transition>, ConfigError> {
        self.reload()?;
        Ok(self.apply_current())
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        let fresh = self.config.load()?;
        config::log_changes(&self.snapshot, &fresh);
        self.snapshot = Arc::new(fresh);
        Ok(())
    }

    fn apply_current(&mut self) -> Option<Transition> {
        let snapshot = Arc::clone(&self.snapshot);
        let outcome = resolver::resolve(self.inspector.as_ref(), &snapshot.targets);
        let desired = snapshot.desired_profile(&outcome);
        debug!("Resolved {:?}, desired profile {}", outcome, desired);

        let transition = self.gate.maybe_apply(
            desired,
            &outcome,
            self.launcher.as_ref(),
            &snapshot.afterburner_path,
        )?;

        if snapshot.notifications && transition.launched {
            self.notify(&transition);
        }
        Some(transition)
    }

    fn notify(&self, transition: &Transition) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        if let Err(e) = notifier.notify(transition) {
            warn!("Failed to send notification: {}", e);
        }
    }
}
