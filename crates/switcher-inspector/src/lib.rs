//! Window and process introspection for the Afterburner profile switcher
//!
//! Implements [`switcher_core::Inspector`] on top of the Windows window APIs
//! (through the `windows` crate) and `sysinfo` for the process list, and
//! provides the WinEvent hook that feeds event-driven monitoring.

pub mod platform;
pub mod processes;

use std::sync::mpsc::SyncSender;
use std::thread::JoinHandle;
use switcher_core::{ForegroundWindow, InspectError, Inspector, WindowEvent};
use tracing::debug;

pub use processes::ProcessTable;

/// The inspector used by the daemon and the CLI
#[derive(Default)]
pub struct SystemInspector {
    processes: ProcessTable,
}

impl SystemInspector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inspector for SystemInspector {
    fn foreground_window(&self) -> Result<ForegroundWindow, InspectError> {
        platform::foreground_window()
    }

    fn process_name(&self, process_id: u32) -> Result<String, InspectError> {
        // Elevated processes refuse OpenProcess; the process table still knows them
        platform::process_name(process_id).or_else(|e| {
            debug!("Native process lookup for {} failed: {}", process_id, e);
            self.processes.name_of(process_id).ok_or(e)
        })
    }

    fn process_names(&self) -> Result<Vec<String>, InspectError> {
        let names = self.processes.names();
        if names.is_empty() {
            return Err(InspectError::Query {
                what: "process list",
                reason: "no processes reported".to_string(),
            });
        }
        Ok(names)
    }

    fn visible_window_titles(&self) -> Result<Vec<String>, InspectError> {
        platform::visible_window_titles()
    }
}

/// Start forwarding window events into `sink`.
///
/// The hook thread runs until the process exits or the receiving side of
/// `sink` is dropped.
pub fn watch_window_events(sink: SyncSender<WindowEvent>) -> Result<JoinHandle<()>, InspectError> {
    platform::spawn_event_hook(sink)
}
