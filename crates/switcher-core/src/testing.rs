//! In-memory collaborators for unit tests

use crate::inspect::{ForegroundWindow, InspectError, Inspector};
use crate::launcher::{LaunchError, ProfileLauncher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// An inspector answering from fixed data
#[derive(Debug, Clone, Default)]
pub struct StaticInspector {
    foreground: Option<ForegroundWindow>,
    processes: Vec<(u32, String)>,
    windows: Vec<String>,
    fail_processes: bool,
    fail_windows: bool,
}

impl StaticInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreground(mut self, title: &str, process_id: u32) -> Self {
        self.foreground = Some(ForegroundWindow {
            title: title.to_string(),
            process_id,
        });
        self
    }

    pub fn with_process(mut self, process_id: u32, name: &str) -> Self {
        self.processes.push((process_id, name.to_string()));
        self
    }

    pub fn with_window(mut self, title: &str) -> Self {
        self.windows.push(title.to_string());
        self
    }

    pub fn failing_processes(mut self) -> Self {
        self.fail_processes = true;
        self
    }

    pub fn failing_windows(mut self) -> Self {
        self.fail_windows = true;
        self
    }
}

impl Inspector for StaticInspector {
    fn foreground_window(&self) -> Result<ForegroundWindow, InspectError> {
        self.foreground.clone().ok_or(InspectError::NoForegroundWindow)
    }

    fn process_name(&self, process_id: u32) -> Result<String, InspectError> {
        self.processes
            .iter()
            .find(|(pid, _)| *pid == process_id)
            .map(|(_, name)| name.clone())
            .ok_or_else(|| InspectError::Query {
                what: "process name",
                reason: format!("no process {}", process_id),
            })
    }

    fn process_names(&self) -> Result<Vec<String>, InspectError> {
        if self.fail_processes {
            return Err(InspectError::Query {
                what: "process list",
                reason: "snapshot failed".to_string(),
            });
        }
        Ok(self.processes.iter().map(|(_, name)| name.clone()).collect())
    }

    fn visible_window_titles(&self) -> Result<Vec<String>, InspectError> {
        if self.fail_windows {
            return Err(InspectError::Unsupported);
        }
        Ok(self.windows.clone())
    }
}

/// A launcher that records every call instead of spawning anything
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn profiles(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, p)| p).collect()
    }
}

impl ProfileLauncher for RecordingLauncher {
    fn launch(&self, tool: &Path, profile: &str) -> Result<(), LaunchError> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_path_buf(), profile.to_string()));
        if self.fail {
            return Err(LaunchError::Spawn {
                path: tool.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(())
    }
}
