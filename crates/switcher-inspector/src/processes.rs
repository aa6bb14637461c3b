//! Running-process enumeration via `sysinfo`

use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, System};

/// Cached process table, refreshed on every query.
///
/// Only the process list itself is refreshed; names come with it, and CPU,
/// memory, disk and command-line data are never loaded.
pub struct ProcessTable {
    system: Mutex<System>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    /// Executable names of every running process, ordered by pid
    pub fn names(&self) -> Vec<String> {
        let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
        system.refresh_processes_specifics(ProcessRefreshKind::new());

        let mut processes: Vec<(u32, String)> = system
            .processes()
            .iter()
            .map(|(pid, process)| (pid.as_u32(), process.name().to_string()))
            .collect();
        processes.sort_by_key(|(pid, _)| *pid);
        processes.into_iter().map(|(_, name)| name).collect()
    }

    /// Executable name of one process, if it is still running
    pub fn name_of(&self, process_id: u32) -> Option<String> {
        let pid = Pid::from_u32(process_id);
        let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
        if !system.refresh_process_specifics(pid, ProcessRefreshKind::new()) {
            return None;
        }
        system.process(pid).map(|p| p.name().to_string())
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
