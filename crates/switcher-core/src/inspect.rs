//! The operating-system queries target resolution depends on

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("No foreground window")]
    NoForegroundWindow,
    #[error("Failed to query {what}: {reason}")]
    Query { what: &'static str, reason: String },
    #[error("Unsupported platform")]
    Unsupported,
}

/// The window that currently has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundWindow {
    /// Window title, possibly empty
    pub title: String,
    /// Id of the process owning the window (0 if unknown)
    pub process_id: u32,
}

/// Window and process introspection.
///
/// Every query may fail; callers treat a failure as "no information" rather
/// than aborting.
pub trait Inspector: Send {
    fn foreground_window(&self) -> Result<ForegroundWindow, InspectError>;

    /// Executable file name (e.g. `discord.exe`) of a process
    fn process_name(&self, process_id: u32) -> Result<String, InspectError>;

    /// Executable names of all running processes
    fn process_names(&self) -> Result<Vec<String>, InspectError>;

    /// Titles of all visible top-level windows
    fn visible_window_titles(&self) -> Result<Vec<String>, InspectError>;
}

/// A window-system notification that should trigger a re-evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    ForegroundChanged,
    ObjectCreated,
    ObjectDestroyed,
}
