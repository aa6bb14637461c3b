//! Platform-specific window queries
//!
//! Only Windows is supported. Elsewhere every window query reports
//! [`InspectError::Unsupported`], which the resolver treats as "no
//! information", so the process tier still works.

#[cfg(target_os = "windows")]
mod windows;

use std::sync::mpsc::SyncSender;
use std::thread::JoinHandle;
use switcher_core::{ForegroundWindow, InspectError, WindowEvent};

#[cfg(target_os = "windows")]
pub fn foreground_window() -> Result<ForegroundWindow, InspectError> {
    windows::foreground_window()
}

#[cfg(target_os = "windows")]
pub fn process_name(process_id: u32) -> Result<String, InspectError> {
    windows::process_name(process_id)
}

#[cfg(target_os = "windows")]
pub fn visible_window_titles() -> Result<Vec<String>, InspectError> {
    windows::visible_window_titles()
}

#[cfg(target_os = "windows")]
pub fn spawn_event_hook(sink: SyncSender<WindowEvent>) -> Result<JoinHandle<()>, InspectError> {
    windows::spawn_event_hook(sink)
}

#[cfg(not(target_os = "windows"))]
pub fn foreground_window() -> Result<ForegroundWindow, InspectError> {
    Err(InspectError::Unsupported)
}

#[cfg(not(target_os = "windows"))]
pub fn process_name(_process_id: u32) -> Result<String, InspectError> {
    Err(InspectError::Unsupported)
}

#[cfg(not(target_os = "windows"))]
pub fn visible_window_titles() -> Result<Vec<String>, InspectError> {
    Err(InspectError::Unsupported)
}

#[cfg(not(target_os = "windows"))]
pub fn spawn_event_hook(_sink: SyncSender<WindowEvent>) -> Result<JoinHandle<()>, InspectError> {
    Err(InspectError::Unsupported)
}
