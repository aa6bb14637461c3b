//! Launching the external profile-switch tool

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to launch {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Starts the external tool with a profile argument
pub trait ProfileLauncher: Send {
    fn launch(&self, tool: &Path, profile: &str) -> Result<(), LaunchError>;
}

/// Spawns the tool as a detached child process.
///
/// The child is not waited on, and on Windows it gets no console window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

impl ProfileLauncher for CommandLauncher {
    fn launch(&self, tool: &Path, profile: &str) -> Result<(), LaunchError> {
        let mut command = Command::new(tool);
        command
            .arg(profile)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command.spawn().map_err(|source| LaunchError::Spawn {
            path: tool.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("does-not-exist.exe");

        let err = CommandLauncher.launch(&tool, "-Profile1").unwrap_err();
        let LaunchError::Spawn { path, .. } = err;
        assert_eq!(path, tool);
    }
}
