// System process control implementation
// reason: async-trait, tokio for async process management

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use noticed_core::port::process_control::{ProcessControl, ProcessError, ProcessHandle};

/// Real OS process control. Spawn detaches the child (stdio nulled) and reaps
/// it on a background task; terminate sends a hard kill, matching the
/// listener's best-effort restart protocol.
#[derive(Debug, Default)]
pub struct SystemProcessControl;

impl SystemProcessControl {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessControl for SystemProcessControl {
    async fn spawn(&self, path: &Path) -> Result<ProcessHandle, ProcessError> {
        let mut child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(format!("{}: {e}", path.display())))?;

        let pid = child
            .id()
            .ok_or_else(|| ProcessError::SpawnFailed("child exited before pid read".to_string()))?;

        // Reap on a background task so an exited child does not linger as a
        // zombie; the listener only keeps the pid.
        tokio::spawn(async move {
            let status = child.wait().await;
            debug!(pid = %pid, status = ?status, "Managed child reaped");
        });

        info!(pid = %pid, path = %path.display(), "Spawned managed process");
        Ok(ProcessHandle(pid))
    }

    async fn terminate(&self, handle: ProcessHandle) -> Result<(), ProcessError> {
        info!(pid = %handle, "Killing managed process");

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            kill(Pid::from_raw(handle.0 as i32), Signal::SIGKILL)
                .map_err(|e| ProcessError::TerminateFailed(format!("SIGKILL failed: {e}")))?;
            Ok(())
        }

        #[cfg(windows)]
        {
            use std::process::Command;

            let output = Command::new("taskkill")
                .args(["/F", "/PID", &handle.0.to_string()])
                .output()
                .map_err(|e| ProcessError::TerminateFailed(e.to_string()))?;

            if !output.status.success() {
                return Err(ProcessError::TerminateFailed(format!(
                    "taskkill failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                )));
            }

            Ok(())
        }
    }
}
