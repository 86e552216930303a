// Process Control Port
// Abstraction for spawning and terminating the managed process

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Opaque handle to a spawned process (OS pid underneath)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle(pub u32);

impl std::fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process control errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Terminate failed: {0}")]
    TerminateFailed(String),
}

/// Process control trait
///
/// Implementations:
/// - SystemProcessControl: real OS processes (infra-system)
/// - MockProcessControl: call-counting stub for tests
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Spawn a new process from the given executable path.
    ///
    /// # Errors
    /// - ProcessError::SpawnFailed if the process cannot be started
    async fn spawn(&self, path: &Path) -> Result<ProcessHandle, ProcessError>;

    /// Request termination of a previously spawned process. Best-effort:
    /// callers clear their tracked handle regardless of the outcome.
    ///
    /// # Errors
    /// - ProcessError::TerminateFailed if the signal cannot be delivered
    async fn terminate(&self, handle: ProcessHandle) -> Result<(), ProcessError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock process control recording spawn/terminate calls
    pub struct MockProcessControl {
        next_pid: Mutex<u32>,
        spawned: Mutex<Vec<PathBuf>>,
        terminated: Mutex<Vec<ProcessHandle>>,
        fail_spawn: Mutex<bool>,
        fail_terminate: Mutex<bool>,
    }

    impl Default for MockProcessControl {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProcessControl {
        pub fn new() -> Self {
            Self {
                next_pid: Mutex::new(100),
                spawned: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
                fail_spawn: Mutex::new(false),
                fail_terminate: Mutex::new(false),
            }
        }

        pub fn fail_next_spawn(&self) {
            *self.fail_spawn.lock().unwrap() = true;
        }

        pub fn fail_terminations(&self) {
            *self.fail_terminate.lock().unwrap() = true;
        }

        pub fn spawn_count(&self) -> usize {
            self.spawned.lock().unwrap().len()
        }

        pub fn spawned_paths(&self) -> Vec<PathBuf> {
            self.spawned.lock().unwrap().clone()
        }

        pub fn terminate_count(&self) -> usize {
            self.terminated.lock().unwrap().len()
        }

        pub fn terminated_handles(&self) -> Vec<ProcessHandle> {
            self.terminated.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessControl for MockProcessControl {
        async fn spawn(&self, path: &Path) -> Result<ProcessHandle, ProcessError> {
            if std::mem::take(&mut *self.fail_spawn.lock().unwrap()) {
                return Err(ProcessError::SpawnFailed("mock spawn failure".to_string()));
            }
            self.spawned.lock().unwrap().push(path.to_path_buf());
            let mut pid = self.next_pid.lock().unwrap();
            *pid += 1;
            Ok(ProcessHandle(*pid))
        }

        async fn terminate(&self, handle: ProcessHandle) -> Result<(), ProcessError> {
            self.terminated.lock().unwrap().push(handle);
            if *self.fail_terminate.lock().unwrap() {
                return Err(ProcessError::TerminateFailed(
                    "mock terminate failure".to_string(),
                ));
            }
            Ok(())
        }
    }
}
