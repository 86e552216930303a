// Notification Source Port
// Abstraction over the platform notification API

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RawNotification;

/// Source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Notification listener is not supported on this platform")]
    Unsupported,

    #[error("Access to notifications was denied")]
    AccessDenied,

    #[error("Access to notifications was revoked")]
    AccessRevoked,

    #[error("Transient fetch failure: {0}")]
    Transient(String),
}

impl SourceError {
    /// Permanent failures terminate the loop; transient ones are treated as
    /// an empty snapshot for the cycle.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, SourceError::Transient(_))
    }
}

/// Notification source trait
///
/// Implementations:
/// - JsonFileSource: snapshot file on disk (infra-system)
/// - MockNotificationSource: scripted snapshots for tests
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Capability check, performed once before the loop starts.
    ///
    /// # Errors
    /// - SourceError::Unsupported if the platform feature is absent
    /// - SourceError::AccessDenied if the user/environment denied access
    async fn request_access(&self) -> Result<(), SourceError>;

    /// Fetch the full current notification set, in source order.
    ///
    /// No timeout is applied by callers; a hung fetch hangs the polling loop
    /// (documented limitation).
    ///
    /// # Errors
    /// - SourceError::AccessRevoked if access was lost after startup (permanent)
    /// - SourceError::Transient for any recoverable failure
    async fn fetch_current(&self) -> Result<Vec<RawNotification>, SourceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted outcome of one fetch call
    pub enum FetchStep {
        Snapshot(Vec<RawNotification>),
        Fail(SourceError),
    }

    /// Mock notification source replaying a scripted snapshot sequence.
    /// Once the script is exhausted, the last snapshot repeats.
    pub struct MockNotificationSource {
        steps: Mutex<VecDeque<FetchStep>>,
        last: Mutex<Vec<RawNotification>>,
        fetch_count: Arc<Mutex<usize>>,
        access_result: Mutex<Option<SourceError>>,
    }

    impl MockNotificationSource {
        pub fn new(steps: Vec<FetchStep>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                last: Mutex::new(Vec::new()),
                fetch_count: Arc::new(Mutex::new(0)),
                access_result: Mutex::new(None),
            }
        }

        pub fn with_snapshots(snapshots: Vec<Vec<RawNotification>>) -> Self {
            Self::new(snapshots.into_iter().map(FetchStep::Snapshot).collect())
        }

        pub fn deny_access(self, err: SourceError) -> Self {
            *self.access_result.lock().unwrap() = Some(err);
            self
        }

        pub fn fetch_count(&self) -> usize {
            *self.fetch_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl NotificationSource for MockNotificationSource {
        async fn request_access(&self) -> Result<(), SourceError> {
            match self.access_result.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn fetch_current(&self) -> Result<Vec<RawNotification>, SourceError> {
            *self.fetch_count.lock().unwrap() += 1;

            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(FetchStep::Snapshot(snapshot)) => {
                    *self.last.lock().unwrap() = snapshot.clone();
                    Ok(snapshot)
                }
                Some(FetchStep::Fail(err)) => Err(err),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }
    }
}
