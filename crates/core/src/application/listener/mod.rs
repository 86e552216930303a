// Listener - keyword-triggered reconciliation/restart loop

pub mod constants;
mod feed;
mod shutdown;

pub use feed::{NoticeEvent, NoticeView};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::{diff, LiveSet, Notification};
use crate::error::Result;
use crate::port::{NotificationSource, ProcessControl, ProcessHandle};

use constants::{POLL_INTERVAL, RESTART_SETTLE_DELAY};
use feed::NoticeFeed;

/// Listener configuration, passed explicitly at construction
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Case-sensitive substring matched against title and body of newly
    /// observed notifications
    pub keyword: String,
    /// Executable started (and restarted) on a keyword match
    pub app_location: PathBuf,
    /// Delay between reconciliation cycles
    pub poll_interval: Duration,
    /// Delay between termination request and replacement spawn
    pub settle_delay: Duration,
}

impl ListenerConfig {
    pub fn new(keyword: impl Into<String>, app_location: impl Into<PathBuf>) -> Self {
        Self {
            keyword: keyword.into(),
            app_location: app_location.into(),
            poll_interval: POLL_INTERVAL,
            settle_delay: RESTART_SETTLE_DELAY,
        }
    }
}

/// Listener owns the polling loop, the live notification set and the
/// managed-process handle. One loop per instance; `run` must not be started
/// twice concurrently (it takes `&mut self`, so the borrow checker enforces
/// this).
pub struct Listener {
    config: ListenerConfig,
    source: Arc<dyn NotificationSource>,
    process: Arc<dyn ProcessControl>,
    live: LiveSet,
    managed: Option<ProcessHandle>,
    feed: NoticeFeed,
}

impl Listener {
    /// Create a listener with an empty live set and no tracked process
    pub fn new(
        config: ListenerConfig,
        source: Arc<dyn NotificationSource>,
        process: Arc<dyn ProcessControl>,
    ) -> Self {
        Self {
            config,
            source,
            process,
            live: LiveSet::new(),
            managed: None,
            feed: NoticeFeed::new(),
        }
    }

    /// Read-only, change-notifying view over the live set
    pub fn view(&self) -> NoticeView {
        self.feed.view()
    }

    /// Handle of the currently tracked managed process, if any
    pub fn managed_handle(&self) -> Option<ProcessHandle> {
        self.managed
    }

    /// Run the reconciliation loop until cancelled.
    ///
    /// Performs the source capability check once before the first cycle;
    /// an unsupported platform or denied access is fatal and surfaces here
    /// before any polling happens. Cancellation is cooperative: the token is
    /// checked at the top of each cycle and raced against the sleep, never
    /// mid-fetch. On exit the managed process (if any) is left running.
    pub async fn run(&mut self, mut shutdown: ShutdownToken) -> Result<()> {
        self.source.request_access().await?;
        info!(keyword = %self.config.keyword, "Listener started");

        loop {
            if shutdown.is_shutdown() {
                info!("Listener shutting down");
                break;
            }

            self.run_cycle().await?;

            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                _ = shutdown.wait() => {
                    info!("Listener interrupted during sleep");
                    break;
                }
            }
        }

        if let Some(handle) = self.managed {
            info!(pid = %handle, "Listener stopped; managed process left running");
        } else {
            info!("Listener stopped");
        }
        Ok(())
    }

    /// Run exactly one reconciliation cycle: fetch, extract, diff, apply,
    /// evaluate, and restart if a newly added notification matched the
    /// keyword. Returns true if a restart was performed.
    ///
    /// # Errors
    /// - a permanent source failure (access revoked) is fatal
    /// - a malformed snapshot entry (no text elements) is fatal
    /// - a spawn failure during restart is fatal
    pub async fn run_cycle(&mut self) -> Result<bool> {
        // Fetching: transient failures degrade to an empty snapshot
        let raw = match self.source.fetch_current().await {
            Ok(raw) => raw,
            Err(err) if err.is_permanent() => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "Transient fetch failure, treating as empty snapshot");
                Vec::new()
            }
        };

        // Title/body extraction: a malformed entry aborts the cycle with no
        // partial reconciliation applied
        let snapshot = raw
            .into_iter()
            .map(Notification::from_raw)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Reconciling
        let delta = diff(&self.live.ids(), &snapshot);

        // Evaluating: only newly added notifications participate in the match
        let matched = delta
            .added
            .iter()
            .any(|n| n.matches_keyword(&self.config.keyword));

        for id in &delta.removed_ids {
            if let Some(removed) = self.live.remove(*id) {
                self.feed
                    .publish(NoticeEvent::Removed(removed.id), self.live.entries());
            }
        }
        for notice in &delta.added {
            if self.live.insert(notice.clone()) {
                self.feed
                    .publish(NoticeEvent::Added(notice.clone()), self.live.entries());
            }
        }

        debug!(
            live = self.live.len(),
            added = delta.added.len(),
            removed = delta.removed_ids.len(),
            "Reconciled snapshot"
        );

        if matched {
            info!("Keyword matched in a new notification, restarting managed process");
            self.restart().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Restart protocol, idempotent best-effort. At most one managed handle
    /// is live at any point: the tracked handle is cleared before the
    /// replacement is spawned, regardless of termination outcome.
    async fn restart(&mut self) -> Result<()> {
        if let Some(handle) = self.managed.take() {
            // Best-effort: a failed termination is logged, never retried
            if let Err(err) = self.process.terminate(handle).await {
                warn!(pid = %handle, error = %err, "Termination failed; handle cleared anyway");
            }
        }

        sleep(self.config.settle_delay).await;

        let handle = self.process.spawn(&self.config.app_location).await?;
        info!(
            pid = %handle,
            path = %self.config.app_location.display(),
            "Managed process started"
        );
        self.managed = Some(handle);
        Ok(())
    }
}

#[cfg(test)]
#[path = "listener_test.rs"]
mod listener_test;
