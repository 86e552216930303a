//! Unit tests for the listener loop and restart protocol

use std::sync::Arc;

use super::*;
use crate::domain::RawNotification;
use crate::error::AppError;
use crate::port::notification_source::mocks::{FetchStep, MockNotificationSource};
use crate::port::process_control::mocks::MockProcessControl;
use crate::port::SourceError;

fn raw(id: u32, texts: &[&str]) -> RawNotification {
    RawNotification::new(id, texts.to_vec())
}

fn listener_with(
    keyword: &str,
    source: Arc<MockNotificationSource>,
    process: Arc<MockProcessControl>,
) -> Listener {
    Listener::new(
        ListenerConfig::new(keyword, "/opt/app/managed"),
        source,
        process,
    )
}

#[tokio::test(start_paused = true)]
async fn test_keyword_match_spawns_exactly_once() {
    // previous {1}, snapshot [1, 2-with-KEY] -> exactly one spawn
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["A", "x"])],
        vec![raw(1, &["A", "x"]), raw(2, &["Alert", "contains KEY here"])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    assert!(!listener.run_cycle().await.unwrap());
    assert_eq!(process.spawn_count(), 0);

    assert!(listener.run_cycle().await.unwrap());
    assert_eq!(process.spawn_count(), 1);
    // No prior handle existed, so nothing was terminated
    assert_eq!(process.terminate_count(), 0);
    assert!(listener.managed_handle().is_some());

    let ids: Vec<_> = listener.view().current().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_removal_cycle_triggers_no_restart() {
    // previous {1,2}, snapshot [2] -> removed {1}, no restart
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["A"]), raw(2, &["B"])],
        vec![raw(2, &["B"])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    assert!(!listener.run_cycle().await.unwrap());
    assert!(!listener.run_cycle().await.unwrap());

    assert_eq!(process.spawn_count(), 0);
    assert_eq!(process.terminate_count(), 0);
    let ids: Vec<_> = listener.view().current().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_second_restart_terminates_previous_handle() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["KEY hit"])],
        vec![raw(1, &["KEY hit"]), raw(2, &["another KEY"])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    assert!(listener.run_cycle().await.unwrap());
    let first = listener.managed_handle().unwrap();

    assert!(listener.run_cycle().await.unwrap());
    let second = listener.managed_handle().unwrap();

    assert_eq!(process.spawn_count(), 2);
    assert_eq!(process.terminate_count(), 1);
    assert_eq!(process.terminated_handles(), vec![first]);
    assert_ne!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_termination_failure_is_swallowed_and_handle_cleared() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["KEY"])],
        vec![raw(1, &["KEY"]), raw(2, &["KEY again"])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    process.fail_terminations();
    let mut listener = listener_with("KEY", source, process.clone());

    assert!(listener.run_cycle().await.unwrap());
    // Second restart: terminate fails, but the replacement is spawned anyway
    assert!(listener.run_cycle().await.unwrap());

    assert_eq!(process.terminate_count(), 1);
    assert_eq!(process.spawn_count(), 2);
    assert!(listener.managed_handle().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_spawn_failure_is_fatal() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![vec![raw(
        1,
        &["KEY"],
    )]]));
    let process = Arc::new(MockProcessControl::new());
    process.fail_next_spawn();
    let mut listener = listener_with("KEY", source, process.clone());

    let result = listener.run_cycle().await;

    assert!(matches!(result, Err(AppError::Process(_))));
    assert!(listener.managed_handle().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_entry_aborts_cycle_without_partial_apply() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["A"])],
        // id 2 is valid but id 3 has no text elements; nothing may be applied
        vec![raw(1, &["A"]), raw(2, &["B"]), raw(3, &[])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    listener.run_cycle().await.unwrap();
    let result = listener.run_cycle().await;

    assert!(matches!(result, Err(AppError::Domain(_))));
    let ids: Vec<_> = listener.view().current().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(process.spawn_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_fetch_degrades_to_empty_snapshot() {
    let source = Arc::new(MockNotificationSource::new(vec![
        FetchStep::Snapshot(vec![raw(1, &["A"])]),
        FetchStep::Fail(SourceError::Transient("socket hiccup".to_string())),
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    listener.run_cycle().await.unwrap();
    assert_eq!(listener.view().current().len(), 1);

    // Transient failure reconciles against an empty snapshot
    assert!(!listener.run_cycle().await.unwrap());
    assert!(listener.view().current().is_empty());
    assert_eq!(process.spawn_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_fetch_failure_is_fatal() {
    let source = Arc::new(MockNotificationSource::new(vec![FetchStep::Fail(
        SourceError::AccessRevoked,
    )]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process);

    let result = listener.run_cycle().await;

    assert!(matches!(result, Err(AppError::Source(_))));
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_snapshot_is_idempotent_and_never_rematches() {
    // The matching notification stays present; only *added* items are
    // evaluated, so no further restart fires on later cycles.
    let snapshot = vec![raw(1, &["Alert", "contains KEY here"])];
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        snapshot.clone(),
        snapshot.clone(),
        snapshot,
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process.clone());

    assert!(listener.run_cycle().await.unwrap());
    assert!(!listener.run_cycle().await.unwrap());
    assert!(!listener.run_cycle().await.unwrap());

    assert_eq!(process.spawn_count(), 1);
    assert_eq!(listener.view().current().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_feed_publishes_ordered_add_and_remove_events() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![
        vec![raw(1, &["A"]), raw(2, &["B"])],
        vec![raw(2, &["B"]), raw(3, &["C"])],
    ]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source, process);

    let view = listener.view();
    let mut events = view.subscribe();

    listener.run_cycle().await.unwrap();
    listener.run_cycle().await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(events.recv().await.unwrap());
    }
    match &seen[..] {
        [NoticeEvent::Added(a), NoticeEvent::Added(b), NoticeEvent::Removed(r), NoticeEvent::Added(c)] =>
        {
            assert_eq!((a.id, b.id, *r, c.id), (1, 2, 1, 3));
        }
        other => panic!("unexpected event order: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_exits_before_fetch_when_already_cancelled() {
    let source = Arc::new(MockNotificationSource::with_snapshots(vec![vec![raw(
        1,
        &["A"],
    )]]));
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source.clone(), process);

    let (tx, rx) = shutdown_channel();
    tx.shutdown();

    listener.run(rx).await.unwrap();
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_fails_fast_when_access_denied() {
    let source = Arc::new(
        MockNotificationSource::with_snapshots(vec![]).deny_access(SourceError::AccessDenied),
    );
    let process = Arc::new(MockProcessControl::new());
    let mut listener = listener_with("KEY", source.clone(), process);

    let (_tx, rx) = shutdown_channel();
    let result = listener.run(rx).await;

    assert!(matches!(result, Err(AppError::Source(_))));
    assert_eq!(source.fetch_count(), 0);
}
