//! Integration tests for the task tracker actor.
//!
//! The actor runs on the test runtime against an in-memory task backend.
//! Task events are pushed through the listener the tracker registers, so
//! they interleave with commands exactly as platform callbacks would.

mod common;

use std::collections::BTreeMap;
use std::time::Duration;

use carrotplay_lib::config::TrackerConfig;
use carrotplay_lib::platform::TaskEvent;
use carrotplay_lib::tracker::{ActorError, TaskTracker, TrackerHandle, TrackerNotification, TrackerOptions};
use common::{FakeTasks, task};

fn spawn(backend: &std::sync::Arc<FakeTasks>, passive: bool) -> TrackerHandle {
    let options = TrackerOptions { config: TrackerConfig::default(), shell: None, passive };
    TaskTracker::spawn(backend.clone(), options)
}

// ============================================================================
// Launch correlation
// ============================================================================

#[tokio::test]
async fn test_pane_launch_is_confirmed_by_moved_to_front() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);
    let mut notifications = tracker.notifications();

    assert!(tracker.launch_on_display("com.app.a", 21).await.unwrap());
    assert_eq!(
        tracker.pending_launches().await.unwrap(),
        BTreeMap::from([(21, "com.app.a".to_string())])
    );
    assert!(backend.has_call("start com.app.a/.Main 21"));

    let started = backend.tasks()[0].clone();
    assert!(backend.emit(TaskEvent::MovedToFront(started.clone())));

    assert!(tracker.pending_launches().await.unwrap().is_empty());
    assert_eq!(tracker.foreground(21).await.unwrap().as_deref(), Some("com.app.a"));
    assert!(backend.has_call(&format!("focus_root {}", started.task_id)));
    assert_eq!(
        notifications.try_recv().unwrap(),
        TrackerNotification::AppChanged { display_id: 21, package: "com.app.a".to_string() }
    );
}

#[tokio::test]
async fn test_launch_focuses_existing_hidden_task_instead_of_starting() {
    let backend = FakeTasks::new(vec![task(5, 21, "com.app.a", false)]);
    let tracker = spawn(&backend, false);

    assert!(tracker.launch_on_display("com.app.a", 21).await.unwrap());

    assert!(backend.has_call("focus_root 5"));
    assert!(!backend.calls().iter().any(|call| call.starts_with("start")));
    assert!(tracker.pending_launches().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_launch_leaves_no_pending_entry() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);

    assert!(!tracker.launch_on_display("denied.app", 21).await.unwrap());
    assert!(!tracker.launch_on_display("missing.app", 22).await.unwrap());
    assert!(tracker.pending_launches().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unconfirmed_fullscreen_launch_is_focused_after_timeout() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);

    assert!(tracker.launch_fullscreen_on_main("com.app.b", 0).await.unwrap());
    let task_id = backend.tasks()[0].task_id;
    assert!(!backend.has_call(&format!("focus_root {task_id}")));

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(tracker.pending_launches().await.unwrap().is_empty());
    assert!(backend.has_call(&format!("focus_root {task_id}")));
}

#[tokio::test(start_paused = true)]
async fn test_confirmed_fullscreen_launch_is_not_focused_twice() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);

    assert!(tracker.launch_fullscreen_on_main("com.app.b", 0).await.unwrap());
    let started = backend.tasks()[0].clone();
    backend.emit(TaskEvent::MovedToFront(started.clone()));

    tokio::time::sleep(Duration::from_millis(600)).await;
    tracker.snapshot().await.unwrap();

    let focus = format!("focus_root {}", started.task_id);
    assert_eq!(backend.calls().iter().filter(|call| **call == focus).count(), 1);
}

// ============================================================================
// Foreground map
// ============================================================================

#[tokio::test]
async fn test_removal_of_last_visible_task_closes_display() {
    let backend = FakeTasks::new(vec![task(7, 21, "com.app.a", true)]);
    let tracker = spawn(&backend, false);
    let mut notifications = tracker.notifications();

    backend.emit(TaskEvent::MovedToFront(task(7, 21, "com.app.a", true)));
    backend.emit(TaskEvent::RemovalStarted(task(7, 21, "com.app.a", true)));

    assert!(tracker.snapshot().await.unwrap().is_empty());
    assert!(matches!(notifications.try_recv(), Ok(TrackerNotification::AppChanged { .. })));
    assert_eq!(notifications.try_recv().unwrap(), TrackerNotification::AppClosed { display_id: 21 });
}

#[tokio::test]
async fn test_force_stop_forgets_package_on_every_display() {
    let backend = FakeTasks::new(vec![task(7, 21, "com.app.a", true), task(8, 22, "com.app.b", true)]);
    let tracker = spawn(&backend, false);

    backend.emit(TaskEvent::MovedToFront(task(7, 21, "com.app.a", true)));
    backend.emit(TaskEvent::MovedToFront(task(8, 22, "com.app.b", true)));
    assert_eq!(tracker.snapshot().await.unwrap().len(), 2);

    assert!(tracker.force_stop("com.app.a").await.unwrap());
    assert_eq!(
        tracker.snapshot().await.unwrap(),
        BTreeMap::from([(22, "com.app.b".to_string())])
    );
}

#[tokio::test]
async fn test_subscriber_observes_foreground_map() {
    let backend = FakeTasks::new(vec![task(7, 21, "com.app.a", true)]);
    let tracker = spawn(&backend, false);
    let subscriber = tracker.subscribe().await.unwrap();

    backend.emit(TaskEvent::MovedToFront(task(7, 21, "com.app.a", true)));
    tracker.snapshot().await.unwrap();

    assert_eq!(subscriber.get(), BTreeMap::from([(21, "com.app.a".to_string())]));
}

#[tokio::test]
async fn test_queries_read_tasks_live() {
    let mut deep = task(7, 21, "com.app.a", true);
    deep.num_activities = 3;
    let backend = FakeTasks::new(vec![deep, task(8, 22, "com.app.b", true)]);
    let tracker = spawn(&backend, false);

    assert_eq!(tracker.top_activity(21).await.unwrap().as_deref(), Some("com.app.a"));
    assert!(tracker.can_go_back(21).await.unwrap());
    assert_eq!(tracker.top_activity(99).await.unwrap(), None);
}

#[tokio::test]
async fn test_event_burst_larger_than_command_queue_is_fully_applied() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);

    for display_id in 1..=600 {
        let package = format!("com.app.p{display_id}");
        assert!(backend.emit(TaskEvent::MovedToFront(task(display_id, display_id, &package, true))));
    }

    let snapshot = tracker.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 600);
    assert_eq!(snapshot.get(&600).map(String::as_str), Some("com.app.p600"));
}

#[tokio::test]
async fn test_handle_sink_feeds_actor_until_shutdown() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, true);
    let sink = tracker.event_sink();

    assert!(sink.deliver(TaskEvent::MovedToFront(task(7, 21, "com.app.a", true))));
    assert_eq!(tracker.foreground(21).await.unwrap().as_deref(), Some("com.app.a"));

    tracker.shutdown().await.unwrap();
    tokio::task::yield_now().await;
    assert!(!sink.deliver(TaskEvent::MovedToBack(task(7, 21, "com.app.a", false))));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_passive_tracker_does_not_register_listener() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, true);

    tracker.snapshot().await.unwrap();
    assert!(!backend.is_listening());
}

#[tokio::test]
async fn test_stop_listening_keeps_commands_working() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);
    assert!(backend.is_listening());

    tracker.stop_listening().await.unwrap();
    assert!(tracker.launch_on_display("com.app.a", 21).await.unwrap());

    assert!(backend.has_call("unregister"));
    assert!(!backend.is_listening());
}

#[tokio::test]
async fn test_requests_fail_after_shutdown() {
    let backend = FakeTasks::new(Vec::new());
    let tracker = spawn(&backend, false);

    tracker.shutdown().await.unwrap();
    tokio::task::yield_now().await;
    assert!(tracker.is_closed());
    let err = tracker.snapshot().await.unwrap_err();
    assert!(matches!(err, ActorError::SendFailed | ActorError::ReceiveFailed));
}
