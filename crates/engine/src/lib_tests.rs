use super::*;
use crate::test_support::{noop_target, test_engine};
use tempfile::tempdir;

#[tokio::test]
async fn start_is_idempotent() {
    let dir = tempdir().unwrap();
    let (engine, _clock) = test_engine(dir.path(), noop_target);

    let handles = engine.start();
    assert_eq!(handles.len(), 3);

    let second = engine.start();
    assert!(second.is_empty());

    for h in handles {
        h.abort();
    }
}

#[tokio::test]
async fn subscribe_only_observes_events_after_the_call() {
    let dir = tempdir().unwrap();
    let (engine, _clock) = test_engine(dir.path(), noop_target);

    engine.add("before".into(), rq_core::QueueItemConfig::new(vec![])).await.unwrap();

    let mut rx = engine.subscribe();
    engine.add("after".into(), rq_core::QueueItemConfig::new(vec![])).await.unwrap();

    let event = rx.try_recv().expect("should observe the post-subscribe add");
    assert!(matches!(event, Event::RunListChanged { .. }));
}

#[tokio::test]
async fn request_shutdown_flips_flag() {
    let dir = tempdir().unwrap();
    let (engine, _clock) = test_engine(dir.path(), noop_target);
    assert!(!engine.is_shutting_down());
    engine.request_shutdown();
    assert!(engine.is_shutting_down());
}
