//! Scenario 3 (§8 "Cancel vs Stop"): with `pool_size = 1`, cancelling a
//! queued item removes it from `queue_order` without touching the one
//! currently running; stopping the running one terminates it, and the
//! supervisor does not dispatch further work since the queue is empty.

use std::time::Duration;

use rq_core::{RunQueueApi, Status};

use crate::prelude::{engine_with, sleepy_target};

#[tokio::test]
async fn cancel_queued_stop_running_leaves_queue_empty() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(dir.path(), 1, sleepy_target);
    engine.start();

    let a = engine.add("A".to_string(), Default::default()).await.unwrap();
    let b = engine.add("B".to_string(), Default::default()).await.unwrap();
    engine.start_autoprocessing().await.unwrap();

    // A is dispatched first (pool_size=1); wait for it to start running.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        if items[&a].status == Status::Running {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "A never started running");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    engine.cancel(b).await.unwrap();
    let items = engine.items_snapshot().await.unwrap();
    assert_eq!(items[&b].status, Status::Cancelled);
    let queue_order = engine.queue_snapshot().await.unwrap();
    assert!(!queue_order.contains(&b));

    engine.stop(a).await.unwrap();
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        if items[&a].status == Status::Stopped {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "A never stopped");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // The queue is empty and autoprocessing stays on; give the supervisor
    // a moment to prove it dispatches nothing further.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(engine.queue_snapshot().await.unwrap().is_empty());
    let items = engine.items_snapshot().await.unwrap();
    assert_eq!(items[&a].status, Status::Stopped);
    assert_eq!(items[&b].status, Status::Cancelled);
}
