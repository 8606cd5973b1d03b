//! Scenario 5 (§8 "Persistence round-trip"): persisting with a running
//! item present (`save_running_as_stopped = true`) and reloading into a
//! fresh engine preserves the item map, queue order, and id counter —
//! with the running item recorded as `Stopped`.

use std::time::Duration;

use rq_core::{ItemId, RunQueueApi, Status};

use crate::prelude::{engine_with, sleepy_target};

#[tokio::test]
async fn persisted_running_item_reloads_as_stopped() {
    let source_dir = tempfile::tempdir().unwrap();
    let engine = engine_with(source_dir.path(), 1, sleepy_target);
    engine.start();

    let a = engine.add("A".to_string(), Default::default()).await.unwrap();
    let b = engine.add("B".to_string(), Default::default()).await.unwrap();
    let c = engine.add("C".to_string(), Default::default()).await.unwrap();
    engine.start_autoprocessing().await.unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        if items[&a].status == Status::Running {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "A never started running");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let snapshot_path = source_dir.path().join("run_queue_data.rq");
    engine.save_to(&snapshot_path, true).await.unwrap();

    let reload_dir = tempfile::tempdir().unwrap();
    let reloaded = engine_with(reload_dir.path(), 1, sleepy_target);
    let loaded = reloaded.load_from_path(&snapshot_path).await.unwrap();
    assert!(loaded);

    let items = reloaded.items_snapshot().await.unwrap();
    assert_eq!(items[&a].status, Status::Stopped);
    assert_eq!(items[&a].stderr, "running at snapshot");
    assert_eq!(items[&b].status, Status::Queued);
    assert_eq!(items[&c].status, Status::Queued);
    assert_eq!(items[&a].name, "A");

    let queue_order = reloaded.queue_snapshot().await.unwrap();
    assert_eq!(queue_order, vec![b, c]);

    // The id counter continued from where the source engine left off.
    let next = reloaded.add("D".to_string(), Default::default()).await.unwrap();
    assert_eq!(next, ItemId::from(3));

    // A is still running in the source engine (the snapshot didn't touch
    // it); stop it so its worker thread doesn't outlive the test.
    engine.stop(a).await.unwrap();
}
