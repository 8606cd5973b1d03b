//! Scenario 2 (§8 "Failure capture"): a target function that returns an
//! error surfaces as `Failed` with `exit_code = -1` and a `stderr`
//! beginning with the error's kind.

use rq_core::{RunQueueApi, Status};

use crate::prelude::{engine_with, failing_target};

#[tokio::test]
async fn failing_target_function_is_captured_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(dir.path(), 1, failing_target);
    engine.start();

    let id = engine.add("boom".to_string(), Default::default()).await.unwrap();
    engine.start_autoprocessing().await.unwrap();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    let item = loop {
        let items = engine.items_snapshot().await.unwrap();
        let item = items[&id].clone();
        if item.status.is_terminal() {
            break item;
        }
        assert!(std::time::Instant::now() < deadline, "item never reached a terminal status");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    };

    assert_eq!(item.status, Status::Failed);
    assert_eq!(item.exit_code, Some(-1));
    assert!(item.stderr.starts_with("ValueError:boom"), "stderr was {:?}", item.stderr);
}
