//! Scenario 4 (§8 "Legality"): a `MoveUp` on a running item is rejected.

use std::time::Duration;

use rq_core::{Action, RunQueueApi, RunQueueError, Status};

use crate::prelude::{engine_with, sleepy_target};

#[tokio::test]
async fn move_up_on_a_running_item_is_illegal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(dir.path(), 1, sleepy_target);
    engine.start();

    let id = engine.add("A".to_string(), Default::default()).await.unwrap();
    engine.start_autoprocessing().await.unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        if items[&id].status == Status::Running {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "item never started running");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let err = engine.do_action(id, Action::MoveUp).await.unwrap_err();
    assert!(matches!(err, RunQueueError::IllegalAction(i) if i == id));

    engine.stop(id).await.unwrap();
}
