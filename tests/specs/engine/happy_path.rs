//! Scenario 1 (§8 "Happy path"): add an item, start autoprocessing, and
//! observe the expected event sequence through to completion.

use rq_core::{Event, RunQueueApi, Status};

use crate::prelude::{engine_with, expect_next, ok_target, SPEC_WAIT};

#[tokio::test]
async fn add_then_autoprocess_runs_the_item_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(dir.path(), 1, ok_target);
    engine.start();
    let mut events = engine.subscribe();

    let id = engine.add("A".to_string(), Default::default()).await.unwrap();
    assert_eq!(id, rq_core::ItemId::from(0));

    expect_next(&mut events, SPEC_WAIT, |e| matches!(e, Event::RunListChanged { .. })).await;
    expect_next(&mut events, SPEC_WAIT, |e| matches!(e, Event::QueueChanged { .. })).await;

    engine.start_autoprocessing().await.unwrap();

    expect_next(&mut events, SPEC_WAIT, |e| {
        matches!(e, Event::NewConsoleOutputPath { id: i, name, .. } if *i == id && name == "A")
    })
    .await;
    expect_next(&mut events, SPEC_WAIT, |e| matches!(e, Event::RunningIdsChanged { ids } if ids == &[id])).await;
    expect_next(&mut events, SPEC_WAIT, |e| {
        matches!(e, Event::ItemChanged { id: i, item } if *i == id && item.status == Status::Finished && item.exit_code == Some(0))
    })
    .await;
    expect_next(&mut events, SPEC_WAIT, |e| matches!(e, Event::RunningIdsChanged { ids } if ids.is_empty())).await;
}
