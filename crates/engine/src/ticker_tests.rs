use super::*;
use crate::test_support::{noop_target, test_engine};
use tempfile::tempdir;

#[tokio::test(start_paused = true)]
async fn reconciles_with_a_full_snapshot_once_per_tick() {
    let dir = tempdir().unwrap();
    let (engine, _clock) = test_engine(dir.path(), noop_target);
    engine.add("job".into(), rq_core::QueueItemConfig::new(vec![])).await.unwrap();

    let mut events = engine.subscribe();
    let ticker = tokio::spawn(run(Arc::clone(&engine)));

    tokio::time::advance(TICK_INTERVAL + Duration::from_millis(10)).await;

    let mut saw_run_list = false;
    let mut saw_queue = false;
    for _ in 0..4 {
        match events.recv().await.unwrap() {
            Event::RunListChanged { .. } => saw_run_list = true,
            Event::QueueChanged { .. } => saw_queue = true,
            _ => {}
        }
        if saw_run_list && saw_queue {
            break;
        }
    }
    assert!(saw_run_list && saw_queue);

    ticker.abort();
}

#[tokio::test(start_paused = true)]
async fn stops_once_shutting_down_and_pool_empty() {
    let dir = tempdir().unwrap();
    let (engine, _clock) = test_engine(dir.path(), noop_target);
    engine.request_shutdown();

    // Under `start_paused`, awaiting this directly auto-advances virtual
    // time past both ticks since nothing else is runnable meanwhile.
    run(Arc::clone(&engine)).await;
}
