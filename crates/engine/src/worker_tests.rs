use super::*;
use crate::config::{CancelToken, TargetError, WorkerContext};
use crate::log_capture::LogCapture;
use rq_core::clock::{Clock, FakeClock};
use rq_core::QueueItemConfig;
use tempfile::tempdir;
use tokio::sync::mpsc;

fn logger(dir: &std::path::Path, id: ItemId) -> LogCapture {
    let path = dir.join(format!("{id}_job.out"));
    std::fs::File::create(&path).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::at(0));
    let (tx, _rx) = mpsc::unbounded_channel();
    LogCapture::open(id, "job", path, clock, tx).unwrap()
}

#[test]
fn clean_return_reports_finished() {
    let dir = tempdir().unwrap();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel();
    let target: Arc<dyn TargetFunction> = Arc::new(|_: &QueueItemConfig, _: &WorkerContext| Ok(()));

    run_worker(
        ItemId::new(1),
        QueueItemConfig::new(vec![]),
        logger(dir.path(), ItemId::new(1)),
        CancelToken::new(),
        target,
        completion_tx,
    );

    let completion = completion_rx.try_recv().unwrap();
    assert_eq!(completion.id, ItemId::new(1));
    assert!(matches!(completion.outcome, WorkerOutcome::Finished));
}

#[test]
fn error_return_reports_failed_with_formatted_stderr() {
    let dir = tempdir().unwrap();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel();
    let target: Arc<dyn TargetFunction> =
        Arc::new(|_: &QueueItemConfig, _: &WorkerContext| Err(TargetError::new("ValueError", "boom")));

    run_worker(
        ItemId::new(2),
        QueueItemConfig::new(vec![]),
        logger(dir.path(), ItemId::new(2)),
        CancelToken::new(),
        target,
        completion_tx,
    );

    let completion = completion_rx.try_recv().unwrap();
    match completion.outcome {
        WorkerOutcome::Failed { stderr } => assert_eq!(stderr, "ValueError:boom"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn panic_is_caught_and_reported_as_failed() {
    let dir = tempdir().unwrap();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel();
    let target: Arc<dyn TargetFunction> = Arc::new(|_: &QueueItemConfig, _: &WorkerContext| -> Result<(), TargetError> {
        panic!("kaboom")
    });

    run_worker(
        ItemId::new(3),
        QueueItemConfig::new(vec![]),
        logger(dir.path(), ItemId::new(3)),
        CancelToken::new(),
        target,
        completion_tx,
    );

    let completion = completion_rx.try_recv().unwrap();
    match completion.outcome {
        WorkerOutcome::Failed { stderr } => assert_eq!(stderr, "Panic:kaboom"),
        other => panic!("expected Failed, got {other:?}"),
    }
}
