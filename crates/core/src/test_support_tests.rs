use super::*;

#[test]
fn builder_defaults_to_queued() {
    let item = QueueItemBuilder::new(1, "A").build();
    assert_eq!(item.status, Status::Queued);
    assert_eq!(item.id, ItemId::new(1));
}

#[test]
fn builder_overrides_are_applied() {
    let item = QueueItemBuilder::new(1, "A")
        .status(Status::Failed)
        .exit_code(-1)
        .stderr("ValueError:boom")
        .dt_started(10)
        .dt_done(20)
        .build();
    assert_eq!(item.status, Status::Failed);
    assert_eq!(item.exit_code, Some(-1));
    assert_eq!(item.stderr, "ValueError:boom");
    assert_eq!(item.dt_started, Some(10));
    assert_eq!(item.dt_done, Some(20));
}
