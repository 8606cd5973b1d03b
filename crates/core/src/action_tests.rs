use super::*;
use yare::parameterized;

#[parameterized(
    queued_in_order = { Status::Queued, true, QUEUED_IN_ORDER },
    queued_transient = { Status::Queued, false, RUNNING_OR_TRANSIENT },
    running = { Status::Running, true, RUNNING_OR_TRANSIENT },
    running_ignores_queue_flag = { Status::Running, false, RUNNING_OR_TRANSIENT },
    finished = { Status::Finished, false, TERMINAL },
    stopped = { Status::Stopped, false, TERMINAL },
    cancelled = { Status::Cancelled, false, TERMINAL },
    failed = { Status::Failed, false, TERMINAL },
)]
fn matches_table(status: Status, in_queue_order: bool, expected: &[Action]) {
    assert_eq!(legal_actions(status, in_queue_order), expected);
}

#[test]
fn only_queued_in_order_permits_reordering() {
    for action in [Action::MoveUp, Action::MoveDown, Action::MoveTop] {
        assert!(legal_actions(Status::Queued, true).contains(&action));
        assert!(!legal_actions(Status::Queued, false).contains(&action));
        assert!(!legal_actions(Status::Running, true).contains(&action));
    }
}

#[test]
fn terminal_statuses_permit_only_delete() {
    for status in [
        Status::Finished,
        Status::Stopped,
        Status::Cancelled,
        Status::Failed,
    ] {
        assert_eq!(legal_actions(status, false), &[Action::Delete]);
    }
}
