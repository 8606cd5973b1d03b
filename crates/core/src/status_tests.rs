use super::*;
use yare::parameterized;

#[parameterized(
    queued = { Status::Queued, false },
    running = { Status::Running, false },
    finished = { Status::Finished, true },
    stopped = { Status::Stopped, true },
    cancelled = { Status::Cancelled, true },
    failed = { Status::Failed, true },
)]
fn is_terminal_matches_lifecycle_table(status: Status, expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}
