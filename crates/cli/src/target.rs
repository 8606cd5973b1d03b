// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The example `target_function` this binary registers with the engine
//! (§6 "Target-function contract"): a `QueueItemConfig` whose bytes are a
//! UTF-8 shell command line, run to completion via `sh -c` (§4.3).
//!
//! A worker here is an OS thread, not a process (DESIGN.md); this target
//! is a thread that itself owns a child process, so `Stop`/cancellation
//! is honored by killing that child rather than the thread that spawned
//! it.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use rq_core::QueueItemConfig;
use rq_engine::config::{TargetError, TargetFunction, WorkerContext};

/// Polling interval for noticing cancellation while the child runs.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ShellTarget;

impl TargetFunction for ShellTarget {
    fn run(&self, config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError> {
        let command_line = std::str::from_utf8(config.as_bytes())
            .map_err(|e| TargetError::new("InvalidConfig", format!("not valid UTF-8: {e}")))?;
        if command_line.trim().is_empty() {
            return Err(TargetError::new("InvalidConfig", "empty command line"));
        }

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TargetError::new("SpawnError", e.to_string()))?;

        #[allow(clippy::expect_used)]
        let stdout = child.stdout.take().expect("piped stdout is always present");
        #[allow(clippy::expect_used)]
        let stderr = child.stderr.take().expect("piped stderr is always present");

        let wait_result = thread::scope(|scope| {
            scope.spawn(|| relay_lines(stdout, ctx));
            scope.spawn(|| relay_lines(stderr, ctx));

            loop {
                if ctx.is_cancelled() {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TargetError::new("Cancelled", "stopped by request"));
                }
                match child.try_wait() {
                    Ok(Some(status)) => return Ok(status),
                    Ok(None) => thread::sleep(POLL_INTERVAL),
                    Err(e) => return Err(TargetError::new("WaitError", e.to_string())),
                }
            }
        });

        let status = wait_result?;
        if status.success() {
            Ok(())
        } else {
            Err(TargetError::new(
                "NonZeroExit",
                format!("exited with {}", status.code().map_or("signal".to_string(), |c| c.to_string())),
            ))
        }
    }
}

fn relay_lines(reader: impl Read, ctx: &WorkerContext) {
    for line in BufReader::new(reader).lines().map_while(Result::ok) {
        ctx.log(line);
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
