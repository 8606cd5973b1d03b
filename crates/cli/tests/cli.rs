// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests driving the `runqueue` binary the way an operator
//! would, mirroring the teacher's preference for exercising a CLI as a
//! subprocess rather than calling its internals directly.

use std::process::Stdio;
use std::time::Duration;

use assert_cmd::cargo::CommandCargoExt;

fn free_port() -> u16 {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);
    port
}

#[test]
fn help_lists_every_subcommand() {
    let mut cmd = std::process::Command::cargo_bin("runqueue").unwrap();
    let output = cmd.arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["serve", "add", "list", "cancel", "stop", "delete", "logs"] {
        assert!(stdout.contains(subcommand), "--help missing `{subcommand}`:\n{stdout}");
    }
}

#[test]
fn version_matches_the_crate_version() {
    let mut cmd = std::process::Command::cargo_bin("runqueue").unwrap();
    let output = cmd.arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn serve_then_add_and_list_round_trip_over_the_network() {
    let workspace = tempfile::tempdir().unwrap();
    let port = free_port().to_string();
    let password = "cli-test-secret";

    let mut serve = std::process::Command::cargo_bin("runqueue")
        .unwrap()
        .args(["--port", &port, "--password", password, "serve", "--workspace"])
        .arg(workspace.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Give the server a moment to bind before any client dials it.
    std::thread::sleep(Duration::from_millis(300));

    let add_output = std::process::Command::cargo_bin("runqueue")
        .unwrap()
        .args(["--port", &port, "--password", password, "add", "smoke-job", "true"])
        .output()
        .unwrap();
    assert!(add_output.status.success(), "{:?}", add_output);

    let list_output = std::process::Command::cargo_bin("runqueue")
        .unwrap()
        .args(["--port", &port, "--password", password, "list"])
        .output()
        .unwrap();
    assert!(list_output.status.success());
    let stdout = String::from_utf8_lossy(&list_output.stdout);
    assert!(stdout.contains("smoke-job"), "list output missing the added job:\n{stdout}");

    let _ = serve.kill();
    let _ = serve.wait();
}
