// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `mnemo check` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

/// A `mnemo` command isolated from the caller's config and environment.
fn mnemo(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("mnemo");
    for var in [
        "MNEMOSYNE_ENABLED",
        "MNEMOSYNE_ADDR",
        "MNEMOSYNE_TIMEOUT",
        "MNEMOSYNE_MAX_RETRIES",
        "MNEMOSYNE_TLS",
        "MNEMO_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

/// A port nothing listens on.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn disabled_store_reports_offline_without_dialing() {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .env("MNEMOSYNE_ENABLED", "false")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("working offline"))
        .stdout(predicate::str::contains("status:").not());
}

#[test]
fn unreachable_store_reports_offline_mode() {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .arg("check")
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(closed_port().to_string())
        .arg("--timeout-ms")
        .arg("1000")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("status: failed"))
        .stdout(predicate::str::contains("mode: offline"))
        .stdout(predicate::str::contains(
            "Cannot connect to the knowledge store. Working offline with cached data.",
        ))
        .stdout(predicate::str::contains("action: Check connection"))
        .stderr(predicate::str::contains("error: [connection] failed to connect to 127.0.0.1"));
}

#[test]
fn address_from_environment_is_used() {
    let home = TempDir::new().unwrap();
    let port = closed_port();
    mnemo(&home)
        .env("MNEMOSYNE_ADDR", format!("127.0.0.1:{}", port))
        .env("MNEMOSYNE_TIMEOUT", "1")
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains(format!("address: 127.0.0.1:{}", port)));
}

#[parameterized(
    zero_port = { &["--port", "0"], "invalid configuration: port" },
    negative_port = { &["--port", "-5"], "invalid configuration: port" },
    large_port = { &["--port", "70000"], "invalid configuration: port" },
    empty_host = { &["--host", ""], "invalid configuration: host" },
    zero_timeout = { &["--timeout-ms", "0"], "invalid configuration: timeout" },
)]
fn invalid_endpoint_is_rejected(args: &[&str], expected: &str) {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .arg("check")
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(expected));
}

#[test]
fn invalid_retry_settings_in_file_are_rejected() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("mnemo.toml");
    std::fs::write(&path, "[retry]\nmax_attempts = -1\n").unwrap();
    mnemo(&home)
        .arg("--config")
        .arg(&path)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration: max_attempts"));
}
