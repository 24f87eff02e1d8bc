// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `mnemo config` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

const ENV_VARS: &[&str] = &[
    "MNEMOSYNE_ENABLED",
    "MNEMOSYNE_ADDR",
    "MNEMOSYNE_TIMEOUT",
    "MNEMOSYNE_MAX_RETRIES",
    "MNEMOSYNE_TLS",
    "MNEMO_CONFIG",
];

/// A `mnemo` command isolated from the caller's config and environment.
fn mnemo(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("mnemo");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

fn write_config(home: &TempDir, content: &str) -> PathBuf {
    let path = home.path().join("mnemo.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn defaults_without_config_file() {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("host = \"localhost\""))
        .stdout(predicate::str::contains("port = 50051"))
        .stdout(predicate::str::contains("[retry]"));
}

#[test]
fn reads_default_config_location() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("mnemo");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "host = \"store.home\"\n").unwrap();

    mnemo(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("host = \"store.home\""));
}

#[test]
fn explicit_config_flag() {
    let home = TempDir::new().unwrap();
    let path = write_config(&home, "host = \"store.flag\"\nport = 7000\n");

    mnemo(&home)
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("host = \"store.flag\""))
        .stdout(predicate::str::contains("port = 7000"));
}

#[test]
fn config_path_from_environment() {
    let home = TempDir::new().unwrap();
    let path = write_config(&home, "use_tls = true\n");

    mnemo(&home)
        .env("MNEMO_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("use_tls = true"));
}

#[test]
fn missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .arg("config")
        .arg("--config")
        .arg(home.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn malformed_config_fails() {
    let home = TempDir::new().unwrap();
    let path = write_config(&home, "port = [1, 2]\n");
    mnemo(&home)
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[parameterized(
    addr = { "MNEMOSYNE_ADDR", "db.local:9000", "host = \"db.local\"" },
    addr_port = { "MNEMOSYNE_ADDR", "db.local:9000", "port = 9000" },
    timeout = { "MNEMOSYNE_TIMEOUT", "5", "timeout_ms = 5000" },
    retries = { "MNEMOSYNE_MAX_RETRIES", "0", "max_attempts = 0" },
    tls = { "MNEMOSYNE_TLS", "true", "use_tls = true" },
    disabled = { "MNEMOSYNE_ENABLED", "false", "enabled = false" },
)]
fn environment_overrides_file(var: &str, value: &str, expected: &str) {
    let home = TempDir::new().unwrap();
    let path = write_config(&home, "host = \"from.file\"\n");
    mnemo(&home)
        .env("MNEMO_CONFIG", &path)
        .env(var, value)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[parameterized(
    timeout = { "MNEMOSYNE_TIMEOUT", "soon", "timeout_ms = 30000" },
    zero_timeout = { "MNEMOSYNE_TIMEOUT", "0", "timeout_ms = 30000" },
    retries = { "MNEMOSYNE_MAX_RETRIES", "-3", "max_attempts = 5" },
)]
fn invalid_environment_values_are_ignored(var: &str, value: &str, expected: &str) {
    let home = TempDir::new().unwrap();
    mnemo(&home)
        .env(var, value)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}
