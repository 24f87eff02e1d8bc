// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::MNEMOSYNE_ENABLED, "MNEMOSYNE_ENABLED");
    assert_eq!(vars::MNEMOSYNE_ADDR, "MNEMOSYNE_ADDR");
    assert_eq!(vars::MNEMOSYNE_TIMEOUT, "MNEMOSYNE_TIMEOUT");
    assert_eq!(vars::MNEMOSYNE_MAX_RETRIES, "MNEMOSYNE_MAX_RETRIES");
    assert_eq!(vars::MNEMOSYNE_TLS, "MNEMOSYNE_TLS");
    assert_eq!(vars::MNEMO_CONFIG, "MNEMO_CONFIG");
}

#[parameterized(
    lower_true = { "true", true },
    upper_true = { "TRUE", true },
    one = { "1", true },
    lower_false = { "false", false },
    zero = { "0", false },
    garbage = { "yes please", false },
)]
fn test_parse_flag(value: &str, expected: bool) {
    assert_eq!(parse_flag(value), expected);
}

#[parameterized(
    host_and_port = { "db.local:9000", "db.local", Some(9000) },
    host_only = { "db.local", "db.local", None },
    bad_port = { "db.local:http", "db.local", None },
    ipv6_like = { "[::1]:50051", "[::1]", Some(50051) },
)]
fn test_parse_addr(value: &str, host: &str, port: Option<i64>) {
    assert_eq!(parse_addr(value), (host.to_string(), port));
}

#[test]
fn test_timeout_ignores_invalid_values() {
    std::env::set_var(vars::MNEMOSYNE_TIMEOUT, "soon");
    assert_eq!(timeout_secs(), None);
    std::env::set_var(vars::MNEMOSYNE_TIMEOUT, "0");
    assert_eq!(timeout_secs(), None);
    std::env::set_var(vars::MNEMOSYNE_TIMEOUT, "12");
    assert_eq!(timeout_secs(), Some(12));
    std::env::remove_var(vars::MNEMOSYNE_TIMEOUT);
    assert_eq!(timeout_secs(), None);
}

#[test]
fn test_max_retries_rejects_negative() {
    std::env::set_var(vars::MNEMOSYNE_MAX_RETRIES, "-3");
    assert_eq!(max_retries(), None);
    std::env::set_var(vars::MNEMOSYNE_MAX_RETRIES, "0");
    assert_eq!(max_retries(), Some(0));
    std::env::remove_var(vars::MNEMOSYNE_MAX_RETRIES);
}

#[test]
fn test_config_path() {
    std::env::set_var(vars::MNEMO_CONFIG, "/tmp/mnemo.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/tmp/mnemo.toml")));
    std::env::remove_var(vars::MNEMO_CONFIG);
    assert_eq!(config_path(), None);
}
