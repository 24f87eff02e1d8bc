// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by mnemo are defined here with
//! typed accessor functions. Values that fail to parse are treated as unset.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const MNEMOSYNE_ENABLED: &str = "MNEMOSYNE_ENABLED";
    pub const MNEMOSYNE_ADDR: &str = "MNEMOSYNE_ADDR";
    pub const MNEMOSYNE_TIMEOUT: &str = "MNEMOSYNE_TIMEOUT";
    pub const MNEMOSYNE_MAX_RETRIES: &str = "MNEMOSYNE_MAX_RETRIES";
    pub const MNEMOSYNE_TLS: &str = "MNEMOSYNE_TLS";
    pub const MNEMO_CONFIG: &str = "MNEMO_CONFIG";
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// `true` for "true"/"1" (case-insensitive), `false` for anything else.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1")
}

/// Splits `host:port`. A missing or unparsable port yields `None` for it.
pub fn parse_addr(value: &str) -> (String, Option<i64>) {
    match value.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.parse().ok()),
        None => (value.to_string(), None),
    }
}

/// Returns the value of `MNEMOSYNE_ENABLED` if set.
pub fn enabled() -> Option<bool> {
    var(vars::MNEMOSYNE_ENABLED).map(|v| parse_flag(&v))
}

/// Returns the value of `MNEMOSYNE_ADDR` if set.
pub fn addr() -> Option<String> {
    var(vars::MNEMOSYNE_ADDR)
}

/// Returns `MNEMOSYNE_TIMEOUT` in seconds if set to a positive integer.
pub fn timeout_secs() -> Option<u64> {
    var(vars::MNEMOSYNE_TIMEOUT)
        .and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
}

/// Returns `MNEMOSYNE_MAX_RETRIES` if set to a non-negative integer.
pub fn max_retries() -> Option<i64> {
    var(vars::MNEMOSYNE_MAX_RETRIES)
        .and_then(|v| v.parse().ok())
        .filter(|n| *n >= 0)
}

/// Returns the value of `MNEMOSYNE_TLS` if set.
pub fn tls() -> Option<bool> {
    var(vars::MNEMOSYNE_TLS).map(|v| parse_flag(&v))
}

/// Returns the value of `MNEMO_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    var(vars::MNEMO_CONFIG).map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
