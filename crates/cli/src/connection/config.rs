// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validated connection parameters.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Endpoint, deadlines and reconnect policy of a connection manager.
///
/// Only obtainable through [`ConnectionConfigBuilder::build`], so every value
/// is known to be valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    use_tls: bool,
    timeout: Duration,
    retry: RetryPolicy,
    health_check_interval: Duration,
}

impl ConnectionConfig {
    /// Starts a builder for `host:port` with default settings.
    pub fn builder(host: impl Into<String>, port: i64) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            host: host.into(),
            port,
            use_tls: false,
            timeout: Duration::from_secs(30),
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            health_check_interval: Duration::from_secs(30),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    /// Deadline for dialing plus the initial liveness check, and for each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn health_check_interval(&self) -> Duration {
        self.health_check_interval
    }

    /// `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// WebSocket endpoint of the store.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        format!("{}://{}/rpc", scheme, self.address())
    }
}

/// Builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    host: String,
    port: i64,
    use_tls: bool,
    timeout: Duration,
    max_attempts: i64,
    initial_backoff: Duration,
    max_backoff: Duration,
    health_check_interval: Duration,
}

impl ConnectionConfigBuilder {
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reconnect attempt limit; 0 means unlimited.
    pub fn max_attempts(mut self, max_attempts: i64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    /// Validates and builds the config.
    pub fn build(self) -> Result<ConnectionConfig> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "cannot be empty"));
        }
        let port = u16::try_from(self.port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| {
                invalid(
                    "port",
                    format!("must be between 1 and 65535, got {}", self.port),
                )
            })?;
        if self.timeout.is_zero() {
            return Err(invalid("timeout", "must be positive"));
        }
        let max_attempts = u32::try_from(self.max_attempts).map_err(|_| {
            invalid(
                "max_attempts",
                format!("must be non-negative, got {}", self.max_attempts),
            )
        })?;
        if self.health_check_interval.is_zero() {
            return Err(invalid("health_check_interval", "must be positive"));
        }
        let retry = RetryPolicy::new(max_attempts, self.initial_backoff, self.max_backoff)?;

        Ok(ConnectionConfig {
            host: self.host,
            port,
            use_tls: self.use_tls,
            timeout: self.timeout,
            retry,
            health_check_interval: self.health_check_interval,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
