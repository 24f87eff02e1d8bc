// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote status codes.
//!
//! The knowledge store reports failures with the canonical RPC status codes.
//! They travel inside error replies and are what the client-side classifier
//! looks at when no richer information is available.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Canonical RPC status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl RpcCode {
    /// Returns the string representation used on the wire and in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcCode::Ok => "ok",
            RpcCode::Cancelled => "cancelled",
            RpcCode::Unknown => "unknown",
            RpcCode::InvalidArgument => "invalid_argument",
            RpcCode::DeadlineExceeded => "deadline_exceeded",
            RpcCode::NotFound => "not_found",
            RpcCode::AlreadyExists => "already_exists",
            RpcCode::PermissionDenied => "permission_denied",
            RpcCode::ResourceExhausted => "resource_exhausted",
            RpcCode::FailedPrecondition => "failed_precondition",
            RpcCode::Aborted => "aborted",
            RpcCode::OutOfRange => "out_of_range",
            RpcCode::Unimplemented => "unimplemented",
            RpcCode::Internal => "internal",
            RpcCode::Unavailable => "unavailable",
            RpcCode::DataLoss => "data_loss",
            RpcCode::Unauthenticated => "unauthenticated",
        }
    }

    /// Codes describing a permanent condition that retrying cannot fix.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            RpcCode::InvalidArgument | RpcCode::NotFound | RpcCode::AlreadyExists
        )
    }
}

impl fmt::Display for RpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RpcCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = match s.to_lowercase().as_str() {
            "ok" => RpcCode::Ok,
            "cancelled" | "canceled" => RpcCode::Cancelled,
            "unknown" => RpcCode::Unknown,
            "invalid_argument" => RpcCode::InvalidArgument,
            "deadline_exceeded" => RpcCode::DeadlineExceeded,
            "not_found" => RpcCode::NotFound,
            "already_exists" => RpcCode::AlreadyExists,
            "permission_denied" => RpcCode::PermissionDenied,
            "resource_exhausted" => RpcCode::ResourceExhausted,
            "failed_precondition" => RpcCode::FailedPrecondition,
            "aborted" => RpcCode::Aborted,
            "out_of_range" => RpcCode::OutOfRange,
            "unimplemented" => RpcCode::Unimplemented,
            "internal" => RpcCode::Internal,
            "unavailable" => RpcCode::Unavailable,
            "data_loss" => RpcCode::DataLoss,
            "unauthenticated" => RpcCode::Unauthenticated,
            _ => return Err(Error::InvalidStatusCode(s.to_string())),
        };
        Ok(code)
    }
}

/// A failure reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("remote error ({code}): {message}")]
pub struct RpcStatus {
    /// Status code.
    pub code: RpcCode,
    /// Server-supplied description.
    pub message: String,
}

impl RpcStatus {
    /// Creates a status with the given code and message.
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        RpcStatus {
            code,
            message: message.into(),
        }
    }
}

/// Result of a liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the store considers itself able to serve requests.
    pub healthy: bool,
    /// Server version string.
    #[serde(default)]
    pub version: String,
    /// Seconds since the server started.
    #[serde(default)]
    pub uptime_secs: u64,
}

impl HealthStatus {
    /// A healthy status with the given version.
    pub fn healthy(version: impl Into<String>) -> Self {
        HealthStatus {
            healthy: true,
            version: version.into(),
            uptime_secs: 0,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
