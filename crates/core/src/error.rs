// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for mnemo-core operations.

use thiserror::Error;

/// All possible errors that can occur in mnemo-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid namespace: '{0}'\n  hint: valid forms are: global, project:<name>, session:<project>/<session>")]
    InvalidNamespace(String),

    #[error("invalid status code: '{0}'")]
    InvalidStatusCode(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for mnemo-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
