// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for mnemo operations.
//!
//! [`Error`] carries both the well-known failure kinds of the knowledge store
//! (not found, unavailable, timeout, ...) and the composite failures produced
//! by the retry engine and the sync replay. The [`classify`] submodule maps any
//! error onto the coarse [`ErrorCategory`] used to decide on retries and on
//! what to tell the user.

mod classify;
mod notification;

pub use classify::{
    categorize, is_connection_error, is_invalid_argument, is_not_found, is_retryable,
    is_timeout, is_unavailable, ClassifiedError, ErrorCategory,
};
pub use notification::{user_message, ErrorNotification};

use mnemo_core::{RpcCode, RpcStatus};
use thiserror::Error;

use crate::sync::OpKind;

/// All possible errors that can occur in mnemo operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not connected to the knowledge store\n  hint: check that the server is running and reachable")]
    NotConnected,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("knowledge store unavailable: {0}")]
    Unavailable(String),

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("working offline\n  hint: changes are queued and sync once the connection is restored")]
    Offline,

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Remote(#[from] RpcStatus),

    #[error(transparent)]
    Classified(#[from] ClassifiedError),

    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("retry cancelled after {attempts} attempts{}", last_error_suffix(.last))]
    RetryCancelled {
        attempts: u32,
        last: Option<Box<Error>>,
    },

    #[error("non-retryable error after {attempts} attempts: {source}")]
    NonRetryable { attempts: u32, source: Box<Error> },

    #[error("max retry attempts ({attempts}) exceeded: {source}")]
    RetriesExhausted { attempts: u32, source: Box<Error> },

    #[error("sync stopped at operation {position} ({kind}) after {synced} synced: {source}")]
    SyncFailed {
        synced: usize,
        position: usize,
        kind: OpKind,
        source: Box<Error>,
    },
}

fn last_error_suffix(last: &Option<Box<Error>>) -> String {
    match last {
        Some(e) => format!(" (last error: {})", e),
        None => String::new(),
    }
}

/// A specialized Result type for mnemo operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Converts a remote status into the matching error kind, keeping the
    /// operation name as context.
    ///
    /// Codes without a dedicated kind are kept as [`Error::Remote`] so the
    /// classifier can still look at the raw code.
    pub fn from_remote(operation: &str, status: RpcStatus) -> Self {
        let context = format!("{}: {}", operation, status.message);
        match status.code {
            RpcCode::NotFound => Error::NotFound(context),
            RpcCode::InvalidArgument => Error::InvalidArgument(context),
            RpcCode::AlreadyExists => Error::AlreadyExists(context),
            RpcCode::Unavailable => Error::Unavailable(context),
            RpcCode::DeadlineExceeded => Error::Timeout(context),
            RpcCode::Internal => Error::Internal(context),
            _ => Error::Remote(status),
        }
    }

    /// Coarse category of this error.
    pub fn category(&self) -> ErrorCategory {
        categorize(self)
    }

    /// Whether retrying the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        is_retryable(self)
    }

    /// The error this one wraps, if any.
    ///
    /// Used instead of [`std::error::Error::source`] when walking a chain so
    /// that transparent and boxed variants expose their inner value directly.
    pub(crate) fn inner_error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Remote(status) => Some(status),
            Error::Classified(e) => Some(e),
            Error::Network(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::RetryCancelled { last, .. } => {
                last.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
            }
            Error::NonRetryable { source, .. }
            | Error::RetriesExhausted { source, .. }
            | Error::SyncFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
