// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error classification.
//!
//! Every error is mapped onto one [`ErrorCategory`]. The rules are checked in
//! tiers over the whole cause chain, first tier wins:
//!
//! 1. an explicitly [`ClassifiedError`] keeps its category
//! 2. well-known error kinds ([`Error::NotFound`], [`Error::Timeout`], ...)
//! 3. OS-level network failures and elapsed deadlines
//! 4. remote status codes
//! 5. message keywords
//! 6. anything else is a server error

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;

use mnemo_core::{RpcCode, RpcStatus};

use super::Error;

/// Coarse class of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No error, or nothing could be determined.
    Unknown,
    /// The store could not be reached.
    Connection,
    /// The caller sent something the store rejected.
    Validation,
    /// The store failed while processing a valid request.
    Server,
    /// A deadline passed.
    Timeout,
}

impl ErrorCategory {
    /// Returns the category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Unknown => "unknown",
            ErrorCategory::Connection => "connection",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Server => "server",
            ErrorCategory::Timeout => "timeout",
        }
    }

    /// Category of an optional error; an absent error is [`ErrorCategory::Unknown`].
    pub fn of(err: Option<&(dyn StdError + 'static)>) -> Self {
        err.map_or(ErrorCategory::Unknown, categorize)
    }

    fn retryable_by_default(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Connection | ErrorCategory::Timeout | ErrorCategory::Server
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error tagged with an explicit category and retry decision.
///
/// Both are fixed at construction and win over anything the classifier would
/// infer from the wrapped error.
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    /// Assigned category.
    pub category: ErrorCategory,
    /// Short machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Whether the failed operation may be retried.
    pub retryable: bool,
    underlying: Option<Arc<dyn StdError + Send + Sync>>,
}

impl ClassifiedError {
    /// Creates a classified error with no underlying cause.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        ClassifiedError {
            category,
            code: category.as_str().to_string(),
            message: message.into(),
            retryable: category.retryable_by_default(),
            underlying: None,
        }
    }

    /// Wraps `err` under an explicit category.
    ///
    /// The retry decision is taken from `err` itself.
    pub fn wrap<E>(err: E, category: ErrorCategory, message: impl Into<String>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let retryable = is_retryable(&err);
        ClassifiedError {
            category,
            code: category.as_str().to_string(),
            message: message.into(),
            retryable,
            underlying: Some(Arc::new(err)),
        }
    }

    /// Wraps `err` under the category the classifier assigns to it.
    pub fn classify<E>(err: E, message: impl Into<String>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let category = categorize(&err);
        Self::wrap(err, category, message)
    }

    /// The wrapped error, if any.
    pub fn underlying(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.underlying.as_deref()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.underlying {
            Some(inner) => write!(f, "[{}] {}: {}", self.code, self.message, inner),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl StdError for ClassifiedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.underlying
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Walks `err` and its causes, outermost first.
fn chain<'a>(err: &'a (dyn StdError + 'static)) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(unbox(err)), |e| next_cause(*e).map(unbox))
}

fn unbox<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err.downcast_ref::<Box<Error>>() {
        Some(boxed) => boxed.as_ref(),
        None => err,
    }
}

fn next_cause<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    match err.downcast_ref::<Error>() {
        Some(e) => e.inner_error(),
        None => err.source(),
    }
}

fn known_kind(err: &Error) -> Option<ErrorCategory> {
    match err {
        Error::NotConnected | Error::Connection(_) | Error::Unavailable(_) | Error::Offline => {
            Some(ErrorCategory::Connection)
        }
        Error::Timeout(_) => Some(ErrorCategory::Timeout),
        Error::InvalidArgument(_)
        | Error::NotFound(_)
        | Error::AlreadyExists(_)
        | Error::InvalidConfig { .. } => Some(ErrorCategory::Validation),
        Error::Internal(_) => Some(ErrorCategory::Server),
        _ => None,
    }
}

fn network_kind(err: &(dyn StdError + 'static)) -> Option<ErrorCategory> {
    if err.is::<tokio::time::error::Elapsed>() {
        return Some(ErrorCategory::Timeout);
    }
    let io = err.downcast_ref::<io::Error>()?;
    match io.kind() {
        io::ErrorKind::TimedOut => Some(ErrorCategory::Timeout),
        _ => Some(ErrorCategory::Connection),
    }
}

fn code_kind(code: RpcCode) -> Option<ErrorCategory> {
    match code {
        RpcCode::Unavailable | RpcCode::FailedPrecondition => Some(ErrorCategory::Connection),
        RpcCode::DeadlineExceeded => Some(ErrorCategory::Timeout),
        RpcCode::InvalidArgument | RpcCode::OutOfRange => Some(ErrorCategory::Validation),
        RpcCode::Internal | RpcCode::Unknown | RpcCode::DataLoss => Some(ErrorCategory::Server),
        _ => None,
    }
}

fn message_kind(message: &str) -> Option<ErrorCategory> {
    let message = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| message.contains(w));
    if has(&["timeout", "timed out", "deadline"]) {
        Some(ErrorCategory::Timeout)
    } else if has(&["connection", "network", "dial", "unreachable"]) {
        Some(ErrorCategory::Connection)
    } else {
        None
    }
}

fn remote_code(err: &(dyn StdError + 'static)) -> Option<RpcCode> {
    chain(err).find_map(|e| e.downcast_ref::<RpcStatus>().map(|s| s.code))
}

/// Assigns a category to `err`.
pub fn categorize(err: &(dyn StdError + 'static)) -> ErrorCategory {
    if let Some(classified) = chain(err).find_map(|e| e.downcast_ref::<ClassifiedError>()) {
        return classified.category;
    }
    if let Some(category) = chain(err).find_map(|e| e.downcast_ref::<Error>().and_then(known_kind))
    {
        return category;
    }
    if let Some(category) = chain(err).find_map(network_kind) {
        return category;
    }
    if let Some(category) = remote_code(err).and_then(code_kind) {
        return category;
    }
    if let Some(category) = chain(err).find_map(|e| message_kind(&e.to_string())) {
        return category;
    }
    ErrorCategory::Server
}

/// Whether retrying the operation that produced `err` may succeed.
///
/// A [`ClassifiedError`] anywhere in the chain decides on its own. Otherwise
/// connection and timeout failures are retryable, validation failures are
/// not, and server failures are unless the remote code says the request
/// itself was at fault.
pub fn is_retryable(err: &(dyn StdError + 'static)) -> bool {
    if let Some(classified) = chain(err).find_map(|e| e.downcast_ref::<ClassifiedError>()) {
        return classified.retryable;
    }
    match categorize(err) {
        ErrorCategory::Connection | ErrorCategory::Timeout => true,
        ErrorCategory::Validation | ErrorCategory::Unknown => false,
        ErrorCategory::Server => !remote_code(err).is_some_and(|code| code.is_permanent()),
    }
}

fn matches_kind(
    err: &(dyn StdError + 'static),
    kind: impl Fn(&Error) -> bool,
    code: RpcCode,
) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(&kind)
            || e.downcast_ref::<RpcStatus>().is_some_and(|s| s.code == code)
    })
}

/// Whether `err` reports a missing entity.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    matches_kind(err, |e| matches!(e, Error::NotFound(_)), RpcCode::NotFound)
}

/// Whether `err` reports a rejected argument.
pub fn is_invalid_argument(err: &(dyn StdError + 'static)) -> bool {
    matches_kind(
        err,
        |e| matches!(e, Error::InvalidArgument(_)),
        RpcCode::InvalidArgument,
    )
}

/// Whether `err` reports the store as unavailable.
pub fn is_unavailable(err: &(dyn StdError + 'static)) -> bool {
    matches_kind(err, |e| matches!(e, Error::Unavailable(_)), RpcCode::Unavailable)
}

/// Whether `err` is a connection failure.
pub fn is_connection_error(err: &(dyn StdError + 'static)) -> bool {
    categorize(err) == ErrorCategory::Connection
}

/// Whether `err` is a timeout.
pub fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    categorize(err) == ErrorCategory::Timeout
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
