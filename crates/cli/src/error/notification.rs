// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing descriptions of errors.

use std::error::Error as StdError;

use super::classify::{categorize, is_retryable, ErrorCategory};

/// Returns a short sentence describing `err` for the user.
pub fn user_message(err: &(dyn StdError + 'static)) -> String {
    match categorize(err) {
        ErrorCategory::Connection => {
            "Cannot connect to the knowledge store. Working offline with cached data.".to_string()
        }
        ErrorCategory::Server => {
            "Server error occurred. Changes will be retried automatically.".to_string()
        }
        ErrorCategory::Validation => format!("Invalid data: {}", err),
        ErrorCategory::Timeout => {
            "Operation timed out. Check your connection and try again.".to_string()
        }
        ErrorCategory::Unknown => format!("An error occurred: {}", err),
    }
}

/// Everything needed to show an error notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotification {
    pub category: ErrorCategory,
    pub message: String,
    pub retryable: bool,
    /// What the user can do about it.
    pub action: &'static str,
}

impl ErrorNotification {
    /// Builds the notification for `err`.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let category = categorize(err);
        let retryable = is_retryable(err);
        let action = match category {
            ErrorCategory::Connection => "Check connection",
            ErrorCategory::Validation => "Fix input",
            ErrorCategory::Server if !retryable => "Contact support",
            ErrorCategory::Server | ErrorCategory::Timeout | ErrorCategory::Unknown => "Retry",
        };
        ErrorNotification {
            category,
            message: user_message(err),
            retryable,
            action,
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
