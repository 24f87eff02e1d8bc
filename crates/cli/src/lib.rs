// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mnemo - Resilient connectivity for a knowledge-store terminal client.
//!
//! This crate keeps the client usable while the remote store comes and goes.
//!
//! # Main Components
//!
//! - [`ConnectionManager`] - connection state machine, health checks and
//!   reconnection
//! - [`retry`] - exponential backoff with cancellation
//! - [`sync`] - offline cache, pending-operation queue and replay
//! - [`error`] - error kinds, classification and user notifications
//! - [`Settings`] - user configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use mnemo::{ConnectionManager, Settings};
//!
//! let settings = Settings::load(None)?;
//! let manager = ConnectionManager::new(settings.connection_config()?);
//! manager.connect().await?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod connection;
pub mod env;
pub mod error;
pub mod retry;
pub mod rpc;
pub mod sync;

pub use cli::{CheckArgs, Cli, Command};
pub use config::Settings;
pub use connection::{ConnectionConfig, ConnectionManager, ConnectionStatus};
pub use error::{Error, Result};
pub use retry::{retry_with_backoff, RetryPolicy};

/// Execute a CLI command against the resolved settings.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match cli.command {
        Command::Check(args) => commands::check::run(settings, args).await,
        Command::Config => commands::config::run(&settings),
    }
}
