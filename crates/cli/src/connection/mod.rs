// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle of the knowledge-store client.
//!
//! The [`ConnectionManager`] owns the RPC client and drives its state
//! machine:
//!
//! ```text
//!  Disconnected ──► Connecting ──► Connected ──► Reconnecting ──► Failed
//!       ▲               │              │              │  │
//!       │               ▼              │              │  └──► Connected
//!       │             Failed           │              │
//!       └──────────────────────────────┴──────────────┘  (disconnect)
//! ```
//!
//! While the store is unreachable the manager is in offline mode: mutations
//! go to the [`SyncQueue`](crate::sync::SyncQueue) and are replayed once a
//! connection is re-established.

mod config;
mod manager;
mod offline;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use manager::{ConnectionManager, ConnectionStatus, ErrorCallback};
pub use offline::Applied;

#[cfg(test)]
mod test_helpers;
