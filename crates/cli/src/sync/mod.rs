// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline state: queued mutations and cached entities.
//!
//! # Architecture
//!
//! ```text
//!   offline write ──► SyncQueue ──┐
//!        │                        │ replay (FIFO, stop at first failure)
//!        ▼                        ▼
//!   OfflineCache ◄──────────── RpcClient ──► knowledge store
//!   (dirty ids)    clear dirty
//! ```
//!
//! Both structures are in-memory only and shared between the connection
//! manager and its background tasks.

mod cache;
mod queue;
mod replay;

pub use cache::OfflineCache;
pub use queue::{OpKind, SyncOperation, SyncQueue};
pub use replay::replay;

#[cfg(test)]
mod test_helpers;



#[cfg(test)]
mod replay_tests;
