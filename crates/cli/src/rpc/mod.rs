// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client side of the knowledge-store protocol.
//!
//! [`RpcClient`] is the seam between the connection manager and the wire:
//! - [`WebSocketClient`] talks JSON frames over a WebSocket
//! - tests substitute an in-memory client

mod client;
mod websocket;

pub use client::{ClientFactory, RpcClient, RpcFuture};
pub use websocket::WebSocketClient;

#[cfg(test)]
pub(crate) mod mock;
