// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for connection tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use super::{ConnectionConfig, ConnectionConfigBuilder, ConnectionManager, ConnectionStatus};
use crate::rpc::mock::{MockClient, MockServer};
use crate::rpc::RpcClient;

/// Fast backoff, two reconnect attempts, no periodic health checks in sight.
pub fn fast_config() -> ConnectionConfigBuilder {
    ConnectionConfig::builder("mock", 1)
        .timeout(Duration::from_millis(500))
        .max_attempts(2)
        .backoff(Duration::from_millis(10), Duration::from_millis(20))
        .health_check_interval(Duration::from_secs(3600))
}

pub fn mock_manager(server: &Arc<MockServer>) -> ConnectionManager<MockClient> {
    ConnectionManager::with_factory(fast_config().build().unwrap(), server.factory())
}

pub async fn connected_manager(server: &Arc<MockServer>) -> ConnectionManager<MockClient> {
    let manager = mock_manager(server);
    manager.connect().await.unwrap();
    manager
}

/// Polls until `manager` reaches `status`, failing after five (virtual or
/// real) seconds.
pub async fn wait_for_status<C: RpcClient>(manager: &ConnectionManager<C>, status: ConnectionStatus) {
    for _ in 0..5000 {
        if manager.status() == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("expected status {}, still {}", status, manager.status());
}

/// Polls until `check` holds, failing after five seconds.
pub async fn wait_until(what: &str, check: impl Fn() -> bool) {
    for _ in 0..5000 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("timed out waiting for {}", what);
}
