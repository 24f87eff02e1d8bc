// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The RPC client trait.

use std::future::Future;
use std::pin::Pin;

use mnemo_core::{Entity, HealthStatus, Namespace};

use crate::connection::ConnectionConfig;
use crate::error::Result;

/// Boxed future returned by [`RpcClient`] methods.
pub type RpcFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Builds a fresh, unconnected client for each dial.
pub type ClientFactory<C> = Box<dyn Fn(&ConnectionConfig) -> Result<C> + Send + Sync>;

/// Remote operations offered by the knowledge store.
///
/// Methods take `&self` so one client can be shared between the caller,
/// the health checker and a sync replay.
pub trait RpcClient: Send + Sync + 'static {
    /// Opens the underlying connection.
    fn connect(&self) -> RpcFuture<'_, ()>;

    /// Closes the underlying connection. Closing twice is not an error.
    fn disconnect(&self) -> RpcFuture<'_, ()>;

    /// Whether the underlying connection is open.
    fn is_connected(&self) -> bool;

    /// Liveness probe. Fails if the store answers but reports itself unhealthy.
    fn health_check(&self) -> RpcFuture<'_, HealthStatus>;

    /// Persists a new entity and returns the stored version.
    fn store_entity(&self, entity: Entity) -> RpcFuture<'_, Entity>;

    fn get_entity(&self, entity_id: String) -> RpcFuture<'_, Entity>;

    /// Replaces an existing entity and returns the stored version.
    fn update_entity(&self, entity: Entity) -> RpcFuture<'_, Entity>;

    fn delete_entity(&self, entity_id: String) -> RpcFuture<'_, ()>;

    fn list_entities(&self, namespace: Option<Namespace>) -> RpcFuture<'_, Vec<Entity>>;
}
