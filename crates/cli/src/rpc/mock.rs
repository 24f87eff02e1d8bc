// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`RpcClient`] for tests.
//!
//! A [`MockServer`] plays the knowledge store. Every client built by its
//! factory shares the server's state, so a test can flip the server into a
//! failing mode while a connection manager holds a client.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mnemo_core::{Entity, HealthStatus, Namespace};
use parking_lot::Mutex;

use super::client::{RpcClient, RpcFuture};
use crate::connection::ConnectionConfig;
use crate::error::{Error, Result};

#[derive(Default)]
struct ServerState {
    refuse_connections: bool,
    unhealthy: bool,
    severed: bool,
    /// 1-based index of the mutation call that fails.
    fail_mutation: Option<usize>,
    mutations: usize,
    calls: Vec<String>,
    connects: usize,
    entities: BTreeMap<String, Entity>,
}

#[derive(Default)]
pub struct MockServer {
    state: Mutex<ServerState>,
}

impl MockServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes `connect` fail with a refused connection.
    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().refuse_connections = refuse;
    }

    /// Makes health checks fail.
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.state.lock().unhealthy = unhealthy;
    }

    /// Makes every call on an open client fail as if the link dropped.
    pub fn sever(&self, severed: bool) {
        self.state.lock().severed = severed;
    }

    /// Makes the `n`th mutation (1-based, counted from now on) fail.
    pub fn fail_mutation(&self, n: usize) {
        let mut state = self.state.lock();
        state.fail_mutation = Some(state.mutations + n);
    }

    /// Mutation calls seen so far, e.g. `store:m1`, `delete:m2`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.state.lock().entities.get(id).cloned()
    }

    pub fn client(self: &Arc<Self>) -> MockClient {
        MockClient {
            server: Arc::clone(self),
            connected: AtomicBool::new(false),
        }
    }

    pub fn factory(self: &Arc<Self>) -> impl Fn(&ConnectionConfig) -> Result<MockClient> + Send + Sync + 'static {
        let server = Arc::clone(self);
        move |_config: &ConnectionConfig| Ok(server.client())
    }

    fn mutate(&self, call: String, apply: impl FnOnce(&mut ServerState)) -> Result<()> {
        let mut state = self.state.lock();
        state.mutations += 1;
        if state.fail_mutation == Some(state.mutations) {
            return Err(Error::Internal(format!("injected failure on {}", call)));
        }
        state.calls.push(call);
        apply(&mut state);
        Ok(())
    }
}

pub struct MockClient {
    server: Arc<MockServer>,
    connected: AtomicBool,
}

impl MockClient {
    fn ensure_connected(&self) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(Error::NotConnected);
        }
        if self.server.state.lock().severed {
            return Err(Error::Connection("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

impl RpcClient for MockClient {
    fn connect(&self) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.server.state.lock();
            state.connects += 1;
            if state.refuse_connections {
                return Err(Error::Network(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )));
            }
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        })
    }

    fn disconnect(&self) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn health_check(&self) -> RpcFuture<'_, HealthStatus> {
        Box::pin(async move {
            self.ensure_connected()?;
            if self.server.state.lock().unhealthy {
                return Err(Error::Unavailable("mock server unhealthy".to_string()));
            }
            Ok(HealthStatus::healthy("mock"))
        })
    }

    fn store_entity(&self, entity: Entity) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            self.ensure_connected()?;
            let stored = entity.clone();
            self.server.mutate(format!("store:{}", entity.id), |state| {
                state.entities.insert(entity.id.clone(), entity);
            })?;
            Ok(stored)
        })
    }

    fn get_entity(&self, entity_id: String) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            self.ensure_connected()?;
            self.server
                .entity(&entity_id)
                .ok_or(Error::NotFound(entity_id))
        })
    }

    fn update_entity(&self, entity: Entity) -> RpcFuture<'_, Entity> {
        Box::pin(async move {
            self.ensure_connected()?;
            let stored = entity.clone();
            self.server.mutate(format!("update:{}", entity.id), |state| {
                state.entities.insert(entity.id.clone(), entity);
            })?;
            Ok(stored)
        })
    }

    fn delete_entity(&self, entity_id: String) -> RpcFuture<'_, ()> {
        Box::pin(async move {
            self.ensure_connected()?;
            self.server.mutate(format!("delete:{}", entity_id), |state| {
                state.entities.remove(&entity_id);
            })
        })
    }

    fn list_entities(&self, namespace: Option<Namespace>) -> RpcFuture<'_, Vec<Entity>> {
        Box::pin(async move {
            self.ensure_connected()?;
            let state = self.server.state.lock();
            Ok(state
                .entities
                .values()
                .filter(|e| namespace.as_ref().is_none_or(|ns| &e.namespace == ns))
                .cloned()
                .collect())
        })
    }
}
