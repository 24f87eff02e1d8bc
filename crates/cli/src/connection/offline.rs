// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline mode and sync replay.
//!
//! Offline mode is entered whenever a connection attempt fails or the
//! connection is lost, and left once a connection is established again.
//! Every established connection replays whatever the sync queue holds in the
//! background, whether or not offline mode was entered first.

use std::sync::Arc;

use mnemo_core::Entity;
use tracing::{debug, info, warn};

use super::manager::{ConnectionManager, Inner};
use crate::error::{is_connection_error, is_timeout, ClassifiedError, Error, Result};
use crate::rpc::RpcClient;
use crate::sync::{replay, OpKind, SyncOperation};

/// Outcome of [`ConnectionManager::apply_mutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Sent to the store; carries the stored entity, or `None` for a delete.
    Live(Option<Entity>),
    /// Queued for the next sync under this sequence number.
    Queued(u64),
}

impl<C: RpcClient> ConnectionManager<C> {
    /// Replays the sync queue against the live connection.
    ///
    /// Returns the number of operations applied. Fails with
    /// [`Error::Offline`] while offline and [`Error::NotConnected`] without a
    /// live client. Replays never overlap.
    pub async fn trigger_sync(&self) -> Result<usize> {
        self.inner.trigger_sync().await
    }

    /// Records a mutation for later replay and updates the offline cache.
    pub fn queue_mutation(&self, kind: OpKind, entity: Entity) -> Result<u64> {
        self.inner.queue_mutation(kind, entity)
    }

    /// Sends a mutation to the store, or queues it when that is not possible.
    ///
    /// The mutation is queued while offline, without a live client, while
    /// older mutations are still queued, or when the call fails with a
    /// connection or timeout error; the latter also starts reconnection.
    /// Other failures are returned as is.
    pub async fn apply_mutation(&self, kind: OpKind, entity: Entity) -> Result<Applied> {
        if !entity.has_id() {
            return Err(Error::InvalidArgument("entity id is required".to_string()));
        }
        let client = {
            let state = self.inner.state.lock();
            if state.offline {
                None
            } else {
                state.client.clone()
            }
        };
        let Some(client) = client.filter(|c| c.is_connected()) else {
            return self.queue_mutation(kind, entity).map(Applied::Queued);
        };
        if !self.inner.queue.is_empty() {
            // Queued intents reach the store first, in order.
            let seq = self.queue_mutation(kind, entity)?;
            self.inner.spawn_sync();
            return Ok(Applied::Queued(seq));
        }

        let result = match kind {
            OpKind::Create => client.store_entity(entity.clone()).await.map(Some),
            OpKind::Update => client.update_entity(entity.clone()).await.map(Some),
            OpKind::Delete => client.delete_entity(entity.id.clone()).await.map(|()| None),
        };
        match result {
            Ok(Some(stored)) => {
                self.inner.cache.store(stored.clone());
                Ok(Applied::Live(Some(stored)))
            }
            Ok(None) => {
                self.inner.cache.delete(&entity.id);
                Ok(Applied::Live(None))
            }
            Err(e) if is_connection_error(&e) || is_timeout(&e) => {
                debug!(kind = %kind, id = %entity.id, error = %e, "queueing mutation after failed call");
                let seq = self.queue_mutation(kind, entity)?;
                let cause = ClassifiedError::classify(e, format!("{} failed", kind));
                self.inner.spawn_reconnect(Error::Classified(cause));
                Ok(Applied::Queued(seq))
            }
            Err(e) => Err(e),
        }
    }
}

impl<C: RpcClient> Inner<C> {
    /// Enters offline mode with `cause` recorded as the last error.
    ///
    /// The error callback fires on every call, even when already offline.
    pub(super) fn enter_offline_mode(&self, cause: Error) {
        let cause = Arc::new(cause);
        let (callback, was_offline) = {
            let mut state = self.state.lock();
            state.last_error = Some(Arc::clone(&cause));
            let was_offline = std::mem::replace(&mut state.offline, true);
            (state.on_error.clone(), was_offline)
        };
        if !was_offline {
            warn!(error = %cause, queued = self.queue.len(), "entering offline mode");
        }
        if let Some(callback) = callback {
            tokio::spawn(async move { callback(cause) });
        }
    }

    /// Leaves offline mode, if in it, and replays any queued mutations in
    /// the background. Called on every established connection.
    pub(super) fn exit_offline_mode(self: &Arc<Self>) {
        let was_offline = std::mem::replace(&mut self.state.lock().offline, false);
        if was_offline {
            info!(queued = self.queue.len(), "leaving offline mode");
        }
        if !self.queue.is_empty() {
            self.spawn_sync();
        }
    }

    /// Runs [`Inner::trigger_sync`] on a spawned task.
    pub(super) fn spawn_sync(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            match inner.trigger_sync().await {
                Ok(0) => {}
                Ok(synced) => info!(synced, "queued changes synced"),
                Err(e) => warn!(error = %e, "background sync failed"),
            }
        });
    }

    pub(super) async fn trigger_sync(&self) -> Result<usize> {
        let client = {
            let state = self.state.lock();
            if state.offline {
                return Err(Error::Offline);
            }
            state.client.clone()
        };
        let client = client
            .filter(|c| c.is_connected())
            .ok_or(Error::NotConnected)?;

        let _gate = self.sync_gate.lock().await;
        replay(client.as_ref(), &self.queue, &self.cache).await
    }

    pub(super) fn queue_mutation(&self, kind: OpKind, entity: Entity) -> Result<u64> {
        if !entity.has_id() {
            return Err(Error::InvalidArgument("entity id is required".to_string()));
        }
        let id = entity.id.clone();
        if kind != OpKind::Delete {
            self.cache.store(entity.clone());
        }
        self.cache.mark_dirty(&id);
        let seq = self.queue.add(SyncOperation::new(kind, id, Some(entity)));
        debug!(seq, kind = %kind, "mutation queued");
        Ok(seq)
    }
}

#[cfg(test)]
#[path = "offline_tests.rs"]
mod tests;
