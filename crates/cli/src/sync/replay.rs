// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued mutations.

use tracing::{debug, warn};

use super::cache::OfflineCache;
use super::queue::{OpKind, SyncOperation, SyncQueue};
use crate::error::{Error, Result};
use crate::rpc::RpcClient;

/// Sends queued operations to the store, oldest first.
///
/// Works on a snapshot of the queue; operations added meanwhile stay queued
/// for the next replay. Each applied operation is removed from the queue and
/// its entity is no longer dirty. The first failure stops the replay and
/// leaves that operation and everything after it queued. Create and update
/// operations without a snapshot are dropped without a remote call.
///
/// Returns the number of operations applied.
pub async fn replay<C: RpcClient + ?Sized>(
    client: &C,
    queue: &SyncQueue,
    cache: &OfflineCache,
) -> Result<usize> {
    let ops = queue.get_all();
    let mut synced = 0;

    for (position, op) in ops.into_iter().enumerate() {
        if let Err(e) = apply(client, &op, cache).await {
            warn!(position, kind = %op.kind, id = %op.entity_id, error = %e, "sync stopped");
            return Err(Error::SyncFailed {
                synced,
                position,
                kind: op.kind,
                source: Box::new(e),
            });
        }
        queue.remove_seq(op.seq);
        if op.snapshot.is_some() || op.kind == OpKind::Delete {
            synced += 1;
        }
    }

    cache.touch_sync();
    Ok(synced)
}

async fn apply<C: RpcClient + ?Sized>(
    client: &C,
    op: &SyncOperation,
    cache: &OfflineCache,
) -> Result<()> {
    match (op.kind, &op.snapshot) {
        (OpKind::Create | OpKind::Update, None) => {
            debug!(seq = op.seq, id = %op.entity_id, "dropping operation without snapshot");
        }
        (OpKind::Create, Some(entity)) => {
            client.store_entity(entity.clone()).await?;
            cache.clear_dirty(&op.entity_id);
        }
        (OpKind::Update, Some(entity)) => {
            client.update_entity(entity.clone()).await?;
            cache.clear_dirty(&op.entity_id);
        }
        (OpKind::Delete, _) => {
            client.delete_entity(op.entity_id.clone()).await?;
            cache.delete(&op.entity_id);
        }
    }
    Ok(())
}
