// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for queue replay.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::test_helpers::make_entity;
use super::*;
use crate::error::Error;
use crate::rpc::mock::{MockClient, MockServer};
use crate::rpc::RpcClient;
use std::sync::Arc;

async fn connected(server: &Arc<MockServer>) -> MockClient {
    let client = server.client();
    client.connect().await.unwrap();
    client
}

#[tokio::test]
async fn empty_queue_touches_sync_without_calls() {
    let server = MockServer::new();
    let client = connected(&server).await;
    let queue = SyncQueue::new();
    let cache = OfflineCache::new();
    let before = cache.last_sync_time();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let synced = replay(&client, &queue, &cache).await.unwrap();

    assert_eq!(synced, 0);
    assert!(server.calls().is_empty());
    assert!(cache.last_sync_time() > before);
}

#[tokio::test]
async fn replays_in_order_and_clears_state() {
    let server = MockServer::new();
    let client = connected(&server).await;
    let queue = SyncQueue::new();
    let cache = OfflineCache::new();

    for id in ["m1", "m2"] {
        cache.store(make_entity(id));
        cache.mark_dirty(id);
    }
    cache.mark_dirty("m3");
    queue.add(SyncOperation::create(make_entity("m1")));
    queue.add(SyncOperation::update(make_entity("m2")));
    queue.add(SyncOperation::delete("m3"));

    let synced = replay(&client, &queue, &cache).await.unwrap();

    assert_eq!(synced, 3);
    assert_eq!(server.calls(), vec!["store:m1", "update:m2", "delete:m3"]);
    assert!(queue.is_empty());
    assert!(cache.get_dirty().is_empty());
    assert!(cache.get("m1").is_some());
    assert!(cache.get("m3").is_none());
}

#[tokio::test]
async fn stops_at_first_failure_and_keeps_the_rest() {
    let server = MockServer::new();
    let client = connected(&server).await;
    let queue = SyncQueue::new();
    let cache = OfflineCache::new();
    for id in ["m1", "m2", "m3"] {
        cache.mark_dirty(id);
        queue.add(SyncOperation::create(make_entity(id)));
    }
    server.fail_mutation(2);

    let err = replay(&client, &queue, &cache).await.unwrap_err();

    match &err {
        Error::SyncFailed {
            synced,
            position,
            kind,
            ..
        } => {
            assert_eq!(*synced, 1);
            assert_eq!(*position, 1);
            assert_eq!(*kind, OpKind::Create);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("injected failure"));

    let left: Vec<_> = queue.get_all().into_iter().map(|op| op.entity_id).collect();
    assert_eq!(left, vec!["m2", "m3"]);
    assert_eq!(cache.get_dirty(), vec!["m2", "m3"]);
}

#[tokio::test]
async fn operations_without_snapshot_are_dropped() {
    let server = MockServer::new();
    let client = connected(&server).await;
    let queue = SyncQueue::new();
    let cache = OfflineCache::new();
    queue.add(SyncOperation::new(OpKind::Create, "ghost", None));
    queue.add(SyncOperation::create(make_entity("m1")));

    let synced = replay(&client, &queue, &cache).await.unwrap();

    assert_eq!(synced, 1);
    assert_eq!(server.calls(), vec!["store:m1"]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn failure_on_unconnected_client_keeps_queue() {
    let server = MockServer::new();
    let client = server.client();
    let queue = SyncQueue::new();
    let cache = OfflineCache::new();
    queue.add(SyncOperation::delete("m1"));

    let err = replay(&client, &queue, &cache).await.unwrap_err();

    assert!(matches!(err, Error::SyncFailed { synced: 0, .. }));
    assert_eq!(queue.len(), 1);
}
