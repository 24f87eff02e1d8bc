// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered queue of mutations made while offline.
//!
//! Operations are replayed against the store in insertion order once the
//! connection returns. Each one gets a sequence number at enqueue time so a
//! replay can remove exactly the operations it applied, even when new ones
//! were appended in the meantime.

use std::fmt;

use chrono::{DateTime, Utc};
use mnemo_core::Entity;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Kind of a queued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A mutation waiting to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOperation {
    pub kind: OpKind,
    pub entity_id: String,
    /// Full entity for create and update. Optional for delete.
    pub snapshot: Option<Entity>,
    /// When the mutation was made locally.
    pub timestamp: DateTime<Utc>,
    /// Assigned by [`SyncQueue::add`]; 0 until then.
    pub seq: u64,
}

impl SyncOperation {
    /// Creates an operation stamped with the current time.
    pub fn new(kind: OpKind, entity_id: impl Into<String>, snapshot: Option<Entity>) -> Self {
        SyncOperation {
            kind,
            entity_id: entity_id.into(),
            snapshot,
            timestamp: Utc::now(),
            seq: 0,
        }
    }

    pub fn create(entity: Entity) -> Self {
        Self::new(OpKind::Create, entity.id.clone(), Some(entity))
    }

    pub fn update(entity: Entity) -> Self {
        Self::new(OpKind::Update, entity.id.clone(), Some(entity))
    }

    pub fn delete(entity_id: impl Into<String>) -> Self {
        Self::new(OpKind::Delete, entity_id, None)
    }
}

#[derive(Debug)]
struct QueueInner {
    ops: Vec<SyncOperation>,
    next_seq: u64,
}

/// Thread-safe FIFO of [`SyncOperation`]s.
#[derive(Debug)]
pub struct SyncQueue {
    inner: Mutex<QueueInner>,
}

impl SyncQueue {
    pub fn new() -> Self {
        SyncQueue {
            inner: Mutex::new(QueueInner {
                ops: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// Appends an operation and returns its sequence number.
    pub fn add(&self, mut op: SyncOperation) -> u64 {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        op.seq = seq;
        inner.ops.push(op);
        seq
    }

    /// Returns a copy of all queued operations, oldest first.
    pub fn get_all(&self) -> Vec<SyncOperation> {
        self.inner.lock().ops.clone()
    }

    /// Removes the operation at `index`. Out-of-range indices are ignored.
    pub fn remove(&self, index: usize) -> Option<SyncOperation> {
        let mut inner = self.inner.lock();
        if index < inner.ops.len() {
            Some(inner.ops.remove(index))
        } else {
            None
        }
    }

    /// Removes the operation with sequence number `seq`.
    pub fn remove_seq(&self, seq: u64) -> bool {
        let mut inner = self.inner.lock();
        match inner.ops.iter().position(|op| op.seq == seq) {
            Some(index) => {
                inner.ops.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.inner.lock().ops.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().ops.is_empty()
    }
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new()
    }
}
