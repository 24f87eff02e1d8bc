// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local copy of entities for offline reads.
//!
//! Entities changed locally but not yet confirmed by the store are tracked as
//! dirty. The cache keeps only the latest version of each entity.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use mnemo_core::Entity;
use parking_lot::RwLock;

#[derive(Debug)]
struct CacheInner {
    entities: BTreeMap<String, Entity>,
    dirty: BTreeSet<String>,
    last_sync: DateTime<Utc>,
}

/// Thread-safe entity cache with dirty tracking.
#[derive(Debug)]
pub struct OfflineCache {
    inner: RwLock<CacheInner>,
}

impl OfflineCache {
    /// Creates an empty cache. The last sync time starts at creation.
    pub fn new() -> Self {
        OfflineCache {
            inner: RwLock::new(CacheInner {
                entities: BTreeMap::new(),
                dirty: BTreeSet::new(),
                last_sync: Utc::now(),
            }),
        }
    }

    /// Stores `entity`, replacing any previous version.
    ///
    /// Entities without an id are ignored.
    pub fn store(&self, entity: Entity) {
        if !entity.has_id() {
            return;
        }
        self.inner.write().entities.insert(entity.id.clone(), entity);
    }

    pub fn get(&self, id: &str) -> Option<Entity> {
        self.inner.read().entities.get(id).cloned()
    }

    /// All cached entities, ordered by id.
    pub fn list_all(&self) -> Vec<Entity> {
        self.inner.read().entities.values().cloned().collect()
    }

    pub fn mark_dirty(&self, id: &str) {
        self.inner.write().dirty.insert(id.to_string());
    }

    pub fn clear_dirty(&self, id: &str) {
        self.inner.write().dirty.remove(id);
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.inner.read().dirty.contains(id)
    }

    /// Ids of all dirty entities, sorted.
    pub fn get_dirty(&self) -> Vec<String> {
        self.inner.read().dirty.iter().cloned().collect()
    }

    /// Removes an entity and its dirty flag.
    pub fn delete(&self, id: &str) {
        let mut inner = self.inner.write();
        inner.entities.remove(id);
        inner.dirty.remove(id);
    }

    /// Drops all entities and dirty flags. The last sync time is kept.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entities.clear();
        inner.dirty.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entities.is_empty()
    }

    pub fn last_sync_time(&self) -> DateTime<Utc> {
        self.inner.read().last_sync
    }

    /// Records a completed sync.
    pub fn touch_sync(&self) {
        self.inner.write().last_sync = Utc::now();
    }
}

impl Default for OfflineCache {
    fn default() -> Self {
        Self::new()
    }
}
