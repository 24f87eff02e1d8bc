// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use mnemo_core::Entity;

/// Create a test entity with the given id.
pub fn make_entity(id: &str) -> Entity {
    Entity::new(id, format!("content of {}", id))
}
