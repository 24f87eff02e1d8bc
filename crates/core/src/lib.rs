// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mnemo-core: Shared types for the mnemo knowledge-store client
//!
//! This crate provides the entity model, remote status codes and the JSON
//! request/reply frames used between the client and the knowledge store.

pub mod entity;
pub mod error;
pub mod protocol;
pub mod status;

pub use entity::{Entity, Namespace};
pub use error::{Error, Result};
pub use protocol::{Method, Reply, ReplyBody, Request};
pub use status::{HealthStatus, RpcCode, RpcStatus};
