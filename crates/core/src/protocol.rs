// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON frames exchanged with the knowledge store.
//!
//! The protocol is request/response:
//! - Client sends a [`Request`] carrying a caller-chosen id
//! - Server answers with a [`Reply`] echoing that id

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Namespace};
use crate::status::{HealthStatus, RpcStatus};

/// Remote procedure invoked by a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    /// Liveness probe.
    HealthCheck,
    /// Persist a new entity.
    StoreEntity { entity: Entity },
    /// Fetch one entity by id.
    GetEntity { entity_id: String },
    /// Replace an existing entity.
    UpdateEntity { entity: Entity },
    /// Remove an entity.
    DeleteEntity { entity_id: String },
    /// List entities, optionally restricted to a namespace.
    ListEntities {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<Namespace>,
    },
}

impl Method {
    /// Short name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Method::HealthCheck => "health check",
            Method::StoreEntity { .. } => "store entity",
            Method::GetEntity { .. } => "get entity",
            Method::UpdateEntity { .. } => "update entity",
            Method::DeleteEntity { .. } => "delete entity",
            Method::ListEntities { .. } => "list entities",
        }
    }
}

/// A client request frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    /// Correlation id echoed by the server.
    pub id: u64,
    #[serde(flatten)]
    pub method: Method,
}

/// Payload of a server reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyBody {
    /// Answer to [`Method::HealthCheck`].
    Health { status: HealthStatus },
    /// Answer to store, get and update.
    Entity { entity: Entity },
    /// Answer to [`Method::ListEntities`].
    Entities { entities: Vec<Entity> },
    /// Answer to [`Method::DeleteEntity`].
    Deleted,
    /// The request failed.
    Error { status: RpcStatus },
}

/// A server reply frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    /// Id of the request being answered.
    pub id: u64,
    #[serde(flatten)]
    pub body: ReplyBody,
}

impl Request {
    /// Creates a request.
    pub fn new(id: u64, method: Method) -> Self {
        Request { id, method }
    }

    /// Serializes the request to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a request from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Reply {
    /// Creates a reply.
    pub fn new(id: u64, body: ReplyBody) -> Self {
        Reply { id, body }
    }

    /// Creates an error reply.
    pub fn error(id: u64, status: RpcStatus) -> Self {
        Reply {
            id,
            body: ReplyBody::Error { status },
        }
    }

    /// Splits the reply into its successful body or the remote status.
    pub fn into_result(self) -> Result<ReplyBody, RpcStatus> {
        match self.body {
            ReplyBody::Error { status } => Err(status),
            body => Ok(body),
        }
    }

    /// Serializes the reply to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a reply from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
