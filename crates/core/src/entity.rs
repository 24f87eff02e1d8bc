// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Knowledge-store entities and their namespaces.
//!
//! An [`Entity`] is the snapshot of a single record held by the remote store.
//! The client treats it as opaque apart from its identifier; everything else is
//! carried through the offline cache and the sync queue unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scope an entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Namespace {
    /// Visible everywhere.
    #[default]
    Global,
    /// Scoped to a single project.
    Project {
        /// Project name.
        name: String,
    },
    /// Scoped to one session inside a project.
    Session {
        /// Owning project name.
        project: String,
        /// Session identifier.
        session: String,
    },
}

impl Namespace {
    /// Creates a project namespace.
    pub fn project(name: impl Into<String>) -> Self {
        Namespace::Project { name: name.into() }
    }

    /// Creates a session namespace.
    pub fn session(project: impl Into<String>, session: impl Into<String>) -> Self {
        Namespace::Session {
            project: project.into(),
            session: session.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Global => write!(f, "global"),
            Namespace::Project { name } => write!(f, "project:{}", name),
            Namespace::Session { project, session } => {
                write!(f, "session:{}/{}", project, session)
            }
        }
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "global" {
            return Ok(Namespace::Global);
        }
        if let Some(name) = s.strip_prefix("project:") {
            if name.is_empty() {
                return Err(Error::InvalidNamespace(s.to_string()));
            }
            return Ok(Namespace::project(name));
        }
        if let Some(rest) = s.strip_prefix("session:") {
            return match rest.split_once('/') {
                Some((project, session)) if !project.is_empty() && !session.is_empty() => {
                    Ok(Namespace::session(project, session))
                }
                _ => Err(Error::InvalidNamespace(s.to_string())),
            };
        }
        Err(Error::InvalidNamespace(s.to_string()))
    }
}

/// A knowledge-store record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Store-assigned identifier. Empty for records not yet known to the store.
    pub id: String,
    /// Scope of the record.
    #[serde(default)]
    pub namespace: Namespace,
    /// Main body.
    pub content: String,
    /// Importance from 1 (trivia) to 10 (critical).
    #[serde(default = "default_importance")]
    pub importance: u8,
    /// Free-form labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Where the record came from (file, conversation, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Store-defined record type (e.g. "insight", "decision").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Last local or remote modification.
    pub updated_at: DateTime<Utc>,
}

fn default_importance() -> u8 {
    5
}

impl Entity {
    /// Creates an entity with the given id and content in the global namespace.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            namespace: Namespace::Global,
            content: content.into(),
            importance: default_importance(),
            tags: Vec::new(),
            context: String::new(),
            kind: None,
            updated_at: Utc::now(),
        }
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the importance, clamped to 1..=10.
    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance.clamp(1, 10);
        self
    }

    /// True when the entity carries an identifier the cache can key on.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
