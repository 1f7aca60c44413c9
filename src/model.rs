//! Input records consumed by the layout engine.
//!
//! These mirror what the ingestion side hands over: sessions (optionally
//! spawned by another session) and the event items recorded against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    #[default]
    Ordinary,
    Scheduled,
}

/// A unit of agent work. `spawned_by` links it to its parent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub key: String,
    #[serde(default)]
    pub spawned_by: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub kind: SessionKind,
}

impl Session {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            spawned_by: None,
            last_activity_at: None,
            kind: SessionKind::Ordinary,
        }
    }

    pub fn spawned_by(mut self, parent: impl Into<String>) -> Self {
        self.spawned_by = Some(parent.into());
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Action,
    #[serde(alias = "exec-process", alias = "exec_process")]
    Exec,
    /// Anything the ingestion side emits that we have no dimensions for.
    #[serde(other)]
    Unknown,
}

/// A single event recorded against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub session_key: Option<String>,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl EventItem {
    pub fn new(session_key: impl Into<String>, kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            session_key: Some(session_key.into()),
            kind,
            timestamp,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Everything a single layout pass consumes. Order matters: the engine is
/// deterministic for a given sequence of sessions and items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub items: Vec<EventItem>,
}

/// JSON request: the input records plus an optional config override.
/// Missing config fields fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRequest {
    #[serde(flatten)]
    pub input: LayoutInput,
    #[serde(default)]
    pub config: LayoutConfig,
}
