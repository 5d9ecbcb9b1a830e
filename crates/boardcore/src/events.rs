use crate::{NodeId, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

pub type RunId = Uuid;

/// Events emitted while a board runs
///
/// Every run appends these to its own chronological log and mirrors them
/// onto the broadcast bus for live subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    RunStarted {
        run_id: RunId,
        node_count: usize,
        timestamp: DateTime<Utc>,
    },
    NodeStarted {
        run_id: RunId,
        node_id: NodeId,
        node_type: String,
        timestamp: DateTime<Utc>,
    },
    NodeCompleted {
        run_id: RunId,
        node_id: NodeId,
        node_type: String,
        outputs: HashMap<String, Value>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    NodeFailed {
        run_id: RunId,
        node_id: NodeId,
        node_type: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
    RunCompleted {
        run_id: RunId,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    RunFailed {
        run_id: RunId,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for run events
pub struct EventBus {
    sender: broadcast::Sender<RunEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.sender.subscribe()
    }

    /// Send to all subscribers; a bus with no listeners drops the event
    pub fn emit(&self, event: RunEvent) {
        let _ = self.sender.send(event);
    }
}

/// Lifecycle states a node moves through during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Idle,
    Pending,
    Running,
    Success,
    Error,
}

/// Side channel for per-node status transitions
///
/// The canvas colors node cards from these updates without replaying the
/// full event log.
pub trait StatusSink: Send + Sync {
    fn on_status(&self, node_id: &str, status: NodeStatus);
}

/// Sink that drops every update
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn on_status(&self, _node_id: &str, _status: NodeStatus) {}
}

/// Sink that records updates in memory, mainly for tests
#[derive(Default)]
pub struct VecStatusSink {
    updates: Mutex<Vec<(NodeId, NodeStatus)>>,
}

impl VecStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(NodeId, NodeStatus)> {
        match self.updates.lock() {
            Ok(updates) => updates.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Statuses recorded for one node, in order
    pub fn for_node(&self, node_id: &str) -> Vec<NodeStatus> {
        self.updates()
            .into_iter()
            .filter(|(id, _)| id == node_id)
            .map(|(_, status)| status)
            .collect()
    }
}

impl StatusSink for VecStatusSink {
    fn on_status(&self, node_id: &str, status: NodeStatus) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((node_id.to_string(), status));
        }
    }
}
