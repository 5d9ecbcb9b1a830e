use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = String;
pub type PortId = String;

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node placed on a board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardNode {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: String,

    /// Widget values typed into the node card, keyed by port or setting id
    #[serde(default)]
    pub settings: HashMap<String, Value>,

    #[serde(default)]
    pub position: Position,

    /// Switched-off nodes stay on the board but never run
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl BoardNode {
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            settings: HashMap::new(),
            position: Position::default(),
            active: true,
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A directed connection between two node ports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<PortId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<PortId>,
}

impl BoardEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<NodeId>,
        source_handle: impl Into<PortId>,
        target: impl Into<NodeId>,
        target_handle: impl Into<PortId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Some(source_handle.into()),
            target_handle: Some(target_handle.into()),
        }
    }

    /// An edge with no handle information, as saved by pre-typed boards
    pub fn untyped(
        id: impl Into<String>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }
}

/// A full board: nodes plus the edges wiring them together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardGraph {
    pub nodes: Vec<BoardNode>,
    pub edges: Vec<BoardEdge>,
}

impl BoardGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: BoardNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: BoardEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn find_node(&self, id: &str) -> Option<&BoardNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn incoming_edges(&self, id: &str) -> Vec<&BoardEdge> {
        self.edges.iter().filter(|e| e.target == id).collect()
    }

    pub fn outgoing_edges(&self, id: &str) -> Vec<&BoardEdge> {
        self.edges.iter().filter(|e| e.source == id).collect()
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &str) -> Option<BoardNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| e.source != id && e.target != id);
        Some(node)
    }

    /// Parse a board from its canvas JSON payload
    pub fn from_json(payload: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
