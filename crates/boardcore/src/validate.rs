use crate::{BoardGraph, SpecTable};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Handle names accepted from boards saved before ports carried types
pub const LEGACY_ANCHORS: [&str; 4] = ["top", "bottom", "left", "right"];

fn is_legacy_anchor(handle: Option<&str>) -> bool {
    matches!(handle, Some(h) if LEGACY_ANCHORS.contains(&h))
}

/// Decide whether a proposed connection may be drawn
///
/// Handles are resolved against the global port index of the spec table.
/// When both resolve, the source type must be compatible with the target
/// type. When either fails to resolve, the connection only stands if both
/// handles are legacy side anchors; anything else is rejected, including
/// absent handles.
pub fn is_valid_connection(
    table: &SpecTable,
    source: &str,
    target: &str,
    source_handle: Option<&str>,
    target_handle: Option<&str>,
) -> bool {
    if source.is_empty() || target.is_empty() {
        return false;
    }
    if source == target {
        return false;
    }

    let source_type = source_handle.and_then(|h| table.output_port_type(h));
    let target_type = target_handle.and_then(|h| table.input_port_type(h));

    match (source_type, target_type) {
        (Some(source_type), Some(target_type)) => {
            let compatible = source_type.is_compatible_with(target_type);
            if !compatible {
                tracing::debug!(
                    "Rejected connection {} -> {}: {} does not feed {}",
                    source,
                    target,
                    source_type,
                    target_type
                );
            }
            compatible
        }
        _ => is_legacy_anchor(source_handle) && is_legacy_anchor(target_handle),
    }
}

/// Problem found while validating a whole board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum GraphIssue {
    InvalidEdge {
        edge_id: String,
        reason: String,
    },
    UnknownNodeType {
        node_id: String,
        node_type: String,
    },
    CycleDetected {
        node_ids: Vec<String>,
    },
    MissingRequiredInput {
        node_id: String,
        port_label: String,
    },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::InvalidEdge { edge_id, reason } => {
                write!(f, "Edge '{}' is invalid: {}", edge_id, reason)
            }
            GraphIssue::UnknownNodeType { node_id, node_type } => {
                write!(f, "Node '{}' has unknown type '{}'", node_id, node_type)
            }
            GraphIssue::CycleDetected { node_ids } => {
                write!(f, "Cycle detected among nodes: {}", node_ids.join(", "))
            }
            GraphIssue::MissingRequiredInput { node_id, port_label } => {
                write!(f, "Node '{}' is missing required input '{}'", node_id, port_label)
            }
        }
    }
}

/// Validate a whole board, collecting every issue rather than stopping at
/// the first
///
/// The canvas runs this before enabling the run button; the report mixes
/// hard errors (bad edges, cycles) with run-blocking gaps (unconnected
/// required inputs).
pub fn validate_graph(graph: &BoardGraph, table: &SpecTable) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    for node in &graph.nodes {
        if !table.contains(&node.node_type) {
            issues.push(GraphIssue::UnknownNodeType {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
            });
        }
    }

    for edge in &graph.edges {
        if graph.find_node(&edge.source).is_none() {
            issues.push(GraphIssue::InvalidEdge {
                edge_id: edge.id.clone(),
                reason: format!("source node '{}' does not exist", edge.source),
            });
            continue;
        }
        if graph.find_node(&edge.target).is_none() {
            issues.push(GraphIssue::InvalidEdge {
                edge_id: edge.id.clone(),
                reason: format!("target node '{}' does not exist", edge.target),
            });
            continue;
        }
        if edge.source == edge.target {
            issues.push(GraphIssue::InvalidEdge {
                edge_id: edge.id.clone(),
                reason: "connects a node to itself".to_string(),
            });
            continue;
        }
        if !is_valid_connection(
            table,
            &edge.source,
            &edge.target,
            edge.source_handle.as_deref(),
            edge.target_handle.as_deref(),
        ) {
            issues.push(GraphIssue::InvalidEdge {
                edge_id: edge.id.clone(),
                reason: format!(
                    "ports {:?} -> {:?} cannot connect",
                    edge.source_handle, edge.target_handle
                ),
            });
        }
    }

    if let Some(node_ids) = detect_cycle(graph, table) {
        issues.push(GraphIssue::CycleDetected { node_ids });
    }

    for node in &graph.nodes {
        let Some(spec) = table.get(&node.node_type) else {
            continue;
        };
        if !spec.executable || !node.active {
            continue;
        }
        let connected: HashSet<&str> = graph
            .incoming_edges(&node.id)
            .iter()
            .filter_map(|e| e.target_handle.as_deref())
            .collect();
        for port in &spec.inputs {
            if !port.required || port.default.is_some() {
                continue;
            }
            if connected.contains(port.id.as_str()) || node.settings.contains_key(&port.id) {
                continue;
            }
            issues.push(GraphIssue::MissingRequiredInput {
                node_id: node.id.clone(),
                port_label: port.label.clone(),
            });
        }
    }

    issues
}

/// Nodes stuck in a dependency cycle, if any
///
/// Only edges whose endpoints are both executable constrain ordering, so a
/// loop through a structural node is not a cycle.
fn detect_cycle(graph: &BoardGraph, table: &SpecTable) -> Option<Vec<String>> {
    let executable: HashSet<&str> = graph
        .nodes
        .iter()
        .filter(|n| table.is_executable(&n.node_type))
        .map(|n| n.id.as_str())
        .collect();

    let mut in_degree: HashMap<&str, usize> = executable.iter().map(|id| (*id, 0)).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();

    for edge in &graph.edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if source == target {
            continue;
        }
        if executable.contains(source) && executable.contains(target) {
            successors.entry(source).or_default().push(target);
            if let Some(degree) = in_degree.get_mut(target) {
                *degree += 1;
            }
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut visited = 0usize;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        if let Some(next) = successors.get(id) {
            for target in next {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    if visited == executable.len() {
        return None;
    }

    // Everything never drained to zero sits on or behind a cycle
    let mut stuck: Vec<String> = in_degree
        .iter()
        .filter(|(_, degree)| **degree > 0)
        .map(|(id, _)| id.to_string())
        .collect();
    stuck.sort();
    Some(stuck)
}
