use crate::registry::ExecutorRegistry;
use boardcore::{
    BoardGraph, BoardNode, EventBus, ExecContext, NodeStatus, NodeTypeSpec, PortValues,
    RunContext, RunEvent, RunId, SpecTable,
};
use chrono::Utc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key under which a cycle failure lands in [`RunResult::errors`]
///
/// A cycle belongs to the board rather than any one node, so the whole run
/// aborts with this single synthetic entry and no node outputs.
pub const CYCLE_ERROR_KEY: &str = "__cycle__";

/// Outcome of one board run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: RunId,

    /// True only when every visited node succeeded and nothing was cancelled
    pub success: bool,

    /// Outputs of each node that completed, keyed by node id then port id
    pub node_outputs: HashMap<String, PortValues>,

    /// Failure message per failed node; cycles use [`CYCLE_ERROR_KEY`]
    pub errors: HashMap<String, String>,

    /// Chronological event log of the run
    pub log: Vec<RunEvent>,

    pub duration: Duration,
    pub cancelled: bool,
}

/// Runs a board sequentially in dependency order
///
/// Nodes execute one at a time in a deterministic topological order. A
/// failing node is recorded and skipped over; the rest of the board keeps
/// going, so one broken branch never takes down its neighbors.
pub struct GraphRunner {
    table: Arc<SpecTable>,
    registry: Arc<ExecutorRegistry>,
    event_bus: Arc<EventBus>,
}

impl GraphRunner {
    pub fn new(
        table: Arc<SpecTable>,
        registry: Arc<ExecutorRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            table,
            registry,
            event_bus,
        }
    }

    /// Execute every runnable node of the board
    pub async fn run(&self, graph: &BoardGraph, ctx: RunContext) -> RunResult {
        let run_id = RunId::new_v4();
        let started = Instant::now();
        let mut log: Vec<RunEvent> = Vec::new();
        let mut node_outputs: HashMap<String, PortValues> = HashMap::new();
        let mut errors: HashMap<String, String> = HashMap::new();

        // Only executable, switched-on nodes take part in the run
        let runnable: Vec<&BoardNode> = graph
            .nodes
            .iter()
            .filter(|n| n.active && self.table.is_executable(&n.node_type))
            .collect();

        tracing::info!("Starting run {} with {} nodes", run_id, runnable.len());
        self.emit(
            &mut log,
            RunEvent::RunStarted {
                run_id,
                node_count: runnable.len(),
                timestamp: Utc::now(),
            },
        );

        let order = match self.execution_order(graph, &runnable) {
            Ok(order) => order,
            Err(stuck) => {
                let message = format!("Cycle detected among nodes: {}", stuck.join(", "));
                tracing::error!("Run {} aborted: {}", run_id, message);
                errors.insert(CYCLE_ERROR_KEY.to_string(), message.clone());
                self.emit(
                    &mut log,
                    RunEvent::RunFailed {
                        run_id,
                        error: message,
                        timestamp: Utc::now(),
                    },
                );
                return RunResult {
                    run_id,
                    success: false,
                    node_outputs,
                    errors,
                    log,
                    duration: started.elapsed(),
                    cancelled: false,
                };
            }
        };

        for node in &runnable {
            ctx.status.on_status(&node.id, NodeStatus::Pending);
        }

        let mut cancelled = false;
        for node_id in &order {
            if ctx.cancellation.is_cancelled() {
                tracing::warn!("Run {} cancelled before node {}", run_id, node_id);
                cancelled = true;
                break;
            }

            let Some(node) = graph.find_node(node_id) else {
                continue;
            };
            let Some(spec) = self.table.get(&node.node_type) else {
                continue;
            };

            ctx.status.on_status(&node.id, NodeStatus::Running);
            self.emit(
                &mut log,
                RunEvent::NodeStarted {
                    run_id,
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                    timestamp: Utc::now(),
                },
            );

            let mut inputs = self.gather_inputs(graph, node, spec, &node_outputs);

            let missing: Vec<&str> = spec
                .inputs
                .iter()
                .filter(|p| p.required && p.default.is_none() && !inputs.contains_key(&p.id))
                .map(|p| p.label.as_str())
                .collect();
            if !missing.is_empty() {
                let message = format!("Missing required inputs: {}", missing.join(", "));
                tracing::error!("Node {} skipped: {}", node.id, message);
                errors.insert(node.id.clone(), message.clone());
                ctx.status.on_status(&node.id, NodeStatus::Error);
                self.emit(
                    &mut log,
                    RunEvent::NodeFailed {
                        run_id,
                        node_id: node.id.clone(),
                        node_type: node.node_type.clone(),
                        error: message,
                        timestamp: Utc::now(),
                    },
                );
                continue;
            }

            for port in &spec.inputs {
                if let Some(default) = &port.default {
                    inputs
                        .entry(port.id.clone())
                        .or_insert_with(|| default.clone());
                }
            }

            // Node settings shadow the run defaults for this call only
            let mut settings = ctx.defaults.clone();
            settings.extend(node.settings.clone());

            let exec_ctx = ExecContext {
                node_id: node.id.clone(),
                scope: ctx.scope.clone(),
                inputs,
                settings,
                cancellation: ctx.cancellation.clone(),
            };

            let executor = self.registry.get(&node.node_type);
            let node_started = Instant::now();
            match executor.execute(exec_ctx).await {
                Ok(outputs) => {
                    let duration_ms = node_started.elapsed().as_millis() as u64;
                    tracing::info!("Node {} completed in {}ms", node.id, duration_ms);
                    ctx.status.on_status(&node.id, NodeStatus::Success);
                    self.emit(
                        &mut log,
                        RunEvent::NodeCompleted {
                            run_id,
                            node_id: node.id.clone(),
                            node_type: node.node_type.clone(),
                            outputs: outputs.clone(),
                            duration_ms,
                            timestamp: Utc::now(),
                        },
                    );
                    node_outputs.insert(node.id.clone(), outputs);
                }
                Err(e) => {
                    tracing::error!("Node {} failed: {}", node.id, e);
                    ctx.status.on_status(&node.id, NodeStatus::Error);
                    errors.insert(node.id.clone(), e.to_string());
                    self.emit(
                        &mut log,
                        RunEvent::NodeFailed {
                            run_id,
                            node_id: node.id.clone(),
                            node_type: node.node_type.clone(),
                            error: e.to_string(),
                            timestamp: Utc::now(),
                        },
                    );
                }
            }
        }

        let success = errors.is_empty() && !cancelled;
        let duration = started.elapsed();
        self.emit(
            &mut log,
            RunEvent::RunCompleted {
                run_id,
                success,
                duration_ms: duration.as_millis() as u64,
                timestamp: Utc::now(),
            },
        );
        tracing::info!(
            "Run {} finished in {}ms (success: {})",
            run_id,
            duration.as_millis(),
            success
        );

        RunResult {
            run_id,
            success,
            node_outputs,
            errors,
            log,
            duration,
            cancelled,
        }
    }

    fn emit(&self, log: &mut Vec<RunEvent>, event: RunEvent) {
        self.event_bus.emit(event.clone());
        log.push(event);
    }

    /// Topological order over the runnable nodes, or the ids stuck in a cycle
    ///
    /// Kahn's algorithm with a FIFO queue seeded in board order; nodes freed
    /// in the same step are queued in board order too, so the schedule is
    /// reproducible for a given board.
    fn execution_order(
        &self,
        graph: &BoardGraph,
        runnable: &[&BoardNode],
    ) -> Result<Vec<String>, Vec<String>> {
        let mut dag: DiGraph<String, ()> = DiGraph::new();
        let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();

        for node in runnable {
            let idx = dag.add_node(node.id.clone());
            index_of.insert(node.id.as_str(), idx);
        }

        // Only edges between two runnable endpoints impose ordering
        for edge in &graph.edges {
            let (Some(&from), Some(&to)) = (
                index_of.get(edge.source.as_str()),
                index_of.get(edge.target.as_str()),
            ) else {
                continue;
            };
            dag.update_edge(from, to, ());
        }

        let mut in_degree: HashMap<NodeIndex, usize> = dag
            .node_indices()
            .map(|ix| (ix, dag.edges_directed(ix, Direction::Incoming).count()))
            .collect();

        let mut queue: VecDeque<NodeIndex> = dag
            .node_indices()
            .filter(|ix| in_degree.get(ix) == Some(&0))
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(dag.node_count());
        while let Some(ix) = queue.pop_front() {
            order.push(dag[ix].clone());
            let mut released: Vec<NodeIndex> = Vec::new();
            for next in dag.neighbors_directed(ix, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        released.push(next);
                    }
                }
            }
            released.sort_unstable_by_key(|ix| ix.index());
            queue.extend(released);
        }

        if order.len() == dag.node_count() {
            return Ok(order);
        }

        let ordered: HashSet<&str> = order.iter().map(|id| id.as_str()).collect();
        let mut stuck: Vec<String> = dag
            .node_indices()
            .map(|ix| dag[ix].clone())
            .filter(|id| !ordered.contains(id.as_str()))
            .collect();
        stuck.sort();
        Err(stuck)
    }

    /// Inputs for one node: edge-delivered values first, then widget values
    /// standing in for unconnected ports
    ///
    /// Edges whose source produced nothing, or that carry no handles, are
    /// skipped without comment; upstream failures surface through their own
    /// error entries, not here.
    fn gather_inputs(
        &self,
        graph: &BoardGraph,
        node: &BoardNode,
        spec: &NodeTypeSpec,
        node_outputs: &HashMap<String, PortValues>,
    ) -> PortValues {
        let mut inputs = PortValues::new();

        for edge in graph.incoming_edges(&node.id) {
            let (Some(source_port), Some(target_port)) = (
                edge.source_handle.as_deref(),
                edge.target_handle.as_deref(),
            ) else {
                continue;
            };
            let Some(outputs) = node_outputs.get(&edge.source) else {
                continue;
            };
            if let Some(value) = outputs.get(source_port) {
                inputs.insert(target_port.to_string(), value.clone());
            }
        }

        for port in &spec.inputs {
            if inputs.contains_key(&port.id) {
                continue;
            }
            if let Some(value) = node.settings.get(&port.id) {
                inputs.insert(port.id.clone(), value.clone());
            }
        }

        inputs
    }
}
