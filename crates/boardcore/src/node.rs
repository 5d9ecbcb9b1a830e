use crate::{NodeError, NodeId, NullStatusSink, StatusSink, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Values keyed by port id
pub type PortValues = HashMap<String, Value>;

/// Behavior of one executable node type
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    /// Type identifier this executor handles (e.g. "image-generator")
    fn node_type(&self) -> &str;

    /// Run the node against its gathered inputs
    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError>;
}

/// Identity of the board and brand a run executes under
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunScope {
    pub board_id: String,
    pub brand_id: String,
}

impl RunScope {
    pub fn new(board_id: impl Into<String>, brand_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            brand_id: brand_id.into(),
        }
    }
}

/// Caller-supplied context for one run
#[derive(Clone)]
pub struct RunContext {
    pub scope: RunScope,

    /// Run-wide settings; node settings shadow these per call
    pub defaults: HashMap<String, Value>,

    /// Checked cooperatively between nodes and inside long-running executors
    pub cancellation: CancellationToken,

    /// Receives per-node status transitions alongside the event log
    pub status: Arc<dyn StatusSink>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            scope: RunScope::default(),
            defaults: HashMap::new(),
            cancellation: CancellationToken::new(),
            status: Arc::new(NullStatusSink),
        }
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: RunScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_status(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.status = sink;
        self
    }
}

/// Context handed to an executor for a single node invocation
#[derive(Clone)]
pub struct ExecContext {
    /// Id of the node being executed
    pub node_id: NodeId,

    /// Board and brand identity of the surrounding run
    pub scope: RunScope,

    /// Values gathered from incoming edges, settings standing in for
    /// unconnected ports, and declared defaults
    pub inputs: PortValues,

    /// Node settings merged over the run defaults
    pub settings: HashMap<String, Value>,

    /// Cancellation token shared by the whole run
    pub cancellation: CancellationToken,
}

impl ExecContext {
    pub fn new(node_id: impl Into<NodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            scope: RunScope::default(),
            inputs: PortValues::new(),
            settings: HashMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_input(mut self, port: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(port.into(), value.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_scope(mut self, scope: RunScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn input(&self, port: &str) -> Option<&Value> {
        self.inputs.get(port)
    }

    /// Get a required input or fail with the port's display label
    pub fn require_input(&self, port: &str, label: &str) -> Result<&Value, NodeError> {
        self.inputs
            .get(port)
            .ok_or_else(|| NodeError::MissingInputs(label.to_string()))
    }

    /// Get a required text input, rejecting values of another type
    pub fn require_text(&self, port: &str, label: &str) -> Result<&str, NodeError> {
        let value = self.require_input(port, label)?;
        value.as_str().ok_or_else(|| NodeError::InvalidInputType {
            port: port.to_string(),
            expected: "text".to_string(),
            actual: value.type_name().to_string(),
        })
    }

    pub fn text_input(&self, port: &str) -> Option<&str> {
        self.inputs.get(port).and_then(|v| v.as_str())
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn text_setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}
