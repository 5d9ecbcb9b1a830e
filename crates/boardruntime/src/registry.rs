use async_trait::async_trait;
use boardcore::{ExecContext, NodeError, NodeExecutor, PortValues};
use std::collections::HashMap;
use std::sync::Arc;

/// Executor that returns its inputs unchanged
///
/// Stands in for every node type without a registered executor, so a board
/// still runs end to end while parts of it are unimplemented.
pub struct Passthrough;

#[async_trait]
impl NodeExecutor for Passthrough {
    fn node_type(&self) -> &str {
        "passthrough"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        Ok(ctx.inputs)
    }
}

/// Registry of executors keyed by node type
pub struct ExecutorRegistry {
    executors: HashMap<String, Arc<dyn NodeExecutor>>,
    passthrough: Arc<dyn NodeExecutor>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
            passthrough: Arc::new(Passthrough),
        }
    }

    /// Register an executor under its node type
    pub fn register(&mut self, executor: Arc<dyn NodeExecutor>) {
        let node_type = executor.node_type().to_string();
        tracing::info!("Registering executor: {}", node_type);
        self.executors.insert(node_type, executor);
    }

    /// Executor for a node type, falling back to the passthrough stub
    pub fn get(&self, node_type: &str) -> Arc<dyn NodeExecutor> {
        match self.executors.get(node_type) {
            Some(executor) => Arc::clone(executor),
            None => {
                tracing::debug!("No executor for '{}', using passthrough", node_type);
                Arc::clone(&self.passthrough)
            }
        }
    }

    /// Whether a real executor is registered for this node type
    pub fn has(&self, node_type: &str) -> bool {
        self.executors.contains_key(node_type)
    }

    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.executors.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
