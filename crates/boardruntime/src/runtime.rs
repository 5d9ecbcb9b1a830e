use crate::{ExecutorRegistry, GraphRunner, RunResult};
use boardcore::{BoardGraph, EventBus, FlowError, RunContext, RunEvent, SpecTable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Entry point owning the spec table, executor registry and event bus
pub struct BoardRuntime {
    table: Arc<SpecTable>,
    registry: Arc<ExecutorRegistry>,
    event_bus: Arc<EventBus>,
    running: AtomicBool,
}

impl BoardRuntime {
    /// Runtime with the builtin catalog and an empty registry
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self::with_registry(
            Arc::new(SpecTable::builtin()),
            Arc::new(ExecutorRegistry::new()),
            config,
        )
    }

    /// Runtime over a pre-built table and registry
    pub fn with_registry(
        table: Arc<SpecTable>,
        registry: Arc<ExecutorRegistry>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            table,
            registry,
            event_bus: Arc::new(EventBus::new(config.event_buffer_size)),
            running: AtomicBool::new(false),
        }
    }

    pub fn spec_table(&self) -> &Arc<SpecTable> {
        &self.table
    }

    pub fn registry(&self) -> &Arc<ExecutorRegistry> {
        &self.registry
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Subscribe to run events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<RunEvent> {
        self.event_bus.subscribe()
    }

    /// Run a board; a runtime drives at most one run at a time
    ///
    /// A second call while a run is active fails fast with
    /// [`FlowError::Busy`] rather than queueing.
    pub async fn execute(&self, graph: &BoardGraph, ctx: RunContext) -> boardcore::Result<RunResult> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FlowError::Busy);
        }
        let _guard = RunGuard {
            flag: &self.running,
        };

        let runner = GraphRunner::new(
            Arc::clone(&self.table),
            Arc::clone(&self.registry),
            Arc::clone(&self.event_bus),
        );
        Ok(runner.run(graph, ctx).await)
    }
}

impl Default for BoardRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the running flag when dropped, so the slot frees up even if the
/// run future is dropped mid-flight
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
        }
    }
}
