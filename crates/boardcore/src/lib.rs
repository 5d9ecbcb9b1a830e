//! Core abstractions for the board engine
//!
//! This crate provides the fundamental types every other component depends
//! on: dynamic port values, the port type system and its coercion rules,
//! the node type catalog, board graph structures, connection validation,
//! and the run event model.

mod catalog;
mod error;
mod events;
mod graph;
mod node;
mod ports;
mod validate;
mod value;

pub use catalog::{NodeTypeSpec, PortSpec, SpecTable};
pub use error::{FlowError, NodeError};
pub use events::{
    EventBus, NodeStatus, NullStatusSink, RunEvent, RunId, StatusSink, VecStatusSink,
};
pub use graph::{BoardEdge, BoardGraph, BoardNode, NodeId, PortId, Position};
pub use node::{ExecContext, NodeExecutor, PortValues, RunContext, RunScope};
pub use ports::PortType;
pub use validate::{is_valid_connection, validate_graph, GraphIssue, LEGACY_ANCHORS};
pub use value::Value;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, FlowError>;
