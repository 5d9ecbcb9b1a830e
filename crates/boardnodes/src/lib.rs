//! Built-in node executors for moodboard automation
//!
//! Content generators, logic gates and delivery stubs covering the stock
//! node catalog, plus ready-made board templates.

mod content;
mod gates;
mod integrations;
mod templates;

pub use content::{
    BrandKitNode, CopyGeneratorNode, ImageGeneratorNode, PaletteExtractorNode, TriggerNode,
};
pub use gates::{ScheduleGateNode, SwitchNode};
pub use integrations::{AdPublisherNode, EmailDispatchNode, SlackPostNode};
pub use templates::{catalog, instantiate, BoardTemplate};

use boardruntime::ExecutorRegistry;
use std::sync::Arc;

/// Register every built-in executor with a registry
pub fn register_all(registry: &mut ExecutorRegistry) {
    registry.register(Arc::new(content::TriggerNode));
    registry.register(Arc::new(content::BrandKitNode));
    registry.register(Arc::new(content::ImageGeneratorNode));
    registry.register(Arc::new(content::CopyGeneratorNode));
    registry.register(Arc::new(content::PaletteExtractorNode));
    registry.register(Arc::new(gates::SwitchNode));
    registry.register(Arc::new(gates::ScheduleGateNode));
    registry.register(Arc::new(integrations::EmailDispatchNode));
    registry.register(Arc::new(integrations::SlackPostNode));
    registry.register(Arc::new(integrations::AdPublisherNode));
}
