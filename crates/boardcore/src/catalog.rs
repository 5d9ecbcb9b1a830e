use crate::{PortType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared port on a node type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    pub id: String,
    pub label: String,
    pub data_type: PortType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PortSpec {
    pub fn required(id: &str, label: &str, data_type: PortType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            data_type,
            required: true,
            default: None,
        }
    }

    pub fn optional(id: &str, label: &str, data_type: PortType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            data_type,
            required: false,
            default: None,
        }
    }

    /// Output ports carry no required flag semantics
    pub fn output(id: &str, label: &str, data_type: PortType) -> Self {
        Self::optional(id, label, data_type)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Port interface and scheduling class of one node type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTypeSpec {
    pub label: String,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    pub executable: bool,
}

impl NodeTypeSpec {
    /// A node type the runner schedules
    pub fn executable(label: &str) -> Self {
        Self {
            label: label.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            executable: true,
        }
    }

    /// A canvas-only node type with no dataflow role
    pub fn structural(label: &str) -> Self {
        Self {
            label: label.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            executable: false,
        }
    }

    pub fn with_input(mut self, port: PortSpec) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: PortSpec) -> Self {
        self.outputs.push(port);
        self
    }
}

/// Table of node type specs
///
/// Owned by the runtime and passed by reference wherever port information
/// is needed. Port ids are indexed globally across node types so the
/// connection validator can resolve a handle without knowing which node
/// it belongs to; the builtin catalog keeps every port id mapped to a
/// single data type.
#[derive(Debug, Clone, Default)]
pub struct SpecTable {
    specs: HashMap<String, NodeTypeSpec>,
    input_types: HashMap<String, PortType>,
    output_types: HashMap<String, PortType>,
}

impl SpecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the spec for a node type
    pub fn insert(&mut self, node_type: impl Into<String>, spec: NodeTypeSpec) {
        for port in &spec.inputs {
            self.input_types.entry(port.id.clone()).or_insert(port.data_type);
        }
        for port in &spec.outputs {
            self.output_types.entry(port.id.clone()).or_insert(port.data_type);
        }
        self.specs.insert(node_type.into(), spec);
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeTypeSpec> {
        self.specs.get(node_type)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.specs.contains_key(node_type)
    }

    /// Whether nodes of this type take part in execution
    pub fn is_executable(&self, node_type: &str) -> bool {
        self.specs.get(node_type).map(|s| s.executable).unwrap_or(false)
    }

    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.specs.keys().cloned().collect();
        types.sort();
        types
    }

    /// Data type of a named input port, searched across every node type
    pub fn input_port_type(&self, port_id: &str) -> Option<PortType> {
        self.input_types.get(port_id).copied()
    }

    /// Data type of a named output port, searched across every node type
    pub fn output_port_type(&self, port_id: &str) -> Option<PortType> {
        self.output_types.get(port_id).copied()
    }

    /// The stock moodboard catalog
    pub fn builtin() -> Self {
        let mut table = Self::new();

        table.insert(
            "trigger",
            NodeTypeSpec::executable("Trigger")
                .with_output(PortSpec::output("payload_out", "Payload", PortType::Json))
                .with_output(PortSpec::output("fired_at_out", "Fired at", PortType::Text)),
        );

        table.insert(
            "brand-kit",
            NodeTypeSpec::executable("Brand kit")
                .with_output(PortSpec::output("brand_out", "Brand", PortType::BrandContext))
                .with_output(PortSpec::output("palette_out", "Palette", PortType::ColorList))
                .with_output(PortSpec::output("voice_out", "Voice", PortType::Text)),
        );

        table.insert(
            "image-generator",
            NodeTypeSpec::executable("Image generator")
                .with_input(PortSpec::required("prompt_in", "Prompt", PortType::Text))
                .with_input(
                    PortSpec::optional("style_in", "Style", PortType::Text)
                        .with_default("photorealistic"),
                )
                .with_input(PortSpec::optional("brand_in", "Brand", PortType::BrandContext))
                .with_output(PortSpec::output("image_out", "Image", PortType::Image))
                .with_output(PortSpec::output("seed_out", "Seed", PortType::Number)),
        );

        table.insert(
            "copy-generator",
            NodeTypeSpec::executable("Copy generator")
                .with_input(PortSpec::required("brief_in", "Brief", PortType::Text))
                .with_input(
                    PortSpec::optional("tone_in", "Tone", PortType::Text).with_default("friendly"),
                )
                .with_input(PortSpec::optional("brand_in", "Brand", PortType::BrandContext))
                .with_input(PortSpec::optional("context_in", "Context", PortType::Json))
                .with_output(PortSpec::output("copy_out", "Copy", PortType::Text))
                .with_output(PortSpec::output("variants_out", "Variants", PortType::TextList)),
        );

        table.insert(
            "palette-extractor",
            NodeTypeSpec::executable("Palette extractor")
                .with_input(PortSpec::required("image_in", "Image", PortType::Image))
                .with_output(PortSpec::output("colors_out", "Colors", PortType::ColorList))
                .with_output(PortSpec::output("dominant_out", "Dominant", PortType::Color)),
        );

        table.insert(
            "switch",
            NodeTypeSpec::executable("Switch")
                .with_input(PortSpec::required("value_in", "Value", PortType::Any))
                .with_output(PortSpec::output("out", "Out", PortType::Any))
                .with_output(PortSpec::output("dropped_out", "Dropped", PortType::Any)),
        );

        table.insert(
            "schedule-gate",
            NodeTypeSpec::executable("Schedule gate")
                .with_input(PortSpec::required("value_in", "Value", PortType::Any))
                .with_input(
                    PortSpec::optional("window_in", "Window", PortType::Schedule)
                        .with_default("immediate"),
                )
                .with_output(PortSpec::output("out", "Out", PortType::Any))
                .with_output(PortSpec::output("released_at_out", "Released at", PortType::Text)),
        );

        table.insert(
            "email-dispatch",
            NodeTypeSpec::executable("Email dispatch")
                .with_input(PortSpec::required("subject_in", "Subject", PortType::Text))
                .with_input(PortSpec::required("body_in", "Body", PortType::Text))
                .with_input(
                    PortSpec::optional("audience_in", "Audience", PortType::TextList)
                        .with_default(Vec::<String>::new()),
                )
                .with_output(PortSpec::output("receipt_out", "Receipt", PortType::Json))
                .with_output(PortSpec::output("delivered_out", "Delivered", PortType::Boolean)),
        );

        table.insert(
            "slack-post",
            NodeTypeSpec::executable("Slack post")
                .with_input(PortSpec::required("message_in", "Message", PortType::Text))
                .with_input(
                    PortSpec::optional("channel_in", "Channel", PortType::Text)
                        .with_default("#marketing"),
                )
                .with_output(PortSpec::output("receipt_out", "Receipt", PortType::Json)),
        );

        table.insert(
            "ad-publisher",
            NodeTypeSpec::executable("Ad publisher")
                .with_input(PortSpec::required("creative_in", "Creative", PortType::Image))
                .with_input(PortSpec::required("headline_in", "Headline", PortType::Text))
                .with_input(
                    PortSpec::optional("window_in", "Window", PortType::Schedule)
                        .with_default("immediate"),
                )
                .with_output(PortSpec::output("receipt_out", "Receipt", PortType::Json))
                .with_output(PortSpec::output("placement_out", "Placement", PortType::Text)),
        );

        table.insert("note", NodeTypeSpec::structural("Note"));
        table.insert("frame", NodeTypeSpec::structural("Frame"));

        table
    }
}
