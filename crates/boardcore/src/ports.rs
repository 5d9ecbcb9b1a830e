use serde::{Deserialize, Serialize};
use std::fmt;

/// Data types a port can carry
///
/// The wire names match what the canvas stores on port definitions, so
/// boards serialized by the frontend deserialize directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortType {
    #[serde(rename = "string")]
    Text,
    Number,
    Boolean,
    Image,
    Json,
    BrandContext,
    #[serde(rename = "text-array")]
    TextList,
    Color,
    #[serde(rename = "color-array")]
    ColorList,
    Model,
    Latent,
    Clip,
    VaeModel,
    Schedule,
    Any,
}

impl PortType {
    pub const ALL: [PortType; 15] = [
        PortType::Text,
        PortType::Number,
        PortType::Boolean,
        PortType::Image,
        PortType::Json,
        PortType::BrandContext,
        PortType::TextList,
        PortType::Color,
        PortType::ColorList,
        PortType::Model,
        PortType::Latent,
        PortType::Clip,
        PortType::VaeModel,
        PortType::Schedule,
        PortType::Any,
    ];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            PortType::Text => "string",
            PortType::Number => "number",
            PortType::Boolean => "boolean",
            PortType::Image => "image",
            PortType::Json => "json",
            PortType::BrandContext => "brand-context",
            PortType::TextList => "text-array",
            PortType::Color => "color",
            PortType::ColorList => "color-array",
            PortType::Model => "model",
            PortType::Latent => "latent",
            PortType::Clip => "clip",
            PortType::VaeModel => "vae-model",
            PortType::Schedule => "schedule",
            PortType::Any => "any",
        }
    }

    /// Whether a value produced on a port of this type may feed a `target` port
    ///
    /// Exact matches and `Any` on either end always connect. Everything else
    /// goes through the one-way coercion table: a color array can feed a
    /// text array, never the reverse.
    pub fn is_compatible_with(self, target: PortType) -> bool {
        if self == target {
            return true;
        }
        if self == PortType::Any || target == PortType::Any {
            return true;
        }
        self.widens_to().contains(&target)
    }

    /// Coercion targets beyond an exact match
    ///
    /// Json accepts nearly everything and coerces to nothing. Model, latent,
    /// clip and VAE handles are opaque and only connect to their own type.
    fn widens_to(self) -> &'static [PortType] {
        match self {
            PortType::Text => &[PortType::Json],
            PortType::Number => &[PortType::Text, PortType::Json],
            PortType::Boolean => &[PortType::Text, PortType::Json],
            PortType::Image => &[PortType::Text, PortType::Json],
            PortType::Color => &[PortType::Text, PortType::Json],
            PortType::ColorList => &[PortType::TextList, PortType::Json],
            PortType::TextList => &[PortType::Json],
            PortType::BrandContext => &[PortType::Json],
            PortType::Schedule => &[PortType::Text, PortType::Json],
            PortType::Json
            | PortType::Model
            | PortType::Latent
            | PortType::Clip
            | PortType::VaeModel
            | PortType::Any => &[],
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
