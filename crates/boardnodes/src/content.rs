use async_trait::async_trait;
use boardcore::{ExecContext, NodeError, NodeExecutor, PortValues, Value};
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Stable hash over the inputs that shape a generated asset, so repeated
/// runs of an unchanged board produce the same placeholders
fn stable_seed(parts: &[&str]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.hash(&mut hasher);
    }
    hasher.finish()
}

fn brand_voice(ctx: &ExecContext) -> Option<String> {
    ctx.input("brand_in")
        .and_then(|v| v.as_object())
        .and_then(|o| o.get("voice"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Entry point of a board, emits the trigger payload
pub struct TriggerNode;

#[async_trait]
impl NodeExecutor for TriggerNode {
    fn node_type(&self) -> &str {
        "trigger"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let payload = ctx
            .setting("payload")
            .and_then(|v| v.as_json())
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let mut outputs = PortValues::new();
        outputs.insert("payload_out".to_string(), Value::Json(payload));
        outputs.insert(
            "fired_at_out".to_string(),
            Value::Text(Utc::now().to_rfc3339()),
        );
        Ok(outputs)
    }
}

/// Resolves the brand identity for the run scope
pub struct BrandKitNode;

const DEFAULT_PALETTE: [&str; 4] = ["#1A1A2E", "#16213E", "#0F3460", "#E94560"];

#[async_trait]
impl NodeExecutor for BrandKitNode {
    fn node_type(&self) -> &str {
        "brand-kit"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let brand_id = if ctx.scope.brand_id.is_empty() {
            "default".to_string()
        } else {
            ctx.scope.brand_id.clone()
        };

        let palette: Vec<String> = ctx
            .setting("palette")
            .and_then(|v| v.as_str_list())
            .map(|colors| colors.to_vec())
            .unwrap_or_else(|| DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect());

        let voice = ctx
            .text_setting("voice")
            .unwrap_or("confident and playful")
            .to_string();

        tracing::debug!("Resolved brand kit '{}'", brand_id);

        let brand = HashMap::from([
            ("brandId".to_string(), Value::Text(brand_id)),
            ("palette".to_string(), Value::ColorList(palette.clone())),
            ("voice".to_string(), Value::Text(voice.clone())),
        ]);

        let mut outputs = PortValues::new();
        outputs.insert("brand_out".to_string(), Value::Object(brand));
        outputs.insert("palette_out".to_string(), Value::ColorList(palette));
        outputs.insert("voice_out".to_string(), Value::Text(voice));
        Ok(outputs)
    }
}

/// Produces a placeholder image handle from a prompt
pub struct ImageGeneratorNode;

#[async_trait]
impl NodeExecutor for ImageGeneratorNode {
    fn node_type(&self) -> &str {
        "image-generator"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let prompt = ctx.require_text("prompt_in", "Prompt")?;
        let style = ctx.text_input("style_in").unwrap_or("photorealistic");
        let voice = brand_voice(&ctx).unwrap_or_default();

        let seed = stable_seed(&[prompt, style, &voice]);
        tracing::debug!("Generating image for '{}' with seed {}", prompt, seed);

        let mut outputs = PortValues::new();
        outputs.insert(
            "image_out".to_string(),
            Value::Text(format!("asset://generated/{:016x}.png", seed)),
        );
        outputs.insert(
            "seed_out".to_string(),
            Value::Number((seed % 1_000_000) as f64),
        );
        Ok(outputs)
    }
}

/// Drafts campaign copy from a brief
pub struct CopyGeneratorNode;

#[async_trait]
impl NodeExecutor for CopyGeneratorNode {
    fn node_type(&self) -> &str {
        "copy-generator"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let brief = ctx.require_text("brief_in", "Brief")?;
        let tone = ctx.text_input("tone_in").unwrap_or("friendly");

        let mut copy = match brand_voice(&ctx) {
            Some(voice) => format!("{} ({} tone, {} voice)", brief.trim(), tone, voice),
            None => format!("{} ({} tone)", brief.trim(), tone),
        };
        let cta = ctx
            .input("context_in")
            .and_then(|v| v.as_json())
            .and_then(|j| j.get("cta"))
            .and_then(|c| c.as_str());
        if let Some(cta) = cta {
            copy = format!("{} {}", copy, cta);
        }

        let variants = vec![
            copy.clone(),
            format!("{} Act now.", copy),
            format!("{} Learn more.", copy),
        ];

        let mut outputs = PortValues::new();
        outputs.insert("copy_out".to_string(), Value::Text(copy));
        outputs.insert("variants_out".to_string(), Value::TextList(variants));
        Ok(outputs)
    }
}

/// Derives a color palette from a generated image handle
pub struct PaletteExtractorNode;

#[async_trait]
impl NodeExecutor for PaletteExtractorNode {
    fn node_type(&self) -> &str {
        "palette-extractor"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let image = ctx.require_text("image_in", "Image")?;

        let seed = stable_seed(&[image]);
        let colors: Vec<String> = (0..4u32)
            .map(|i| format!("#{:06X}", (seed.rotate_left(i * 13) & 0xFF_FFFF) as u32))
            .collect();
        let dominant = colors
            .first()
            .cloned()
            .unwrap_or_else(|| "#000000".to_string());

        let mut outputs = PortValues::new();
        outputs.insert("colors_out".to_string(), Value::ColorList(colors));
        outputs.insert("dominant_out".to_string(), Value::Color(dominant));
        Ok(outputs)
    }
}
