//! Delivery stubs
//!
//! These executors shape the same receipts their real counterparts would
//! return, without talking to any external service. Actual delivery
//! belongs to the channel workers behind the product API, not the engine.

use async_trait::async_trait;
use boardcore::{ExecContext, NodeError, NodeExecutor, PortValues, Value};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

/// Shapes an email send receipt
pub struct EmailDispatchNode;

#[async_trait]
impl NodeExecutor for EmailDispatchNode {
    fn node_type(&self) -> &str {
        "email-dispatch"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let subject = ctx.require_text("subject_in", "Subject")?;
        let body = ctx.require_text("body_in", "Body")?;
        if subject.trim().is_empty() {
            return Err(NodeError::ExecutionFailed(
                "Subject must not be empty".to_string(),
            ));
        }
        let audience: Vec<String> = ctx
            .input("audience_in")
            .and_then(|v| v.as_str_list())
            .map(|list| list.to_vec())
            .unwrap_or_default();

        tracing::info!(
            "Dispatching email '{}' to {} recipients",
            subject,
            audience.len()
        );

        let receipt = json!({
            "channel": "email",
            "messageId": Uuid::new_v4().to_string(),
            "subject": subject,
            "body": body,
            "recipients": audience.len(),
        });

        let mut outputs = PortValues::new();
        outputs.insert("receipt_out".to_string(), Value::Json(receipt));
        outputs.insert("delivered_out".to_string(), Value::Bool(true));
        Ok(outputs)
    }
}

/// Shapes a Slack message receipt
pub struct SlackPostNode;

#[async_trait]
impl NodeExecutor for SlackPostNode {
    fn node_type(&self) -> &str {
        "slack-post"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let message = ctx.require_text("message_in", "Message")?;
        let channel = ctx.text_input("channel_in").unwrap_or("#marketing");

        tracing::info!("Posting to {}: {}", channel, message);

        let receipt = json!({
            "channel": channel,
            "message": message,
            "ts": Utc::now().timestamp_millis(),
        });

        let mut outputs = PortValues::new();
        outputs.insert("receipt_out".to_string(), Value::Json(receipt));
        Ok(outputs)
    }
}

/// Shapes an ad placement receipt for a generated creative
pub struct AdPublisherNode;

#[async_trait]
impl NodeExecutor for AdPublisherNode {
    fn node_type(&self) -> &str {
        "ad-publisher"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let creative = ctx.require_text("creative_in", "Creative")?;
        let headline = ctx.require_text("headline_in", "Headline")?;
        let window = ctx.text_input("window_in").unwrap_or("immediate");

        if !creative.starts_with("asset://") {
            return Err(NodeError::ExecutionFailed(format!(
                "Creative '{}' is not a generated asset",
                creative
            )));
        }

        let campaign_id = Uuid::new_v4();
        tracing::info!("Publishing ad campaign {} ({})", campaign_id, window);

        let receipt = json!({
            "campaignId": campaign_id.to_string(),
            "creative": creative,
            "headline": headline,
            "window": window,
        });

        let slug = campaign_id.simple().to_string();
        let mut outputs = PortValues::new();
        outputs.insert("receipt_out".to_string(), Value::Json(receipt));
        outputs.insert(
            "placement_out".to_string(),
            Value::Text(format!("feed/{}", &slug[..8])),
        );
        Ok(outputs)
    }
}
