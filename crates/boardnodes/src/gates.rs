use async_trait::async_trait;
use boardcore::{ExecContext, NodeError, NodeExecutor, PortValues, Value};
use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;

/// Routes or duplicates a value downstream
///
/// In broadcast mode the value passes through on `out`, and every edge
/// leaving that port sees the same value. In filter mode the value must
/// match the configured field; rejects land on `dropped_out` instead.
pub struct SwitchNode;

#[async_trait]
impl NodeExecutor for SwitchNode {
    fn node_type(&self) -> &str {
        "switch"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let value = ctx.require_input("value_in", "Value")?.clone();
        let mode = ctx.text_setting("mode").unwrap_or("broadcast");

        let mut outputs = PortValues::new();
        match mode {
            "broadcast" => {
                outputs.insert("out".to_string(), value);
            }
            "filter" => {
                let field = ctx.text_setting("field");
                let expected = ctx.text_setting("equals").unwrap_or_default();
                let actual = match (&value, field) {
                    (Value::Json(json), Some(name)) => match json.get(name) {
                        Some(serde_json::Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => String::new(),
                    },
                    (other, _) => other.as_str().unwrap_or_default().to_string(),
                };
                if actual == expected {
                    outputs.insert("out".to_string(), value);
                } else {
                    tracing::debug!(
                        "Switch {} dropped value: '{}' != '{}'",
                        ctx.node_id,
                        actual,
                        expected
                    );
                    outputs.insert("dropped_out".to_string(), value);
                }
            }
            other => {
                return Err(NodeError::Configuration(format!(
                    "Unknown switch mode: {}",
                    other
                )));
            }
        }
        Ok(outputs)
    }
}

/// Holds a value until its schedule window releases it
pub struct ScheduleGateNode;

#[async_trait]
impl NodeExecutor for ScheduleGateNode {
    fn node_type(&self) -> &str {
        "schedule-gate"
    }

    async fn execute(&self, ctx: ExecContext) -> Result<PortValues, NodeError> {
        let value = ctx.require_input("value_in", "Value")?.clone();
        let window = ctx.text_input("window_in").unwrap_or("immediate");
        let delay = parse_window(window)?;

        if !delay.is_zero() {
            tracing::debug!("Gate {} holding value for {:?}", ctx.node_id, delay);
            tokio::select! {
                _ = sleep(delay) => {}
                _ = ctx.cancellation.cancelled() => return Err(NodeError::Cancelled),
            }
        }

        let mut outputs = PortValues::new();
        outputs.insert("out".to_string(), value);
        outputs.insert(
            "released_at_out".to_string(),
            Value::Text(Utc::now().to_rfc3339()),
        );
        Ok(outputs)
    }
}

/// Parse a schedule window: "immediate" releases at once, "in:<n>ms" and
/// "in:<n>s" hold for the given duration
fn parse_window(window: &str) -> Result<Duration, NodeError> {
    if window.is_empty() || window == "immediate" {
        return Ok(Duration::ZERO);
    }
    let Some(rest) = window.strip_prefix("in:") else {
        return Err(NodeError::Configuration(format!(
            "Unknown schedule window: {}",
            window
        )));
    };
    if let Some(ms) = rest.strip_suffix("ms") {
        let ms: u64 = ms.trim().parse().map_err(|_| {
            NodeError::Configuration(format!("Bad schedule window: {}", window))
        })?;
        return Ok(Duration::from_millis(ms));
    }
    if let Some(secs) = rest.strip_suffix('s') {
        let secs: u64 = secs.trim().parse().map_err(|_| {
            NodeError::Configuration(format!("Bad schedule window: {}", window))
        })?;
        return Ok(Duration::from_secs(secs));
    }
    Err(NodeError::Configuration(format!(
        "Unknown schedule window: {}",
        window
    )))
}
