use boardcore::{BoardEdge, BoardNode, Position, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Prebuilt board shipped with the engine
///
/// Template nodes carry placeholder ids; [`instantiate`] replaces them
/// before anything lands on a real board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub nodes: Vec<BoardNode>,
    pub edges: Vec<BoardEdge>,
}

/// Clone a template onto a board
///
/// Every node gets a fresh uuid, edges are remapped through the
/// substitution, and positions shift by `offset` so repeated drops of the
/// same template do not stack. Template edges naming nodes outside the
/// template are dropped rather than carried dangling.
pub fn instantiate(template: &BoardTemplate, offset: Position) -> (Vec<BoardNode>, Vec<BoardEdge>) {
    let mut id_map: HashMap<String, String> = HashMap::new();
    let mut nodes = Vec::with_capacity(template.nodes.len());

    for node in &template.nodes {
        let fresh = Uuid::new_v4().to_string();
        id_map.insert(node.id.clone(), fresh.clone());
        let mut placed = node.clone();
        placed.id = fresh;
        placed.position = Position::new(node.position.x + offset.x, node.position.y + offset.y);
        nodes.push(placed);
    }

    let mut edges = Vec::with_capacity(template.edges.len());
    for edge in &template.edges {
        let (Some(source), Some(target)) = (id_map.get(&edge.source), id_map.get(&edge.target))
        else {
            continue;
        };
        let mut placed = edge.clone();
        placed.id = format!("edge-{}", Uuid::new_v4());
        placed.source = source.clone();
        placed.target = target.clone();
        edges.push(placed);
    }

    (nodes, edges)
}

/// Stock templates offered from the canvas template picker
pub fn catalog() -> Vec<BoardTemplate> {
    vec![campaign_blast(), brand_refresh(), ad_launch()]
}

fn campaign_blast() -> BoardTemplate {
    BoardTemplate {
        id: "campaign-blast".to_string(),
        name: "Campaign blast".to_string(),
        description: "Draft campaign copy once and fan it out to email and Slack".to_string(),
        nodes: vec![
            BoardNode::new("trigger", "trigger").at(0.0, 120.0),
            BoardNode::new("copy", "copy-generator")
                .at(260.0, 120.0)
                .with_setting("brief_in", Value::from("Announce the spring moodboard drop")),
            BoardNode::new("fanout", "switch").at(520.0, 120.0),
            BoardNode::new("email", "email-dispatch")
                .at(780.0, 40.0)
                .with_setting("subject_in", Value::from("Spring drop")),
            BoardNode::new("slack", "slack-post").at(780.0, 200.0),
        ],
        edges: vec![
            BoardEdge::new("e1", "trigger", "payload_out", "copy", "context_in"),
            BoardEdge::new("e2", "copy", "copy_out", "fanout", "value_in"),
            BoardEdge::new("e3", "fanout", "out", "email", "body_in"),
            BoardEdge::new("e4", "fanout", "out", "slack", "message_in"),
        ],
    }
}

fn brand_refresh() -> BoardTemplate {
    BoardTemplate {
        id: "brand-refresh".to_string(),
        name: "Brand refresh".to_string(),
        description: "Regenerate the hero image and pull a fresh palette from it".to_string(),
        nodes: vec![
            BoardNode::new("brand", "brand-kit").at(0.0, 80.0),
            BoardNode::new("hero", "image-generator")
                .at(260.0, 80.0)
                .with_setting("prompt_in", Value::from("Hero shot on a seasonal backdrop")),
            BoardNode::new("palette", "palette-extractor").at(520.0, 80.0),
        ],
        edges: vec![
            BoardEdge::new("e1", "brand", "brand_out", "hero", "brand_in"),
            BoardEdge::new("e2", "hero", "image_out", "palette", "image_in"),
        ],
    }
}

fn ad_launch() -> BoardTemplate {
    BoardTemplate {
        id: "ad-launch".to_string(),
        name: "Ad launch".to_string(),
        description: "Generate a creative and publish it through a schedule gate".to_string(),
        nodes: vec![
            BoardNode::new("brand", "brand-kit").at(0.0, 80.0),
            BoardNode::new("creative", "image-generator")
                .at(260.0, 80.0)
                .with_setting("prompt_in", Value::from("Product creative for the launch")),
            BoardNode::new("gate", "schedule-gate").at(520.0, 80.0),
            BoardNode::new("publish", "ad-publisher")
                .at(780.0, 80.0)
                .with_setting("headline_in", Value::from("Now live")),
        ],
        edges: vec![
            BoardEdge::new("e1", "brand", "brand_out", "creative", "brand_in"),
            BoardEdge::new("e2", "creative", "image_out", "gate", "value_in"),
            BoardEdge::new("e3", "gate", "out", "publish", "creative_in"),
        ],
    }
}
