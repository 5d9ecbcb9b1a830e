use boardcore::{BoardGraph, Position, RunContext, RunScope, SpecTable};
use boardnodes::{catalog, instantiate, register_all};
use boardruntime::{BoardRuntime, ExecutorRegistry, RuntimeConfig};
use std::sync::Arc;

fn stock_runtime() -> BoardRuntime {
    let mut registry = ExecutorRegistry::new();
    register_all(&mut registry);
    BoardRuntime::with_registry(
        Arc::new(SpecTable::builtin()),
        Arc::new(registry),
        RuntimeConfig::default(),
    )
}

fn place(template_id: &str) -> BoardGraph {
    let template = catalog()
        .into_iter()
        .find(|t| t.id == template_id)
        .expect("stock template present");
    let (nodes, edges) = instantiate(&template, Position::new(0.0, 0.0));
    let mut board = BoardGraph::new();
    board.nodes = nodes;
    board.edges = edges;
    board
}

fn node_id(board: &BoardGraph, node_type: &str) -> String {
    board
        .nodes
        .iter()
        .find(|n| n.node_type == node_type)
        .map(|n| n.id.clone())
        .expect("node of that type on the board")
}

#[tokio::test]
async fn campaign_blast_fans_the_same_copy_out_to_both_channels() {
    let runtime = stock_runtime();
    let board = place("campaign-blast");
    let copy_id = node_id(&board, "copy-generator");
    let email_id = node_id(&board, "email-dispatch");
    let slack_id = node_id(&board, "slack-post");

    let ctx = RunContext::default().with_scope(RunScope::new("board-1", "acme"));
    let result = runtime.execute(&board, ctx).await.expect("run returns");
    assert!(result.success, "errors: {:?}", result.errors);

    let copy = result.node_outputs[&copy_id]
        .get("copy_out")
        .and_then(|v| v.as_str())
        .expect("copy present")
        .to_string();
    assert_eq!(copy, "Announce the spring moodboard drop (friendly tone)");

    let email_receipt = result.node_outputs[&email_id]
        .get("receipt_out")
        .and_then(|v| v.as_json())
        .expect("email receipt present");
    assert_eq!(email_receipt["subject"], "Spring drop");
    assert_eq!(email_receipt["body"], copy.as_str());

    let slack_receipt = result.node_outputs[&slack_id]
        .get("receipt_out")
        .and_then(|v| v.as_json())
        .expect("slack receipt present");
    assert_eq!(
        slack_receipt["message"],
        copy.as_str(),
        "both channels must see the same broadcast value"
    );
}

#[tokio::test]
async fn brand_refresh_extracts_a_palette_from_the_generated_hero() {
    let runtime = stock_runtime();
    let board = place("brand-refresh");
    let hero_id = node_id(&board, "image-generator");
    let palette_id = node_id(&board, "palette-extractor");

    let result = runtime
        .execute(&board, RunContext::default())
        .await
        .expect("run returns");
    assert!(result.success, "errors: {:?}", result.errors);

    let image = result.node_outputs[&hero_id]
        .get("image_out")
        .and_then(|v| v.as_str())
        .expect("hero image present");
    assert!(image.starts_with("asset://generated/"));

    let colors = result.node_outputs[&palette_id]
        .get("colors_out")
        .and_then(|v| v.as_str_list())
        .expect("palette present");
    assert_eq!(colors.len(), 4);
}

#[tokio::test]
async fn brand_refresh_runs_are_reproducible() {
    let runtime = stock_runtime();
    let board = place("brand-refresh");
    let hero_id = node_id(&board, "image-generator");

    let first = runtime
        .execute(&board, RunContext::default())
        .await
        .expect("run returns");
    let second = runtime
        .execute(&board, RunContext::default())
        .await
        .expect("run returns");

    assert_eq!(
        first.node_outputs[&hero_id].get("image_out"),
        second.node_outputs[&hero_id].get("image_out"),
        "an unchanged board must generate the same assets"
    );
}

#[tokio::test]
async fn ad_launch_publishes_the_generated_creative() {
    let runtime = stock_runtime();
    let board = place("ad-launch");
    let creative_id = node_id(&board, "image-generator");
    let publish_id = node_id(&board, "ad-publisher");

    let result = runtime
        .execute(&board, RunContext::default())
        .await
        .expect("run returns");
    assert!(result.success, "errors: {:?}", result.errors);

    let image = result.node_outputs[&creative_id]
        .get("image_out")
        .and_then(|v| v.as_str())
        .expect("creative present");

    let receipt = result.node_outputs[&publish_id]
        .get("receipt_out")
        .and_then(|v| v.as_json())
        .expect("placement receipt present");
    assert_eq!(receipt["creative"], image);
    assert_eq!(receipt["headline"], "Now live");
    assert_eq!(receipt["window"], "immediate");
}
