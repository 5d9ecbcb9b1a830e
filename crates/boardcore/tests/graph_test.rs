use boardcore::{
    validate_graph, BoardEdge, BoardGraph, BoardNode, GraphIssue, NodeTypeSpec, PortSpec,
    PortType, SpecTable, Value,
};

// Relaxed types for structural tests, so validation issues can be
// asserted one at a time.
fn chain_table() -> SpecTable {
    let mut table = SpecTable::new();
    table.insert(
        "producer",
        NodeTypeSpec::executable("Producer")
            .with_output(PortSpec::output("value_out", "Value", PortType::Number)),
    );
    table.insert(
        "consumer",
        NodeTypeSpec::executable("Consumer")
            .with_input(PortSpec::optional("value_in", "Value", PortType::Number))
            .with_output(PortSpec::output("result_out", "Result", PortType::Number)),
    );
    table.insert("sticker", NodeTypeSpec::structural("Sticker"));
    table
}

#[test]
fn node_json_defaults_active_and_renames_type() {
    let payload = r#"{"id":"n1","type":"image-generator","position":{"x":10.0,"y":20.0}}"#;
    let node: BoardNode = serde_json::from_str(payload).expect("node parses");

    assert_eq!(node.id, "n1");
    assert_eq!(node.node_type, "image-generator");
    assert!(node.active, "nodes default to active");
    assert!(node.settings.is_empty());
    assert_eq!(node.position.x, 10.0);
    assert_eq!(node.position.y, 20.0);
}

#[test]
fn edge_json_uses_camel_case_handles() {
    let edge = BoardEdge::new("e1", "a", "image_out", "b", "image_in");
    let json = serde_json::to_value(&edge).expect("edge serializes");

    assert_eq!(json["sourceHandle"], "image_out");
    assert_eq!(json["targetHandle"], "image_in");

    let untyped = BoardEdge::untyped("e2", "a", "b");
    let json = serde_json::to_value(&untyped).expect("edge serializes");
    assert!(json.get("sourceHandle").is_none(), "absent handles are omitted");
    assert!(json.get("targetHandle").is_none());
}

#[test]
fn board_roundtrips_through_json() -> anyhow::Result<()> {
    let board = BoardGraph::new()
        .with_node(
            BoardNode::new("gen", "image-generator")
                .at(40.0, 60.0)
                .with_setting("prompt_in", Value::from("alpine lake at dawn")),
        )
        .with_node(BoardNode::new("palette", "palette-extractor").at(320.0, 60.0))
        .with_edge(BoardEdge::new("e1", "gen", "image_out", "palette", "image_in"));

    let parsed = BoardGraph::from_json(&board.to_json()?)?;

    assert_eq!(parsed.nodes.len(), 2);
    assert_eq!(parsed.edges.len(), 1);
    let gen = parsed.find_node("gen").expect("node survives");
    assert_eq!(
        gen.settings.get("prompt_in"),
        Some(&Value::from("alpine lake at dawn"))
    );
    Ok(())
}

#[test]
fn remove_node_drops_incident_edges() {
    let mut board = BoardGraph::new()
        .with_node(BoardNode::new("a", "producer"))
        .with_node(BoardNode::new("b", "consumer"))
        .with_node(BoardNode::new("c", "consumer"))
        .with_edge(BoardEdge::new("e1", "a", "value_out", "b", "value_in"))
        .with_edge(BoardEdge::new("e2", "b", "result_out", "c", "value_in"));

    let removed = board.remove_node("b");

    assert!(removed.is_some());
    assert!(board.find_node("b").is_none());
    assert!(board.edges.is_empty(), "both edges touched the removed node");
    assert_eq!(board.nodes.len(), 2);
}

#[test]
fn incoming_and_outgoing_edges_filter_by_endpoint() {
    let board = BoardGraph::new()
        .with_node(BoardNode::new("a", "producer"))
        .with_node(BoardNode::new("b", "consumer"))
        .with_node(BoardNode::new("c", "consumer"))
        .with_edge(BoardEdge::new("e1", "a", "value_out", "b", "value_in"))
        .with_edge(BoardEdge::new("e2", "a", "value_out", "c", "value_in"));

    assert_eq!(board.outgoing_edges("a").len(), 2);
    assert!(board.incoming_edges("a").is_empty());
    assert_eq!(board.incoming_edges("b").len(), 1);
    assert_eq!(board.incoming_edges("c").len(), 1);
}

#[test]
fn validate_flags_unknown_node_types() {
    let table = chain_table();
    let board = BoardGraph::new().with_node(BoardNode::new("x", "hologram"));

    let issues = validate_graph(&board, &table);

    assert_eq!(
        issues,
        vec![GraphIssue::UnknownNodeType {
            node_id: "x".to_string(),
            node_type: "hologram".to_string(),
        }]
    );
}

#[test]
fn validate_flags_edges_with_missing_endpoints_and_self_loops() {
    let table = chain_table();
    let board = BoardGraph::new()
        .with_node(BoardNode::new("a", "producer"))
        .with_edge(BoardEdge::new("ghost", "a", "value_out", "missing", "value_in"))
        .with_edge(BoardEdge::new("loop", "a", "value_out", "a", "value_in"));

    let issues = validate_graph(&board, &table);

    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| matches!(
        i,
        GraphIssue::InvalidEdge { edge_id, .. } if edge_id == "ghost"
    )));
    assert!(issues.iter().any(|i| matches!(
        i,
        GraphIssue::InvalidEdge { edge_id, .. } if edge_id == "loop"
    )));
}

#[test]
fn validate_flags_incompatible_ports() {
    let table = SpecTable::builtin();
    let board = BoardGraph::new()
        .with_node(BoardNode::new("gen", "image-generator").with_setting("prompt_in", "x"))
        .with_node(
            BoardNode::new("mail", "email-dispatch")
                .with_setting("subject_in", "s")
                .with_setting("body_in", "b"),
        )
        // a number cannot feed a text list
        .with_edge(BoardEdge::new("bad", "gen", "seed_out", "mail", "audience_in"));

    let issues = validate_graph(&board, &table);

    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0],
        GraphIssue::InvalidEdge { edge_id, .. } if edge_id == "bad"
    ));
}

#[test]
fn validate_detects_cycles_between_executable_nodes() {
    let table = chain_table();
    let board = BoardGraph::new()
        .with_node(BoardNode::new("a", "consumer"))
        .with_node(BoardNode::new("b", "consumer"))
        .with_edge(BoardEdge::new("e1", "a", "result_out", "b", "value_in"))
        .with_edge(BoardEdge::new("e2", "b", "result_out", "a", "value_in"));

    let issues = validate_graph(&board, &table);

    assert_eq!(
        issues,
        vec![GraphIssue::CycleDetected {
            node_ids: vec!["a".to_string(), "b".to_string()],
        }]
    );
}

#[test]
fn validate_reports_unsatisfied_required_inputs_by_label() {
    let table = SpecTable::builtin();

    let bare = BoardGraph::new().with_node(BoardNode::new("gen", "image-generator"));
    let issues = validate_graph(&bare, &table);
    assert_eq!(
        issues,
        vec![GraphIssue::MissingRequiredInput {
            node_id: "gen".to_string(),
            port_label: "Prompt".to_string(),
        }]
    );

    // a widget value satisfies the port without an edge
    let with_setting = BoardGraph::new()
        .with_node(BoardNode::new("gen", "image-generator").with_setting("prompt_in", "sunset"));
    assert!(validate_graph(&with_setting, &table).is_empty());

    // a switched-off node is not scheduled, so nothing is missing
    let inactive = BoardGraph::new()
        .with_node(BoardNode::new("gen", "image-generator").inactive());
    assert!(validate_graph(&inactive, &table).is_empty());
}

#[test]
fn clean_board_validates_empty() {
    let table = SpecTable::builtin();
    let board = BoardGraph::new()
        .with_node(BoardNode::new("gen", "image-generator").with_setting("prompt_in", "dunes"))
        .with_node(BoardNode::new("palette", "palette-extractor"))
        .with_node(BoardNode::new("memo", "note"))
        .with_edge(BoardEdge::new("e1", "gen", "image_out", "palette", "image_in"));

    assert!(validate_graph(&board, &table).is_empty());
}
