use boardcore::{validate_graph, BoardEdge, BoardGraph, BoardNode, Position, SpecTable};
use boardnodes::{catalog, instantiate};
use std::collections::{HashMap, HashSet};

/// Edge list reduced to node types and handles, independent of node ids
fn edge_shapes(
    nodes: &[BoardNode],
    edges: &[BoardEdge],
) -> Vec<(String, Option<String>, String, Option<String>)> {
    let type_of: HashMap<&str, &str> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.node_type.as_str()))
        .collect();
    let mut shapes: Vec<_> = edges
        .iter()
        .map(|e| {
            (
                type_of[e.source.as_str()].to_string(),
                e.source_handle.clone(),
                type_of[e.target.as_str()].to_string(),
                e.target_handle.clone(),
            )
        })
        .collect();
    shapes.sort();
    shapes
}

#[test]
fn catalog_offers_the_stock_templates() {
    let templates = catalog();
    let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["campaign-blast", "brand-refresh", "ad-launch"]);

    for template in &templates {
        assert!(!template.name.is_empty());
        assert!(!template.nodes.is_empty());
    }
}

#[test]
fn instantiation_mints_fresh_ids_and_remaps_edges() {
    let templates = catalog();
    let template = &templates[0];
    let (nodes, edges) = instantiate(template, Position::new(100.0, 40.0));

    assert_eq!(nodes.len(), template.nodes.len());
    assert_eq!(edges.len(), template.edges.len());

    let template_ids: HashSet<&str> = template.nodes.iter().map(|n| n.id.as_str()).collect();
    let fresh_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(fresh_ids.len(), nodes.len(), "placed ids must be unique");
    assert!(fresh_ids.is_disjoint(&template_ids), "placeholder ids must not leak");

    for edge in &edges {
        assert!(fresh_ids.contains(edge.source.as_str()));
        assert!(fresh_ids.contains(edge.target.as_str()));
    }

    // the wiring is the same board, just under new names
    assert_eq!(
        edge_shapes(&template.nodes, &template.edges),
        edge_shapes(&nodes, &edges)
    );
}

#[test]
fn instantiation_translates_positions_and_keeps_settings() {
    let templates = catalog();
    let template = &templates[1];
    let (nodes, _) = instantiate(template, Position::new(-30.0, 250.0));

    for (placed, original) in nodes.iter().zip(&template.nodes) {
        assert_eq!(placed.node_type, original.node_type);
        assert_eq!(placed.settings, original.settings);
        assert_eq!(placed.position.x, original.position.x - 30.0);
        assert_eq!(placed.position.y, original.position.y + 250.0);
    }
}

#[test]
fn repeated_drops_never_collide() {
    let templates = catalog();
    let template = &templates[0];

    let (first, _) = instantiate(template, Position::default());
    let (second, _) = instantiate(template, Position::default());

    let first_ids: HashSet<&str> = first.iter().map(|n| n.id.as_str()).collect();
    let second_ids: HashSet<&str> = second.iter().map(|n| n.id.as_str()).collect();
    assert!(first_ids.is_disjoint(&second_ids));
}

#[test]
fn edges_naming_outside_nodes_are_dropped() {
    let templates = catalog();
    let mut template = templates[0].clone();
    template
        .edges
        .push(BoardEdge::new("ghost", "nowhere", "out", "copy", "context_in"));

    let (_, edges) = instantiate(&template, Position::default());
    assert_eq!(edges.len(), template.edges.len() - 1);
}

#[test]
fn every_template_validates_against_the_stock_catalog() {
    let table = SpecTable::builtin();
    for template in catalog() {
        let (nodes, edges) = instantiate(&template, Position::new(0.0, 0.0));
        let mut board = BoardGraph::new();
        board.nodes = nodes;
        board.edges = edges;

        let issues = validate_graph(&board, &table);
        assert!(
            issues.is_empty(),
            "template '{}' does not validate: {:?}",
            template.id,
            issues
        );
    }
}
