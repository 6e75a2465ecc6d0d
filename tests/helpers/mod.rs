use workflow_canvas::model::*;
use workflow_canvas::store::GraphStore;

// =============================================================================
// Node builders
// =============================================================================

pub fn source(id: &str) -> Node {
    Node::new(id, NodeType::Source, id)
}

pub fn transform(id: &str) -> Node {
    Node::new(id, NodeType::Transform, id)
}

pub fn destination(id: &str) -> Node {
    Node::new(id, NodeType::Destination, id)
}

pub fn edge(from: &str, to: &str) -> Connection {
    Connection::new(from, to)
}

// =============================================================================
// Graph builders
// =============================================================================

/// Store holding `a` (source) → `b` (destination).
pub fn pair_store() -> GraphStore {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.add_node(destination("b"));
    store.add_connection(edge("a", "b"));
    store
}

/// `src` → `map` → `dst`, laid out left to right with configured nodes.
pub fn pipeline_graph() -> GraphSnapshot {
    let mut src = source("src").at(40.0, 120.0);
    src.description = "CRM contacts".into();
    src.config = NodeConfig::Connection(ConnectionConfig::Credentials {
        host: "db.internal".into(),
        port: Some(5432),
        database: "crm".into(),
        username: "etl".into(),
        password: "secret".into(),
    });

    let mut map = transform("map").at(300.0, 120.0);
    map.config = NodeConfig::Transform(TransformConfig {
        logic: "map".into(),
        flags: vec!["trim".into()],
        field_mappings: vec![FieldMapping {
            source_field: "email".into(),
            target_field: "contact_email".into(),
        }],
    });

    let mut dst = destination("dst").at(560.5, 118.25);
    dst.icon = "warehouse".into();
    dst.config = NodeConfig::Connection(ConnectionConfig::Aggregator {
        aggregator_id: "agg-42".into(),
        mini_connector_id: Some("mc-1".into()),
    });

    GraphSnapshot::new(
        vec![src, map, dst],
        vec![edge("src", "map"), edge("map", "dst")],
    )
}

/// Sorted `(from, to)` pairs, for order-insensitive comparison.
pub fn edge_pairs(connections: &[Connection]) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = connections
        .iter()
        .map(|c| (c.from.clone(), c.to.clone()))
        .collect();
    pairs.sort();
    pairs
}
