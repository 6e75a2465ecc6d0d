#[allow(dead_code)]
mod helpers;

use helpers::*;
use workflow_canvas::config::EditorConfig;
use workflow_canvas::dto::{self, ActivityType, UI_METADATA_KEY};
use workflow_canvas::model::*;

fn pair_graph() -> GraphSnapshot {
    let mut a = source("a").at(40.5, 120.5);
    a.label = "Orders".into();
    a.config = NodeConfig::Connection(ConnectionConfig::ConnectionString {
        connection_string: "postgres://crm".into(),
    });
    let mut b = destination("b").at(300.5, 120.5);
    b.label = "Warehouse".into();
    b.config = NodeConfig::Connection(ConnectionConfig::ConnectionString {
        connection_string: "warehouse://analytics".into(),
    });
    GraphSnapshot::new(vec![a, b], vec![edge("a", "b")])
}

// =============================================================================
// Forward
// =============================================================================

#[test]
fn source_to_destination_definition() {
    let definition = dto::to_definition(&pair_graph());

    assert_eq!(definition.activities[0].activity_type, ActivityType::Extract);
    assert_eq!(definition.activities[1].activity_type, ActivityType::Load);
    assert_eq!(definition.steps.len(), 1);
    assert_eq!(definition.steps[0].id, "step-0");
    assert_eq!(definition.steps[0].activity_id, "b");
    assert_eq!(definition.steps[0].depends_on, vec!["a".to_string()]);

    insta::assert_json_snapshot!("pair_definition", definition);
}

#[test]
fn empty_graph_has_no_activities_or_steps() {
    let definition = dto::to_definition(&GraphSnapshot::default());
    assert_eq!(definition.version, dto::DEFINITION_VERSION);
    assert!(definition.activities.is_empty());
    assert!(definition.steps.is_empty());
}

#[test]
fn every_activity_carries_ui_metadata() {
    let definition = dto::to_definition(&pipeline_graph());
    for activity in &definition.activities {
        let ui = &activity.config[UI_METADATA_KEY];
        assert!(ui["x"].is_number(), "{} has no x", activity.id);
        assert!(ui["y"].is_number(), "{} has no y", activity.id);
        assert!(ui["icon"].is_string(), "{} has no icon", activity.id);
    }
}

#[test]
fn switched_method_leaves_no_stale_fields() {
    let mut node = source("a");
    node.config = NodeConfig::Connection(ConnectionConfig::Credentials {
        host: "db".into(),
        port: Some(5432),
        database: "crm".into(),
        username: "etl".into(),
        password: "secret".into(),
    });
    node.config = NodeConfig::Connection(ConnectionConfig::Aggregator {
        aggregator_id: "agg-1".into(),
        mini_connector_id: None,
    });

    let definition = dto::to_definition(&GraphSnapshot::new(vec![node], vec![]));
    let config = &definition.activities[0].config;
    assert_eq!(config["method"], "aggregator");
    assert_eq!(config["aggregatorId"], "agg-1");
    for stale in ["host", "port", "database", "username", "password", "miniConnectorId"] {
        assert!(!config.contains_key(stale), "stale field {} serialized", stale);
    }
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn round_trip_preserves_graph() {
    let graph = pipeline_graph();
    let definition = dto::to_definition(&graph);
    let json = serde_json::to_string(&definition).unwrap();

    let parsed = dto::parse_definition(&json).unwrap();
    let restored = dto::from_definition(&parsed, &EditorConfig::default()).unwrap();

    assert_eq!(edge_pairs(&restored.connections), edge_pairs(&graph.connections));
    for original in &graph.nodes {
        let node = restored.node(&original.id).unwrap();
        assert_eq!(node.position, original.position, "{}", original.id);
        assert_eq!(node.icon, original.icon, "{}", original.id);
    }
    assert_eq!(restored, graph);
}

#[test]
fn round_trip_keeps_empty_icon() {
    let mut node = source("a").at(12.0, 34.0);
    node.icon = String::new();
    let graph = GraphSnapshot::new(vec![node], vec![]);

    let definition = dto::to_definition(&graph);
    assert_eq!(definition.activities[0].config[UI_METADATA_KEY]["icon"], "");

    let restored = dto::from_definition(&definition, &EditorConfig::default()).unwrap();
    assert_eq!(restored.nodes[0].icon, "");
    assert_eq!(restored, graph);
}

#[test]
fn fetched_definition_without_ui_metadata_uses_fallbacks() {
    let json = r#"{
        "version": "1.0",
        "activities": [
            {"id": "x", "type": "extract", "name": "X", "config": {"method": "connection_string", "connectionString": "pg://x"}},
            {"id": "y", "type": "transform", "name": "Y", "config": {"logic": "filter"}}
        ],
        "steps": [
            {"id": "s0", "activityId": "y", "dependsOn": ["x"]},
            {"id": "s1", "activityId": "x", "dependsOn": []}
        ]
    }"#;
    let config = EditorConfig::default();
    let graph = dto::from_definition(&dto::parse_definition(json).unwrap(), &config).unwrap();

    assert!(graph.nodes.iter().all(|n| n.position == config.fallback_position));
    assert_eq!(graph.node("x").unwrap().icon, "database");
    assert_eq!(graph.node("y").unwrap().icon, "shuffle");
    assert_eq!(
        graph.node("y").unwrap().transform_config().map(|t| t.logic.as_str()),
        Some("filter")
    );
    assert_eq!(edge_pairs(&graph.connections), vec![("x".into(), "y".into())]);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unknown_activity_type_is_rejected() {
    let json = r#"{"version":"1.0","activities":[{"id":"a","type":"notify","name":"A","config":{}}],"steps":[]}"#;
    let err = dto::parse_definition(json).unwrap_err();
    assert_eq!(err.code(), Some("T001"));
}

#[test]
fn malformed_config_names_the_activity() {
    let json = r#"{"version":"1.0","activities":[{"id":"a","type":"extract","name":"A","config":{"method":"carrier_pigeon"}}],"steps":[]}"#;
    let definition = dto::parse_definition(json).unwrap();
    let err = dto::from_definition(&definition, &EditorConfig::default()).unwrap_err();
    assert_eq!(err.code(), Some("T002"));
    assert!(err.to_string().contains("(activity 'a')"));
}
