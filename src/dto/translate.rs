//! Bidirectional mapping between the canvas graph and the definition DTO.
//!
//! Forward: one activity per node, one step per connection.
//! Reverse: the inverse, recovering position and icon from `ui_metadata`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::*;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::model::{
    Connection, ConnectionConfig, GraphSnapshot, Node, NodeConfig, NodeType, Position,
    TransformConfig,
};

pub const TRACING_TARGET: &str = "workflow_canvas::dto";

const DESCRIPTION_KEY: &str = "description";

/// Deserialize a definition JSON string.
pub fn parse_definition(json: &str) -> Result<WorkflowDefinitionDto> {
    serde_json::from_str(json).map_err(|e| {
        EditorError::translate(
            "T001",
            format!("Failed to parse workflow definition: {}", e),
            None,
        )
    })
}

// =============================================================================
// FORWARD (save)
// =============================================================================

pub fn to_definition(graph: &GraphSnapshot) -> WorkflowDefinitionDto {
    let activities = graph.nodes.iter().map(node_to_activity).collect();

    let steps = graph
        .connections
        .iter()
        .enumerate()
        .map(|(index, connection)| StepDto {
            id: format!("step-{}", index),
            activity_id: connection.to.clone(),
            depends_on: vec![connection.from.clone()],
        })
        .collect();

    WorkflowDefinitionDto {
        version: DEFINITION_VERSION.into(),
        activities,
        steps,
    }
}

fn node_to_activity(node: &Node) -> ActivityDto {
    let mut config = match &node.config {
        NodeConfig::Connection(c) => object_of(c),
        NodeConfig::Transform(t) => object_of(t),
    };
    if !node.description.is_empty() {
        config.insert(DESCRIPTION_KEY.into(), Value::String(node.description.clone()));
    }
    config.insert(UI_METADATA_KEY.into(), object_value(&UiMetadata {
        x: node.position.x,
        y: node.position.y,
        icon: node.icon.clone(),
    }));

    ActivityDto {
        id: node.id.clone(),
        activity_type: node.node_type.into(),
        name: node.label.clone(),
        config,
    }
}

fn object_of<T: serde::Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn object_value<T: serde::Serialize>(value: &T) -> Value {
    Value::Object(object_of(value))
}

// =============================================================================
// REVERSE (load)
// =============================================================================

/// Map a definition back onto the canvas. Steps without a dependency are
/// dropped since they cannot correspond to a real edge.
pub fn from_definition(
    definition: &WorkflowDefinitionDto,
    config: &EditorConfig,
) -> Result<GraphSnapshot> {
    let nodes = definition
        .activities
        .iter()
        .map(|activity| activity_to_node(activity, config.fallback_position))
        .collect::<Result<Vec<_>>>()?;

    let mut connections = Vec::with_capacity(definition.steps.len());
    for step in &definition.steps {
        let Some(from) = step.depends_on.first() else {
            warn!(
                target: TRACING_TARGET,
                step_id = %step.id,
                activity_id = %step.activity_id,
                "Dropping step without dependency"
            );
            continue;
        };
        if step.depends_on.len() > 1 {
            debug!(
                target: TRACING_TARGET,
                step_id = %step.id,
                ignored = step.depends_on.len() - 1,
                "Step has more than one dependency, keeping the first"
            );
        }
        connections.push(Connection::new(from.clone(), step.activity_id.clone()));
    }

    Ok(GraphSnapshot { nodes, connections })
}

fn activity_to_node(activity: &ActivityDto, fallback: Position) -> Result<Node> {
    let mut config = activity.config.clone();
    let node_type = NodeType::from(activity.activity_type);

    let (position, icon) = match config.remove(UI_METADATA_KEY) {
        Some(ui) => ui_position_and_icon(&activity.id, ui, fallback),
        None => (fallback, node_type.default_icon().to_string()),
    };

    let description = match config.remove(DESCRIPTION_KEY) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };

    let node_config = if config.is_empty() {
        NodeConfig::default_for(node_type)
    } else {
        decode_config(node_type, config).map_err(|e| {
            EditorError::translate(
                "T002",
                format!("Invalid config for {} activity: {}", activity.activity_type.as_str(), e),
                Some(activity.id.clone()),
            )
        })?
    };

    Ok(Node {
        id: activity.id.clone(),
        node_type,
        label: activity.name.clone(),
        description,
        icon,
        position,
        config: node_config,
    })
}

/// Read position and icon from stored `ui_metadata`. The icon is kept as
/// stored, empty included. Coordinates that are missing or not numbers fall
/// back to `fallback`.
fn ui_position_and_icon(activity_id: &str, ui: Value, fallback: Position) -> (Position, String) {
    if let Ok(ui) = serde_json::from_value::<UiMetadata>(ui.clone()) {
        return (Position::new(ui.x, ui.y), ui.icon);
    }
    warn!(
        target: TRACING_TARGET,
        activity_id,
        "Malformed ui_metadata, using fallback position"
    );
    let icon = ui
        .get("icon")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    (fallback, icon)
}

fn decode_config(
    node_type: NodeType,
    config: Map<String, Value>,
) -> std::result::Result<NodeConfig, serde_json::Error> {
    let value = Value::Object(config);
    match node_type {
        NodeType::Transform => {
            serde_json::from_value::<TransformConfig>(value).map(NodeConfig::Transform)
        }
        NodeType::Source | NodeType::Destination => {
            serde_json::from_value::<ConnectionConfig>(value).map(NodeConfig::Connection)
        }
    }
}
