//! Rust types mirroring the backend workflow definition contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::NodeType;

/// The only definition version this editor writes.
pub const DEFINITION_VERSION: &str = "1.0";

/// Key under which canvas-only data rides along in an activity config.
pub const UI_METADATA_KEY: &str = "ui_metadata";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinitionDto {
    pub version: String,
    pub activities: Vec<ActivityDto>,
    pub steps: Vec<StepDto>,
}

impl Default for WorkflowDefinitionDto {
    fn default() -> Self {
        WorkflowDefinitionDto {
            version: DEFINITION_VERSION.into(),
            activities: Vec::new(),
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDto {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A dependency edge. Step ids are positional (`step-<index>`) and are not
/// stable across reorderings of the connection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub id: String,
    pub activity_id: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Extract,
    Transform,
    Load,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Extract => "extract",
            ActivityType::Transform => "transform",
            ActivityType::Load => "load",
        }
    }
}

impl From<NodeType> for ActivityType {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Source => ActivityType::Extract,
            NodeType::Transform => ActivityType::Transform,
            NodeType::Destination => ActivityType::Load,
        }
    }
}

impl From<ActivityType> for NodeType {
    fn from(activity_type: ActivityType) -> Self {
        match activity_type {
            ActivityType::Extract => NodeType::Source,
            ActivityType::Transform => NodeType::Transform,
            ActivityType::Load => NodeType::Destination,
        }
    }
}

/// Canvas position and icon stored under [`UI_METADATA_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMetadata {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub icon: String,
}
