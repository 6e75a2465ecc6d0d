//! Draggable node templates and their drag payload encoding.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::model::{Node, NodeConfig, NodeType, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteCategory {
    Source,
    Transform,
    Destination,
    Marketplace,
    Workflows,
}

impl PaletteCategory {
    /// Display order.
    pub const ALL: [PaletteCategory; 5] = [
        PaletteCategory::Source,
        PaletteCategory::Transform,
        PaletteCategory::Destination,
        PaletteCategory::Marketplace,
        PaletteCategory::Workflows,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PaletteCategory::Source => "Sources",
            PaletteCategory::Transform => "Transforms",
            PaletteCategory::Destination => "Destinations",
            PaletteCategory::Marketplace => "Marketplace",
            PaletteCategory::Workflows => "Workflows",
        }
    }
}

/// A node description carried from the palette to the canvas. Position is
/// injected at drop time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Initial config; the node type's empty config when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<NodeConfig>,
}

impl NodeTemplate {
    pub fn new(
        node_type: NodeType,
        label: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        NodeTemplate {
            node_type,
            label: label.into(),
            description: description.into(),
            icon: icon.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Case-insensitive substring match on label and description.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.label.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn to_drag_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_drag_payload(payload: &str) -> Result<Self> {
        let template: NodeTemplate = serde_json::from_str(payload).map_err(|e| {
            EditorError::payload("D001", format!("Failed to parse drag payload: {}", e))
        })?;
        if let Some(config) = &template.config
            && !config.fits(template.node_type)
        {
            return Err(EditorError::payload(
                "D002",
                format!(
                    "Template config does not fit a {} node",
                    template.node_type
                ),
            ));
        }
        Ok(template)
    }

    /// Materialize the template as a node with the given id and position.
    pub fn into_node(self, id: String, position: Position) -> Node {
        let config = self
            .config
            .unwrap_or_else(|| NodeConfig::default_for(self.node_type));
        let icon = if self.icon.is_empty() {
            self.node_type.default_icon().to_string()
        } else {
            self.icon
        };
        Node {
            id,
            node_type: self.node_type,
            label: self.label,
            description: self.description,
            icon,
            position,
            config,
        }
    }
}
