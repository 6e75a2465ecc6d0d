//! Canvas node types and their type-specific configuration.

use serde::{Deserialize, Serialize};

// =============================================================================
// NODE
// =============================================================================

/// A visual unit on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub position: Position,
    pub config: NodeConfig,
}

impl Node {
    /// A node of the given type with the empty config for that type.
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            node_type,
            label: label.into(),
            description: String::new(),
            icon: node_type.default_icon().into(),
            position: Position::default(),
            config: NodeConfig::default_for(node_type),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn connection_config(&self) -> Option<&ConnectionConfig> {
        match &self.config {
            NodeConfig::Connection(c) => Some(c),
            NodeConfig::Transform(_) => None,
        }
    }

    pub fn transform_config(&self) -> Option<&TransformConfig> {
        match &self.config {
            NodeConfig::Transform(t) => Some(t),
            NodeConfig::Connection(_) => None,
        }
    }
}

/// Generate a fresh node id, e.g. `source-3f0c9a...`.
pub fn mint_node_id(node_type: NodeType) -> String {
    format!("{}-{}", node_type.as_str(), uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Source,
    Transform,
    Destination,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Source => "source",
            NodeType::Transform => "transform",
            NodeType::Destination => "destination",
        }
    }

    /// Whether the node renders an input connector (left side).
    pub fn has_input(&self) -> bool {
        !matches!(self, NodeType::Source)
    }

    /// Whether the node renders an output connector (right side).
    pub fn has_output(&self) -> bool {
        !matches!(self, NodeType::Destination)
    }

    pub fn default_icon(&self) -> &'static str {
        match self {
            NodeType::Source => "database",
            NodeType::Transform => "shuffle",
            NodeType::Destination => "upload",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates to the non-negative quadrant.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }
}

// =============================================================================
// NODE CONFIG
// =============================================================================

/// Type-specific configuration. Data nodes (source/destination) carry a
/// connection config, transform nodes carry transform logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeConfig {
    Connection(ConnectionConfig),
    Transform(TransformConfig),
}

impl NodeConfig {
    pub fn default_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Transform => NodeConfig::Transform(TransformConfig::default()),
            NodeType::Source | NodeType::Destination => {
                NodeConfig::Connection(ConnectionConfig::empty(ConnectionMethod::Credentials))
            }
        }
    }

    /// Whether this config shape is valid for the node type.
    pub fn fits(&self, node_type: NodeType) -> bool {
        match self {
            NodeConfig::Connection(_) => node_type != NodeType::Transform,
            NodeConfig::Transform(_) => node_type == NodeType::Transform,
        }
    }
}

// =============================================================================
// CONNECTION CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMethod {
    Credentials,
    ConnectionString,
    Aggregator,
    CustomApi,
}

impl ConnectionMethod {
    pub const ALL: [ConnectionMethod; 4] = [
        ConnectionMethod::Credentials,
        ConnectionMethod::ConnectionString,
        ConnectionMethod::Aggregator,
        ConnectionMethod::CustomApi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionMethod::Credentials => "credentials",
            ConnectionMethod::ConnectionString => "connection_string",
            ConnectionMethod::Aggregator => "aggregator",
            ConnectionMethod::CustomApi => "custom_api",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// How a data node reaches its system. Only the active method's fields exist,
/// so switching methods cannot leave stale values behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ConnectionConfig {
    Credentials {
        host: String,
        port: Option<u16>,
        database: String,
        username: String,
        password: String,
    },
    ConnectionString {
        connection_string: String,
    },
    Aggregator {
        aggregator_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mini_connector_id: Option<String>,
    },
    CustomApi {
        endpoint: String,
        http_method: HttpMethod,
        #[serde(default)]
        headers: Vec<Header>,
        #[serde(default)]
        auth: ApiAuth,
    },
}

impl ConnectionConfig {
    /// The empty form for a method.
    pub fn empty(method: ConnectionMethod) -> Self {
        match method {
            ConnectionMethod::Credentials => ConnectionConfig::Credentials {
                host: String::new(),
                port: None,
                database: String::new(),
                username: String::new(),
                password: String::new(),
            },
            ConnectionMethod::ConnectionString => ConnectionConfig::ConnectionString {
                connection_string: String::new(),
            },
            ConnectionMethod::Aggregator => ConnectionConfig::Aggregator {
                aggregator_id: String::new(),
                mini_connector_id: None,
            },
            ConnectionMethod::CustomApi => ConnectionConfig::CustomApi {
                endpoint: String::new(),
                http_method: HttpMethod::Get,
                headers: Vec::new(),
                auth: ApiAuth::None,
            },
        }
    }

    pub fn method(&self) -> ConnectionMethod {
        match self {
            ConnectionConfig::Credentials { .. } => ConnectionMethod::Credentials,
            ConnectionConfig::ConnectionString { .. } => ConnectionMethod::ConnectionString,
            ConnectionConfig::Aggregator { .. } => ConnectionMethod::Aggregator,
            ConnectionConfig::CustomApi { .. } => ConnectionMethod::CustomApi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ApiAuth {
    #[default]
    None,
    Bearer {
        token: String,
    },
    ApiKey {
        header: String,
        key: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

// =============================================================================
// TRANSFORM CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    pub logic: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
}
