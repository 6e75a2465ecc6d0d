//! Editor configuration, deserializable from the JSON the host page passes in.

use serde::{Deserialize, Serialize};

use crate::model::Position;

pub const DEFAULT_NODE_WIDTH: f64 = 200.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 80.0;
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Rendered node width, used to center dropped nodes under the cursor.
    pub node_width: f64,
    pub node_height: f64,
    /// Position given to loaded activities without `ui_metadata`.
    pub fallback_position: Position,
    /// Maximum undo depth. `None` keeps every entry.
    pub history_limit: Option<usize>,
    pub api: ApiConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            fallback_position: Position::new(100.0, 100.0),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            api: ApiConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Offset subtracted from the cursor so a dropped node lands centered on it.
    pub fn drop_offset(&self) -> Position {
        Position::new(self.node_width / 2.0, self.node_height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL of the workflows REST API, without trailing slash.
    pub base_url: String,
    /// Bearer token forwarded on every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "/api".into(),
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL with any trailing slash removed.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
