//! Client-side structural checks run before a workflow is saved.
//!
//! Nothing here blocks editing; findings are reported so the user can fix
//! them before the backend validation runs.

pub mod structural;

use serde::Serialize;

use crate::model::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphIssue {
    pub code: &'static str,
    pub message: String,
    /// The node the issue is attached to, if any.
    pub node_id: Option<String>,
}

impl GraphIssue {
    pub fn new(code: &'static str, message: impl Into<String>, node_id: Option<String>) -> Self {
        GraphIssue {
            code,
            message: message.into(),
            node_id,
        }
    }
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {} (node '{}')", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Run every structural rule. Returns all issues found.
pub fn check_graph(graph: &GraphSnapshot) -> Vec<GraphIssue> {
    structural::check_structural(graph)
}
