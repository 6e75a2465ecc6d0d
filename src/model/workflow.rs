use serde::{Deserialize, Serialize};

/// Metadata of the workflow being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMeta {
    /// `None` until the first save returns a server-assigned id.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: WorkflowStatus,
}

impl Default for WorkflowMeta {
    fn default() -> Self {
        WorkflowMeta {
            id: None,
            name: "Untitled workflow".into(),
            description: String::new(),
            status: WorkflowStatus::Draft,
        }
    }
}

impl WorkflowMeta {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Archived,
}
