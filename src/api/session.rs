//! Editor session: the workflow store wired to the workflows API.
//!
//! Every call sets its own loading flag, reduces failures to a notification
//! and leaves the graph untouched when the API call fails. Calls are not
//! cancelled, retried or de-duplicated.

use serde::Serialize;
use tracing::{info, warn};

use super::types::{SaveWorkflowRequest, ValidationResult, WorkflowSummary};
use super::{TRACING_TARGET, WorkflowsApi};
use crate::canvas::CanvasSurface;
use crate::config::EditorConfig;
use crate::dto;
use crate::error::EditorError;
use crate::model::WorkflowMeta;
use crate::palette::Palette;
use crate::properties::PropertiesPanel;
use crate::store::GraphStore;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    fn error(err: &EditorError) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: err.user_message(),
        }
    }
}

/// Per-call loading flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub fetching: bool,
    pub saving: bool,
    pub validating: bool,
    pub palette: bool,
    pub mini_connectors: bool,
}

#[derive(Debug)]
pub struct WorkflowSession<A> {
    api: A,
    config: EditorConfig,
    pub store: GraphStore,
    pub canvas: CanvasSurface,
    pub palette: Palette,
    pub properties: PropertiesPanel,
    workflows: Vec<WorkflowSummary>,
    loading: LoadingState,
    notifications: Vec<Notification>,
}

impl<A: WorkflowsApi> WorkflowSession<A> {
    pub fn new(api: A, config: EditorConfig) -> Self {
        WorkflowSession {
            store: GraphStore::new(&config),
            canvas: CanvasSurface::new(&config),
            palette: Palette::new(),
            properties: PropertiesPanel::new(),
            workflows: Vec::new(),
            loading: LoadingState::default(),
            notifications: Vec::new(),
            api,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain pending notifications once they have been shown.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Start over with an empty draft.
    pub fn new_workflow(&mut self) {
        self.store.reset_workflow();
        self.palette.set_workflows(&self.workflows, None);
    }

    /// Fetch a workflow and replace the editor state with it.
    pub async fn load(&mut self, id: &str) -> bool {
        self.loading.fetching = true;
        let result = self.api.fetch_workflow(id).await;
        self.loading.fetching = false;

        let record = match result {
            Ok(record) => record,
            Err(e) => return self.fail("load", e),
        };
        let graph = match dto::from_definition(&record.definition, &self.config) {
            Ok(graph) => graph,
            Err(e) => return self.fail("load", e),
        };

        info!(
            target: TRACING_TARGET,
            workflow_id = %record.id,
            nodes = graph.nodes.len(),
            "Workflow loaded"
        );
        let meta = WorkflowMeta {
            id: Some(record.id),
            name: record.name,
            description: record.description,
            status: record.status,
        };
        self.store.load_workflow(meta, graph);
        self.palette.set_workflows(&self.workflows, self.store.meta().id.as_deref());
        true
    }

    /// Create the workflow on first save, update it afterwards.
    pub async fn save(&mut self) -> bool {
        let graph = self.store.snapshot();
        for issue in validate::check_graph(&graph) {
            warn!(
                target: TRACING_TARGET,
                code = issue.code,
                node_id = ?issue.node_id,
                "{}", issue.message
            );
        }

        let meta = self.store.meta().clone();
        let request = SaveWorkflowRequest {
            name: meta.name,
            description: meta.description,
            status: meta.status,
            definition: dto::to_definition(&graph),
        };

        self.loading.saving = true;
        let result = match &meta.id {
            Some(id) => self.api.update_workflow(id, &request).await,
            None => self.api.create_workflow(&request).await,
        };
        self.loading.saving = false;

        match result {
            Ok(record) => {
                info!(
                    target: TRACING_TARGET,
                    workflow_id = %record.id,
                    created = meta.id.is_none(),
                    "Workflow saved"
                );
                if meta.id.is_none() {
                    self.store.mark_persisted(record.id);
                    self.palette.set_workflows(&self.workflows, self.store.meta().id.as_deref());
                }
                self.notifications.push(Notification::success("Workflow saved"));
                true
            }
            Err(e) => self.fail("save", e),
        }
    }

    /// Ask the backend to validate the current graph. Only the error count
    /// is surfaced to the user.
    pub async fn validate(&mut self) -> Option<ValidationResult> {
        let definition = dto::to_definition(self.store.graph());

        self.loading.validating = true;
        let result = self.api.validate_workflow(&definition).await;
        self.loading.validating = false;

        match result {
            Ok(validation) => {
                if validation.valid {
                    self.notifications.push(Notification::success(format!(
                        "Workflow is valid ({} activities checked)",
                        validation.activities_checked
                    )));
                } else {
                    self.notifications.push(Notification::warning(format!(
                        "Validation found {} error(s)",
                        validation.errors.len()
                    )));
                }
                Some(validation)
            }
            Err(e) => {
                self.fail("validate", e);
                None
            }
        }
    }

    /// Reload the marketplace and workflows palette categories. Each list is
    /// fetched independently; one failing does not clear the other.
    pub async fn refresh_palette(&mut self) {
        self.loading.palette = true;

        match self.api.list_aggregators().await {
            Ok(aggregators) => self.palette.set_marketplace(&aggregators),
            Err(e) => {
                self.fail("list aggregators", e);
            }
        }

        match self.api.list_workflows().await {
            Ok(workflows) => {
                self.workflows = workflows;
                self.palette
                    .set_workflows(&self.workflows, self.store.meta().id.as_deref());
            }
            Err(e) => {
                self.fail("list workflows", e);
            }
        }

        self.loading.palette = false;
    }

    /// Load the on-premise agents available to an aggregator.
    pub async fn load_mini_connectors(&mut self, aggregator_id: &str) -> bool {
        self.loading.mini_connectors = true;
        let result = self.api.list_mini_connectors(aggregator_id).await;
        self.loading.mini_connectors = false;

        match result {
            Ok(agents) => {
                self.properties.set_mini_connectors(agents);
                true
            }
            Err(e) => self.fail("list mini connectors", e),
        }
    }

    fn fail(&mut self, action: &'static str, err: EditorError) -> bool {
        warn!(target: TRACING_TARGET, action, error = %err, "Workflow API call failed");
        self.notifications.push(Notification::error(&err));
        false
    }
}
