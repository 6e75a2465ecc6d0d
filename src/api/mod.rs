//! Boundary to the external workflows REST API.
//!
//! [`WorkflowsApi`] abstracts the backend calls; [`HttpWorkflowsApi`] is the
//! reqwest implementation and [`WorkflowSession`] drives them on behalf of
//! the editor.

pub mod http;
pub mod session;
pub mod types;

pub use http::HttpWorkflowsApi;
pub use session::{LoadingState, Notification, NotificationLevel, WorkflowSession};
pub use types::*;

use crate::dto::WorkflowDefinitionDto;
use crate::error::Result;

pub const TRACING_TARGET: &str = "workflow_canvas::api";

#[async_trait::async_trait(?Send)]
pub trait WorkflowsApi {
    async fn create_workflow(&self, request: &SaveWorkflowRequest) -> Result<WorkflowRecord>;

    async fn update_workflow(&self, id: &str, request: &SaveWorkflowRequest)
    -> Result<WorkflowRecord>;

    async fn fetch_workflow(&self, id: &str) -> Result<WorkflowRecord>;

    async fn validate_workflow(&self, definition: &WorkflowDefinitionDto)
    -> Result<ValidationResult>;

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>>;

    /// Installed aggregator connectors, shown in the marketplace category.
    async fn list_aggregators(&self) -> Result<Vec<AggregatorSummary>>;

    async fn list_mini_connectors(&self, aggregator_id: &str) -> Result<Vec<MiniConnectorAgent>>;
}
