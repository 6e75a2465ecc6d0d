//! `WorkflowsApi` over HTTP using reqwest.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::*;
use super::{TRACING_TARGET, WorkflowsApi};
use crate::config::ApiConfig;
use crate::dto::WorkflowDefinitionDto;
use crate::error::{EditorError, Result};

#[derive(Debug, Clone)]
pub struct HttpWorkflowsApi {
    http: Client,
    config: ApiConfig,
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    definition: &'a WorkflowDefinitionDto,
}

impl HttpWorkflowsApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder().build()?;
        tracing::debug!(
            target: TRACING_TARGET,
            base_url = config.effective_base_url(),
            "Workflows API client created"
        );
        Ok(HttpWorkflowsApi { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.effective_base_url(), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        tracing::warn!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            message = %message,
            "Workflows API request failed"
        );
        Err(EditorError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl WorkflowsApi for HttpWorkflowsApi {
    async fn create_workflow(&self, request: &SaveWorkflowRequest) -> Result<WorkflowRecord> {
        self.send(self.request(Method::POST, "/workflows").json(request))
            .await
    }

    async fn update_workflow(
        &self,
        id: &str,
        request: &SaveWorkflowRequest,
    ) -> Result<WorkflowRecord> {
        let path = format!("/workflows/{}", id);
        self.send(self.request(Method::PUT, &path).json(request)).await
    }

    async fn fetch_workflow(&self, id: &str) -> Result<WorkflowRecord> {
        let path = format!("/workflows/{}", id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn validate_workflow(
        &self,
        definition: &WorkflowDefinitionDto,
    ) -> Result<ValidationResult> {
        let body = ValidateRequest { definition };
        self.send(self.request(Method::POST, "/workflows/validate").json(&body))
            .await
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>> {
        self.send(self.request(Method::GET, "/workflows")).await
    }

    async fn list_aggregators(&self) -> Result<Vec<AggregatorSummary>> {
        self.send(self.request(Method::GET, "/aggregators/installed"))
            .await
    }

    async fn list_mini_connectors(&self, aggregator_id: &str) -> Result<Vec<MiniConnectorAgent>> {
        let path = format!("/aggregators/{}/mini-connectors", aggregator_id);
        self.send(self.request(Method::GET, &path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let api = HttpWorkflowsApi::new(ApiConfig::new("https://example.com/api/")).unwrap();
        assert_eq!(api.url("/workflows/wf-1"), "https://example.com/api/workflows/wf-1");
    }
}
