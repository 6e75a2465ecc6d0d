//! The categorized, searchable node palette.

use std::collections::HashSet;

use serde::Serialize;

use super::template::{NodeTemplate, PaletteCategory};
use crate::api::types::{AggregatorSummary, WorkflowSummary};
use crate::model::{
    ConnectionConfig, ConnectionMethod, HttpMethod, NodeConfig, NodeType, TransformConfig,
};

/// `TransformConfig::logic` prefix of nodes that call another workflow.
pub const SUBWORKFLOW_LOGIC_PREFIX: &str = "workflow:";

/// One visible palette section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteGroup {
    pub category: PaletteCategory,
    pub title: &'static str,
    pub collapsed: bool,
    pub templates: Vec<NodeTemplate>,
}

#[derive(Debug, Clone)]
pub struct Palette {
    builtin: Vec<(PaletteCategory, NodeTemplate)>,
    marketplace: Vec<NodeTemplate>,
    workflows: Vec<NodeTemplate>,
    search: String,
    collapsed: HashSet<PaletteCategory>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            builtin: builtin_templates(),
            marketplace: Vec::new(),
            workflows: Vec::new(),
            search: String::new(),
            collapsed: HashSet::new(),
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the marketplace category with installed aggregators.
    pub fn set_marketplace(&mut self, aggregators: &[AggregatorSummary]) {
        self.marketplace = aggregators.iter().map(aggregator_template).collect();
    }

    /// Replace the workflows category. `current_id` is excluded so a
    /// workflow cannot embed itself.
    pub fn set_workflows(&mut self, workflows: &[WorkflowSummary], current_id: Option<&str>) {
        self.workflows = workflows
            .iter()
            .filter(|w| Some(w.id.as_str()) != current_id)
            .map(workflow_template)
            .collect();
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn toggle_category(&mut self, category: PaletteCategory) {
        if !self.collapsed.remove(&category) {
            self.collapsed.insert(category);
        }
    }

    pub fn is_collapsed(&self, category: PaletteCategory) -> bool {
        self.collapsed.contains(&category)
    }

    pub fn templates(&self, category: PaletteCategory) -> Vec<&NodeTemplate> {
        match category {
            PaletteCategory::Marketplace => self.marketplace.iter().collect(),
            PaletteCategory::Workflows => self.workflows.iter().collect(),
            _ => self
                .builtin
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, t)| t)
                .collect(),
        }
    }

    /// Visible groups in display order. Under an active search a category
    /// without matches is hidden; without a search every category shows.
    pub fn groups(&self) -> Vec<PaletteGroup> {
        let needle = self.search.trim().to_lowercase();
        PaletteCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let templates: Vec<NodeTemplate> = self
                    .templates(category)
                    .into_iter()
                    .filter(|t| t.matches(&needle))
                    .cloned()
                    .collect();
                if !needle.is_empty() && templates.is_empty() {
                    return None;
                }
                Some(PaletteGroup {
                    category,
                    title: category.title(),
                    collapsed: self.is_collapsed(category),
                    templates,
                })
            })
            .collect()
    }
}

fn aggregator_template(aggregator: &AggregatorSummary) -> NodeTemplate {
    let description = if aggregator.description.is_empty() {
        format!("Installed {} connector", aggregator.connector_type)
    } else {
        aggregator.description.clone()
    };
    NodeTemplate::new(
        NodeType::Source,
        aggregator.name.clone(),
        description,
        aggregator.icon.clone().unwrap_or_else(|| "plug".into()),
    )
    .with_config(NodeConfig::Connection(ConnectionConfig::Aggregator {
        aggregator_id: aggregator.id.clone(),
        mini_connector_id: None,
    }))
}

fn workflow_template(workflow: &WorkflowSummary) -> NodeTemplate {
    NodeTemplate::new(
        NodeType::Transform,
        workflow.name.clone(),
        workflow.description.clone(),
        "workflow",
    )
    .with_config(NodeConfig::Transform(TransformConfig {
        logic: format!("{}{}", SUBWORKFLOW_LOGIC_PREFIX, workflow.id),
        ..Default::default()
    }))
}

fn credentials() -> NodeConfig {
    NodeConfig::Connection(ConnectionConfig::empty(ConnectionMethod::Credentials))
}

fn transform(logic: &str) -> NodeConfig {
    NodeConfig::Transform(TransformConfig {
        logic: logic.into(),
        ..Default::default()
    })
}

fn builtin_templates() -> Vec<(PaletteCategory, NodeTemplate)> {
    use PaletteCategory as C;

    vec![
        // Sources
        (
            C::Source,
            NodeTemplate::new(NodeType::Source, "PostgreSQL", "Read rows from a PostgreSQL database", "database")
                .with_config(credentials()),
        ),
        (
            C::Source,
            NodeTemplate::new(NodeType::Source, "MySQL", "Read rows from a MySQL database", "database")
                .with_config(credentials()),
        ),
        (
            C::Source,
            NodeTemplate::new(NodeType::Source, "Connection String", "Connect with a raw connection string", "link")
                .with_config(NodeConfig::Connection(ConnectionConfig::empty(
                    ConnectionMethod::ConnectionString,
                ))),
        ),
        (
            C::Source,
            NodeTemplate::new(NodeType::Source, "REST API", "Fetch records from an HTTP endpoint", "globe")
                .with_config(NodeConfig::Connection(ConnectionConfig::empty(
                    ConnectionMethod::CustomApi,
                ))),
        ),
        // Transforms
        (
            C::Transform,
            NodeTemplate::new(NodeType::Transform, "Filter", "Keep records matching a condition", "filter")
                .with_config(transform("filter")),
        ),
        (
            C::Transform,
            NodeTemplate::new(NodeType::Transform, "Map Fields", "Rename and reshape fields", "shuffle")
                .with_config(transform("map")),
        ),
        (
            C::Transform,
            NodeTemplate::new(NodeType::Transform, "Aggregate", "Group records and compute totals", "sigma")
                .with_config(transform("aggregate")),
        ),
        (
            C::Transform,
            NodeTemplate::new(NodeType::Transform, "Deduplicate", "Drop duplicate records by key", "copy")
                .with_config(transform("dedupe")),
        ),
        // Destinations
        (
            C::Destination,
            NodeTemplate::new(NodeType::Destination, "PostgreSQL", "Write rows to a PostgreSQL table", "database")
                .with_config(credentials()),
        ),
        (
            C::Destination,
            NodeTemplate::new(NodeType::Destination, "Data Warehouse", "Load into a warehouse via connection string", "warehouse")
                .with_config(NodeConfig::Connection(ConnectionConfig::empty(
                    ConnectionMethod::ConnectionString,
                ))),
        ),
        (
            C::Destination,
            NodeTemplate::new(NodeType::Destination, "Webhook", "POST records to an HTTP endpoint", "send")
                .with_config(NodeConfig::Connection(ConnectionConfig::CustomApi {
                    endpoint: String::new(),
                    http_method: HttpMethod::Post,
                    headers: Vec::new(),
                    auth: Default::default(),
                })),
        ),
    ]
}
