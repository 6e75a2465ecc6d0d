//! Properties panel: the form for the selected node and the edits it writes
//! back through [`GraphStore::update_node`], which keeps them out of undo
//! history.

pub mod form;

pub use form::{DataForm, FieldKind, FormField, PanelView, TransformForm};

use tracing::warn;

use crate::api::types::MiniConnectorAgent;
use crate::model::{
    ApiAuth, ConnectionConfig, ConnectionMethod, FieldMapping, Header, HttpMethod, NodeConfig,
    TransformConfig,
};
use crate::store::{GraphStore, NodePatch};

pub const TRACING_TARGET: &str = "workflow_canvas::properties";

#[derive(Debug, Clone, Default)]
pub struct PropertiesPanel {
    mini_connectors: Vec<MiniConnectorAgent>,
}

impl PropertiesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agents offered by the aggregator form's on-premise selector.
    pub fn set_mini_connectors(&mut self, agents: Vec<MiniConnectorAgent>) {
        self.mini_connectors = agents;
    }

    pub fn mini_connectors(&self) -> &[MiniConnectorAgent] {
        &self.mini_connectors
    }

    pub fn view(&self, store: &GraphStore) -> PanelView {
        match store.selected_node() {
            Some(node) => form::view_for(node, &self.mini_connectors),
            None => PanelView::Empty,
        }
    }

    // -------------------------------------------------------------------------
    // Common fields
    // -------------------------------------------------------------------------

    pub fn set_label(&self, store: &mut GraphStore, label: &str) {
        if let Some(id) = store.selected().map(str::to_string) {
            store.update_node(&id, NodePatch::label(label));
        }
    }

    pub fn set_description(&self, store: &mut GraphStore, description: &str) {
        if let Some(id) = store.selected().map(str::to_string) {
            store.update_node(&id, NodePatch::description(description));
        }
    }

    // -------------------------------------------------------------------------
    // Connection config
    // -------------------------------------------------------------------------

    /// Switch the connection method. The previous method's fields are
    /// discarded.
    pub fn switch_method(&self, store: &mut GraphStore, method: ConnectionMethod) {
        self.edit_connection(store, |config| {
            if config.method() != method {
                *config = ConnectionConfig::empty(method);
            }
        });
    }

    /// Set a scalar field of the active connection method. Unknown names
    /// and unparsable values leave the config unchanged.
    pub fn set_field(&self, store: &mut GraphStore, name: &str, value: &str) {
        self.edit_connection(store, |config| {
            if !apply_field(config, name, value) {
                warn!(
                    target: TRACING_TARGET,
                    field = name,
                    method = config.method().as_str(),
                    "Ignoring field edit"
                );
            }
        });
    }

    pub fn add_header(&self, store: &mut GraphStore, name: &str, value: &str) {
        self.edit_connection(store, |config| {
            if let ConnectionConfig::CustomApi { headers, .. } = config {
                headers.push(Header {
                    name: name.into(),
                    value: value.into(),
                });
            }
        });
    }

    pub fn remove_header(&self, store: &mut GraphStore, index: usize) {
        self.edit_connection(store, |config| {
            if let ConnectionConfig::CustomApi { headers, .. } = config
                && index < headers.len()
            {
                headers.remove(index);
            }
        });
    }

    pub fn set_auth(&self, store: &mut GraphStore, new_auth: ApiAuth) {
        self.edit_connection(store, |config| {
            if let ConnectionConfig::CustomApi { auth, .. } = config {
                *auth = new_auth;
            }
        });
    }

    // -------------------------------------------------------------------------
    // Transform config
    // -------------------------------------------------------------------------

    pub fn set_transform_logic(&self, store: &mut GraphStore, logic: &str) {
        self.edit_transform(store, |t| t.logic = logic.into());
    }

    pub fn toggle_flag(&self, store: &mut GraphStore, flag: &str) {
        self.edit_transform(store, |t| {
            if let Some(i) = t.flags.iter().position(|f| f == flag) {
                t.flags.remove(i);
            } else {
                t.flags.push(flag.into());
            }
        });
    }

    pub fn add_mapping(&self, store: &mut GraphStore, source_field: &str, target_field: &str) {
        self.edit_transform(store, |t| {
            t.field_mappings.push(FieldMapping {
                source_field: source_field.into(),
                target_field: target_field.into(),
            })
        });
    }

    pub fn remove_mapping(&self, store: &mut GraphStore, index: usize) {
        self.edit_transform(store, |t| {
            if index < t.field_mappings.len() {
                t.field_mappings.remove(index);
            }
        });
    }

    fn edit_connection(&self, store: &mut GraphStore, edit: impl FnOnce(&mut ConnectionConfig)) {
        let Some(node) = store.selected_node() else {
            return;
        };
        let NodeConfig::Connection(mut config) = node.config.clone() else {
            return;
        };
        let id = node.id.clone();
        edit(&mut config);
        store.update_node(&id, NodePatch::config(NodeConfig::Connection(config)));
    }

    fn edit_transform(&self, store: &mut GraphStore, edit: impl FnOnce(&mut TransformConfig)) {
        let Some(node) = store.selected_node() else {
            return;
        };
        let NodeConfig::Transform(mut config) = node.config.clone() else {
            return;
        };
        let id = node.id.clone();
        edit(&mut config);
        store.update_node(&id, NodePatch::config(NodeConfig::Transform(config)));
    }
}

fn apply_field(config: &mut ConnectionConfig, name: &str, value: &str) -> bool {
    match (config, name) {
        (ConnectionConfig::Credentials { host, .. }, "host") => *host = value.into(),
        (ConnectionConfig::Credentials { port, .. }, "port") => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                *port = None;
            } else {
                match trimmed.parse::<u16>() {
                    Ok(p) => *port = Some(p),
                    Err(_) => return false,
                }
            }
        }
        (ConnectionConfig::Credentials { database, .. }, "database") => *database = value.into(),
        (ConnectionConfig::Credentials { username, .. }, "username") => *username = value.into(),
        (ConnectionConfig::Credentials { password, .. }, "password") => *password = value.into(),
        (ConnectionConfig::ConnectionString { connection_string }, "connectionString") => {
            *connection_string = value.into()
        }
        (ConnectionConfig::Aggregator { aggregator_id, .. }, "aggregatorId") => {
            *aggregator_id = value.into()
        }
        (ConnectionConfig::Aggregator { mini_connector_id, .. }, "miniConnectorId") => {
            *mini_connector_id = (!value.is_empty()).then(|| value.to_string())
        }
        (ConnectionConfig::CustomApi { endpoint, .. }, "endpoint") => *endpoint = value.into(),
        (ConnectionConfig::CustomApi { http_method, .. }, "httpMethod") => {
            match HttpMethod::parse(value) {
                Some(m) => *http_method = m,
                None => return false,
            }
        }
        _ => return false,
    }
    true
}
