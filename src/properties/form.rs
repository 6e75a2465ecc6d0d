//! Form descriptors rendered by the properties panel.

use serde::Serialize;

use crate::api::types::MiniConnectorAgent;
use crate::model::{
    ApiAuth, ConnectionConfig, ConnectionMethod, FieldMapping, Header, Node, NodeConfig, NodeType,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelView {
    /// Nothing selected.
    Empty,
    Data(DataForm),
    Transform(TransformForm),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataForm {
    pub node_id: String,
    pub node_type: NodeType,
    pub label: String,
    pub description: String,
    pub method: ConnectionMethod,
    pub methods: Vec<ConnectionMethod>,
    pub fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<ApiAuth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformForm {
    pub node_id: String,
    pub label: String,
    pub description: String,
    pub logic: String,
    pub flags: Vec<String>,
    pub field_mappings: Vec<FieldMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Name accepted by `PropertiesPanel::set_field`.
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Number,
    Secret,
    Select { options: Vec<SelectOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

fn field(name: &'static str, label: &'static str, value: impl Into<String>, kind: FieldKind) -> FormField {
    FormField {
        name,
        label,
        value: value.into(),
        kind,
        required: true,
    }
}

fn optional(mut f: FormField) -> FormField {
    f.required = false;
    f
}

pub(crate) fn view_for(node: &Node, agents: &[MiniConnectorAgent]) -> PanelView {
    match &node.config {
        NodeConfig::Transform(t) => PanelView::Transform(TransformForm {
            node_id: node.id.clone(),
            label: node.label.clone(),
            description: node.description.clone(),
            logic: t.logic.clone(),
            flags: t.flags.clone(),
            field_mappings: t.field_mappings.clone(),
        }),
        NodeConfig::Connection(c) => {
            let (headers, auth) = match c {
                ConnectionConfig::CustomApi { headers, auth, .. } => {
                    (headers.clone(), Some(auth.clone()))
                }
                _ => (Vec::new(), None),
            };
            PanelView::Data(DataForm {
                node_id: node.id.clone(),
                node_type: node.node_type,
                label: node.label.clone(),
                description: node.description.clone(),
                method: c.method(),
                methods: ConnectionMethod::ALL.to_vec(),
                fields: connection_fields(c, agents),
                headers,
                auth,
            })
        }
    }
}

fn connection_fields(config: &ConnectionConfig, agents: &[MiniConnectorAgent]) -> Vec<FormField> {
    match config {
        ConnectionConfig::Credentials {
            host,
            port,
            database,
            username,
            password,
        } => vec![
            field("host", "Host", host.as_str(), FieldKind::Text),
            field(
                "port",
                "Port",
                port.map(|p| p.to_string()).unwrap_or_default(),
                FieldKind::Number,
            ),
            field("database", "Database", database.as_str(), FieldKind::Text),
            field("username", "Username", username.as_str(), FieldKind::Text),
            field("password", "Password", password.as_str(), FieldKind::Secret),
        ],
        ConnectionConfig::ConnectionString { connection_string } => vec![field(
            "connectionString",
            "Connection string",
            connection_string.as_str(),
            FieldKind::Secret,
        )],
        ConnectionConfig::Aggregator {
            aggregator_id,
            mini_connector_id,
        } => {
            let options = agents
                .iter()
                .map(|a| SelectOption {
                    value: a.id.clone(),
                    label: if a.online {
                        a.name.clone()
                    } else {
                        format!("{} (offline)", a.name)
                    },
                })
                .collect();
            vec![
                field("aggregatorId", "Aggregator", aggregator_id.as_str(), FieldKind::Text),
                optional(field(
                    "miniConnectorId",
                    "On-premise agent",
                    mini_connector_id.clone().unwrap_or_default(),
                    FieldKind::Select { options },
                )),
            ]
        }
        ConnectionConfig::CustomApi {
            endpoint,
            http_method,
            ..
        } => {
            let options = ["GET", "POST", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(|m| SelectOption {
                    value: m.into(),
                    label: m.into(),
                })
                .collect();
            let method = serde_json::to_value(http_method)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            vec![
                field("endpoint", "Endpoint", endpoint.as_str(), FieldKind::Text),
                field("httpMethod", "HTTP method", method, FieldKind::Select { options }),
            ]
        }
    }
}
