//! WASM entry points for browser use.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::canvas::{CanvasSurface, KeyChord};
use crate::config::EditorConfig;
use crate::dto;
use crate::model::{ConnectionMethod, GraphSnapshot, Position, WorkflowMeta};
use crate::palette::{Palette, PaletteCategory};
use crate::properties::PropertiesPanel;
use crate::store::GraphStore;
use crate::validate;

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// Editor state owned by the page: store, canvas, palette and properties.
#[wasm_bindgen]
pub struct WasmEditor {
    config: EditorConfig,
    store: GraphStore,
    canvas: CanvasSurface,
    palette: Palette,
    properties: PropertiesPanel,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor from an optional `EditorConfig` JSON string.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmEditor, JsError> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json)?,
            None => EditorConfig::default(),
        };
        Ok(WasmEditor {
            store: GraphStore::new(&config),
            canvas: CanvasSurface::new(&config),
            palette: Palette::new(),
            properties: PropertiesPanel::new(),
            config,
        })
    }

    // ---------------------------------------------------------------------
    // State
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> JsValue {
        to_js(self.store.graph())
    }

    pub fn meta(&self) -> JsValue {
        to_js(self.store.meta())
    }

    pub fn selected(&self) -> Option<String> {
        self.store.selected().map(str::to_string)
    }

    pub fn connecting_from(&self) -> Option<String> {
        self.canvas.connecting_from().map(str::to_string)
    }

    pub fn edge_paths(&self) -> JsValue {
        to_js(&self.canvas.edge_paths(&self.store))
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn undo(&mut self) {
        self.store.undo();
    }

    pub fn redo(&mut self) {
        self.store.redo();
    }

    pub fn reset(&mut self) {
        self.store.reset_workflow();
    }

    pub fn set_name(&mut self, name: &str) {
        self.store.set_name(name);
    }

    pub fn remove_node(&mut self, id: &str) {
        self.store.remove_node(id);
    }

    pub fn remove_connection(&mut self, from: &str, to: &str) {
        self.store.remove_connection(from, to);
    }

    // ---------------------------------------------------------------------
    // Canvas events
    // ---------------------------------------------------------------------

    /// Drop a palette payload at canvas coordinates. Returns the new node id.
    pub fn drop_template(&mut self, payload: &str, x: f64, y: f64) -> Result<String, JsError> {
        Ok(self
            .canvas
            .drop_template(&mut self.store, payload, Position::new(x, y))?)
    }

    pub fn pointer_down(&mut self, node_id: &str, x: f64, y: f64) {
        self.canvas
            .pointer_down_on_node(&mut self.store, node_id, Position::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.canvas.pointer_move(&mut self.store, Position::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.canvas.pointer_up(&mut self.store);
    }

    pub fn click_node(&mut self, node_id: &str) {
        self.canvas.click_node(&mut self.store, node_id);
    }

    pub fn click_output_handle(&mut self, node_id: &str) {
        self.canvas.click_output_handle(&self.store, node_id);
    }

    pub fn click_input_handle(&mut self, node_id: &str) -> bool {
        self.canvas.click_input_handle(&mut self.store, node_id)
    }

    pub fn click_background(&mut self) {
        self.canvas.click_background(&mut self.store);
    }

    pub fn delete_selected(&mut self) {
        self.canvas.delete_selected(&mut self.store);
    }

    /// Handle a `{key, ctrl, meta, shift}` chord. Returns whether it was consumed.
    pub fn key_down(&mut self, chord: JsValue) -> Result<bool, JsError> {
        let chord: KeyChord = serde_wasm_bindgen::from_value(chord)
            .map_err(|e| JsError::new(&format!("Invalid key chord: {}", e)))?;
        Ok(self.canvas.key_down(&mut self.store, &chord))
    }

    // ---------------------------------------------------------------------
    // Palette
    // ---------------------------------------------------------------------

    pub fn palette_groups(&self) -> JsValue {
        to_js(&self.palette.groups())
    }

    pub fn set_palette_search(&mut self, query: &str) {
        self.palette.set_search(query);
    }

    pub fn toggle_palette_category(&mut self, category: &str) -> Result<(), JsError> {
        let category: PaletteCategory = serde_json::from_value(category.into())?;
        self.palette.toggle_category(category);
        Ok(())
    }

    /// Feed the marketplace category from an `AggregatorSummary[]` JSON string.
    pub fn set_marketplace(&mut self, aggregators_json: &str) -> Result<(), JsError> {
        let aggregators: Vec<crate::api::AggregatorSummary> =
            serde_json::from_str(aggregators_json)?;
        self.palette.set_marketplace(&aggregators);
        Ok(())
    }

    /// Feed the workflows category from a `WorkflowSummary[]` JSON string.
    pub fn set_workflows(&mut self, workflows_json: &str) -> Result<(), JsError> {
        let workflows: Vec<crate::api::WorkflowSummary> = serde_json::from_str(workflows_json)?;
        self.palette
            .set_workflows(&workflows, self.store.meta().id.as_deref());
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    pub fn properties(&self) -> JsValue {
        to_js(&self.properties.view(&self.store))
    }

    pub fn set_label(&mut self, label: &str) {
        self.properties.set_label(&mut self.store, label);
    }

    pub fn set_description(&mut self, description: &str) {
        self.properties.set_description(&mut self.store, description);
    }

    pub fn switch_method(&mut self, method: &str) -> Result<(), JsError> {
        let method = ConnectionMethod::parse(method)
            .ok_or_else(|| JsError::new(&format!("Unknown connection method '{}'", method)))?;
        self.properties.switch_method(&mut self.store, method);
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.properties.set_field(&mut self.store, name, value);
    }

    pub fn set_mini_connectors(&mut self, agents_json: &str) -> Result<(), JsError> {
        let agents = serde_json::from_str(agents_json)?;
        self.properties.set_mini_connectors(agents);
        Ok(())
    }

    pub fn set_transform_logic(&mut self, logic: &str) {
        self.properties.set_transform_logic(&mut self.store, logic);
    }

    pub fn toggle_flag(&mut self, flag: &str) {
        self.properties.toggle_flag(&mut self.store, flag);
    }

    pub fn add_mapping(&mut self, source_field: &str, target_field: &str) {
        self.properties
            .add_mapping(&mut self.store, source_field, target_field);
    }

    pub fn remove_mapping(&mut self, index: usize) {
        self.properties.remove_mapping(&mut self.store, index);
    }

    // ---------------------------------------------------------------------
    // Definition DTO
    // ---------------------------------------------------------------------

    pub fn export_definition(&self) -> JsValue {
        to_js(&dto::to_definition(self.store.graph()))
    }

    /// Replace the editor state with a fetched definition. `meta_json` is a
    /// `WorkflowMeta` JSON string; a fresh draft is assumed when absent.
    pub fn import_definition(
        &mut self,
        definition_json: &str,
        meta_json: Option<String>,
    ) -> Result<(), JsError> {
        let definition = dto::parse_definition(definition_json)?;
        let graph = dto::from_definition(&definition, &self.config)?;
        let meta = match meta_json {
            Some(json) => serde_json::from_str::<WorkflowMeta>(&json)?,
            None => WorkflowMeta::default(),
        };
        self.store.load_workflow(meta, graph);
        Ok(())
    }

    pub fn check_graph(&self) -> JsValue {
        to_js(&validate::check_graph(self.store.graph()))
    }
}

/// Translate a `GraphSnapshot` JSON string into a workflow definition.
#[wasm_bindgen]
pub fn to_definition_json(graph_json: &str) -> Result<JsValue, JsError> {
    let graph: GraphSnapshot = serde_json::from_str(graph_json)?;
    Ok(to_js(&dto::to_definition(&graph)))
}

/// Translate a workflow definition JSON string into a `GraphSnapshot`.
#[wasm_bindgen]
pub fn from_definition_json(definition_json: &str) -> Result<JsValue, JsError> {
    let definition = dto::parse_definition(definition_json)?;
    let graph = dto::from_definition(&definition, &EditorConfig::default())?;
    Ok(to_js(&graph))
}

/// Run the structural checks on a `GraphSnapshot` JSON string.
#[wasm_bindgen]
pub fn check_graph_json(graph_json: &str) -> Result<JsValue, JsError> {
    let graph: GraphSnapshot = serde_json::from_str(graph_json)?;
    Ok(to_js(&validate::check_graph(&graph)))
}
