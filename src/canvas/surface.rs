//! Pointer and keyboard interaction on the canvas, translated into store
//! mutations.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::geometry::{self, EdgePath, NodeSize};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::model::{Connection, Position, mint_node_id};
use crate::palette::NodeTemplate;
use crate::store::GraphStore;

pub const TRACING_TARGET: &str = "workflow_canvas::canvas";

/// An active drag of an existing node.
#[derive(Debug, Clone, PartialEq)]
struct DragState {
    node_id: String,
    /// Pointer position relative to the node's top-left corner.
    offset: Position,
}

/// A key press with its modifiers, as delivered by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        KeyChord {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone)]
pub struct CanvasSurface {
    size: NodeSize,
    drop_offset: Position,
    drag: Option<DragState>,
    connecting_from: Option<String>,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl CanvasSurface {
    pub fn new(config: &EditorConfig) -> Self {
        CanvasSurface {
            size: NodeSize {
                width: config.node_width,
                height: config.node_height,
            },
            drop_offset: config.drop_offset(),
            drag: None,
            connecting_from: None,
        }
    }

    pub fn node_size(&self) -> NodeSize {
        self.size
    }

    /// Node currently armed as the source of a new connection.
    pub fn connecting_from(&self) -> Option<&str> {
        self.connecting_from.as_deref()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.node_id.as_str())
    }

    // -------------------------------------------------------------------------
    // Drag to move
    // -------------------------------------------------------------------------

    /// Pointer pressed on a node body (not on a connector handle).
    pub fn pointer_down_on_node(&mut self, store: &mut GraphStore, node_id: &str, pointer: Position) {
        let Some(node) = store.node(node_id) else {
            return;
        };
        let offset = Position::new(pointer.x - node.position.x, pointer.y - node.position.y);
        trace!(target: TRACING_TARGET, node_id, "Drag started");
        self.drag = Some(DragState {
            node_id: node_id.to_string(),
            offset,
        });
        store.begin_gesture();
    }

    /// Move the dragged node. The drag is dropped once the store's gesture
    /// has been closed underneath it (undo, redo, reset or load).
    pub fn pointer_move(&mut self, store: &mut GraphStore, pointer: Position) {
        let Some(drag) = &self.drag else {
            return;
        };
        if !store.in_gesture() {
            trace!(target: TRACING_TARGET, node_id = %drag.node_id, "Drag cancelled");
            self.drag = None;
            return;
        }
        let target = Position::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
        store.move_node(&drag.node_id, target.clamped());
    }

    pub fn pointer_up(&mut self, store: &mut GraphStore) {
        if let Some(drag) = self.drag.take() {
            trace!(target: TRACING_TARGET, node_id = %drag.node_id, "Drag ended");
            store.end_gesture();
        }
    }

    // -------------------------------------------------------------------------
    // Drop from palette
    // -------------------------------------------------------------------------

    /// Create a node from a palette drag payload centered on `cursor`.
    /// Returns the new node's id.
    pub fn drop_template(
        &mut self,
        store: &mut GraphStore,
        payload: &str,
        cursor: Position,
    ) -> Result<String> {
        let template = NodeTemplate::from_drag_payload(payload)?;
        let position = Position::new(
            cursor.x - self.drop_offset.x,
            cursor.y - self.drop_offset.y,
        )
        .clamped();
        let id = mint_node_id(template.node_type);
        debug!(
            target: TRACING_TARGET,
            node_id = %id,
            label = %template.label,
            x = position.x,
            y = position.y,
            "Dropped template"
        );
        store.add_node(template.into_node(id.clone(), position));
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Click to connect
    // -------------------------------------------------------------------------

    /// Arm a connection from the node's output handle.
    pub fn click_output_handle(&mut self, store: &GraphStore, node_id: &str) {
        match store.node(node_id) {
            Some(node) if node.node_type.has_output() => {
                trace!(target: TRACING_TARGET, node_id, "Connection armed");
                self.connecting_from = Some(node_id.to_string());
            }
            _ => self.connecting_from = None,
        }
    }

    /// Complete an armed connection on the node's input handle. Returns
    /// whether a new connection was created. Always disarms.
    pub fn click_input_handle(&mut self, store: &mut GraphStore, node_id: &str) -> bool {
        let Some(from) = self.connecting_from.take() else {
            return false;
        };
        if from == node_id {
            return false;
        }
        let accepts_input = store
            .node(node_id)
            .is_some_and(|node| node.node_type.has_input());
        if !accepts_input || store.node(&from).is_none() {
            return false;
        }
        store.add_connection(Connection::new(from, node_id))
    }

    /// Background click: disarm and clear selection.
    pub fn click_background(&mut self, store: &mut GraphStore) {
        self.connecting_from = None;
        store.select_node(None);
    }

    // -------------------------------------------------------------------------
    // Selection and deletion
    // -------------------------------------------------------------------------

    pub fn click_node(&mut self, store: &mut GraphStore, node_id: &str) {
        self.connecting_from = None;
        if store.node(node_id).is_some() {
            store.select_node(Some(node_id));
        }
    }

    pub fn delete_selected(&mut self, store: &mut GraphStore) {
        if let Some(id) = store.selected().map(str::to_string) {
            if self.dragging() == Some(id.as_str()) {
                self.pointer_up(store);
            }
            store.remove_node(&id);
        }
    }

    /// Topmost node under `point`; later nodes render above earlier ones.
    pub fn hit_test<'a>(&self, store: &'a GraphStore, point: Position) -> Option<&'a str> {
        store
            .nodes()
            .iter()
            .rev()
            .find(|n| self.size.contains(n, point))
            .map(|n| n.id.as_str())
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Handle an editor shortcut. Returns whether the key was consumed.
    pub fn key_down(&mut self, store: &mut GraphStore, chord: &KeyChord) -> bool {
        let key = chord.key.to_ascii_lowercase();
        match key.as_str() {
            "z" if chord.command() && chord.shift => store.redo(),
            "z" if chord.command() => store.undo(),
            "y" if chord.command() => store.redo(),
            "delete" | "backspace" if store.selected().is_some() => self.delete_selected(store),
            "escape" => {
                self.connecting_from = None;
                store.select_node(None);
            }
            _ => return false,
        }
        true
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Edge curves for the current node positions. Recomputed on every call.
    pub fn edge_paths(&self, store: &GraphStore) -> Vec<EdgePath> {
        geometry::edge_paths(store.graph(), self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeType};

    fn setup() -> (CanvasSurface, GraphStore) {
        let mut store = GraphStore::default();
        store.add_node(Node::new("src", NodeType::Source, "Source").at(0.0, 0.0));
        store.add_node(Node::new("dst", NodeType::Destination, "Dest").at(300.0, 0.0));
        (CanvasSurface::default(), store)
    }

    #[test]
    fn drag_moves_node_with_pointer_offset() {
        let (mut canvas, mut store) = setup();
        canvas.pointer_down_on_node(&mut store, "dst", Position::new(310.0, 5.0));
        canvas.pointer_move(&mut store, Position::new(410.0, 105.0));
        canvas.pointer_up(&mut store);
        assert_eq!(store.node("dst").unwrap().position, Position::new(400.0, 100.0));
        assert!(canvas.dragging().is_none());
    }

    #[test]
    fn drag_clamps_to_origin() {
        let (mut canvas, mut store) = setup();
        canvas.pointer_down_on_node(&mut store, "src", Position::new(50.0, 50.0));
        canvas.pointer_move(&mut store, Position::new(10.0, -100.0));
        assert_eq!(store.node("src").unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn move_after_release_is_ignored() {
        let (mut canvas, mut store) = setup();
        canvas.pointer_down_on_node(&mut store, "src", Position::new(0.0, 0.0));
        canvas.pointer_up(&mut store);
        canvas.pointer_move(&mut store, Position::new(90.0, 90.0));
        assert_eq!(store.node("src").unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn connect_requires_output_then_input() {
        let (mut canvas, mut store) = setup();
        canvas.click_output_handle(&store, "dst");
        assert!(canvas.connecting_from().is_none());

        canvas.click_output_handle(&store, "src");
        assert_eq!(canvas.connecting_from(), Some("src"));
        assert!(canvas.click_input_handle(&mut store, "dst"));
        assert!(canvas.connecting_from().is_none());
        assert_eq!(store.connections(), &[Connection::new("src", "dst")]);
    }

    #[test]
    fn connecting_to_self_disarms_without_edge() {
        let mut store = GraphStore::default();
        store.add_node(Node::new("t", NodeType::Transform, "T"));
        let mut canvas = CanvasSurface::default();
        canvas.click_output_handle(&store, "t");
        assert!(!canvas.click_input_handle(&mut store, "t"));
        assert!(canvas.connecting_from().is_none());
        assert!(store.connections().is_empty());
    }

    #[test]
    fn background_click_disarms_and_deselects() {
        let (mut canvas, mut store) = setup();
        canvas.click_node(&mut store, "src");
        canvas.click_output_handle(&store, "src");
        canvas.click_background(&mut store);
        assert!(canvas.connecting_from().is_none());
        assert!(store.selected().is_none());
        assert!(!canvas.click_input_handle(&mut store, "dst"));
    }

    #[test]
    fn delete_selected_cascades_edges() {
        let (mut canvas, mut store) = setup();
        store.add_connection(Connection::new("src", "dst"));
        canvas.click_node(&mut store, "src");
        canvas.delete_selected(&mut store);
        assert!(store.node("src").is_none());
        assert!(store.connections().is_empty());
    }

    #[test]
    fn shortcuts_drive_history() {
        let (mut canvas, mut store) = setup();
        assert!(canvas.key_down(&mut store, &KeyChord::new("z").with_ctrl()));
        assert_eq!(store.nodes().len(), 1);
        assert!(canvas.key_down(&mut store, &KeyChord::new("Z").with_ctrl().with_shift()));
        assert_eq!(store.nodes().len(), 2);
        assert!(!canvas.key_down(&mut store, &KeyChord::new("q")));
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let (canvas, mut store) = setup();
        store.add_node(Node::new("top", NodeType::Transform, "Top").at(250.0, 0.0));
        assert_eq!(canvas.hit_test(&store, Position::new(320.0, 10.0)), Some("top"));
        assert_eq!(canvas.hit_test(&store, Position::new(100.0, 200.0)), None);
    }
}
