//! The graph state store: single source of truth for the workflow being edited.
//!
//! Structural mutations (add/remove/replace of nodes or connections) record the
//! pre-mutation snapshot in [`History`]. Field edits through
//! [`GraphStore::update_node`] and selection changes are not recorded. Unknown
//! ids are ignored everywhere.

use tracing::{debug, trace, warn};

use super::history::History;
use super::listeners::{Listener, Listeners, StoreEvent, SubscriptionId};
use crate::config::EditorConfig;
use crate::model::{
    Connection, GraphSnapshot, Node, NodeConfig, Position, WorkflowMeta, WorkflowStatus,
};

pub const TRACING_TARGET: &str = "workflow_canvas::store";

/// Optional field overrides applied by [`GraphStore::update_node`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub position: Option<Position>,
    pub config: Option<NodeConfig>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        NodePatch {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        NodePatch {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn config(config: NodeConfig) -> Self {
        NodePatch {
            config: Some(config),
            ..Default::default()
        }
    }
}

/// An open drag gesture. The pre-gesture snapshot is only committed to
/// history once something actually moves.
#[derive(Debug)]
struct Gesture {
    before: Option<GraphSnapshot>,
}

#[derive(Debug)]
pub struct GraphStore {
    meta: WorkflowMeta,
    graph: GraphSnapshot,
    selected: Option<String>,
    history: History,
    gesture: Option<Gesture>,
    listeners: Listeners,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl GraphStore {
    pub fn new(config: &EditorConfig) -> Self {
        GraphStore {
            meta: WorkflowMeta::default(),
            graph: GraphSnapshot::default(),
            selected: None,
            history: History::new(config.history_limit),
            gesture: None,
            listeners: Listeners::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.graph.connections
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn graph(&self) -> &GraphSnapshot {
        &self.graph
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.clone()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_deref().and_then(|id| self.graph.node(id))
    }

    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(StoreEvent) + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener) as Listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Structural mutations (history tracked)
    // -------------------------------------------------------------------------

    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.capture();
        debug!(target: TRACING_TARGET, count = nodes.len(), "Replacing nodes");
        self.graph.nodes = nodes;
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    pub fn set_connections(&mut self, connections: Vec<Connection>) {
        self.capture();
        debug!(target: TRACING_TARGET, count = connections.len(), "Replacing connections");
        self.graph.connections = connections;
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    pub fn add_node(&mut self, node: Node) {
        self.capture();
        debug!(
            target: TRACING_TARGET,
            node_id = %node.id,
            node_type = %node.node_type,
            "Adding node"
        );
        self.graph.nodes.push(node);
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, id: &str) {
        if self.graph.node(id).is_none() {
            return;
        }
        self.capture();
        self.graph.nodes.retain(|n| n.id != id);
        let before = self.graph.connections.len();
        self.graph.connections.retain(|c| !c.touches(id));
        debug!(
            target: TRACING_TARGET,
            node_id = id,
            dropped_connections = before - self.graph.connections.len(),
            "Removed node"
        );
        self.listeners.notify(StoreEvent::GraphChanged);

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.listeners.notify(StoreEvent::SelectionChanged);
        }
    }

    /// Add an edge unless an identical `(from, to)` edge already exists.
    /// Returns whether an edge was added.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if self.graph.has_connection(&connection.from, &connection.to) {
            trace!(
                target: TRACING_TARGET,
                from = %connection.from,
                to = %connection.to,
                "Connection already exists"
            );
            return false;
        }
        self.capture();
        debug!(
            target: TRACING_TARGET,
            from = %connection.from,
            to = %connection.to,
            "Adding connection"
        );
        self.graph.connections.push(connection);
        self.listeners.notify(StoreEvent::GraphChanged);
        true
    }

    pub fn remove_connection(&mut self, from: &str, to: &str) {
        if !self.graph.has_connection(from, to) {
            return;
        }
        self.capture();
        self.graph
            .connections
            .retain(|c| !(c.from == from && c.to == to));
        debug!(target: TRACING_TARGET, from, to, "Removed connection");
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    // -------------------------------------------------------------------------
    // Field edits (not history tracked)
    // -------------------------------------------------------------------------

    /// Shallow-merge `patch` into the node. A config that does not fit the
    /// node's type is ignored.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) {
        let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == id) else {
            return;
        };
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(description) = patch.description {
            node.description = description;
        }
        if let Some(icon) = patch.icon {
            node.icon = icon;
        }
        if let Some(position) = patch.position {
            node.position = position;
        }
        if let Some(config) = patch.config {
            if config.fits(node.node_type) {
                node.config = config;
            } else {
                warn!(
                    target: TRACING_TARGET,
                    node_id = id,
                    node_type = %node.node_type,
                    "Ignoring config that does not fit node type"
                );
            }
        }
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    pub fn select_node(&mut self, id: Option<&str>) {
        let next = id.map(str::to_string);
        if self.selected != next {
            self.selected = next;
            self.listeners.notify(StoreEvent::SelectionChanged);
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
        self.listeners.notify(StoreEvent::MetaChanged);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.meta.description = description.into();
        self.listeners.notify(StoreEvent::MetaChanged);
    }

    pub fn set_status(&mut self, status: WorkflowStatus) {
        self.meta.status = status;
        self.listeners.notify(StoreEvent::MetaChanged);
    }

    /// Record the server-assigned id after the first successful save.
    pub fn mark_persisted(&mut self, id: impl Into<String>) {
        self.meta.id = Some(id.into());
        self.listeners.notify(StoreEvent::MetaChanged);
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Start a drag gesture: every [`move_node`](Self::move_node) until
    /// [`end_gesture`](Self::end_gesture) shares one history entry.
    pub fn begin_gesture(&mut self) {
        if self.gesture.is_none() {
            trace!(target: TRACING_TARGET, "Gesture started");
            self.gesture = Some(Gesture {
                before: Some(self.graph.clone()),
            });
        }
    }

    pub fn end_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            trace!(
                target: TRACING_TARGET,
                moved = gesture.before.is_none(),
                "Gesture ended"
            );
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Move a node. Inside a gesture only the first move records history;
    /// outside one every move is its own entry.
    pub fn move_node(&mut self, id: &str, position: Position) {
        if self.graph.node(id).is_none() {
            return;
        }
        match self.gesture.as_mut() {
            Some(gesture) => {
                if let Some(before) = gesture.before.take() {
                    self.history.record(before);
                }
            }
            None => self.capture(),
        }
        if let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == id) {
            node.position = position.clamped();
        }
        self.listeners.notify(StoreEvent::GraphChanged);
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Step back one history entry. An open gesture is closed; the drag that
    /// started it cannot continue past a history move.
    pub fn undo(&mut self) {
        self.gesture = None;
        let current = self.graph.clone();
        if let Some(previous) = self.history.undo(current) {
            trace!(target: TRACING_TARGET, depth = self.history.undo_depth(), "Undo");
            self.graph = previous;
            self.listeners.notify(StoreEvent::HistoryChanged);
        }
    }

    pub fn redo(&mut self) {
        self.gesture = None;
        let current = self.graph.clone();
        if let Some(next) = self.history.redo(current) {
            trace!(target: TRACING_TARGET, depth = self.history.redo_depth(), "Redo");
            self.graph = next;
            self.listeners.notify(StoreEvent::HistoryChanged);
        }
    }

    // -------------------------------------------------------------------------
    // Whole-state replacement (not undoable)
    // -------------------------------------------------------------------------

    /// Back to an empty, unsaved draft.
    pub fn reset_workflow(&mut self) {
        debug!(target: TRACING_TARGET, "Resetting workflow");
        self.meta = WorkflowMeta::default();
        self.graph = GraphSnapshot::default();
        self.selected = None;
        self.gesture = None;
        self.history.clear();
        self.listeners.notify(StoreEvent::Reset);
    }

    /// Replace everything with a fetched workflow. History starts empty.
    pub fn load_workflow(&mut self, meta: WorkflowMeta, graph: GraphSnapshot) {
        debug!(
            target: TRACING_TARGET,
            workflow_id = ?meta.id,
            nodes = graph.nodes.len(),
            connections = graph.connections.len(),
            "Loading workflow"
        );
        self.meta = meta;
        self.graph = graph;
        self.selected = None;
        self.gesture = None;
        self.history.clear();
        self.listeners.notify(StoreEvent::Loaded);
    }

    fn capture(&mut self) {
        // Later moves in the same drag fold into this entry.
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.before = None;
        }
        self.history.record(self.graph.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::NodeType;

    fn store_with_pair() -> GraphStore {
        let mut store = GraphStore::default();
        store.add_node(Node::new("a", NodeType::Source, "A"));
        store.add_node(Node::new("b", NodeType::Destination, "B"));
        store.add_connection(Connection::new("a", "b"));
        store
    }

    #[test]
    fn update_node_is_not_undoable() {
        let mut store = store_with_pair();
        let depth = store.history().undo_depth();
        store.update_node("a", NodePatch::label("Renamed"));
        assert_eq!(store.history().undo_depth(), depth);
        assert_eq!(store.node("a").unwrap().label, "Renamed");
    }

    #[test]
    fn update_unknown_node_is_noop() {
        let mut store = store_with_pair();
        let before = store.snapshot();
        store.update_node("missing", NodePatch::label("x"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn mismatched_config_is_ignored() {
        let mut store = store_with_pair();
        let before = store.node("a").unwrap().config.clone();
        store.update_node("a", NodePatch::config(NodeConfig::default_for(NodeType::Transform)));
        assert_eq!(store.node("a").unwrap().config, before);
    }

    #[test]
    fn removing_selected_node_clears_selection() {
        let mut store = store_with_pair();
        store.select_node(Some("a"));
        store.remove_node("a");
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn undo_keeps_selection_and_meta() {
        let mut store = store_with_pair();
        store.set_name("Orders sync");
        store.select_node(Some("b"));
        store.undo();
        assert_eq!(store.selected(), Some("b"));
        assert_eq!(store.meta().name, "Orders sync");
        assert!(store.connections().is_empty());
    }

    #[test]
    fn gesture_records_single_entry() {
        let mut store = store_with_pair();
        let depth = store.history().undo_depth();
        store.begin_gesture();
        for step in 1..=10 {
            store.move_node("a", Position::new(step as f64, step as f64));
        }
        store.end_gesture();
        assert_eq!(store.history().undo_depth(), depth + 1);

        store.undo();
        assert_eq!(store.node("a").unwrap().position, Position::default());
    }

    #[test]
    fn gesture_without_movement_records_nothing() {
        let mut store = store_with_pair();
        store.undo();
        assert!(store.can_redo());
        store.begin_gesture();
        store.end_gesture();
        assert!(store.can_redo());
    }

    #[test]
    fn undo_closes_open_gesture() {
        let mut store = store_with_pair();
        store.begin_gesture();
        store.move_node("a", Position::new(5.0, 5.0));
        store.undo();
        assert!(!store.in_gesture());

        store.begin_gesture();
        store.redo();
        assert!(!store.in_gesture());
    }

    #[test]
    fn duplicate_connection_records_no_history() {
        let mut store = store_with_pair();
        let depth = store.history().undo_depth();
        assert!(!store.add_connection(Connection::new("a", "b")));
        assert_eq!(store.history().undo_depth(), depth);
    }

    #[test]
    fn listeners_see_events_until_unsubscribed() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = GraphStore::default();
        let sink = Rc::clone(&events);
        let id = store.subscribe(move |e| sink.borrow_mut().push(e));

        store.add_node(Node::new("a", NodeType::Source, "A"));
        store.select_node(Some("a"));
        store.undo();
        assert!(store.unsubscribe(id));
        store.reset_workflow();

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::GraphChanged,
                StoreEvent::SelectionChanged,
                StoreEvent::HistoryChanged,
            ]
        );
    }

    #[test]
    fn load_workflow_is_not_undoable() {
        let mut store = store_with_pair();
        let meta = WorkflowMeta {
            id: Some("wf-1".into()),
            ..Default::default()
        };
        store.load_workflow(meta, GraphSnapshot::default());
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.meta().id.as_deref(), Some("wf-1"));
    }
}
