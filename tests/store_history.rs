#[allow(dead_code)]
mod helpers;

use helpers::*;
use workflow_canvas::config::EditorConfig;
use workflow_canvas::model::*;
use workflow_canvas::store::{GraphStore, NodePatch};

// =============================================================================
// Undo / redo
// =============================================================================

#[test]
fn undo_cancels_each_structural_call() {
    let mut store = pair_store();
    let before = store.snapshot();

    store.add_node(transform("t"));
    store.undo();
    assert_eq!(store.snapshot(), before);

    store.add_connection(edge("b", "a"));
    store.undo();
    assert_eq!(store.snapshot(), before);

    store.remove_connection("a", "b");
    store.undo();
    assert_eq!(store.snapshot(), before);

    store.remove_node("a");
    store.undo();
    assert_eq!(store.snapshot(), before);

    store.set_nodes(vec![]);
    store.undo();
    assert_eq!(store.snapshot(), before);

    store.set_connections(vec![]);
    store.undo();
    assert_eq!(store.snapshot(), before);
}

#[test]
fn undo_on_empty_history_is_a_noop() {
    let mut store = GraphStore::default();
    store.undo();
    assert!(store.snapshot().is_empty());
    assert!(!store.can_undo());
    assert!(!store.can_redo());
}

#[test]
fn undo_after_first_add_restores_empty_graph() {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.undo();
    assert!(store.nodes().is_empty());
    assert!(store.can_redo());

    store.redo();
    assert_eq!(store.nodes().len(), 1);
    assert_eq!(store.nodes()[0].id, "a");
}

#[test]
fn mutation_after_undo_clears_redo() {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.add_node(source("b"));
    store.undo();
    assert!(store.can_redo());

    store.add_node(destination("c"));
    assert!(!store.can_redo());

    let current = store.snapshot();
    store.redo();
    assert_eq!(store.snapshot(), current);
}

#[test]
fn field_edits_do_not_enter_history() {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.update_node("a", NodePatch::label("Orders DB"));
    store.update_node("a", NodePatch::description("nightly"));

    store.undo();
    assert!(store.nodes().is_empty());
    assert!(!store.can_undo());
}

#[test]
fn undo_restores_edits_made_before_the_snapshot() {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.update_node("a", NodePatch::label("Orders DB"));
    store.add_node(destination("b"));

    store.undo();
    assert_eq!(store.node("a").map(|n| n.label.as_str()), Some("Orders DB"));
    assert!(store.node("b").is_none());
}

#[test]
fn history_limit_drops_oldest_entries() {
    let config = EditorConfig::default().with_history_limit(Some(2));
    let mut store = GraphStore::new(&config);
    store.add_node(source("a"));
    store.add_node(source("b"));
    store.add_node(source("c"));

    store.undo();
    store.undo();
    store.undo();
    let ids: Vec<_> = store.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

// =============================================================================
// Cascades and idempotence
// =============================================================================

#[test]
fn remove_node_cascades_connections_and_selection() {
    let mut store = GraphStore::default();
    store.add_node(source("a"));
    store.add_node(transform("t"));
    store.add_node(destination("b"));
    store.add_connection(edge("a", "t"));
    store.add_connection(edge("t", "b"));
    store.select_node(Some("t"));

    store.remove_node("t");

    assert!(store.connections().iter().all(|c| !c.touches("t")));
    assert!(store.connections().is_empty());
    assert_eq!(store.selected(), None);
}

#[test]
fn removing_source_of_pair_leaves_lone_destination() {
    let mut store = pair_store();
    store.remove_node("a");

    assert!(store.connections().is_empty());
    let ids: Vec<_> = store.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}

#[test]
fn duplicate_connection_is_ignored_without_history() {
    let mut store = pair_store();
    let depth = store.history().undo_depth();

    assert!(!store.add_connection(edge("a", "b")));
    assert_eq!(store.connections().len(), 1);
    assert_eq!(store.history().undo_depth(), depth);
}

#[test]
fn removing_unknown_things_records_nothing() {
    let mut store = pair_store();
    let depth = store.history().undo_depth();

    store.remove_node("ghost");
    store.remove_connection("b", "a");

    assert_eq!(store.history().undo_depth(), depth);
}

// =============================================================================
// Workflow replacement
// =============================================================================

#[test]
fn load_and_reset_clear_history() {
    let mut store = pair_store();
    let meta = WorkflowMeta {
        id: Some("wf-1".into()),
        name: "Nightly sync".into(),
        ..WorkflowMeta::default()
    };

    store.load_workflow(meta, pipeline_graph());
    assert!(!store.can_undo());
    assert_eq!(store.nodes().len(), 3);
    assert!(store.meta().is_persisted());

    store.add_node(source("extra"));
    store.reset_workflow();
    assert!(!store.can_undo());
    assert!(store.snapshot().is_empty());
    assert_eq!(store.meta(), &WorkflowMeta::default());
}
