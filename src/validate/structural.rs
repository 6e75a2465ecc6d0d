//! Structural graph rules (G001–G006).

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use super::GraphIssue;
use crate::model::GraphSnapshot;

/// Run all structural rules. Returns all issues found.
pub fn check_structural(graph: &GraphSnapshot) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    g001_connections_reference_existing_nodes(graph, &mut issues);
    g002_no_duplicate_connections(graph, &mut issues);
    g003_no_self_loops(graph, &mut issues);
    g004_no_cycles(graph, &mut issues);
    g005_connector_sides(graph, &mut issues);
    g006_no_isolated_nodes(graph, &mut issues);

    issues
}

fn g001_connections_reference_existing_nodes(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for c in &graph.connections {
        if !ids.contains(c.from.as_str()) {
            issues.push(GraphIssue::new(
                "G001",
                format!("Connection to '{}' comes from unknown node '{}'", c.to, c.from),
                None,
            ));
        }
        if !ids.contains(c.to.as_str()) {
            issues.push(GraphIssue::new(
                "G001",
                format!("Connection from '{}' goes to unknown node '{}'", c.from, c.to),
                None,
            ));
        }
    }
}

fn g002_no_duplicate_connections(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    let mut seen = HashSet::new();
    for c in &graph.connections {
        if !seen.insert((c.from.as_str(), c.to.as_str())) {
            issues.push(GraphIssue::new(
                "G002",
                format!("Duplicate connection from '{}' to '{}'", c.from, c.to),
                None,
            ));
        }
    }
}

fn g003_no_self_loops(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    for c in graph.connections.iter().filter(|c| c.is_self_loop()) {
        issues.push(GraphIssue::new(
            "G003",
            format!("Node '{}' is connected to itself", c.from),
            Some(c.from.clone()),
        ));
    }
}

fn g004_no_cycles(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    // Self-loops are already reported by G003.
    let mut g: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        indices.insert(node.id.as_str(), g.add_node(node.id.as_str()));
    }
    for c in graph.connections.iter().filter(|c| !c.is_self_loop()) {
        if let (Some(&s), Some(&t)) = (indices.get(c.from.as_str()), indices.get(c.to.as_str())) {
            g.add_edge(s, t, ());
        }
    }
    if is_cyclic_directed(&g) {
        issues.push(GraphIssue::new("G004", "Workflow graph contains a cycle", None));
    }
}

fn g005_connector_sides(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    for c in &graph.connections {
        if let Some(from) = graph.node(&c.from)
            && !from.node_type.has_output()
        {
            issues.push(GraphIssue::new(
                "G005",
                format!("{} node '{}' has no output connector", from.node_type, from.id),
                Some(from.id.clone()),
            ));
        }
        if let Some(to) = graph.node(&c.to)
            && !to.node_type.has_input()
        {
            issues.push(GraphIssue::new(
                "G005",
                format!("{} node '{}' has no input connector", to.node_type, to.id),
                Some(to.id.clone()),
            ));
        }
    }
}

fn g006_no_isolated_nodes(graph: &GraphSnapshot, issues: &mut Vec<GraphIssue>) {
    if graph.nodes.len() < 2 {
        return;
    }
    let connected: HashSet<&str> = graph
        .connections
        .iter()
        .flat_map(|c| [c.from.as_str(), c.to.as_str()])
        .collect();
    for node in &graph.nodes {
        if !connected.contains(node.id.as_str()) {
            issues.push(GraphIssue::new(
                "G006",
                format!("Node '{}' is not connected to anything", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Node, NodeType};

    fn node(id: &str, node_type: NodeType) -> Node {
        Node::new(id, node_type, id)
    }

    fn codes(graph: &GraphSnapshot) -> Vec<&'static str> {
        check_structural(graph).into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn linear_pipeline_is_clean() {
        let graph = GraphSnapshot::new(
            vec![
                node("a", NodeType::Source),
                node("b", NodeType::Transform),
                node("c", NodeType::Destination),
            ],
            vec![Connection::new("a", "b"), Connection::new("b", "c")],
        );
        assert!(check_structural(&graph).is_empty());
    }

    #[test]
    fn longer_cycle_is_reported() {
        let graph = GraphSnapshot::new(
            vec![node("a", NodeType::Transform), node("b", NodeType::Transform)],
            vec![Connection::new("a", "b"), Connection::new("b", "a")],
        );
        assert_eq!(codes(&graph), vec!["G004"]);
    }

    #[test]
    fn self_loop_is_not_double_reported_as_cycle() {
        let graph = GraphSnapshot::new(
            vec![node("a", NodeType::Transform)],
            vec![Connection::new("a", "a")],
        );
        assert_eq!(codes(&graph), vec!["G003"]);
    }

    #[test]
    fn dangling_and_wrong_side_connections() {
        let graph = GraphSnapshot::new(
            vec![node("a", NodeType::Destination), node("b", NodeType::Source)],
            vec![Connection::new("a", "b"), Connection::new("", "a")],
        );
        let codes = codes(&graph);
        assert!(codes.contains(&"G001"));
        assert_eq!(codes.iter().filter(|c| **c == "G005").count(), 2);
    }

    #[test]
    fn isolated_node_is_reported() {
        let graph = GraphSnapshot::new(
            vec![
                node("a", NodeType::Source),
                node("b", NodeType::Destination),
                node("c", NodeType::Transform),
            ],
            vec![Connection::new("a", "b")],
        );
        let issues = check_structural(&graph);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].node_id.as_deref(), Some("c"));
    }
}
