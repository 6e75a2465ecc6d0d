//! Connector anchors and edge curves, derived from node positions.

use serde::Serialize;

use crate::model::{GraphSnapshot, Node, Position};

/// Minimum horizontal control-point distance so short edges still curve.
const MIN_CONTROL_OFFSET: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    /// Output handle: right edge, vertically centered.
    pub fn output_anchor(&self, node: &Node) -> Position {
        Position::new(node.position.x + self.width, node.position.y + self.height / 2.0)
    }

    /// Input handle: left edge, vertically centered.
    pub fn input_anchor(&self, node: &Node) -> Position {
        Position::new(node.position.x, node.position.y + self.height / 2.0)
    }

    pub fn contains(&self, node: &Node, point: Position) -> bool {
        point.x >= node.position.x
            && point.x <= node.position.x + self.width
            && point.y >= node.position.y
            && point.y <= node.position.y + self.height
    }
}

/// A cubic Bézier between two connectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePath {
    pub from: String,
    pub to: String,
    pub start: Position,
    pub control1: Position,
    pub control2: Position,
    pub end: Position,
    /// SVG path data.
    pub d: String,
}

pub fn edge_path(from: &Node, to: &Node, size: NodeSize) -> EdgePath {
    let start = size.output_anchor(from);
    let end = size.input_anchor(to);
    let offset = ((end.x - start.x).abs() / 2.0).max(MIN_CONTROL_OFFSET);
    let control1 = Position::new(start.x + offset, start.y);
    let control2 = Position::new(end.x - offset, end.y);
    let d = format!(
        "M {} {} C {} {}, {} {}, {} {}",
        start.x, start.y, control1.x, control1.y, control2.x, control2.y, end.x, end.y
    );
    EdgePath {
        from: from.id.clone(),
        to: to.id.clone(),
        start,
        control1,
        control2,
        end,
        d,
    }
}

/// Curves for every connection whose endpoints both exist.
pub fn edge_paths(graph: &GraphSnapshot, size: NodeSize) -> Vec<EdgePath> {
    graph
        .connections
        .iter()
        .filter_map(|c| {
            let from = graph.node(&c.from)?;
            let to = graph.node(&c.to)?;
            Some(edge_path(from, to, size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, NodeType};

    const SIZE: NodeSize = NodeSize {
        width: 200.0,
        height: 80.0,
    };

    #[test]
    fn anchors_sit_on_node_sides() {
        let node = Node::new("a", NodeType::Transform, "A").at(10.0, 20.0);
        assert_eq!(SIZE.output_anchor(&node), Position::new(210.0, 60.0));
        assert_eq!(SIZE.input_anchor(&node), Position::new(10.0, 60.0));
    }

    #[test]
    fn path_follows_anchor_positions() {
        let a = Node::new("a", NodeType::Source, "A").at(0.0, 0.0);
        let b = Node::new("b", NodeType::Destination, "B").at(400.0, 0.0);
        let path = edge_path(&a, &b, SIZE);
        assert_eq!(path.start, Position::new(200.0, 40.0));
        assert_eq!(path.end, Position::new(400.0, 40.0));
        assert_eq!(path.control1, Position::new(300.0, 40.0));
        assert_eq!(path.d, "M 200 40 C 300 40, 300 40, 400 40");
    }

    #[test]
    fn dangling_connections_are_not_drawn() {
        let graph = GraphSnapshot::new(
            vec![Node::new("a", NodeType::Source, "A")],
            vec![Connection::new("a", "ghost")],
        );
        assert!(edge_paths(&graph, SIZE).is_empty());
    }
}
