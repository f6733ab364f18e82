//! Escape map components: MapNode and NodeConnections

use super::common::Vec2;
use serde::{Deserialize, Serialize};

/// A reachable place on the escape map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapNode {
    /// Index into the map layout
    pub id: u32,
    pub name: String,
    pub node_type: NodeType,
    pub position: Vec2,
    pub visited: bool,
    pub visible: bool,
}

impl MapNode {
    pub fn new(id: u32, name: impl Into<String>, node_type: NodeType, position: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
            position,
            visited: false,
            visible: false,
        }
    }

    /// Visiting a node also reveals it
    pub fn visit(&mut self) {
        self.visited = true;
        self.visible = true;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn display_state(&self) -> NodeDisplay {
        if !self.visible {
            NodeDisplay::Hidden
        } else if self.visited {
            NodeDisplay::Visited
        } else {
            NodeDisplay::Unvisited
        }
    }

    /// Only visible, unvisited nodes respond to clicks
    pub fn is_selectable(&self) -> bool {
        self.visible && !self.visited
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Supplies can be searched for
    Town,
    Road,
    /// Reaching it wins the escape
    Border,
    /// Costs stamina and fuel on arrival
    Danger,
}

impl NodeType {
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Town => "Town",
            NodeType::Road => "Road",
            NodeType::Border => "Border",
            NodeType::Danger => "Danger",
        }
    }
}

/// How a node should be drawn under fog-of-war
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeDisplay {
    Hidden,
    Visited,
    Unvisited,
}

/// Outgoing edges of a map node (ids of the nodes it can travel to)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConnections {
    pub connected_to: Vec<u32>,
}

impl NodeConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, node_id: u32) {
        if !self.connected_to.contains(&node_id) {
            self.connected_to.push(node_id);
        }
    }

    pub fn is_connected(&self, node_id: u32) -> bool {
        self.connected_to.contains(&node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_reveals() {
        let mut node = MapNode::new(0, "Crossing", NodeType::Road, Vec2::ZERO);
        assert_eq!(node.display_state(), NodeDisplay::Hidden);
        node.set_visible(true);
        assert!(node.is_selectable());
        assert_eq!(node.display_state(), NodeDisplay::Unvisited);
        node.visit();
        assert!(!node.is_selectable());
        assert_eq!(node.display_state(), NodeDisplay::Visited);
    }

    #[test]
    fn test_connections_dedup() {
        let mut conn = NodeConnections::new();
        conn.connect(3);
        conn.connect(3);
        conn.connect(5);
        assert_eq!(conn.connected_to, vec![3, 5]);
        assert!(conn.is_connected(5));
        assert!(!conn.is_connected(4));
    }
}
