//! Routes with a progress cursor.

use glam::Vec2;

use crate::graph::GridNode;

/// Ordered route of nodes plus the index of the next node to reach.
///
/// Paths are replaced wholesale on every re-plan; the only in-place
/// mutations are advancing the cursor and clearing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    nodes: Vec<GridNode>,
    cursor: usize,
}

impl Path {
    /// Creates a path starting at its first node.
    #[must_use]
    pub fn new(nodes: Vec<GridNode>) -> Self {
        Self { nodes, cursor: 0 }
    }

    /// Creates an empty path.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether the path has no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the full route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes of the route.
    #[must_use]
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Index of the next node to reach.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Next node to reach, or `None` when the route is finished.
    #[must_use]
    pub fn current(&self) -> Option<&GridNode> {
        self.nodes.get(self.cursor)
    }

    /// Last node of the route.
    #[must_use]
    pub fn goal(&self) -> Option<&GridNode> {
        self.nodes.last()
    }

    /// Moves the cursor to the following node.
    pub fn advance(&mut self) {
        if self.cursor < self.nodes.len() {
            self.cursor += 1;
        }
    }

    /// Whether the route has nodes left to reach.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.cursor < self.nodes.len()
    }

    /// Whether every node of a non-empty route has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.nodes.is_empty() && self.cursor >= self.nodes.len()
    }

    /// Drops all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cursor = 0;
    }

    /// World-space centers of the nodes not yet reached, for debug drawing.
    #[must_use]
    pub fn world_points(&self) -> Vec<Vec2> {
        self.nodes
            .iter()
            .skip(self.cursor)
            .map(GridNode::center)
            .collect()
    }
}
