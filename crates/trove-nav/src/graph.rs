//! Navigation graph of walkable grid cells.
//!
//! The graph is a snapshot: walkability is sampled once at every cell
//! center when the graph is built and never re-evaluated. Rebuild it when
//! the map changes.

use fastrand::Rng;
use glam::Vec2;
use tracing::{debug, info};
use trove_common::GridCoord;

use crate::walkable::{MapGeometry, Walkability};

/// Stable index of a node within its graph.
pub type NodeIndex = usize;

/// Cost of a single cardinal step.
pub const STEP_COST: f32 = 1.0;

/// Fraction of interior nodes that must stay unvisited before the visited
/// set is wiped.
pub const EXPLORATION_RESET_FRACTION: f32 = 0.2;

/// A walkable grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridNode {
    index: NodeIndex,
    cell: GridCoord,
    center: Vec2,
}

impl GridNode {
    /// Stable index within the owning graph.
    #[must_use]
    pub const fn index(&self) -> NodeIndex {
        self.index
    }

    /// Grid cell of the node.
    #[must_use]
    pub const fn cell(&self) -> GridCoord {
        self.cell
    }

    /// World-space center of the cell.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }
}

/// Edge to a cardinally adjacent walkable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Destination node
    pub to: NodeIndex,
    /// Traversal cost
    pub cost: f32,
}

/// Graph of walkable cells with 4-way connectivity and an exploration
/// visited set.
#[derive(Debug, Clone)]
pub struct NavGraph {
    geometry: MapGeometry,
    nodes: Vec<GridNode>,
    /// Row-major cell -> node lookup
    cells: Vec<Option<NodeIndex>>,
    connections: Vec<Vec<Connection>>,
    visited: Vec<bool>,
}

impl NavGraph {
    /// Builds the graph by sampling `walkable` at every cell center.
    ///
    /// Nodes are indexed in row-major scan order. Each node then links to
    /// each of its four cardinal neighbors that is also a node; because
    /// every node does this, every link has a matching reverse link.
    pub fn build<W: Walkability + ?Sized>(walkable: &W, geometry: MapGeometry) -> Self {
        let mut nodes = Vec::new();
        let mut cells = vec![None; geometry.cell_count()];

        for y in 0..geometry.grid_height as i32 {
            for x in 0..geometry.grid_width as i32 {
                let cell = GridCoord::new(x, y);
                let center = cell.center(geometry.tile);
                if walkable.is_walkable(center) {
                    let index = nodes.len();
                    nodes.push(GridNode {
                        index,
                        cell,
                        center,
                    });
                    cells[cell.to_index(geometry.grid_width)] = Some(index);
                }
            }
        }

        let mut graph = Self {
            geometry,
            visited: vec![false; nodes.len()],
            connections: vec![Vec::new(); nodes.len()],
            nodes,
            cells,
        };

        for index in 0..graph.nodes.len() {
            let cell = graph.nodes[index].cell;
            for neighbor in cell.cardinal_neighbors() {
                if let Some(to) = graph.index_at_cell(neighbor) {
                    graph.connections[index].push(Connection {
                        to,
                        cost: STEP_COST,
                    });
                }
            }
        }

        info!(
            "Built navigation graph: {} nodes, {} connections, {}x{} grid",
            graph.nodes.len(),
            graph.connection_count(),
            geometry.grid_width,
            geometry.grid_height
        );
        graph
    }

    /// Returns the geometry the graph was built from.
    #[must_use]
    pub const fn geometry(&self) -> MapGeometry {
        self.geometry
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the graph has no walkable nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, indexed by [`NodeIndex`].
    #[must_use]
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Gets a node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&GridNode> {
        self.nodes.get(index)
    }

    /// Outgoing connections of a node (empty for unknown indices).
    #[must_use]
    pub fn connections(&self, index: NodeIndex) -> &[Connection] {
        self.connections.get(index).map_or(&[], Vec::as_slice)
    }

    /// Total number of directed connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.iter().map(Vec::len).sum()
    }

    /// Checks whether `a` links directly to `b`.
    #[must_use]
    pub fn are_connected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.connections(a).iter().any(|c| c.to == b)
    }

    fn index_at_cell(&self, cell: GridCoord) -> Option<NodeIndex> {
        if !cell.in_bounds(self.geometry.grid_width, self.geometry.grid_height) {
            return None;
        }
        self.cells
            .get(cell.to_index(self.geometry.grid_width))
            .copied()
            .flatten()
    }

    /// Gets the node occupying a grid cell.
    #[must_use]
    pub fn node_at_cell(&self, cell: GridCoord) -> Option<&GridNode> {
        self.index_at_cell(cell).and_then(|i| self.nodes.get(i))
    }

    /// Gets the node whose cell contains a world position.
    ///
    /// Returns `None` for positions off the grid or on unwalkable cells.
    #[must_use]
    pub fn node_at(&self, pos: Vec2) -> Option<&GridNode> {
        self.node_at_cell(GridCoord::from_world(pos, self.geometry.tile))
    }

    /// Finds the node whose center is closest to a world position by
    /// scanning every node.
    #[must_use]
    pub fn nearest_node(&self, pos: Vec2) -> Option<&GridNode> {
        self.nodes.iter().min_by(|a, b| {
            a.center
                .distance_squared(pos)
                .total_cmp(&b.center.distance_squared(pos))
        })
    }

    /// Node at `pos` if there is one, else the nearest node.
    #[must_use]
    pub fn resolve_node(&self, pos: Vec2) -> Option<&GridNode> {
        self.node_at(pos).or_else(|| self.nearest_node(pos))
    }

    fn is_interior(&self, node: &GridNode) -> bool {
        !node
            .cell
            .is_border(self.geometry.grid_width, self.geometry.grid_height)
    }

    /// Indices of nodes not on the map's border ring, or of all nodes when
    /// the interior is empty.
    fn interior_indices(&self) -> Vec<NodeIndex> {
        let interior: Vec<NodeIndex> = self
            .nodes
            .iter()
            .filter(|n| self.is_interior(n))
            .map(GridNode::index)
            .collect();
        if interior.is_empty() {
            (0..self.nodes.len()).collect()
        } else {
            interior
        }
    }

    /// Picks a uniformly random walkable node away from the map border.
    ///
    /// Falls back to any walkable node if the interior has none.
    pub fn random_walkable_node(&self, rng: &mut Rng) -> Option<&GridNode> {
        let candidates = self.interior_indices();
        if candidates.is_empty() {
            return None;
        }
        let pick = candidates[rng.usize(..candidates.len())];
        self.nodes.get(pick)
    }

    /// Picks an exploration target biased away from `current`.
    ///
    /// Marks the node under `current` visited. When fewer than
    /// [`EXPLORATION_RESET_FRACTION`] of the interior nodes remain
    /// unvisited, the visited set is cleared and a random node is returned
    /// instead. Otherwise a random node is drawn from the farthest third of
    /// the unvisited nodes.
    pub fn unexplored_node(&mut self, current: Vec2, rng: &mut Rng) -> Option<GridNode> {
        self.mark_visited(current);

        let interior = self.interior_indices();
        if interior.is_empty() {
            return None;
        }
        let mut unvisited: Vec<NodeIndex> = interior
            .iter()
            .copied()
            .filter(|&i| !self.visited[i])
            .collect();

        if (unvisited.len() as f32) < interior.len() as f32 * EXPLORATION_RESET_FRACTION {
            debug!(
                "Exploration reset: {} of {} interior nodes unvisited",
                unvisited.len(),
                interior.len()
            );
            self.clear_visited();
            return self.random_walkable_node(rng).copied();
        }

        unvisited.sort_by(|&a, &b| {
            let da = self.nodes[a].center.distance_squared(current);
            let db = self.nodes[b].center.distance_squared(current);
            db.total_cmp(&da)
        });
        let band = (unvisited.len() / 3).max(1);
        let pick = unvisited[rng.usize(..band)];
        self.nodes.get(pick).copied()
    }

    /// Marks the node under a world position as visited.
    pub fn mark_visited(&mut self, pos: Vec2) {
        if let Some(index) = self.node_at(pos).map(GridNode::index) {
            self.visited[index] = true;
        }
    }

    /// Checks whether a node has been visited.
    #[must_use]
    pub fn is_visited(&self, index: NodeIndex) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    /// Number of visited nodes.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }

    /// Clears every visited mark.
    pub fn clear_visited(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
    }
}
