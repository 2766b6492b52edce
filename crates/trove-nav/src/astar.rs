//! A* search over the navigation graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec2;
use tracing::{debug, trace};
use trove_common::GridCoord;

use crate::graph::{GridNode, NavGraph, NodeIndex};

/// Heuristic scale that breaks ties between equal-cost routes in favor of
/// ones that keep heading straight at the goal.
pub const TIE_BREAK: f32 = 1.001;

/// Manhattan distance between two cells, scaled by [`TIE_BREAK`].
#[must_use]
pub fn heuristic(a: GridCoord, b: GridCoord) -> f32 {
    a.manhattan(b) as f32 * TIE_BREAK
}

/// Open-set entry ordered so that `BinaryHeap` pops the lowest `f` first.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f32,
    g: f32,
    node: NodeIndex,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; deeper nodes first on equal f, then by
        // index so the search is deterministic.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Finds a shortest cardinal route from `start` to `goal`.
///
/// The result runs from `start` to `goal` inclusive. It is empty when
/// either index is unknown or when `goal` is unreachable from `start`;
/// callers treat that as "no path", not as an error.
#[must_use]
pub fn find_path(graph: &NavGraph, start: NodeIndex, goal: NodeIndex) -> Vec<GridNode> {
    let (Some(start_node), Some(goal_node)) = (graph.node(start), graph.node(goal)) else {
        return Vec::new();
    };
    if start == goal {
        return vec![*start_node];
    }

    let goal_cell = goal_node.cell();
    let mut g_score = vec![f32::INFINITY; graph.len()];
    let mut came_from: Vec<Option<NodeIndex>> = vec![None; graph.len()];
    let mut closed = vec![false; graph.len()];
    let mut open = BinaryHeap::new();

    g_score[start] = 0.0;
    open.push(OpenEntry {
        f: heuristic(start_node.cell(), goal_cell),
        g: 0.0,
        node: start,
    });

    let mut expanded = 0usize;
    while let Some(OpenEntry { g, node, .. }) = open.pop() {
        if closed[node] {
            continue;
        }
        if node == goal {
            trace!("A* reached goal after expanding {expanded} nodes");
            return reconstruct(graph, &came_from, goal);
        }
        closed[node] = true;
        expanded += 1;

        for conn in graph.connections(node) {
            if closed[conn.to] {
                continue;
            }
            let tentative = g + conn.cost;
            if tentative < g_score[conn.to] {
                g_score[conn.to] = tentative;
                came_from[conn.to] = Some(node);
                let h = graph
                    .node(conn.to)
                    .map_or(0.0, |n| heuristic(n.cell(), goal_cell));
                open.push(OpenEntry {
                    f: tentative + h,
                    g: tentative,
                    node: conn.to,
                });
            }
        }
    }

    debug!(
        "No path from {:?} to {:?} ({expanded} nodes expanded)",
        start_node.cell(),
        goal_cell
    );
    Vec::new()
}

fn reconstruct(graph: &NavGraph, came_from: &[Option<NodeIndex>], goal: NodeIndex) -> Vec<GridNode> {
    let mut route = Vec::new();
    let mut current = Some(goal);
    while let Some(index) = current {
        if let Some(node) = graph.node(index) {
            route.push(*node);
        }
        current = came_from[index];
    }
    route.reverse();
    route
}

/// Resolves world positions to the nodes under them and searches between
/// them. Positions off the graph give an empty route.
#[must_use]
pub fn find_path_between(graph: &NavGraph, from: Vec2, to: Vec2) -> Vec<GridNode> {
    match (graph.node_at(from), graph.node_at(to)) {
        (Some(start), Some(goal)) => find_path(graph, start.index(), goal.index()),
        _ => Vec::new(),
    }
}

/// Cost of a route (number of cardinal steps).
#[must_use]
pub fn route_cost(route: &[GridNode]) -> f32 {
    route.len().saturating_sub(1) as f32 * crate::graph::STEP_COST
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::TileMap;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use trove_common::TileSize;

    fn graph_from(rows: &[&str]) -> NavGraph {
        let map = TileMap::from_ascii(rows, TileSize::square(32.0)).expect("valid map");
        NavGraph::build(&map, map.geometry())
    }

    fn index(graph: &NavGraph, x: i32, y: i32) -> NodeIndex {
        graph
            .node_at_cell(GridCoord::new(x, y))
            .expect("walkable cell")
            .index()
    }

    /// Breadth-first step count, used as the optimal-cost oracle.
    fn bfs_distance(graph: &NavGraph, start: NodeIndex, goal: NodeIndex) -> Option<usize> {
        let mut dist = vec![usize::MAX; graph.len()];
        let mut queue = VecDeque::new();
        dist[start] = 0;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            if node == goal {
                return Some(dist[node]);
            }
            for conn in graph.connections(node) {
                if dist[conn.to] == usize::MAX {
                    dist[conn.to] = dist[node] + 1;
                    queue.push_back(conn.to);
                }
            }
        }
        None
    }

    fn assert_valid_route(graph: &NavGraph, route: &[GridNode], start: NodeIndex, goal: NodeIndex) {
        assert_eq!(route.first().map(GridNode::index), Some(start));
        assert_eq!(route.last().map(GridNode::index), Some(goal));
        for pair in route.windows(2) {
            assert!(graph.are_connected(pair[0].index(), pair[1].index()));
        }
    }

    #[test]
    fn test_wall_with_gap() {
        // Column 2 is a wall on rows 0..=3 with a gap at row 4.
        let graph = graph_from(&["..#..", "..#..", "..#..", "..#..", "....."]);
        let start = index(&graph, 0, 0);
        let goal = index(&graph, 4, 0);

        let route = find_path(&graph, start, goal);
        assert_valid_route(&graph, &route, start, goal);
        assert!(route.iter().any(|n| n.cell() == GridCoord::new(2, 4)));
        assert!(route
            .iter()
            .filter(|n| n.cell().x == 2)
            .all(|n| n.cell().y == 4));
        // 4 across + 4 down + 4 up = 12 steps, 13 nodes.
        assert!((route_cost(&route) - 12.0).abs() < f32::EPSILON);
        assert_eq!(route.len(), 13);
    }

    #[test]
    fn test_unreachable_goal_is_empty() {
        let graph = graph_from(&[".....", ".###.", ".#.#.", ".###.", "....."]);
        let start = index(&graph, 0, 0);
        let goal = index(&graph, 2, 2);
        assert!(find_path(&graph, start, goal).is_empty());
    }

    #[test]
    fn test_unknown_indices_are_empty() {
        let graph = graph_from(&["..."]);
        assert!(find_path(&graph, 0, 99).is_empty());
        assert!(find_path(&graph, 99, 0).is_empty());
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = graph_from(&["..."]);
        let route = find_path(&graph, 1, 1);
        assert_eq!(route.len(), 1);
        assert!(route_cost(&route).abs() < f32::EPSILON);
    }

    #[test]
    fn test_find_path_between_world_positions() {
        let graph = graph_from(&["....", "...."]);
        let route = find_path_between(&graph, Vec2::new(5.0, 5.0), Vec2::new(120.0, 40.0));
        assert_eq!(route.len(), 5);
        assert!(find_path_between(&graph, Vec2::new(-5.0, 5.0), Vec2::new(120.0, 40.0)).is_empty());
    }

    #[test]
    fn test_straight_preferred_on_open_grid() {
        let graph = graph_from(&[".....", ".....", "....."]);
        let route = find_path(&graph, index(&graph, 0, 1), index(&graph, 4, 1));
        assert!(route.iter().all(|n| n.cell().y == 1));
    }

    fn arb_grid() -> impl Strategy<Value = (Vec<String>, usize, usize)> {
        (2usize..9, 2usize..9).prop_flat_map(|(w, h)| {
            (
                prop::collection::vec(
                    prop::collection::vec(prop::bool::weighted(0.75), w)
                        .prop_map(|r| r.into_iter().map(|b| if b { '.' } else { '#' }).collect::<String>()),
                    h,
                ),
                0..w * h,
                0..w * h,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_route_valid_and_near_optimal((rows, a, b) in arb_grid()) {
            let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
            let graph = graph_from(&rows);
            prop_assume!(!graph.is_empty());
            let start = a % graph.len();
            let goal = b % graph.len();

            let route = find_path(&graph, start, goal);
            match bfs_distance(&graph, start, goal) {
                None => prop_assert!(route.is_empty()),
                Some(optimal) => {
                    assert_valid_route(&graph, &route, start, goal);
                    let cost = route_cost(&route);
                    prop_assert!(cost >= optimal as f32);
                    prop_assert!(cost <= optimal as f32 * TIE_BREAK + 1e-3);
                }
            }
        }
    }
}
