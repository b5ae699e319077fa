//! Shortest-path search over the graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::graph::Graph;

use super::edge::Edge;
use super::single::SingleRoute;
use super::Route;

/// The multiplier applied to an edge's length when leaving `node_id` over
/// `edge_id`.
///
/// Factors must be non-negative; `f64::INFINITY` marks the edge impassable
/// and needs no special handling in the search. Finite factors should be
/// at least 1 so that the straight-line heuristic stays admissible and the
/// returned route optimal; smaller factors still terminate but may cost
/// optimality.
pub trait CostFunction {
    fn cost_factor(&self, node_id: u32, edge_id: u32) -> f64;
}

impl<F: Fn(u32, u32) -> f64> CostFunction for F {
    fn cost_factor(&self, node_id: u32, edge_id: u32) -> f64 {
        self(node_id, edge_id)
    }
}

/// A* shortest-path search with a pluggable cost function.
///
/// Each query allocates only call-local state (frontier, distance and
/// predecessor arrays sized to the node count), so concurrent searches
/// over the same graph need no synchronization.
pub struct RouteSearch<'a, C> {
    graph: &'a Graph,
    cost: C,
}

/// Frontier entry, ordered by ascending priority (reversed `Ord` turns the
/// max-heap into a min-heap). Equal priorities pop in unspecified order;
/// with non-negative costs the result stays optimal either way.
#[derive(Debug, Clone, Copy)]
struct WeightedNode {
    node: u32,
    priority: f64,
}

impl PartialEq for WeightedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WeightedNode {}

impl PartialOrd for WeightedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeightedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
    }
}

impl<'a, C: CostFunction> RouteSearch<'a, C> {
    pub fn new(graph: &'a Graph, cost: C) -> Self {
        Self { graph, cost }
    }

    /// The minimal-cost route from `start` to `end`, or `None` when `end`
    /// is unreachable.
    ///
    /// Label-setting search: a node is settled the first time it leaves
    /// the frontier, stale frontier entries are skipped by the settled
    /// flag, and the edge list is rebuilt from the predecessor chain once
    /// `end` is reached.
    ///
    /// # Panics
    ///
    /// Panics if `start == end`.
    pub fn best_route(&self, start: u32, end: u32) -> Option<Route> {
        assert!(start != end, "start and destination must differ");

        let node_count = self.graph.node_count() as usize;
        let mut distance = vec![f64::INFINITY; node_count];
        let mut settled = vec![false; node_count];
        let mut predecessor = vec![0u32; node_count];
        let mut via_edge = vec![0u32; node_count];

        let end_point = self.graph.node_point(end);
        let mut frontier = BinaryHeap::new();
        distance[start as usize] = 0.0;
        frontier.push(WeightedNode {
            node: start,
            priority: self.graph.node_point(start).distance_to(end_point),
        });

        let mut settled_count = 0usize;
        while let Some(WeightedNode { node, .. }) = frontier.pop() {
            if settled[node as usize] {
                continue;
            }
            if node == end {
                debug!(settled = settled_count, "route found");
                return Some(self.rebuild(start, end, &predecessor, &via_edge));
            }
            settled[node as usize] = true;
            settled_count += 1;

            for edge_index in 0..self.graph.node_out_degree(node) {
                let edge_id = self.graph.node_out_edge_id(node, edge_index);
                let target = self.graph.edge_target_node(edge_id);
                if settled[target as usize] {
                    continue;
                }
                let candidate = distance[node as usize]
                    + self.cost.cost_factor(node, edge_id) * self.graph.edge_length(edge_id);
                if candidate < distance[target as usize] {
                    distance[target as usize] = candidate;
                    predecessor[target as usize] = node;
                    via_edge[target as usize] = edge_id;
                    frontier.push(WeightedNode {
                        node: target,
                        priority: candidate + self.graph.node_point(target).distance_to(end_point),
                    });
                }
            }
        }

        debug!(settled = settled_count, "destination unreachable");
        None
    }

    fn rebuild(&self, start: u32, end: u32, predecessor: &[u32], via_edge: &[u32]) -> Route {
        let mut edges = Vec::new();
        let mut current = end;
        while current != start {
            let previous = predecessor[current as usize];
            edges.push(Edge::of(
                self.graph,
                via_edge[current as usize],
                previous,
                current,
            ));
            current = previous;
        }
        edges.reverse();
        Route::Single(SingleRoute::new(edges))
    }
}
