//! One directed edge of a computed route.

use crate::func::ElevationFunction;
use crate::geom::{self, PointEn};
use crate::graph::Graph;

/// A route edge: endpoints, geometry, length and elevation function,
/// detached from the graph it was built from.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from_node: u32,
    pub to_node: u32,
    pub from_point: PointEn,
    pub to_point: PointEn,
    pub length: f64,
    pub profile: ElevationFunction,
}

impl Edge {
    /// Builds the route edge for graph edge `edge_id`, traversed from
    /// `from_node` to `to_node`.
    pub fn of(graph: &Graph, edge_id: u32, from_node: u32, to_node: u32) -> Edge {
        Edge {
            from_node,
            to_node,
            from_point: graph.node_point(from_node),
            to_point: graph.node_point(to_node),
            length: graph.edge_length(edge_id),
            profile: graph.edge_profile(edge_id),
        }
    }

    /// Position on the edge's supporting line closest to `point`.
    ///
    /// Not clamped: the result is negative before the edge start and larger
    /// than the length past its end. Callers clamp.
    pub fn position_closest_to(&self, point: PointEn) -> f64 {
        geom::projection_length(self.from_point, self.to_point, point)
    }

    /// Point at `position`, linearly interpolated along the edge.
    pub fn point_at(&self, position: f64) -> PointEn {
        if self.length == 0.0 {
            return self.from_point;
        }
        let t = position / self.length;
        PointEn::new(
            geom::interpolate(self.from_point.e, self.to_point.e, t),
            geom::interpolate(self.from_point.n, self.to_point.n, t),
        )
    }

    /// Elevation at `position`, `NaN` when the edge has no elevation data.
    pub fn elevation_at(&self, position: f64) -> f64 {
        self.profile.apply(position)
    }
}
