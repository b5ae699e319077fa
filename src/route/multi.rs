//! A route composed of consecutive sub-routes.

use crate::geom::PointEn;

use super::edge::Edge;
use super::point::RoutePoint;
use super::Route;

/// A non-empty sequence of route segments, each contributing a contiguous
/// position range. Every query translates the global position into the
/// owning segment's local position and delegates.
#[derive(Debug, Clone)]
pub struct MultiRoute {
    segments: Vec<Route>,
    length: f64,
}

impl MultiRoute {
    /// Builds a route from consecutive segments.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn new(segments: Vec<Route>) -> Self {
        assert!(!segments.is_empty(), "a route needs at least one segment");
        let length = segments.iter().map(Route::length).sum();
        Self { segments, length }
    }

    /// Total length, meters.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The immediate segments (which may themselves be multi-routes).
    pub fn segments(&self) -> &[Route] {
        &self.segments
    }

    /// Flat index of the single-route segment containing `position`,
    /// consistent with a fully flattened numbering: nested multi-routes
    /// count each of their single routes.
    pub fn index_of_segment_at(&self, position: f64) -> usize {
        let (index, local) = self.segment_at(position);
        let preceding: usize = self.segments[..index]
            .iter()
            .map(|segment| segment.index_of_segment_at(segment.length()) + 1)
            .sum();
        preceding + self.segments[index].index_of_segment_at(local)
    }

    /// All edges, in traversal order.
    pub fn edges(&self) -> Vec<Edge> {
        self.segments
            .iter()
            .flat_map(|segment| segment.edges())
            .collect()
    }

    /// Every vertex of the route polyline, segment joints included once.
    pub fn points(&self) -> Vec<PointEn> {
        let mut points = vec![self.segments[0].point_at(0.0)];
        for segment in &self.segments {
            points.extend(segment.points().into_iter().skip(1));
        }
        points
    }

    /// Point at `position` (clamped to `[0, length]`).
    pub fn point_at(&self, position: f64) -> PointEn {
        let (index, local) = self.segment_at(position);
        self.segments[index].point_at(local)
    }

    /// Elevation at `position` (clamped), `NaN` where the owning edge has
    /// no elevation data.
    pub fn elevation_at(&self, position: f64) -> f64 {
        let (index, local) = self.segment_at(position);
        self.segments[index].elevation_at(local)
    }

    /// Id of the route node closest to `position` (clamped).
    pub fn node_closest_to(&self, position: f64) -> u32 {
        let (index, local) = self.segment_at(position);
        self.segments[index].node_closest_to(local)
    }

    /// The route point closest to `point` across all segments; ties go to
    /// the earliest segment.
    pub fn point_closest_to(&self, point: PointEn) -> RoutePoint {
        let mut closest = RoutePoint::NONE;
        let mut offset = 0.0;
        for segment in &self.segments {
            closest = closest.min(
                segment
                    .point_closest_to(point)
                    .with_position_shifted_by(offset),
            );
            offset += segment.length();
        }
        closest
    }

    /// Owning segment of a clamped position, with the segment-local
    /// position. A position exactly on a joint belongs to the earlier
    /// segment (whose queries then answer with their own end, matching the
    /// following segment's start).
    fn segment_at(&self, position: f64) -> (usize, f64) {
        let clamped = position.clamp(0.0, self.length);
        let mut before = 0.0;
        for (index, segment) in self.segments.iter().enumerate() {
            let end = before + segment.length();
            if end >= clamped {
                return (index, clamped - before);
            }
            before = end;
        }
        let last = self.segments.len() - 1;
        (last, self.segments[last].length())
    }
}
