//! Projection of a reference point onto a route.

use serde::Serialize;

use crate::geom::PointEn;

/// The point of a route closest to some reference point: its location, its
/// position along the route, and its distance to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutePoint {
    /// The route point, `None` for [`RoutePoint::NONE`].
    pub point: Option<PointEn>,
    /// Position along the route, meters.
    pub position: f64,
    /// Distance between the route point and the reference point, meters.
    pub distance_to_reference: f64,
}

impl RoutePoint {
    /// "No point found": infinitely far from any reference, so it loses
    /// every [`min`](RoutePoint::min) comparison.
    pub const NONE: RoutePoint = RoutePoint {
        point: None,
        position: f64::NAN,
        distance_to_reference: f64::INFINITY,
    };

    pub fn new(point: PointEn, position: f64, distance_to_reference: f64) -> Self {
        Self {
            point: Some(point),
            position,
            distance_to_reference,
        }
    }

    /// The same point with its position shifted by `difference` (positive
    /// or negative), used to translate segment-local positions into global
    /// route positions.
    pub fn with_position_shifted_by(self, difference: f64) -> Self {
        Self {
            position: self.position + difference,
            ..self
        }
    }

    /// `self` when it is at most as far from the reference as `that`,
    /// `that` otherwise.
    pub fn min(self, that: RoutePoint) -> RoutePoint {
        if self.distance_to_reference <= that.distance_to_reference {
            self
        } else {
            that
        }
    }

    /// Like [`min`](RoutePoint::min), without building the candidate
    /// unless it wins.
    pub fn min_with(self, point: PointEn, position: f64, distance_to_reference: f64) -> RoutePoint {
        if self.distance_to_reference <= distance_to_reference {
            self
        } else {
            RoutePoint::new(point, position, distance_to_reference)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_loses_every_comparison() {
        let some = RoutePoint::new(PointEn::new(1.0, 2.0), 10.0, 5.0);
        assert_eq!(RoutePoint::NONE.min(some), some);
        assert_eq!(some.min(RoutePoint::NONE), some);
        assert!(RoutePoint::NONE.distance_to_reference.is_infinite());
    }

    #[test]
    fn min_keeps_the_receiver_on_ties() {
        let first = RoutePoint::new(PointEn::new(0.0, 0.0), 1.0, 5.0);
        let second = RoutePoint::new(PointEn::new(9.0, 9.0), 2.0, 5.0);
        assert_eq!(first.min(second), first);
        assert_eq!(
            first.min_with(PointEn::new(9.0, 9.0), 2.0, 5.0),
            first
        );
    }

    #[test]
    fn shifting_moves_only_the_position() {
        let point = RoutePoint::new(PointEn::new(1.0, 2.0), 10.0, 5.0);
        let shifted = point.with_position_shifted_by(-3.0);
        assert_eq!(shifted.position, 7.0);
        assert_eq!(shifted.point, point.point);
        assert_eq!(shifted.distance_to_reference, 5.0);
    }
}
