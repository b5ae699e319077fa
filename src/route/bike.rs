//! Default bicycle cost function over the OSM attribute catalogue.

use crate::graph::attributes::{Attribute, AttributeSet};
use crate::graph::Graph;

use super::search::CostFunction;

/// Attribute-driven bicycle cost factors.
///
/// Roads bicycles may not use get an infinite factor; every other factor is
/// at least 1, keeping the search heuristic admissible. Callers wanting a
/// different trade-off supply their own [`CostFunction`].
pub struct BikeCost<'a> {
    graph: &'a Graph,
    forbidden: AttributeSet,
    preferred: AttributeSet,
    big_road: AttributeSet,
    rough_surface: AttributeSet,
}

impl<'a> BikeCost<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            forbidden: AttributeSet::of(&[
                Attribute::HighwayMotorway,
                Attribute::HighwayTrunk,
                Attribute::HighwaySteps,
                Attribute::MotorroadYes,
                Attribute::VehicleNo,
                Attribute::VehiclePrivate,
                Attribute::AccessNo,
                Attribute::AccessPrivate,
                Attribute::BicycleNo,
                Attribute::BicycleDismount,
                Attribute::BicycleUseSidepath,
                Attribute::BicyclePrivate,
            ]),
            preferred: AttributeSet::of(&[
                Attribute::HighwayCycleway,
                Attribute::BicycleDesignated,
                Attribute::LcnYes,
                Attribute::IcnYes,
                Attribute::NcnYes,
                Attribute::RcnYes,
            ]),
            big_road: AttributeSet::of(&[Attribute::HighwayPrimary, Attribute::HighwaySecondary]),
            rough_surface: AttributeSet::of(&[
                Attribute::SurfaceUnpaved,
                Attribute::SurfaceGravel,
                Attribute::SurfaceGround,
                Attribute::SurfaceGrass,
                Attribute::SurfaceDirt,
                Attribute::SurfaceSand,
                Attribute::SurfaceCobblestone,
                Attribute::SurfacePebblestone,
                Attribute::SurfaceSett,
                Attribute::TracktypeGrade3,
                Attribute::TracktypeGrade4,
                Attribute::TracktypeGrade5,
            ]),
        }
    }
}

impl CostFunction for BikeCost<'_> {
    fn cost_factor(&self, _node_id: u32, edge_id: u32) -> f64 {
        let attributes = self.graph.edge_attributes(edge_id);
        if attributes.intersects(self.forbidden) {
            return f64::INFINITY;
        }
        // Dedicated cycle infrastructure overrides surface and road-class
        // penalties.
        if attributes.intersects(self.preferred) {
            return 1.0;
        }
        let mut factor = 1.0;
        if attributes.intersects(self.big_road) {
            factor *= 1.5;
        }
        if attributes.intersects(self.rough_surface) {
            factor *= 2.0;
        }
        factor
    }
}
