//! Offline bicycle routing core.
//!
//! A road network is loaded once from a compact binary layout into
//! read-only, memory-mapped buffers ([`Graph`]); on top of it sit an A*
//! shortest-path search with a pluggable cost function ([`RouteSearch`]),
//! a position-indexable route model ([`Route`]) and an elevation-profile
//! builder ([`elevation_profile`]).
//!
//! Everything is synchronous and allocation-light: graph accessors decode
//! records in place, and searches only allocate call-local scratch state,
//! so independent queries may run concurrently without locking.

pub mod bits;
pub mod error;
pub mod fixed;
pub mod func;
pub mod geom;
pub mod graph;
pub mod route;

pub use error::{Error, Result};
pub use func::ElevationFunction;
pub use geom::{Bounds, PointEn};
pub use graph::attributes::{Attribute, AttributeSet};
pub use graph::Graph;
pub use route::{
    elevation_profile, BikeCost, CostFunction, Edge, ElevationProfile, MultiRoute, Route,
    RoutePoint, RouteSearch, SingleRoute,
};
