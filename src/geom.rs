//! Planar geometry: points, bounds and small vector helpers.
//!
//! All coordinates live in the projected planar system (east/north, meters).
//! Geodetic conversion is external to this crate: callers project lon/lat
//! before passing points in, and unproject results on the way out.

use serde::{Deserialize, Serialize};

/// A point in the planar coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointEn {
    /// East coordinate, meters.
    pub e: f64,
    /// North coordinate, meters.
    pub n: f64,
}

impl PointEn {
    pub fn new(e: f64, n: f64) -> Self {
        Self { e, n }
    }

    /// Squared Euclidean distance to `that`.
    pub fn squared_distance_to(self, that: PointEn) -> f64 {
        squared_norm(self.e - that.e, self.n - that.n)
    }

    /// Euclidean distance to `that`.
    pub fn distance_to(self, that: PointEn) -> f64 {
        self.squared_distance_to(that).sqrt()
    }
}

/// Axis-aligned bounding box of the road network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_e: f64,
    pub min_n: f64,
    pub max_e: f64,
    pub max_n: f64,
}

impl Bounds {
    /// # Panics
    ///
    /// Panics if the minima exceed the maxima.
    pub fn new(min_e: f64, min_n: f64, max_e: f64, max_n: f64) -> Self {
        assert!(
            min_e <= max_e && min_n <= max_n,
            "inverted bounds: ({min_e}, {min_n})..({max_e}, {max_n})"
        );
        Self {
            min_e,
            min_n,
            max_e,
            max_n,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_e - self.min_e
    }

    pub fn height(&self) -> f64 {
        self.max_n - self.min_n
    }

    pub fn contains(&self, point: PointEn) -> bool {
        point.e >= self.min_e && point.e <= self.max_e && point.n >= self.min_n && point.n <= self.max_n
    }
}

/// Value at `x` on the line through `(0, y0)` and `(1, y1)`.
pub fn interpolate(y0: f64, y1: f64, x: f64) -> f64 {
    (y1 - y0).mul_add(x, y0)
}

/// Dot product of the vectors `u` and `v`.
pub fn dot_product(u_x: f64, u_y: f64, v_x: f64, v_y: f64) -> f64 {
    u_x.mul_add(v_x, u_y * v_y)
}

/// Squared norm of the vector `u`.
pub fn squared_norm(u_x: f64, u_y: f64) -> f64 {
    dot_product(u_x, u_y, u_x, u_y)
}

/// Norm of the vector `u`.
pub fn norm(u_x: f64, u_y: f64) -> f64 {
    squared_norm(u_x, u_y).sqrt()
}

/// Signed length of the projection of the vector `a -> p` onto `a -> b`.
pub fn projection_length(a: PointEn, b: PointEn, p: PointEn) -> f64 {
    dot_product(p.e - a.e, p.n - a.n, b.e - a.e, b.n - a.n) / norm(b.e - a.e, b.n - a.n)
}
