//! Sector index: a fixed 128 x 128 grid over the network bounding box.
//!
//! Nodes are stored sorted by the grid cell they fall in, so each cell is
//! described by a contiguous node-id range. Bounding-box queries enumerate
//! the overlapped cells instead of scanning the whole node table.

use crate::geom::{Bounds, PointEn};
use crate::graph::blob::Blob;

/// Grid cells per side.
pub const GRID_DIM: u32 = 128;
/// Total number of sector records.
pub const SECTOR_COUNT: usize = (GRID_DIM * GRID_DIM) as usize;
/// Bytes per sector record: first node id (i32) + node count (u16).
pub const SECTOR_BYTES: usize = 6;

const OFFSET_START_NODE: usize = 0;
const OFFSET_NODE_COUNT: usize = 4;

/// The contiguous node-id range `[start_node, end_node)` of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub start_node: u32,
    pub end_node: u32,
}

/// Read-only sector grid.
#[derive(Debug)]
pub struct SectorIndex {
    data: Blob,
    bounds: Bounds,
}

impl SectorIndex {
    /// Wraps a flat buffer of sector records covering `bounds`.
    ///
    /// # Panics
    ///
    /// Panics unless the buffer holds exactly `GRID_DIM * GRID_DIM` records.
    pub fn new(data: Blob, bounds: Bounds) -> Self {
        assert_eq!(
            data.len(),
            SECTOR_COUNT * SECTOR_BYTES,
            "sector buffer must hold exactly {SECTOR_COUNT} records"
        );
        Self { data, bounds }
    }

    /// The bounding box the grid is laid over.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Sectors overlapped by the axis-aligned square centered on `center`
    /// with half side length `half_extent`, in row-major order.
    ///
    /// Grid indices are clamped, so a square reaching past the bounds
    /// returns the border cells; a square covering everything returns all
    /// 16384 sectors.
    ///
    /// # Panics
    ///
    /// Panics unless `half_extent > 0`.
    pub fn sectors_overlapping(&self, center: PointEn, half_extent: f64) -> Vec<Sector> {
        assert!(half_extent > 0.0, "half_extent must be positive, got {half_extent}");

        let x_min = self.x_index(center.e - half_extent);
        let x_max = self.x_index(center.e + half_extent);
        let y_min = self.y_index(center.n - half_extent);
        let y_max = self.y_index(center.n + half_extent);

        let mut sectors = Vec::with_capacity(((x_max - x_min + 1) * (y_max - y_min + 1)) as usize);
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                sectors.push(self.sector(y * GRID_DIM + x));
            }
        }
        sectors
    }

    /// The sector record with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `sector_id >= GRID_DIM * GRID_DIM`.
    pub fn sector(&self, sector_id: u32) -> Sector {
        assert!(
            (sector_id as usize) < SECTOR_COUNT,
            "sector id {sector_id} out of range"
        );
        let base = sector_id as usize * SECTOR_BYTES;
        let start_node = self.data.i32_at(base + OFFSET_START_NODE) as u32;
        let count = u32::from(self.data.u16_at(base + OFFSET_NODE_COUNT));
        Sector {
            start_node,
            end_node: start_node + count,
        }
    }

    /// Grid column of the given east coordinate, clamped to the grid.
    fn x_index(&self, e: f64) -> u32 {
        let t = (e - self.bounds.min_e) / self.bounds.width() * f64::from(GRID_DIM);
        t.clamp(0.0, f64::from(GRID_DIM - 1)) as u32
    }

    /// Grid row of the given north coordinate, clamped to the grid.
    fn y_index(&self, n: f64) -> u32 {
        let t = (n - self.bounds.min_n) / self.bounds.height() * f64::from(GRID_DIM);
        t.clamp(0.0, f64::from(GRID_DIM - 1)) as u32
    }
}
