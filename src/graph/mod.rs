//! Read-only road graph: node, edge, sector and attribute tables composed
//! behind one query facade.
//!
//! The graph is loaded once at startup (the only I/O this crate performs)
//! and never mutated afterwards, so any number of concurrent readers is
//! safe without locking.

pub mod attributes;
pub mod blob;
pub mod edges;
pub mod nodes;
pub mod sectors;

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::func::ElevationFunction;
use crate::geom::{Bounds, PointEn};
use attributes::AttributeSet;
use blob::Blob;
use edges::EdgeTable;
use nodes::NodeTable;
use sectors::SectorIndex;

/// The complete road graph.
pub struct Graph {
    nodes: NodeTable,
    sectors: SectorIndex,
    edges: EdgeTable,
    attribute_sets: Vec<AttributeSet>,
}

impl Graph {
    /// Composes a graph from its tables (the loader for pre-built buffers;
    /// [`Graph::load`] is the file-backed path).
    pub fn new(
        nodes: NodeTable,
        sectors: SectorIndex,
        edges: EdgeTable,
        attribute_sets: Vec<AttributeSet>,
    ) -> Self {
        Self {
            nodes,
            sectors,
            edges,
            attribute_sets,
        }
    }

    /// Memory-maps and validates the six flat files of a graph directory:
    /// `nodes.bin`, `sectors.bin`, `edges.bin`, `profile_ids.bin`,
    /// `elevations.bin` and `attributes.bin`.
    ///
    /// The grid bounds are not stored; they are derived here from one pass
    /// over the node table. Any missing, truncated or malformed file fails
    /// the whole load: no partial graph is ever returned.
    pub fn load(dir: &Path) -> Result<Graph> {
        let nodes_blob = load_table(dir, "nodes.bin", nodes::NODE_BYTES)?;
        let sectors_blob = load_table(dir, "sectors.bin", sectors::SECTOR_BYTES)?;
        let edges_blob = load_table(dir, "edges.bin", edges::EDGE_BYTES)?;
        let profile_ids = load_table(dir, "profile_ids.bin", edges::PROFILE_BYTES)?;
        let elevations = load_table(dir, "elevations.bin", edges::SAMPLE_BYTES)?;
        let attributes_blob = load_table(dir, "attributes.bin", attributes::ATTRIBUTE_SET_BYTES)?;

        if sectors_blob.len() != sectors::SECTOR_COUNT * sectors::SECTOR_BYTES {
            return Err(Error::Malformed {
                path: dir.join("sectors.bin"),
                reason: format!(
                    "expected exactly {} sector records, found {}",
                    sectors::SECTOR_COUNT,
                    sectors_blob.len() / sectors::SECTOR_BYTES
                ),
            });
        }
        if profile_ids.len() / edges::PROFILE_BYTES != edges_blob.len() / edges::EDGE_BYTES {
            return Err(Error::Malformed {
                path: dir.join("profile_ids.bin"),
                reason: format!(
                    "{} profile descriptors for {} edges",
                    profile_ids.len() / edges::PROFILE_BYTES,
                    edges_blob.len() / edges::EDGE_BYTES
                ),
            });
        }

        let set_count = attributes_blob.len() / attributes::ATTRIBUTE_SET_BYTES;
        let mut attribute_sets = Vec::with_capacity(set_count);
        for i in 0..set_count {
            let raw = attributes_blob.u64_at(i * attributes::ATTRIBUTE_SET_BYTES);
            if raw & !AttributeSet::VALID_MASK != 0 {
                return Err(Error::Malformed {
                    path: dir.join("attributes.bin"),
                    reason: format!("attribute set {i} has bits above the valid mask: {raw:#x}"),
                });
            }
            attribute_sets.push(AttributeSet::new(raw));
        }

        let nodes = NodeTable::new(nodes_blob);
        let bounds = node_bounds(&nodes).ok_or_else(|| Error::Malformed {
            path: dir.join("nodes.bin"),
            reason: "empty node table".to_owned(),
        })?;

        let graph = Graph::new(
            nodes,
            SectorIndex::new(sectors_blob, bounds),
            EdgeTable::new(edges_blob, profile_ids, elevations),
            attribute_sets,
        );
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            attribute_sets = graph.attribute_sets.len(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> u32 {
        self.nodes.count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> u32 {
        self.edges.count()
    }

    /// Bounding box of the network.
    pub fn bounds(&self) -> Bounds {
        self.sectors.bounds()
    }

    /// Position of the node.
    pub fn node_point(&self, node_id: u32) -> PointEn {
        PointEn::new(self.nodes.node_e(node_id), self.nodes.node_n(node_id))
    }

    /// Number of edges leaving the node.
    pub fn node_out_degree(&self, node_id: u32) -> u32 {
        self.nodes.out_degree(node_id)
    }

    /// Id of the `edge_index`-th edge leaving the node.
    pub fn node_out_edge_id(&self, node_id: u32, edge_index: u32) -> u32 {
        self.nodes.edge_id(node_id, edge_index)
    }

    /// Id of the node closest to `point` within `search_distance` meters,
    /// or `None` when no node qualifies.
    ///
    /// Only nodes in sectors overlapping the search square are examined, so
    /// the cost is bounded by the query's neighborhood; a distance covering
    /// the whole grid degrades to an exact full scan.
    ///
    /// # Panics
    ///
    /// Panics unless `search_distance > 0`.
    pub fn node_closest_to(&self, point: PointEn, search_distance: f64) -> Option<u32> {
        let mut best = search_distance * search_distance;
        let mut best_id = None;
        for sector in self.sectors.sectors_overlapping(point, search_distance) {
            for node_id in sector.start_node..sector.end_node {
                let distance = point.squared_distance_to(self.node_point(node_id));
                if distance <= best {
                    best = distance;
                    best_id = Some(node_id);
                }
            }
        }
        best_id
    }

    /// Id of the node the edge leads to.
    pub fn edge_target_node(&self, edge_id: u32) -> u32 {
        self.edges.target_node(edge_id)
    }

    /// Whether the edge runs against its road's canonical direction.
    pub fn edge_is_inverted(&self, edge_id: u32) -> bool {
        self.edges.is_inverted(edge_id)
    }

    /// The OSM attributes of the edge's road.
    pub fn edge_attributes(&self, edge_id: u32) -> AttributeSet {
        self.attribute_sets[self.edges.attributes_index(edge_id) as usize]
    }

    /// Length of the edge, meters.
    pub fn edge_length(&self, edge_id: u32) -> f64 {
        self.edges.length(edge_id)
    }

    /// Total positive elevation gain of the edge, meters.
    pub fn edge_elevation_gain(&self, edge_id: u32) -> f64 {
        self.edges.elevation_gain(edge_id)
    }

    /// Elevation along the edge as a function of position, constant `NaN`
    /// when the edge has no elevation data.
    pub fn edge_profile(&self, edge_id: u32) -> ElevationFunction {
        if self.edges.has_profile(edge_id) {
            ElevationFunction::sampled(self.edges.profile_samples(edge_id), self.edge_length(edge_id))
        } else {
            ElevationFunction::constant(f64::NAN)
        }
    }
}

fn load_table(dir: &Path, name: &str, record_bytes: usize) -> Result<Blob> {
    let path = dir.join(name);
    let blob = Blob::map_file(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    if blob.len() % record_bytes != 0 {
        return Err(Error::Malformed {
            path,
            reason: format!(
                "length {} is not a multiple of the {record_bytes}-byte record size",
                blob.len()
            ),
        });
    }
    Ok(blob)
}

fn node_bounds(nodes: &NodeTable) -> Option<Bounds> {
    if nodes.count() == 0 {
        return None;
    }
    let (mut min_e, mut min_n) = (f64::INFINITY, f64::INFINITY);
    let (mut max_e, mut max_n) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node_id in 0..nodes.count() {
        let (e, n) = (nodes.node_e(node_id), nodes.node_n(node_id));
        min_e = min_e.min(e);
        min_n = min_n.min(n);
        max_e = max_e.max(e);
        max_n = max_n.max(n);
    }
    Some(Bounds::new(min_e, min_n, max_e, max_n))
}
