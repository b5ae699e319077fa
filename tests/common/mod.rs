//! Test-only graph builder: encodes a node/edge description into the six
//! flat buffers of the binary layout.
#![allow(dead_code)]

use std::path::Path;

use velograph::geom::Bounds;
use velograph::graph::blob::Blob;
use velograph::graph::edges::EdgeTable;
use velograph::graph::nodes::NodeTable;
use velograph::graph::sectors::{SectorIndex, GRID_DIM};
use velograph::graph::Graph;
use velograph::AttributeSet;

const Q: f64 = 16.0;

/// Routes library logs to the test output; safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct TestEdge {
    to: u32,
    length_q: u16,
    attribute_index: u16,
    inverted: bool,
    /// Raw Q28.4 sample words, already in canonical (un-inverted) order.
    samples: Option<Vec<u16>>,
}

/// Builds graphs for tests. Edges are grouped by their from-node at encode
/// time (the layout stores a node's out-edges contiguously); every sector
/// record spans the whole node table, which satisfies every query
/// brute-force.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<(f64, f64)>,
    out_edges: Vec<Vec<TestEdge>>,
    attribute_sets: Vec<u64>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            out_edges: Vec::new(),
            attribute_sets: vec![0],
        }
    }

    /// Adds a node and returns its id.
    pub fn node(&mut self, e: f64, n: f64) -> u32 {
        self.nodes.push((e, n));
        self.out_edges.push(Vec::new());
        (self.nodes.len() - 1) as u32
    }

    /// Adds an edge with the empty attribute set and no elevation data.
    pub fn edge(&mut self, from: u32, to: u32, length: f64) {
        self.edge_full(from, to, length, 0, false, None);
    }

    /// Adds an edge with every knob exposed. `samples` are elevations in
    /// meters and must match the sample count the length implies
    /// (`1 + ceil(length / 2)`).
    pub fn edge_full(
        &mut self,
        from: u32,
        to: u32,
        length: f64,
        attribute_index: u16,
        inverted: bool,
        samples: Option<Vec<f64>>,
    ) {
        let length_q = (length * Q).round() as u16;
        let samples = samples.map(|samples| {
            let expected = 1 + (usize::from(length_q)).div_ceil(32);
            assert_eq!(samples.len(), expected, "length {length} needs {expected} samples");
            samples.iter().map(|s| (s * Q).round() as u16).collect()
        });
        self.out_edges[from as usize].push(TestEdge {
            to,
            length_q,
            attribute_index,
            inverted,
            samples,
        });
    }

    /// Registers an attribute set and returns its index.
    pub fn attribute_set(&mut self, set: AttributeSet) -> u16 {
        self.attribute_sets.push(set.bits());
        (self.attribute_sets.len() - 1) as u16
    }

    fn encode(&self) -> [Vec<u8>; 6] {
        let mut nodes_bin = Vec::new();
        let mut edges_bin = Vec::new();
        let mut profile_ids_bin = Vec::new();
        let mut elevations_bin = Vec::new();

        let mut next_edge_id = 0u32;
        let mut next_sample_id = 0u32;
        for (node_id, (e, n)) in self.nodes.iter().enumerate() {
            let out = &self.out_edges[node_id];
            nodes_bin.extend_from_slice(&((e * Q).round() as i32).to_le_bytes());
            nodes_bin.extend_from_slice(&((n * Q).round() as i32).to_le_bytes());
            nodes_bin.extend_from_slice(&(((out.len() as u32) << 28) | next_edge_id).to_le_bytes());
            next_edge_id += out.len() as u32;

            for edge in out {
                let target = if edge.inverted {
                    !(edge.to as i32)
                } else {
                    edge.to as i32
                };
                edges_bin.extend_from_slice(&target.to_le_bytes());
                edges_bin.extend_from_slice(&edge.length_q.to_le_bytes());
                edges_bin.extend_from_slice(&0u16.to_le_bytes());
                edges_bin.extend_from_slice(&edge.attribute_index.to_le_bytes());

                match &edge.samples {
                    Some(samples) => {
                        // Raw encoding (type 1).
                        profile_ids_bin
                            .extend_from_slice(&((1 << 30) | next_sample_id).to_le_bytes());
                        for word in samples {
                            elevations_bin.extend_from_slice(&word.to_le_bytes());
                        }
                        next_sample_id += samples.len() as u32;
                    }
                    None => profile_ids_bin.extend_from_slice(&0u32.to_le_bytes()),
                }
            }
        }

        let mut sectors_bin = Vec::new();
        for _ in 0..GRID_DIM * GRID_DIM {
            sectors_bin.extend_from_slice(&0i32.to_le_bytes());
            sectors_bin.extend_from_slice(&(self.nodes.len() as u16).to_le_bytes());
        }

        let mut attributes_bin = Vec::new();
        for bits in &self.attribute_sets {
            attributes_bin.extend_from_slice(&bits.to_le_bytes());
        }

        [
            nodes_bin,
            sectors_bin,
            edges_bin,
            profile_ids_bin,
            elevations_bin,
            attributes_bin,
        ]
    }

    /// Writes the six files into `dir` for [`Graph::load`].
    pub fn write_to(&self, dir: &Path) {
        let [nodes, sectors, edges, profile_ids, elevations, attributes] = self.encode();
        std::fs::write(dir.join("nodes.bin"), nodes).unwrap();
        std::fs::write(dir.join("sectors.bin"), sectors).unwrap();
        std::fs::write(dir.join("edges.bin"), edges).unwrap();
        std::fs::write(dir.join("profile_ids.bin"), profile_ids).unwrap();
        std::fs::write(dir.join("elevations.bin"), elevations).unwrap();
        std::fs::write(dir.join("attributes.bin"), attributes).unwrap();
    }

    /// Builds the graph in memory, without touching the filesystem.
    pub fn build(&self) -> Graph {
        let [nodes, sectors, edges, profile_ids, elevations, attributes] = self.encode();
        let bounds = self.bounds();
        let attribute_sets = attributes
            .chunks_exact(8)
            .map(|chunk| AttributeSet::new(u64::from_le_bytes(chunk.try_into().unwrap())))
            .collect();
        Graph::new(
            NodeTable::new(Blob::from_vec(nodes)),
            SectorIndex::new(Blob::from_vec(sectors), bounds),
            EdgeTable::new(
                Blob::from_vec(edges),
                Blob::from_vec(profile_ids),
                Blob::from_vec(elevations),
            ),
            attribute_sets,
        )
    }

    fn bounds(&self) -> Bounds {
        let mut min_e = f64::INFINITY;
        let mut min_n = f64::INFINITY;
        let mut max_e = f64::NEG_INFINITY;
        let mut max_n = f64::NEG_INFINITY;
        for (e, n) in &self.nodes {
            min_e = min_e.min(*e);
            min_n = min_n.min(*n);
            max_e = max_e.max(*e);
            max_n = max_n.max(*n);
        }
        Bounds::new(min_e, min_n, max_e, max_n)
    }
}
