//! Edge table: per-edge records and the three elevation-sample encodings.

use crate::bits;
use crate::fixed;
use crate::graph::blob::Blob;

/// Bytes per edge record: target node (i32, sign bit = inverted direction,
/// id = bit complement when negative), length (u16, Q28.4), elevation gain
/// (u16, Q28.4), attribute set index (u16).
pub const EDGE_BYTES: usize = 10;
/// Bytes per profile descriptor: top 2 bits encoding type, low 30 bits the
/// id of the edge's first elevation sample.
pub const PROFILE_BYTES: usize = 4;
/// Bytes per stored elevation sample word.
pub const SAMPLE_BYTES: usize = 2;

const OFFSET_TARGET: usize = 0;
const OFFSET_LENGTH: usize = 4;
const OFFSET_ELEVATION_GAIN: usize = 6;
const OFFSET_ATTRIBUTES: usize = 8;

const PROFILE_NONE: u32 = 0;
const PROFILE_RAW: u32 = 1;
const PROFILE_DELTA_8: u32 = 2;
const PROFILE_DELTA_4: u32 = 3;

/// Spacing between elevation samples along an edge, as a Q28.4 length
/// (two meters).
const SAMPLE_SPACING_Q: u32 = fixed::of_int(2) as u32;

/// Read-only table of all graph edges.
///
/// Backed by three buffers: the edge records, one profile descriptor per
/// edge, and the shared elevation sample words the descriptors point into.
#[derive(Debug)]
pub struct EdgeTable {
    edges: Blob,
    profile_ids: Blob,
    elevations: Blob,
}

impl EdgeTable {
    /// Wraps the three flat buffers.
    ///
    /// # Panics
    ///
    /// Panics if a buffer length is not a multiple of its record size, or
    /// if the descriptor count differs from the edge count.
    pub fn new(edges: Blob, profile_ids: Blob, elevations: Blob) -> Self {
        assert_eq!(
            edges.len() % EDGE_BYTES,
            0,
            "edge buffer length {} is not a multiple of {EDGE_BYTES}",
            edges.len()
        );
        assert_eq!(
            profile_ids.len() % PROFILE_BYTES,
            0,
            "profile descriptor buffer length {} is not a multiple of {PROFILE_BYTES}",
            profile_ids.len()
        );
        assert_eq!(
            profile_ids.len() / PROFILE_BYTES,
            edges.len() / EDGE_BYTES,
            "one profile descriptor per edge required"
        );
        assert_eq!(
            elevations.len() % SAMPLE_BYTES,
            0,
            "elevation buffer length {} is not a multiple of {SAMPLE_BYTES}",
            elevations.len()
        );
        Self {
            edges,
            profile_ids,
            elevations,
        }
    }

    /// Number of edges in the table.
    pub fn count(&self) -> u32 {
        (self.edges.len() / EDGE_BYTES) as u32
    }

    /// Whether the edge runs against its road's canonical direction.
    ///
    /// # Panics
    ///
    /// All per-edge accessors panic if `edge_id >= count()`.
    pub fn is_inverted(&self, edge_id: u32) -> bool {
        self.target_word(edge_id) < 0
    }

    /// Id of the node the edge leads to.
    pub fn target_node(&self, edge_id: u32) -> u32 {
        let target = self.target_word(edge_id);
        if target < 0 {
            !target as u32
        } else {
            target as u32
        }
    }

    /// Length of the edge, meters.
    pub fn length(&self, edge_id: u32) -> f64 {
        fixed::as_f64(i32::from(self.length_q(edge_id)))
    }

    /// Total positive elevation gain of the edge, meters.
    pub fn elevation_gain(&self, edge_id: u32) -> f64 {
        fixed::as_f64(i32::from(
            self.edges.u16_at(self.base(edge_id) + OFFSET_ELEVATION_GAIN),
        ))
    }

    /// Index of the edge's attribute set in the shared attribute table.
    pub fn attributes_index(&self, edge_id: u32) -> u16 {
        self.edges.u16_at(self.base(edge_id) + OFFSET_ATTRIBUTES)
    }

    /// Whether the edge carries elevation samples.
    pub fn has_profile(&self, edge_id: u32) -> bool {
        self.profile_encoding(edge_id) != PROFILE_NONE
    }

    /// The edge's elevation samples in traversal order, empty when the edge
    /// has none.
    ///
    /// Samples are stored in the road's canonical direction; for inverted
    /// edges the reconstructed sequence is reversed so that index order
    /// matches the direction the edge is traversed in.
    pub fn profile_samples(&self, edge_id: u32) -> Vec<f32> {
        let encoding = self.profile_encoding(edge_id);
        if encoding == PROFILE_NONE {
            return Vec::new();
        }

        let first = self.first_sample_id(edge_id);
        let count = self.sample_count(edge_id);
        let mut samples = Vec::with_capacity(count);
        samples.push(fixed::as_f32(i32::from(self.sample_word(first))));

        match encoding {
            PROFILE_RAW => {
                for i in 1..count {
                    samples.push(fixed::as_f32(i32::from(self.sample_word(first + i))));
                }
            }
            PROFILE_DELTA_8 | PROFILE_DELTA_4 => {
                // Deltas are packed most-significant-first, two per word for
                // the 8-bit encoding and four per word for the 4-bit one;
                // the word at `first` holds only the initial sample.
                let per_word = if encoding == PROFILE_DELTA_8 { 2 } else { 4 };
                let delta_bits = 16 / per_word as u32;
                for i in 1..count {
                    let word = u32::from(self.sample_word(first + i.div_ceil(per_word)));
                    let start = delta_bits * (per_word as u32 - 1 - ((i - 1) % per_word) as u32);
                    let delta = fixed::as_f32(bits::extract_signed(word, start, delta_bits));
                    samples.push(samples[i - 1] + delta);
                }
            }
            _ => unreachable!("profile encoding is two bits"),
        }

        if self.is_inverted(edge_id) {
            samples.reverse();
        }
        samples
    }

    /// Number of elevation samples the edge's profile holds: one per two
    /// meters of length, plus one.
    pub fn sample_count(&self, edge_id: u32) -> usize {
        1 + u32::from(self.length_q(edge_id)).div_ceil(SAMPLE_SPACING_Q) as usize
    }

    fn length_q(&self, edge_id: u32) -> u16 {
        self.edges.u16_at(self.base(edge_id) + OFFSET_LENGTH)
    }

    fn target_word(&self, edge_id: u32) -> i32 {
        self.edges.i32_at(self.base(edge_id) + OFFSET_TARGET)
    }

    fn profile_encoding(&self, edge_id: u32) -> u32 {
        bits::extract_unsigned(self.profile_word(edge_id), 30, 2)
    }

    fn first_sample_id(&self, edge_id: u32) -> usize {
        bits::extract_unsigned(self.profile_word(edge_id), 0, 30) as usize
    }

    fn profile_word(&self, edge_id: u32) -> u32 {
        self.check(edge_id);
        self.profile_ids.u32_at(edge_id as usize * PROFILE_BYTES)
    }

    fn sample_word(&self, sample_id: usize) -> u16 {
        self.elevations.u16_at(sample_id * SAMPLE_BYTES)
    }

    fn base(&self, edge_id: u32) -> usize {
        self.check(edge_id);
        edge_id as usize * EDGE_BYTES
    }

    fn check(&self, edge_id: u32) {
        assert!(
            edge_id < self.count(),
            "edge id {edge_id} out of range (count {})",
            self.count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RawEdge {
        target: i32,
        length_q: u16,
        gain_q: u16,
        attributes: u16,
        /// (encoding, first sample id)
        profile: (u32, u32),
    }

    fn table(edges: &[RawEdge], elevations: &[u16]) -> EdgeTable {
        let mut edge_bytes = Vec::new();
        let mut profile_bytes = Vec::new();
        for edge in edges {
            edge_bytes.extend_from_slice(&edge.target.to_le_bytes());
            edge_bytes.extend_from_slice(&edge.length_q.to_le_bytes());
            edge_bytes.extend_from_slice(&edge.gain_q.to_le_bytes());
            edge_bytes.extend_from_slice(&edge.attributes.to_le_bytes());
            let (encoding, first) = edge.profile;
            profile_bytes.extend_from_slice(&((encoding << 30) | first).to_le_bytes());
        }
        let mut elevation_bytes = Vec::new();
        for word in elevations {
            elevation_bytes.extend_from_slice(&word.to_le_bytes());
        }
        EdgeTable::new(
            Blob::from_vec(edge_bytes),
            Blob::from_vec(profile_bytes),
            Blob::from_vec(elevation_bytes),
        )
    }

    #[test]
    fn decodes_the_fixed_fields() {
        let edges = table(
            &[RawEdge {
                target: 12,
                length_q: 267, // 16.6875 m
                gain_q: 256,   // 16.0 m
                attributes: 2022,
                profile: (PROFILE_NONE, 0),
            }],
            &[],
        );

        assert_eq!(edges.count(), 1);
        assert!(!edges.is_inverted(0));
        assert_eq!(edges.target_node(0), 12);
        assert_eq!(edges.length(0), 16.6875);
        assert_eq!(edges.elevation_gain(0), 16.0);
        assert_eq!(edges.attributes_index(0), 2022);
        assert!(!edges.has_profile(0));
        assert!(edges.profile_samples(0).is_empty());
    }

    #[test]
    fn inverted_edges_complement_the_target() {
        let edges = table(
            &[RawEdge {
                target: !12,
                length_q: 0,
                gain_q: 0,
                attributes: 0,
                profile: (PROFILE_NONE, 0),
            }],
            &[],
        );
        assert!(edges.is_inverted(0));
        assert_eq!(edges.target_node(0), 12);
    }

    #[test]
    fn sample_count_is_one_per_two_meters_plus_one() {
        let edge = |length_q| RawEdge {
            target: 1,
            length_q,
            gain_q: 0,
            attributes: 0,
            profile: (PROFILE_RAW, 0),
        };
        let edges = table(&[edge(80), edge(267), edge(1)], &[0; 16]);
        // 5.0 m: 1 + ceil(5 / 2) = 4.
        assert_eq!(edges.sample_count(0), 4);
        // 16.6875 m: 1 + ceil(267 / 32) = 10.
        assert_eq!(edges.sample_count(1), 10);
        // Tiny edge still gets two samples.
        assert_eq!(edges.sample_count(2), 2);
    }

    #[test]
    fn raw_profile_reads_samples_directly() {
        let edges = table(
            &[RawEdge {
                target: 1,
                length_q: 80, // 5.0 m, 4 samples
                gain_q: 0,
                attributes: 0,
                profile: (PROFILE_RAW, 1),
            }],
            &[9999, 384, 385, 386, 387],
        );
        assert_eq!(edges.profile_samples(0), vec![24.0, 24.0625, 24.125, 24.1875]);
    }

    #[test]
    fn delta_8_profile_accumulates_high_byte_first() {
        // First sample 24.0; deltas +16 (1.0), -32 (-2.0), +8 (0.5),
        // packed two per word, high byte first.
        let edges = table(
            &[RawEdge {
                target: 1,
                length_q: 80,
                gain_q: 0,
                attributes: 0,
                profile: (PROFILE_DELTA_8, 0),
            }],
            &[384, 0x10E0, 0x0800],
        );
        assert_eq!(edges.profile_samples(0), vec![24.0, 25.0, 23.0, 23.5]);
    }

    #[test]
    fn delta_4_profile_accumulates_high_nibble_first() {
        // First sample 24.0; deltas +1, -2, +3 sixteenths, packed four per
        // word from the high nibble down.
        let edges = table(
            &[RawEdge {
                target: 1,
                length_q: 80,
                gain_q: 0,
                attributes: 0,
                profile: (PROFILE_DELTA_4, 0),
            }],
            &[384, 0x1E30],
        );
        assert_eq!(
            edges.profile_samples(0),
            vec![24.0, 24.0625, 23.9375, 24.125]
        );
    }

    #[test]
    fn delta_encodings_match_the_raw_encoding() {
        // One physical profile (384, 390, 383, 385 sixteenths, i.e. deltas
        // +6, -7, +2) under all three encodings.
        let edge = |profile| RawEdge {
            target: 1,
            length_q: 80,
            gain_q: 0,
            attributes: 0,
            profile,
        };
        let edges = table(
            &[
                edge((PROFILE_RAW, 0)),
                edge((PROFILE_DELTA_8, 4)),
                edge((PROFILE_DELTA_4, 7)),
            ],
            &[
                // Raw words.
                384, 390, 383, 385,
                // 8-bit deltas, high byte first: (+6, -7), (+2, pad).
                384, 0x06F9, 0x0200,
                // 4-bit deltas, high nibble first: (+6, -7, +2, pad).
                384, 0x6920,
            ],
        );
        assert_eq!(edges.profile_samples(0), edges.profile_samples(1));
        assert_eq!(edges.profile_samples(0), edges.profile_samples(2));
        assert_eq!(
            edges.profile_samples(0),
            vec![24.0, 24.375, 23.9375, 24.0625]
        );
    }

    #[test]
    fn inverted_edges_reverse_the_samples() {
        let edges = table(
            &[RawEdge {
                target: !1,
                length_q: 80,
                gain_q: 0,
                attributes: 0,
                profile: (PROFILE_RAW, 0),
            }],
            &[384, 385, 386, 387],
        );
        assert_eq!(
            edges.profile_samples(0),
            vec![24.1875, 24.125, 24.0625, 24.0]
        );
    }

    #[test]
    #[should_panic]
    fn out_of_range_id_panics() {
        table(&[], &[]).length(0);
    }
}
