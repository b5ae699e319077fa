//! Read-only backing buffers for the graph tables.

use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;

/// A read-only byte buffer, either memory-mapped from a file or owned.
///
/// Every table decodes its records from a `Blob` with fixed-stride offset
/// arithmetic; nothing is materialized up front. Buffers are immutable for
/// the process lifetime once loaded, so any number of threads may read them
/// concurrently. All multi-byte accessors are little-endian.
#[derive(Debug)]
pub struct Blob(Repr);

#[derive(Debug)]
enum Repr {
    Mapped(Mmap),
    Owned(Box<[u8]>),
}

impl Blob {
    /// Memory-maps `path` read-only. An empty file becomes an empty owned
    /// buffer, since zero-length mappings are not portable.
    pub fn map_file(path: &Path) -> io::Result<Blob> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Blob::from_vec(Vec::new()));
        }
        // Safety: the mapping is read-only and graph files are not modified
        // while the process runs.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Blob(Repr::Mapped(map)))
    }

    /// Wraps an owned byte vector (tests, synthetic graphs).
    pub fn from_vec(bytes: Vec<u8>) -> Blob {
        Blob(Repr::Owned(bytes.into_boxed_slice()))
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    fn bytes(&self) -> &[u8] {
        match &self.0 {
            Repr::Mapped(map) => map,
            Repr::Owned(bytes) => bytes,
        }
    }

    /// Little-endian `u16` at byte offset `offset`.
    pub fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.array_at(offset))
    }

    /// Little-endian `i32` at byte offset `offset`.
    pub fn i32_at(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.array_at(offset))
    }

    /// Little-endian `u32` at byte offset `offset`.
    pub fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.array_at(offset))
    }

    /// Little-endian `u64` at byte offset `offset`.
    pub fn u64_at(&self, offset: usize) -> u64 {
        u64::from_le_bytes(self.array_at(offset))
    }

    fn array_at<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut array = [0u8; N];
        array.copy_from_slice(&self.bytes()[offset..offset + N]);
        array
    }
}
