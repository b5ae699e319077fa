//! Error types for graph loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a graph from its backing files.
///
/// Queries on a loaded graph never return errors: precondition violations
/// (out-of-range ids, invalid bit ranges, non-positive parameters) are
/// programmer errors and panic, and absent results ("no node in range",
/// "no route") are ordinary values.
#[derive(Debug, Error)]
pub enum Error {
    /// A backing file could not be opened or mapped.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backing file exists but cannot be a valid table.
    #[error("malformed graph data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Convenience result type for graph loading.
pub type Result<T> = std::result::Result<T, Error>;
