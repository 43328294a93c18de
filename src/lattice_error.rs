//! LatticeError: Unified error type for world-lattice public APIs
//!
//! Every fallible operation in the crate returns this type. Variants carrying
//! I/O or codec failures hold the rendered message rather than the source
//! error so the enum stays `Clone + Eq` and can be compared in tests.

use crate::topology::arena::CellId;
use crate::topology::coord::Coord;
use crate::topology::integrity::IntegrityViolation;
use crate::topology::path::{Node, Step};
use crate::topology::time_root::TimeRoot;
use thiserror::Error;

/// Unified error type for lattice operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// A traversal step dereferenced an absent neighbour or counterpart.
    #[error("missing reference: `{step}` is unset on {at}")]
    MissingReference { at: Node, step: Step },
    /// A traversal step does not apply to the kind of node it was taken from.
    #[error("invalid step `{step}` taken from {node}")]
    InvalidStep { node: Node, step: Step },
    /// A reciprocity test path resolved fully but did not return to its subject.
    #[error("data integrity failure: {0}")]
    DataIntegrity(Box<IntegrityViolation>),
    /// No cell is indexed at this coordinate.
    #[error("no cell indexed at {0}")]
    CoordinateNotFound(Coord),
    /// Head window extents must all be non-zero.
    #[error("invalid head window dimensions {x}x{y}x{z}")]
    InvalidWindow { x: usize, y: usize, z: usize },
    /// The cell handle was not issued by this lattice.
    #[error("unknown cell handle {0}")]
    UnknownCell(CellId),
    /// The time root was not issued by this lattice.
    #[error("unknown time root {0}")]
    UnknownTimeRoot(TimeRoot),
    /// A structural invariant of the lattice does not hold.
    #[error("lattice invariant violated: {0}")]
    Invariant(String),
    /// A snapshot failed structural validation while being reloaded.
    #[error("snapshot rejected: {0}")]
    Snapshot(String),
    /// Encoding, decoding or file access failed while moving a snapshot.
    #[error("snapshot I/O error: {0}")]
    SnapshotIo(String),
    /// A walker command string was not recognised.
    #[error("unknown walker command `{0}`")]
    UnknownCommand(String),
}

impl From<std::io::Error> for LatticeError {
    fn from(e: std::io::Error) -> Self {
        LatticeError::SnapshotIo(e.to_string())
    }
}

impl From<serde_json::Error> for LatticeError {
    fn from(e: serde_json::Error) -> Self {
        LatticeError::SnapshotIo(e.to_string())
    }
}

impl From<bincode::Error> for LatticeError {
    fn from(e: bincode::Error) -> Self {
        LatticeError::SnapshotIo(e.to_string())
    }
}
