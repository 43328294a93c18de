#![cfg_attr(docsrs, feature(doc_cfg))]
//! # world-lattice
//!
//! world-lattice is a sparse, integer-addressed 3D lattice whose cells are
//! cross-linked to their six axis neighbours and versioned in time. Every
//! coordinate holds an append-only chain of revisions; inserting a payload
//! appends a revision and hands the old cell's neighbour links to the new one.
//!
//! ## Features
//! - Arena-owned node graph: half-cells (`LBit`) paired into cells (`DBit`),
//!   addressed by monotonic [`TimeRoot`](topology::TimeRoot) identities
//! - A head window of freshly linked cells that follows every move and insert
//! - Link-following traversal ([`Move`](topology::Move)) through space and time
//! - A reciprocity checker that walks 24 closed paths per cell
//! - Snapshots through JSON or bincode, and a one-file-per-cell directory store
//! - A seeded random-walk workload and a mutex-wrapped shared handle
//!
//! ## Cargo features
//! - `strict-invariants`: run full invariant checks after every insertion, in
//!   release builds too
//! - `fast-hash`: `ahash`-backed coordinate index
//! - `deterministic-order`: `BTreeMap`-backed coordinate index
//!
//! ## Determinism
//!
//! TimeRoots are issued by a clock owned by each lattice, so two lattices
//! driven by the same calls issue the same identities. The random walk takes
//! its `SmallRng` seed from [`WalkOptions`](algs::WalkOptions).
//!
//! ## Usage
//!
//! ```
//! use world_lattice::prelude::*;
//!
//! let mut lattice = Lattice::new();
//! lattice.insert("origin", Coord::new(0, 0, 0));
//! let cell = lattice.insert("one", Coord::new(1, 1, 1));
//!
//! assert_eq!(lattice.value_at(Coord::new(1, 1, 1)), Some(&"one"));
//! let below = lattice.step(cell, Move::XM).unwrap();
//! assert_eq!(lattice.coord(below), Coord::new(0, 1, 1));
//! assert!(lattice.check_integrity().unwrap().is_clean());
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod io;
pub mod lattice_error;
pub mod render;
pub mod sync;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use lattice_error::LatticeError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::walk::{WalkOptions, WalkSummary, random_walk};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{BincodeCodec, CellDirStore, JsonCodec, SnapshotReader, SnapshotWriter};
    pub use crate::lattice_error::LatticeError;
    pub use crate::render::{RenderCell, neighbourhood_model};
    pub use crate::sync::SharedLattice;
    pub use crate::topology::{
        Axis, CellId, Coord, Half, IntegrityOptions, InvalidateCache, Lattice, LatticeConfig,
        Move, Payload, TimeRoot, ViolationHandling, WindowDims,
    };
}
