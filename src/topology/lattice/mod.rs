//! The lattice engine: coordinate index, head window, navigation, insertion.
//!
//! A [`Lattice`] owns a [`NodeArena`] holding every cell revision ever created,
//! a sparse index from [`Coord`] to the current occupant, and a [`HeadWindow`]
//! of freshly cross-linked cells around the navigation origin.
//!
//! # Invariants
//!
//! - Every indexed cell sits at its key coordinate and is the terminal
//!   revision of its chain.
//! - Axis links only ever join current occupants of adjacent coordinates, and
//!   are always set in both directions (value half of the upper cell <->
//!   sentinel half of the lower cell).
//! - Superseded revisions keep no axis links; they are reachable through the
//!   revision chain of the cell that replaced them.
//! - Every window slot holds the current occupant of its coordinate.
//!
//! These are checked after insertions in debug builds and with the
//! `strict-invariants` feature, and on demand via
//! [`validate_invariants`](crate::DebugInvariants::validate_invariants).
//!
//! The engine is single-owner: every mutation takes `&mut self`. Wrap it in
//! [`SharedLattice`](crate::sync::SharedLattice) to cross threads.

mod head;
mod insert;
mod navigator;

pub use head::{HeadWindow, WindowDims};

use crate::debug_invariants::DebugInvariants;
use crate::lattice_error::LatticeError;
use crate::topology::arena::{CellId, DBit, LBit, NodeArena, Payload};
use crate::topology::cache::LandingCache;
use crate::topology::coord::{Coord, Half};
use crate::topology::fast_map::FastMap;
use crate::topology::integrity::IntegrityOptions;
use crate::topology::time_root::TimeRoot;
use std::fmt;

/// Construction options for a [`Lattice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeConfig {
    /// Extents of the head window.
    pub window: WindowDims,
    /// Origin the head window is first initialized at.
    pub initial_origin: Coord,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            window: WindowDims::default(),
            initial_origin: Coord::new(-1, -1, -1),
        }
    }
}

/// Counters describing navigation work done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavStats {
    /// Number of head window (re)initializations.
    pub window_rebuilds: u64,
    /// Cells created by window initialization.
    pub cells_materialized: u64,
    /// Revisions appended by insertion.
    pub inserts: u64,
}

/// Sparse 3D lattice of axis-linked, revisioned cells.
#[derive(Clone, Debug)]
pub struct Lattice<T> {
    pub(crate) arena: NodeArena<T>,
    pub(crate) index: FastMap<Coord, CellId>,
    pub(crate) head: HeadWindow,
    pub(crate) landing: LandingCache,
    pub(crate) config: LatticeConfig,
    pub(crate) stats: NavStats,
}

impl<T> Lattice<T> {
    /// A lattice with the default 3x3x3 window initialized around (0,0,0).
    pub fn new() -> Self {
        Self::init(LatticeConfig::default())
    }

    /// A lattice with custom window extents and initial origin.
    ///
    /// # Errors
    /// Returns `Err(InvalidWindow)` if any window extent is zero.
    pub fn with_config(config: LatticeConfig) -> Result<Self, LatticeError> {
        config.window.validate()?;
        Ok(Self::init(config))
    }

    fn init(config: LatticeConfig) -> Self {
        let mut lattice = Lattice {
            arena: NodeArena::new(),
            index: FastMap::default(),
            head: HeadWindow::unanchored(config.window),
            landing: LandingCache::default(),
            config,
            stats: NavStats::default(),
        };
        lattice.initialize_window(config.initial_origin);
        lattice
    }

    #[inline]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> NavStats {
        self.stats
    }

    #[inline]
    pub fn head(&self) -> &HeadWindow {
        &self.head
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena<T> {
        &self.arena
    }

    /// The current occupant of `coord`, if any. Never constructs.
    #[inline]
    pub fn retrieve(&self, coord: Coord) -> Option<CellId> {
        self.index.get(&coord).copied()
    }

    /// Like [`retrieve`](Self::retrieve), but reports an absent coordinate
    /// as `Err(CoordinateNotFound)`.
    pub fn try_retrieve(&self, coord: Coord) -> Result<CellId, LatticeError> {
        self.retrieve(coord)
            .ok_or(LatticeError::CoordinateNotFound(coord))
    }

    /// Payload value of the current occupant of `coord`.
    pub fn value_at(&self, coord: Coord) -> Option<&T> {
        self.retrieve(coord).and_then(|c| self.value(c))
    }

    #[inline]
    pub fn dbit(&self, cell: CellId) -> &DBit {
        self.arena.dbit(cell)
    }

    #[inline]
    pub fn lbit(&self, tr: TimeRoot) -> &LBit<T> {
        self.arena.lbit(tr)
    }

    #[inline]
    pub fn coord(&self, cell: CellId) -> Coord {
        self.arena.dbit(cell).coord()
    }

    /// Payload of the value half of `cell`.
    #[inline]
    pub fn payload(&self, cell: CellId) -> &Payload<T> {
        self.arena.half(cell, Half::Value).payload()
    }

    #[inline]
    pub fn value(&self, cell: CellId) -> Option<&T> {
        self.payload(cell).value()
    }

    /// Whether `cell` is the current occupant of its coordinate.
    pub fn is_current(&self, cell: CellId) -> bool {
        self.retrieve(self.coord(cell)) == Some(cell)
    }

    /// Number of indexed coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current occupants in coordinate order.
    pub fn current_cells(&self) -> Vec<(Coord, CellId)> {
        let mut cells: Vec<(Coord, CellId)> = self.index.iter().map(|(c, id)| (*c, *id)).collect();
        cells.sort_unstable();
        cells
    }

    /// Every cell revision ever created, oldest first.
    pub fn history_cells(&self) -> impl ExactSizeIterator<Item = (CellId, &DBit)> + '_ {
        self.arena.history()
    }

    /// Human-readable label for an LBit payload, as used in traces.
    ///
    /// Scaffold halves are labelled after their coordinate (`3d0_0_0`).
    pub fn label(&self, tr: TimeRoot) -> String
    where
        T: fmt::Debug,
    {
        let lbit = self.arena.lbit(tr);
        match lbit.payload() {
            Payload::Value(v) => format!("{v:?}"),
            Payload::TimeRoot => "time_root".to_string(),
            Payload::Scaffold => match lbit.cell() {
                Some(cell) => {
                    let c = self.coord(cell);
                    format!("3d{}_{}_{}", c.x, c.y, c.z)
                }
                None => "3d?".to_string(),
            },
        }
    }

    /// Returns the indexed cell at `coord`, materializing a scaffold cell
    /// when the coordinate has never been touched.
    pub(crate) fn lookup_or_create(&mut self, coord: Coord) -> CellId {
        if let Some(cell) = self.retrieve(coord) {
            return cell;
        }
        let cell = self.arena.new_cell(Payload::Scaffold, coord);
        self.index.insert(coord, cell);
        self.stats.cells_materialized += 1;
        log::trace!("materialized {cell} at {coord}");
        cell
    }
}

impl<T> Default for Lattice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> DebugInvariants for Lattice<T> {
    fn debug_assert_invariants(&self) {
        crate::debug_assert_ok!(self.validate_invariants(), "Lattice invalid");
    }

    fn validate_invariants(&self) -> Result<(), LatticeError> {
        // 1) counterpart pairing and owner back-references on every revision
        for (id, dbit) in self.arena.history() {
            let l0 = self.arena.lbit(dbit.half(Half::Value));
            let l1 = self.arena.lbit(dbit.half(Half::Sentinel));
            if l0.other() != Some(l1.time_root())
                || l1.other() != Some(l0.time_root())
                || l0.cell() != Some(id)
                || l1.cell() != Some(id)
            {
                return Err(LatticeError::Invariant(format!(
                    "counterpart pairing broken on {id} at {}",
                    dbit.coord()
                )));
            }
        }

        // 2) revision chains are reciprocal, stay in place and run forward
        for (id, _) in self.arena.history() {
            for half in [Half::Value, Half::Sentinel] {
                if let Some(fault) = self.arena.chain_fault(id, half) {
                    return Err(LatticeError::Invariant(fault));
                }
            }
        }

        // 3) index entries sit at their key and terminate their chain
        for (coord, cell) in self.current_cells() {
            let dbit = self.arena.try_dbit(cell)?;
            if dbit.coord() != coord {
                return Err(LatticeError::Invariant(format!(
                    "{cell} indexed at {coord} but located at {}",
                    dbit.coord()
                )));
            }
            if self.arena.half(cell, Half::Value).later().is_some() {
                return Err(LatticeError::Invariant(format!(
                    "{cell} indexed at {coord} has a later revision"
                )));
            }
        }

        // 4) window slots match the index
        for (coord, cell) in self.head.iter() {
            if self.retrieve(coord) != Some(cell) {
                return Err(LatticeError::Invariant(format!(
                    "head window slot {coord} holds stale {cell}"
                )));
            }
        }

        // 5) reciprocity over every current cell
        self.check_integrity_with(IntegrityOptions::default())
            .map(|_| ())
    }
}
