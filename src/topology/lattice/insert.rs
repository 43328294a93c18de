//! Insertion and revision-chain queries.
//!
//! Every coordinate's history is an append-only chain of cells, oldest first,
//! rooted at the scaffold cell the head window materialized there. The chain
//! is threaded through dedicated `earlier`/`later` links on both halves; axis
//! links only ever describe spatial adjacency.

use super::Lattice;
use crate::topology::arena::{CellId, Payload};
use crate::topology::coord::{Coord, Half};
use std::fmt;

impl<T: fmt::Debug> Lattice<T> {
    /// Appends `payload` as the newest revision at `coord`.
    ///
    /// 1. Moves the head so that `coord` is the active (centroid) cell.
    /// 2. Walks the landing cell's chain to its terminal revision.
    /// 3. Creates a new cell from a value half and a sentinel half.
    /// 4. Threads it onto the chain after the terminal revision.
    /// 5. Hands the terminal's axis links over to the new cell.
    /// 6. Makes it the indexed occupant and refreshes cached handles.
    ///
    /// Earlier revisions are never mutated apart from losing their axis
    /// links; their payloads stay reachable through [`earlier`](Self::earlier).
    pub fn insert(&mut self, payload: T, coord: Coord) -> CellId {
        log::debug!("inserting {payload:?} at {coord}");
        let (cx, cy, cz) = self.config.window.centroid();
        let landing = self.move_absolute(coord.offset(-cx, -cy, -cz));
        debug_assert_eq!(self.coord(landing), coord);

        let terminal = self.chain_terminal(landing);
        let newer = self.arena.new_cell(Payload::Value(payload), coord);
        self.arena.append_revision(terminal, newer);
        self.arena.transfer_axes(terminal, newer);

        self.index.insert(coord, newer);
        self.head.supersede(coord, newer);
        self.landing.supersede(terminal, newer);
        self.stats.inserts += 1;
        log::trace!("{newer} supersedes {terminal} at {coord}");

        crate::debug_assert_ok!(
            self.check_cell_with(newer, crate::topology::integrity::IntegrityOptions::default()),
            "insert broke reciprocity"
        );
        #[cfg(feature = "strict-invariants")]
        crate::debug_invariants::DebugInvariants::debug_assert_invariants(self);
        newer
    }
}

impl<T> Lattice<T> {
    /// The revision that preceded `cell` at its coordinate.
    pub fn earlier(&self, cell: CellId) -> Option<CellId> {
        let tr = self.arena.half(cell, Half::Value).earlier()?;
        self.arena.lbit(tr).cell()
    }

    /// The revision that superseded `cell` at its coordinate.
    pub fn later(&self, cell: CellId) -> Option<CellId> {
        let tr = self.arena.half(cell, Half::Value).later()?;
        self.arena.lbit(tr).cell()
    }

    /// Follows `later` links from `cell` to the newest revision.
    pub fn chain_terminal(&self, cell: CellId) -> CellId {
        let mut at = cell;
        while let Some(next) = self.later(at) {
            at = next;
        }
        at
    }

    /// Follows `earlier` links from `cell` to the chain root.
    pub fn chain_root(&self, cell: CellId) -> CellId {
        let mut at = cell;
        while let Some(prev) = self.earlier(at) {
            at = prev;
        }
        at
    }

    /// Every revision ever held at `coord`, oldest first. Empty if the
    /// coordinate was never materialized.
    pub fn history(&self, coord: Coord) -> Vec<CellId> {
        let Some(current) = self.retrieve(coord) else {
            return Vec::new();
        };
        let mut chain = vec![current];
        let mut at = current;
        while let Some(prev) = self.earlier(at) {
            chain.push(prev);
            at = prev;
        }
        chain.reverse();
        chain
    }

    /// Client payloads held at `coord`, oldest first, skipping the scaffold.
    pub fn values_at(&self, coord: Coord) -> Vec<&T> {
        self.history(coord)
            .into_iter()
            .filter_map(|c| self.value(c))
            .collect()
    }
}
