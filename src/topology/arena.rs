//! Node arena: owner of every LBit and DBit a lattice ever creates.
//!
//! Links between nodes (counterpart, axis neighbours, revision chain, owning
//! cell) are stored as handles into this arena rather than as references, so
//! the cyclic graph has a single owner and nothing is ever freed piecemeal.
//!
//! LBits are addressed by their [`TimeRoot`]; since every identity issued by
//! the arena's clock is stored here, identities double as dense indices.
//! DBits are addressed by [`CellId`] in creation order, which makes the DBit
//! vector the append-only history.

use crate::lattice_error::LatticeError;
use crate::topology::coord::{Axis, Coord, Half};
use crate::topology::time_root::{TimeRoot, TimeRootGen};
use std::fmt;

/// Stable handle to a DBit (a cell revision).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct CellId(pub(crate) usize);

impl CellId {
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellId").field(&self.0).finish()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dbit#{}", self.0)
    }
}

/// What an LBit carries.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Payload<T> {
    /// Placeholder value half of a cell materialized by window initialization.
    Scaffold,
    /// The sentinel half's marker.
    TimeRoot,
    /// A client payload.
    Value(T),
}

impl<T> Payload<T> {
    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            Payload::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, Payload::Value(_))
    }
}

/// Half-cell node.
#[derive(Clone, Debug)]
pub struct LBit<T> {
    pub(crate) tr: TimeRoot,
    pub(crate) payload: Payload<T>,
    pub(crate) other: Option<TimeRoot>,
    pub(crate) axes: [Option<TimeRoot>; 3],
    pub(crate) earlier: Option<TimeRoot>,
    pub(crate) later: Option<TimeRoot>,
    pub(crate) cell: Option<CellId>,
}

impl<T> LBit<T> {
    fn fresh(tr: TimeRoot, payload: Payload<T>) -> Self {
        LBit {
            tr,
            payload,
            other: None,
            axes: [None; 3],
            earlier: None,
            later: None,
            cell: None,
        }
    }

    #[inline]
    pub fn time_root(&self) -> TimeRoot {
        self.tr
    }

    #[inline]
    pub fn payload(&self) -> &Payload<T> {
        &self.payload
    }

    /// The other half of the owning cell.
    #[inline]
    pub fn other(&self) -> Option<TimeRoot> {
        self.other
    }

    /// Spatial neighbour along `axis`, facing the direction of this half.
    #[inline]
    pub fn neighbour(&self, axis: Axis) -> Option<TimeRoot> {
        self.axes[axis.index()]
    }

    /// Same half of the previous revision at this coordinate.
    #[inline]
    pub fn earlier(&self) -> Option<TimeRoot> {
        self.earlier
    }

    /// Same half of the next revision at this coordinate.
    #[inline]
    pub fn later(&self) -> Option<TimeRoot> {
        self.later
    }

    #[inline]
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }
}

/// A cell revision: two halves at one coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DBit {
    pub(crate) lbit0: TimeRoot,
    pub(crate) lbit1: TimeRoot,
    pub(crate) coord: Coord,
}

impl DBit {
    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[inline]
    pub fn half(&self, half: Half) -> TimeRoot {
        match half {
            Half::Value => self.lbit0,
            Half::Sentinel => self.lbit1,
        }
    }
}

/// Arena owning all nodes of one lattice.
#[derive(Clone, Debug)]
pub struct NodeArena<T> {
    lbits: Vec<LBit<T>>,
    dbits: Vec<DBit>,
    clock: TimeRootGen,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self {
            lbits: Vec::new(),
            dbits: Vec::new(),
            clock: TimeRootGen::new(),
        }
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs an unlinked LBit carrying `payload` under a fresh identity.
    pub fn new_lbit(&mut self, payload: Payload<T>) -> TimeRoot {
        let tr = self.clock.issue();
        debug_assert_eq!(tr.index(), self.lbits.len());
        self.lbits.push(LBit::fresh(tr, payload));
        tr
    }

    /// Pairs two fresh LBits into a cell at `coord`.
    ///
    /// Sets the mutual counterpart references and both owning-cell
    /// back-references; the pairing is never changed afterwards.
    pub fn new_dbit(&mut self, lbit0: TimeRoot, lbit1: TimeRoot, coord: Coord) -> CellId {
        let id = CellId(self.dbits.len());
        self.dbits.push(DBit { lbit0, lbit1, coord });
        {
            let l0 = &mut self.lbits[lbit0.index()];
            l0.other = Some(lbit1);
            l0.cell = Some(id);
        }
        {
            let l1 = &mut self.lbits[lbit1.index()];
            l1.other = Some(lbit0);
            l1.cell = Some(id);
        }
        id
    }

    /// Builds a complete cell: value half, sentinel half, pairing.
    pub fn new_cell(&mut self, payload: Payload<T>, coord: Coord) -> CellId {
        let v = self.new_lbit(payload);
        let s = self.new_lbit(Payload::TimeRoot);
        self.new_dbit(v, s, coord)
    }

    #[inline]
    pub fn lbit(&self, tr: TimeRoot) -> &LBit<T> {
        &self.lbits[tr.index()]
    }

    #[inline]
    pub fn dbit(&self, id: CellId) -> &DBit {
        &self.dbits[id.0]
    }

    pub fn try_lbit(&self, tr: TimeRoot) -> Result<&LBit<T>, LatticeError> {
        self.lbits
            .get(tr.index())
            .ok_or(LatticeError::UnknownTimeRoot(tr))
    }

    pub fn try_dbit(&self, id: CellId) -> Result<&DBit, LatticeError> {
        self.dbits.get(id.0).ok_or(LatticeError::UnknownCell(id))
    }

    /// The LBit forming `half` of `cell`.
    #[inline]
    pub fn half(&self, cell: CellId, half: Half) -> &LBit<T> {
        self.lbit(self.dbit(cell).half(half))
    }

    /// Every DBit ever created, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = (CellId, &DBit)> + '_ {
        self.dbits.iter().enumerate().map(|(i, d)| (CellId(i), d))
    }

    pub fn lbits(&self) -> impl ExactSizeIterator<Item = &LBit<T>> + '_ {
        self.lbits.iter()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.dbits.len()
    }

    #[inline]
    pub fn lbit_count(&self) -> usize {
        self.lbits.len()
    }

    #[inline]
    pub fn clock(&self) -> &TimeRootGen {
        &self.clock
    }

    /// Describes the first broken revision-chain link on the `half` of `id`.
    ///
    /// Both `earlier` and `later` must be answered by the linked half, stay on
    /// the same coordinate and half, and run forward in time. The last rule
    /// keeps every chain acyclic.
    pub(crate) fn chain_fault(&self, id: CellId, half: Half) -> Option<String> {
        let dbit = self.dbit(id);
        let tr = dbit.half(half);
        let lbit = self.lbit(tr);
        let in_place = |t: TimeRoot| {
            self.lbit(t).cell().is_some_and(|c| {
                let d = self.dbit(c);
                d.coord() == dbit.coord() && d.half(half) == t
            })
        };
        if let Some(prev) = lbit.earlier() {
            if prev >= tr || self.lbit(prev).later() != Some(tr) || !in_place(prev) {
                return Some(format!(
                    "revision chain {prev} <- {tr} at {} is broken",
                    dbit.coord()
                ));
            }
        }
        if let Some(next) = lbit.later() {
            if next <= tr || self.lbit(next).earlier() != Some(tr) || !in_place(next) {
                return Some(format!(
                    "revision chain {tr} -> {next} at {} is broken",
                    dbit.coord()
                ));
            }
        }
        None
    }

    /// Cross-links `lower` and its upper neighbour `upper` along `axis`.
    pub(crate) fn link(&mut self, lower: CellId, upper: CellId, axis: Axis) {
        let up_face = self.dbits[lower.0].lbit1;
        let down_face = self.dbits[upper.0].lbit0;
        self.lbits[up_face.index()].axes[axis.index()] = Some(down_face);
        self.lbits[down_face.index()].axes[axis.index()] = Some(up_face);
    }

    /// Threads `newer` onto the revision chain after `terminal`, half by half.
    pub(crate) fn append_revision(&mut self, terminal: CellId, newer: CellId) {
        let old = self.dbits[terminal.0];
        let new = self.dbits[newer.0];
        for (o, n) in [(old.lbit0, new.lbit0), (old.lbit1, new.lbit1)] {
            debug_assert!(self.lbits[o.index()].later.is_none());
            self.lbits[o.index()].later = Some(n);
            self.lbits[n.index()].earlier = Some(o);
        }
    }

    /// Moves every axis link of `from` onto `to`, re-pointing the neighbours.
    ///
    /// `from` is left without spatial links; it stays reachable through the
    /// revision chain only.
    pub(crate) fn transfer_axes(&mut self, from: CellId, to: CellId) {
        let old = self.dbits[from.0];
        let new = self.dbits[to.0];
        for (o, n) in [(old.lbit0, new.lbit0), (old.lbit1, new.lbit1)] {
            for axis in Axis::ALL {
                let Some(peer) = self.lbits[o.index()].axes[axis.index()].take() else {
                    continue;
                };
                self.lbits[n.index()].axes[axis.index()] = Some(peer);
                self.lbits[peer.index()].axes[axis.index()] = Some(n);
            }
        }
    }

    /// Rebuilds an arena from fully linked parts; used by snapshot reload.
    pub(crate) fn from_parts(lbits: Vec<LBit<T>>, dbits: Vec<DBit>) -> Self {
        let next = lbits.len() as u64;
        Self {
            lbits,
            dbits,
            clock: TimeRootGen::starting_at(next),
        }
    }
}
