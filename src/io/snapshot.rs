//! Flat, serde-friendly snapshot of a lattice and its validating reload.
//!
//! A snapshot lists every cell revision in history order. Links are stored as
//! raw TimeRoot integers, so a snapshot carries no pointers and can be moved
//! through any serde format. Reloading re-checks the structural invariants of
//! the graph before handing back a [`Lattice`]; a snapshot that was edited by
//! hand (or truncated) is rejected with [`LatticeError::Snapshot`].

use crate::lattice_error::LatticeError;
use crate::topology::arena::{CellId, DBit, LBit, NodeArena, Payload};
use crate::topology::cache::LandingCache;
use crate::topology::coord::{Axis, Coord, Half};
use crate::topology::fast_map::FastMap;
use crate::topology::lattice::{HeadWindow, Lattice, LatticeConfig, NavStats, WindowDims};
use crate::topology::time_root::TimeRoot;
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// Version tag written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One half-cell with its links as raw TimeRoot values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LBitRecord<T> {
    pub tr: u64,
    pub payload: Payload<T>,
    pub other: Option<u64>,
    pub x: Option<u64>,
    pub y: Option<u64>,
    pub z: Option<u64>,
    pub earlier: Option<u64>,
    pub later: Option<u64>,
}

impl<T> LBitRecord<T> {
    #[inline]
    pub fn axis(&self, axis: Axis) -> Option<u64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// One cell revision: its coordinate and both halves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord<T> {
    pub coord: Coord,
    pub lbit0: LBitRecord<T>,
    pub lbit1: LBitRecord<T>,
}

impl<T> CellRecord<T> {
    #[inline]
    pub fn half(&self, half: Half) -> &LBitRecord<T> {
        match half {
            Half::Value => &self.lbit0,
            Half::Sentinel => &self.lbit1,
        }
    }
}

/// Everything needed to rebuild a lattice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeSnapshot<T> {
    pub version: u32,
    pub window: WindowDims,
    pub head_origin: Coord,
    pub cells: Vec<CellRecord<T>>,
}

fn reject(msg: impl Into<String>) -> LatticeError {
    LatticeError::Snapshot(msg.into())
}

impl<T: Clone> Lattice<T> {
    fn lbit_record(&self, tr: TimeRoot) -> LBitRecord<T> {
        let l = self.arena.lbit(tr);
        let raw = |t: Option<TimeRoot>| t.map(TimeRoot::get);
        LBitRecord {
            tr: tr.get(),
            payload: l.payload().clone(),
            other: raw(l.other()),
            x: raw(l.neighbour(Axis::X)),
            y: raw(l.neighbour(Axis::Y)),
            z: raw(l.neighbour(Axis::Z)),
            earlier: raw(l.earlier()),
            later: raw(l.later()),
        }
    }

    /// Every cell revision ever created, in history order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = CellRecord<T>> + '_ {
        self.arena.history().map(|(_, d)| CellRecord {
            coord: d.coord(),
            lbit0: self.lbit_record(d.half(Half::Value)),
            lbit1: self.lbit_record(d.half(Half::Sentinel)),
        })
    }

    pub fn snapshot(&self) -> LatticeSnapshot<T> {
        LatticeSnapshot {
            version: SNAPSHOT_VERSION,
            window: self.config.window,
            head_origin: self.head.origin(),
            cells: self.cells().collect(),
        }
    }
}

impl<T> Lattice<T> {
    /// Rebuilds a lattice from `snapshot`.
    ///
    /// The clock resumes after the highest TimeRoot in the snapshot, so later
    /// insertions never reuse an identity. The landing cache starts empty.
    ///
    /// # Errors
    /// `Snapshot` when the version is unknown, TimeRoots are not dense and
    /// unique, counterparts are not paired, a reference dangles, an axis or
    /// chain link is not reciprocated or joins the wrong coordinates, a
    /// coordinate has more than one current revision, or the head window is
    /// not fully materialized. `InvalidWindow` for zero window extents.
    pub fn from_snapshot(snapshot: LatticeSnapshot<T>) -> Result<Self, LatticeError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(reject(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        snapshot.window.validate()?;

        let n = snapshot.cells.len() * 2;
        let resolve = |raw: u64| -> Result<TimeRoot, LatticeError> {
            usize::try_from(raw)
                .ok()
                .filter(|&i| i < n)
                .map(|_| TimeRoot::from_raw(raw))
                .ok_or_else(|| reject(format!("reference to tr_{raw} out of range")))
        };
        let resolve_opt = |raw: Option<u64>| raw.map(resolve).transpose();

        let mut slots: Vec<Option<LBit<T>>> = std::iter::repeat_with(|| None).take(n).collect();
        let mut dbits = Vec::with_capacity(snapshot.cells.len());
        for (i, cell) in snapshot.cells.into_iter().enumerate() {
            let id = CellId(i);
            let mut halves = [TimeRoot::from_raw(0); 2];
            for (k, rec) in [cell.lbit0, cell.lbit1].into_iter().enumerate() {
                let tr = resolve(rec.tr)?;
                let lbit = LBit {
                    tr,
                    payload: rec.payload,
                    other: resolve_opt(rec.other)?,
                    axes: [
                        resolve_opt(rec.x)?,
                        resolve_opt(rec.y)?,
                        resolve_opt(rec.z)?,
                    ],
                    earlier: resolve_opt(rec.earlier)?,
                    later: resolve_opt(rec.later)?,
                    cell: Some(id),
                };
                let slot = &mut slots[tr.index()];
                if slot.is_some() {
                    return Err(reject(format!("duplicate time root {tr}")));
                }
                *slot = Some(lbit);
                halves[k] = tr;
            }
            dbits.push(DBit {
                lbit0: halves[0],
                lbit1: halves[1],
                coord: cell.coord,
            });
        }
        // n unique values in 0..n fill every slot
        let lbits: Vec<LBit<T>> = slots.into_iter().flatten().collect();
        debug_assert_eq!(lbits.len(), n);

        let arena = NodeArena::from_parts(lbits, dbits);
        let index = validate_graph(&arena)?;

        let dims = snapshot.window;
        let origin = snapshot.head_origin;
        let mut head_cells = Vec::with_capacity(dims.volume());
        for (i, j, k) in iproduct!(0..dims.x, 0..dims.y, 0..dims.z) {
            let coord = origin.offset(i as i64, j as i64, k as i64);
            let cell = index
                .get(&coord)
                .copied()
                .ok_or_else(|| reject(format!("head window slot {coord} is not materialized")))?;
            head_cells.push(cell);
        }

        log::debug!(
            "restored {} cells ({} current) with head at {origin}",
            arena.cell_count(),
            index.len()
        );
        Ok(Lattice {
            arena,
            index,
            head: HeadWindow::anchored(origin, dims, head_cells),
            landing: LandingCache::default(),
            config: LatticeConfig {
                window: dims,
                initial_origin: origin,
            },
            stats: NavStats::default(),
        })
    }
}

/// Checks pairing, reciprocity and placement of every link; returns the index
/// of current occupants.
fn validate_graph<T>(arena: &NodeArena<T>) -> Result<FastMap<Coord, CellId>, LatticeError> {
    let mut index: FastMap<Coord, CellId> = FastMap::default();

    for (id, dbit) in arena.history() {
        let (v, s) = (dbit.half(Half::Value), dbit.half(Half::Sentinel));
        let (lv, ls) = (arena.lbit(v), arena.lbit(s));
        if lv.other() != Some(s) || ls.other() != Some(v) {
            return Err(reject(format!("counterparts of {id} are not paired")));
        }
        if !matches!(ls.payload(), Payload::TimeRoot) || matches!(lv.payload(), Payload::TimeRoot) {
            return Err(reject(format!("halves of {id} carry the wrong payload kind")));
        }

        for (half, tr) in [(Half::Value, v), (Half::Sentinel, s)] {
            let lbit = arena.lbit(tr);
            for axis in Axis::ALL {
                let Some(peer) = lbit.neighbour(axis) else {
                    continue;
                };
                let peer_lbit = arena.lbit(peer);
                let peer_cell = peer_lbit.cell().map(|c| arena.dbit(c));
                let placed = peer_cell.is_some_and(|pc| {
                    pc.half(half.opposite()) == peer
                        && pc.coord() == dbit.coord().step(axis, half.facing())
                });
                if peer_lbit.neighbour(axis) != Some(tr) || !placed {
                    return Err(reject(format!(
                        "{axis} link {tr} -> {peer} on {id} at {} is not reciprocal",
                        dbit.coord()
                    )));
                }
            }

            if let Some(fault) = arena.chain_fault(id, half) {
                return Err(reject(fault));
            }
        }

        let superseded = lv.later().is_some();
        if superseded != ls.later().is_some() || lv.earlier().is_some() != ls.earlier().is_some() {
            return Err(reject(format!("halves of {id} disagree on supersession")));
        }
        if superseded {
            let linked = Axis::ALL
                .iter()
                .any(|&a| lv.neighbour(a).is_some() || ls.neighbour(a).is_some());
            if linked {
                return Err(reject(format!("superseded {id} still holds axis links")));
            }
        } else if let Some(prev) = index.insert(dbit.coord(), id) {
            return Err(reject(format!(
                "{prev} and {id} are both current at {}",
                dbit.coord()
            )));
        }
    }
    Ok(index)
}
