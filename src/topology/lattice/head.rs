//! The head window: a dense block of cross-linked cells around the cursor.
//!
//! The window is a staging cache, not a source of truth; every slot is
//! looked up from (or created into) the coordinate index when the window is
//! initialized.

use super::Lattice;
use crate::lattice_error::LatticeError;
use crate::topology::arena::CellId;
use crate::topology::coord::{Axis, Coord};
use itertools::iproduct;

/// Extents of the head window along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Default for WindowDims {
    fn default() -> Self {
        Self { x: 3, y: 3, z: 3 }
    }
}

impl WindowDims {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.x * self.y * self.z
    }

    /// Offset of the slot nearest the window centroid; (1,1,1) for 3x3x3.
    #[inline]
    pub const fn centroid(self) -> (i64, i64, i64) {
        ((self.x / 2) as i64, (self.y / 2) as i64, (self.z / 2) as i64)
    }

    pub fn validate(self) -> Result<(), LatticeError> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(LatticeError::InvalidWindow {
                x: self.x,
                y: self.y,
                z: self.z,
            });
        }
        Ok(())
    }
}

/// Dense `dims.x * dims.y * dims.z` array of cells anchored at `origin`.
#[derive(Debug, Clone)]
pub struct HeadWindow {
    origin: Coord,
    dims: WindowDims,
    cells: Vec<CellId>,
}

impl HeadWindow {
    pub(crate) fn unanchored(dims: WindowDims) -> Self {
        Self {
            origin: Coord::default(),
            dims,
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    #[inline]
    pub fn dims(&self) -> WindowDims {
        self.dims
    }

    #[inline]
    fn slot(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.dims.y + j) * self.dims.z + k
    }

    /// Window-relative position of `coord`, if it lies inside the window.
    fn local(&self, coord: Coord) -> Option<(usize, usize, usize)> {
        let (dx, dy, dz) = coord.delta_from(self.origin);
        let inside = |d: i64, n: usize| d >= 0 && (d as usize) < n;
        (inside(dx, self.dims.x) && inside(dy, self.dims.y) && inside(dz, self.dims.z))
            .then(|| (dx as usize, dy as usize, dz as usize))
    }

    /// Cell in window slot `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<CellId> {
        if i >= self.dims.x || j >= self.dims.y || k >= self.dims.z {
            return None;
        }
        self.cells.get(self.slot(i, j, k)).copied()
    }

    /// Cell at absolute `coord`, if the window covers it.
    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        let (i, j, k) = self.local(coord)?;
        self.get(i, j, k)
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.local(coord).is_some()
    }

    /// Cell nearest the window centroid.
    pub fn centroid_cell(&self) -> Option<CellId> {
        let (ci, cj, ck) = self.dims.centroid();
        self.get(ci as usize, cj as usize, ck as usize)
    }

    /// All slots as `(coord, cell)` in lexicographic coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellId)> + '_ {
        let origin = self.origin;
        iproduct!(0..self.dims.x, 0..self.dims.y, 0..self.dims.z)
            .zip(self.cells.iter().copied())
            .map(move |((i, j, k), cell)| (origin.offset(i as i64, j as i64, k as i64), cell))
    }

    /// Swaps in a newer revision for a covered coordinate.
    pub(crate) fn supersede(&mut self, coord: Coord, newer: CellId) {
        if let Some((i, j, k)) = self.local(coord) {
            let slot = self.slot(i, j, k);
            if let Some(c) = self.cells.get_mut(slot) {
                *c = newer;
            }
        }
    }

    pub(crate) fn anchored(origin: Coord, dims: WindowDims, cells: Vec<CellId>) -> Self {
        debug_assert_eq!(cells.len(), dims.volume());
        Self {
            origin,
            dims,
            cells,
        }
    }
}

impl<T> Lattice<T> {
    /// Re-anchors the head window at `origin`, materializing and cross-linking
    /// every covered cell.
    ///
    /// Cells are visited in lexicographic `(x, y, z)` order; each is looked up
    /// in the index (or created) and linked to its already-visited lower
    /// neighbour on every axis that has one inside the window. Existing cells
    /// are never duplicated, and re-linking an already linked pair rewrites
    /// the same references. Returns the cell nearest the window centroid.
    pub fn initialize_window(&mut self, origin: Coord) -> CellId {
        let dims = self.config.window;
        let mut cells: Vec<CellId> = Vec::with_capacity(dims.volume());
        let slot = |i: usize, j: usize, k: usize| (i * dims.y + j) * dims.z + k;

        for (i, j, k) in iproduct!(0..dims.x, 0..dims.y, 0..dims.z) {
            let coord = origin.offset(i as i64, j as i64, k as i64);
            let cell = self.lookup_or_create(coord);
            if i > 0 {
                self.arena.link(cells[slot(i - 1, j, k)], cell, Axis::X);
            }
            if j > 0 {
                self.arena.link(cells[slot(i, j - 1, k)], cell, Axis::Y);
            }
            if k > 0 {
                self.arena.link(cells[slot(i, j, k - 1)], cell, Axis::Z);
            }
            cells.push(cell);
        }

        self.head = HeadWindow::anchored(origin, dims, cells);
        self.stats.window_rebuilds += 1;
        log::trace!("head window anchored at {origin}");

        let (ci, cj, ck) = dims.centroid();
        self.head
            .cell_at(origin.offset(ci, cj, ck))
            .unwrap_or_else(|| self.lookup_or_create(origin.offset(ci, cj, ck)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::coord::Half;
    use crate::topology::lattice::LatticeConfig;

    #[test]
    fn fresh_window_materializes_27_cells() {
        let l = Lattice::<()>::new();
        assert_eq!(l.len(), 27);
        assert_eq!(l.head().origin(), Coord::new(-1, -1, -1));
        assert_eq!(l.stats().window_rebuilds, 1);
        let coords: Vec<Coord> = l.head().iter().map(|(c, _)| c).collect();
        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
    }

    #[test]
    fn reinitializing_does_not_duplicate() {
        let mut l = Lattice::<()>::new();
        let before = l.arena().cell_count();
        let first = l.initialize_window(Coord::new(-1, -1, -1));
        let again = l.initialize_window(Coord::new(-1, -1, -1));
        assert_eq!(first, again);
        assert_eq!(l.arena().cell_count(), before);
        assert_eq!(l.coord(first), Coord::new(0, 0, 0));
    }

    #[test]
    fn overlapping_window_only_adds_new_slab() {
        let mut l = Lattice::<()>::new();
        l.initialize_window(Coord::new(0, -1, -1));
        // one new x-slab of 3x3 cells
        assert_eq!(l.len(), 36);
        let a = l.retrieve(Coord::new(1, 0, 0)).unwrap();
        let b = l.retrieve(Coord::new(2, 0, 0)).unwrap();
        let up = l.arena().half(a, Half::Sentinel).neighbour(Axis::X).unwrap();
        assert_eq!(l.lbit(up).cell(), Some(b));
    }

    #[test]
    fn centroid_follows_dims() {
        let cfg = LatticeConfig {
            window: WindowDims::new(5, 1, 2),
            initial_origin: Coord::new(0, 0, 0),
        };
        let l = Lattice::<()>::with_config(cfg).unwrap();
        assert_eq!(l.len(), 10);
        let c = l.head().centroid_cell().unwrap();
        assert_eq!(l.coord(c), Coord::new(2, 0, 1));
    }

    #[test]
    fn zero_extent_rejected() {
        let cfg = LatticeConfig {
            window: WindowDims::new(3, 0, 3),
            ..LatticeConfig::default()
        };
        assert_eq!(
            Lattice::<()>::with_config(cfg).unwrap_err(),
            LatticeError::InvalidWindow { x: 3, y: 0, z: 3 }
        );
    }

    #[test]
    fn cell_at_outside_window_is_none() {
        let l = Lattice::<()>::new();
        assert!(l.head().cell_at(Coord::new(2, 0, 0)).is_none());
        assert!(l.head().contains(Coord::new(1, 1, 1)));
        assert!(!l.head().contains(Coord::new(-2, 0, 0)));
    }
}
