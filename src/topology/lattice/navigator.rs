//! Cursor movement.
//!
//! Moves walk one axis at a time (x fully, then y, then z) and re-initialize
//! the whole head window at every intermediate origin, so each cell along an
//! axis-aligned path is materialized and cross-linked before the next axis is
//! traversed. The cost is O(path length x window volume) per move; that
//! redundancy is what keeps the window consistent along the path.

use super::Lattice;
use crate::topology::arena::CellId;
use crate::topology::cache::InvalidateCache;
use crate::topology::coord::Coord;

/// Origins visited by a relative move, in order, for one axis.
///
/// Defined for every `delta`, `i64::MIN` included; origins wrap at the
/// `i64` bounds the same way [`Coord::offset`] does.
fn leg(start: i64, delta: i64) -> impl Iterator<Item = i64> {
    (0..=delta.unsigned_abs()).map(move |step| {
        if delta < 0 {
            start.wrapping_sub_unsigned(step)
        } else {
            start.wrapping_add_unsigned(step)
        }
    })
}

impl<T> Lattice<T> {
    /// The cell nearest the centroid of the current window.
    pub fn cursor(&self) -> CellId {
        let (cx, cy, cz) = self.config.window.centroid();
        let at = self.head.origin().offset(cx, cy, cz);
        self.head
            .cell_at(at)
            .or_else(|| self.retrieve(at))
            .unwrap_or_else(|| unreachable!("head window centroid {at} is always indexed"))
    }

    /// Moves the window origin by `(dx, dy, dz)`.
    ///
    /// The window is rebuilt at every origin on the path, starting with the
    /// current one, for each axis that has a non-zero delta. Returns the cell
    /// nearest the centroid of the final window (the cell at origin + (1,1,1)
    /// for a 3x3x3 window). A zero move rebuilds nothing.
    pub fn move_relative(&mut self, dx: i64, dy: i64, dz: i64) -> CellId {
        let start = self.head.origin();
        log::debug!("head at {start}, moving by ({dx},{dy},{dz})");

        let mut landing = self.cursor();
        let (mut x, mut y) = (start.x, start.y);
        if dx != 0 {
            for xi in leg(start.x, dx) {
                landing = self.initialize_window(Coord::new(xi, start.y, start.z));
            }
            x = start.x.wrapping_add(dx);
        }
        if dy != 0 {
            for yi in leg(start.y, dy) {
                landing = self.initialize_window(Coord::new(x, yi, start.z));
            }
            y = start.y.wrapping_add(dy);
        }
        if dz != 0 {
            for zi in leg(start.z, dz) {
                landing = self.initialize_window(Coord::new(x, y, zi));
            }
        }
        landing
    }

    /// Moves the window origin to `target`.
    ///
    /// When the window already sits at `target` and a previous absolute move
    /// landed there, the cached landing is returned without touching the
    /// window.
    pub fn move_absolute(&mut self, target: Coord) -> CellId {
        if self.head.origin() == target {
            if let Some(cell) = self.landing.lookup(target) {
                log::trace!("head already at {target}, reusing {cell}");
                return cell;
            }
        }
        let (dx, dy, dz) = target.delta_from(self.head.origin());
        let landing = self.move_relative(dx, dy, dz);
        self.landing.store(target, landing);
        landing
    }

    /// Number of absolute moves answered from the landing cache.
    pub fn cached_moves(&self) -> u64 {
        self.landing.hits()
    }
}

impl<T> InvalidateCache for Lattice<T> {
    fn invalidate_cache(&mut self) {
        self.landing.invalidate_cache();
    }
}
