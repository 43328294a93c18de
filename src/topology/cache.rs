//! Navigation caches and their invalidation.

use crate::topology::arena::CellId;
use crate::topology::coord::Coord;

/// Anything that caches derived navigation state should implement this.
pub trait InvalidateCache {
    /// Drop *all* cached state so the next query recomputes it from the index.
    fn invalidate_cache(&mut self);
}

/// The cell an absolute move last landed on, keyed by the window origin the
/// move anchored at.
#[derive(Clone, Copy, Debug, Default)]
pub struct LandingCache {
    entry: Option<(Coord, CellId)>,
    hits: u64,
}

impl LandingCache {
    /// Returns the cached landing if it was computed for `origin`.
    pub fn lookup(&mut self, origin: Coord) -> Option<CellId> {
        match self.entry {
            Some((o, cell)) if o == origin => {
                self.hits += 1;
                Some(cell)
            }
            _ => None,
        }
    }

    pub fn store(&mut self, origin: Coord, cell: CellId) {
        self.entry = Some((origin, cell));
    }

    /// Re-targets the cached landing when its cell gains a newer revision.
    pub fn supersede(&mut self, old: CellId, newer: CellId) {
        if let Some((_, cell)) = self.entry.as_mut() {
            if *cell == old {
                *cell = newer;
            }
        }
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

impl InvalidateCache for LandingCache {
    fn invalidate_cache(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_only_for_same_origin() {
        let mut c = LandingCache::default();
        let o = Coord::new(-1, -1, -1);
        assert_eq!(c.lookup(o), None);
        c.store(o, CellId(4));
        assert_eq!(c.lookup(Coord::new(0, 0, 0)), None);
        assert_eq!(c.lookup(o), Some(CellId(4)));
        assert_eq!(c.hits(), 1);
    }

    #[test]
    fn supersede_and_invalidate() {
        let mut c = LandingCache::default();
        let o = Coord::new(0, 0, 0);
        c.store(o, CellId(1));
        c.supersede(CellId(2), CellId(3));
        assert_eq!(c.lookup(o), Some(CellId(1)));
        c.supersede(CellId(1), CellId(3));
        assert_eq!(c.lookup(o), Some(CellId(3)));
        c.invalidate_cache();
        assert_eq!(c.lookup(o), None);
    }
}
