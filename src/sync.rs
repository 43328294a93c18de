//! Shared handle for callers that need a lattice on more than one thread.
//!
//! Every call takes the one lock for its whole duration, so a navigation and
//! an insertion never interleave. There is no finer-grained concurrency.

use crate::lattice_error::LatticeError;
use crate::topology::arena::CellId;
use crate::topology::coord::Coord;
use crate::topology::lattice::{Lattice, LatticeConfig};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one [`Lattice`].
pub struct SharedLattice<T> {
    inner: Arc<Mutex<Lattice<T>>>,
}

impl<T> Clone for SharedLattice<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SharedLattice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLattice")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<T> From<Lattice<T>> for SharedLattice<T> {
    fn from(lattice: Lattice<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(lattice)),
        }
    }
}

impl<T> Default for SharedLattice<T> {
    fn default() -> Self {
        Lattice::new().into()
    }
}

impl<T> SharedLattice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LatticeConfig) -> Result<Self, LatticeError> {
        Ok(Lattice::with_config(config)?.into())
    }

    pub fn retrieve(&self, coord: Coord) -> Option<CellId> {
        self.inner.lock().retrieve(coord)
    }

    /// Runs `f` with exclusive access to the lattice.
    pub fn with<R>(&self, f: impl FnOnce(&mut Lattice<T>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Unwraps the lattice if this is the last handle.
    pub fn try_into_inner(self) -> Result<Lattice<T>, Self> {
        Arc::try_unwrap(self.inner)
            .map(|m| m.into_inner())
            .map_err(|inner| Self { inner })
    }
}

impl<T: Clone> SharedLattice<T> {
    /// Payload of the current occupant of `coord`, cloned out of the lock.
    pub fn value_at(&self, coord: Coord) -> Option<T> {
        self.inner.lock().value_at(coord).cloned()
    }
}

impl<T: fmt::Debug> SharedLattice<T> {
    pub fn insert(&self, payload: T, coord: Coord) -> CellId {
        self.inner.lock().insert(payload, coord)
    }
}
