//! `TimeRoot`: the temporal identity of every half-cell node
//!
//! Each LBit receives exactly one `TimeRoot` at construction. Identities are
//! issued by a [`TimeRootGen`] owned by a single lattice, so two lattices in
//! the same process never interfere and tests stay deterministic.
//!
//! This module provides:
//! - A transparent `TimeRoot` newtype around `u64`, usable as an arena key.
//! - The strictly increasing generator that issues them.
//! - `Debug`/`Display` so identities read well in diagnostics (`tr_7`).

use std::fmt;

/// Opaque, strictly increasing node identity.
///
/// # Memory layout
/// `repr(transparent)` over `u64`; snapshots store the raw integer.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct TimeRoot(u64);

impl TimeRoot {
    /// Wraps a raw identity. Only snapshot reloading should need this.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        TimeRoot(raw)
    }

    /// Returns the raw integer value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Position of this node in the owning arena.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TimeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimeRoot").field(&self.0).finish()
    }
}

impl fmt::Display for TimeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tr_{}", self.0)
    }
}

/// Issues strictly increasing [`TimeRoot`]s.
///
/// The generator never rewinds: once an identity is handed out it is never
/// produced again by the same generator.
#[derive(Clone, Debug, Default)]
pub struct TimeRootGen {
    next: u64,
}

impl TimeRootGen {
    /// A generator whose first identity is `tr_0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that continues after previously issued identities.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Allocates the next identity.
    #[inline]
    pub fn issue(&mut self) -> TimeRoot {
        let tr = TimeRoot(self.next);
        self.next += 1;
        tr
    }

    /// The identity the next call to [`issue`](Self::issue) will return.
    #[inline]
    pub fn peek(&self) -> TimeRoot {
        TimeRoot(self.next)
    }

    /// Number of identities issued so far.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(TimeRoot, u64);
    assert_eq_align!(TimeRoot, u64);
}
