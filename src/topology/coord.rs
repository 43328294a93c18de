//! Coordinates, axes and cell halves.
//!
//! Coordinates are already-quantized integers; the lattice performs no unit
//! conversion. `Coord` orders lexicographically by `(x, y, z)`, which is the
//! order window initialization and integrity scans visit cells in.

use std::fmt;

/// Integer coordinate triple.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Coord {
    #[inline]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Coord { x, y, z }
    }

    /// Translate by `(dx, dy, dz)`. Components wrap at the `i64` bounds, so
    /// the lattice is closed under every translation.
    #[inline]
    pub const fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Coord::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// Translate by `delta` along a single axis.
    #[inline]
    pub fn step(self, axis: Axis, delta: i64) -> Self {
        match axis {
            Axis::X => self.offset(delta, 0, 0),
            Axis::Y => self.offset(0, delta, 0),
            Axis::Z => self.offset(0, 0, delta),
        }
    }

    #[inline]
    pub fn get(self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Component-wise `self - other`, wrapping like [`offset`](Self::offset):
    /// `other.offset(d)` is `self` for `d = self.delta_from(other)`.
    #[inline]
    pub const fn delta_from(self, other: Coord) -> (i64, i64, i64) {
        (
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

impl From<(i64, i64, i64)> for Coord {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Coord::new(x, y, z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// One of the three spatial axes.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Slot of this axis in an LBit's neighbour array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Which half of a DBit an LBit is.
///
/// The value half (`lbit0`) carries the payload and faces the lower neighbour
/// on every axis; the sentinel half (`lbit1`) carries the time-root marker and
/// faces the upper neighbour.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Half {
    Value,
    Sentinel,
}

impl Half {
    pub const BOTH: [Half; 2] = [Half::Value, Half::Sentinel];

    #[inline]
    pub const fn opposite(self) -> Half {
        match self {
            Half::Value => Half::Sentinel,
            Half::Sentinel => Half::Value,
        }
    }

    /// Direction along an axis this half faces: -1 for value, +1 for sentinel.
    #[inline]
    pub const fn facing(self) -> i64 {
        match self {
            Half::Value => -1,
            Half::Sentinel => 1,
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Half::Value => "lbit0",
            Half::Sentinel => "lbit1",
        })
    }
}
