//! Link-following cell walker.
//!
//! Unlike [`Lattice::retrieve`], every step here follows stored links: axis
//! moves go through the facing half's neighbour reference, time moves through
//! the revision chain. A missing link is reported, never repaired.

use crate::lattice_error::LatticeError;
use crate::topology::arena::CellId;
use crate::topology::coord::{Axis, Half};
use crate::topology::lattice::Lattice;
use crate::topology::path::{Node, Step, walk};
use std::fmt;
use std::str::FromStr;

/// A single walker command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// One cell up (`plus == true`) or down along an axis.
    Axis { axis: Axis, plus: bool },
    /// The revision that superseded this one.
    Later,
    /// The revision this one superseded.
    Earlier,
}

impl Move {
    pub const XP: Move = Move::Axis { axis: Axis::X, plus: true };
    pub const XM: Move = Move::Axis { axis: Axis::X, plus: false };
    pub const YP: Move = Move::Axis { axis: Axis::Y, plus: true };
    pub const YM: Move = Move::Axis { axis: Axis::Y, plus: false };
    pub const ZP: Move = Move::Axis { axis: Axis::Z, plus: true };
    pub const ZM: Move = Move::Axis { axis: Axis::Z, plus: false };

    /// The six spatial moves, minus before plus, x before y before z.
    pub const SPATIAL: [Move; 6] = [
        Move::XM,
        Move::XP,
        Move::YM,
        Move::YP,
        Move::ZM,
        Move::ZP,
    ];

    /// Path from a cell to the cell this move reaches.
    pub fn path(self) -> [Step; 3] {
        match self {
            Move::Axis { axis, plus } => {
                let half = if plus { Half::Sentinel } else { Half::Value };
                [Step::Half(half), Step::Axis(axis), Step::Cell]
            }
            Move::Later => [Step::Half(Half::Value), Step::Later, Step::Cell],
            Move::Earlier => [Step::Half(Half::Value), Step::Earlier, Step::Cell],
        }
    }
}

impl FromStr for Move {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "xp" => Move::XP,
            "xm" => Move::XM,
            "yp" => Move::YP,
            "ym" => Move::YM,
            "zp" => Move::ZP,
            "zm" => Move::ZM,
            "ot" | "later" => Move::Later,
            "ob" | "earlier" => Move::Earlier,
            other => return Err(LatticeError::UnknownCommand(other.to_string())),
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Axis { axis, plus } => write!(f, "{axis}{}", if *plus { 'p' } else { 'm' }),
            Move::Later => f.write_str("ot"),
            Move::Earlier => f.write_str("ob"),
        }
    }
}

impl<T> Lattice<T> {
    /// Follows `mv` from `cell`.
    ///
    /// # Errors
    /// `MissingReference` when the link does not exist (a lattice edge, the
    /// newest revision for [`Move::Later`], a chain root for
    /// [`Move::Earlier`], or a superseded cell for any spatial move);
    /// `UnknownCell` for a foreign handle.
    pub fn step(&self, cell: CellId, mv: Move) -> Result<CellId, LatticeError> {
        match walk(&self.arena, Node::Cell(cell), &mv.path(), |_, _| {})? {
            Node::Cell(c) => Ok(c),
            node => Err(LatticeError::InvalidStep {
                node,
                step: Step::Cell,
            }),
        }
    }

    /// Follows a sequence of moves, stopping at the first missing link.
    pub fn step_all(
        &self,
        cell: CellId,
        moves: impl IntoIterator<Item = Move>,
    ) -> Result<CellId, LatticeError> {
        moves.into_iter().try_fold(cell, |at, mv| self.step(at, mv))
    }

    /// The six spatial neighbours of `cell` in [`Move::SPATIAL`] order.
    pub fn neighbours(&self, cell: CellId) -> [(Move, Option<CellId>); 6] {
        Move::SPATIAL.map(|mv| (mv, self.step(cell, mv).ok()))
    }
}
