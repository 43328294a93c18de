//! Read-only views for plotting and debugging.
//!
//! [`Lattice::render_cells`] is the enumeration a plotting front end consumes;
//! [`neighbourhood_model`] is a text picture of the block of cells around one
//! cell, reached through links only, useful when a link is suspected broken.

use crate::topology::arena::{CellId, Payload};
use crate::topology::coord::{Coord, Half};
use crate::topology::lattice::Lattice;
use crate::topology::walker::Move;
use itertools::Itertools;
use std::fmt;

/// One current cell as a plotting front end sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCell<'a, T> {
    pub coord: Coord,
    pub payload: &'a Payload<T>,
}

impl<T> Lattice<T> {
    /// Every current occupant in coordinate order.
    pub fn render_cells(&self) -> impl Iterator<Item = RenderCell<'_, T>> + '_ {
        self.current_cells()
            .into_iter()
            .map(move |(coord, cell)| RenderCell {
                coord,
                payload: self.payload(cell),
            })
    }
}

fn moves_to(dx: i64, dy: i64, dz: i64) -> Vec<Move> {
    let pick = |d: i64, minus: Move, plus: Move| match d {
        -1 => Some(minus),
        1 => Some(plus),
        _ => None,
    };
    [
        pick(dx, Move::XM, Move::XP),
        pick(dy, Move::YM, Move::YP),
        pick(dz, Move::ZM, Move::ZP),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Renders the 3x3x3 block around `cell` one z-layer at a time, top layer
/// first, rows with the highest y first.
///
/// Each cell is reached by following x, then y, then z links from `cell`; a
/// slot whose path hits a missing link shows `-`. Because nothing is looked up
/// in the index, a block that disagrees with the coordinates printed in the
/// header points at a broken link.
pub fn neighbourhood_model<T: fmt::Debug>(lattice: &Lattice<T>, cell: CellId) -> String {
    let label = |dx: i64, dy: i64, dz: i64| -> String {
        lattice
            .step_all(cell, moves_to(dx, dy, dz))
            .map(|c| lattice.label(lattice.dbit(c).half(Half::Value)))
            .unwrap_or_else(|_| "-".to_string())
    };

    let mut grid = Vec::with_capacity(27);
    for dz in [1, 0, -1] {
        for dy in [1, 0, -1] {
            for dx in [-1, 0, 1] {
                grid.push(label(dx, dy, dz));
            }
        }
    }
    let width = grid.iter().map(String::len).max().unwrap_or(1);

    let mut out = format!("# around {} ({cell})\n", lattice.coord(cell));
    for (layer, dz) in grid.chunks(9).zip([1, 0, -1]) {
        out.push_str(&format!("# z{dz:+}\n"));
        for row in layer.chunks(3) {
            let line = row.iter().map(|s| format!("{s:^width$}")).join(" | ");
            out.push_str(&format!("#   {line}\n"));
        }
    }
    out
}
