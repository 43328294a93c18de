//! Traversal steps over the node graph.
//!
//! A path is a sequence of [`Step`]s evaluated from a starting [`Node`]. Cells
//! step into one of their halves; halves step to their counterpart, to an axis
//! neighbour, along the revision chain, or up to their owning cell.

use crate::lattice_error::LatticeError;
use crate::topology::arena::{CellId, NodeArena};
use crate::topology::coord::{Axis, Half};
use crate::topology::time_root::TimeRoot;
use std::fmt;

/// A position in the node graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Cell(CellId),
    LBit(TimeRoot),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Cell(c) => write!(f, "{c}"),
            Node::LBit(t) => write!(f, "{t}"),
        }
    }
}

/// One hop of a traversal path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Cell -> one of its halves.
    Half(Half),
    /// LBit -> axis neighbour.
    Axis(Axis),
    /// LBit -> counterpart half of the same cell.
    Other,
    /// LBit -> same half of the previous revision.
    Earlier,
    /// LBit -> same half of the next revision.
    Later,
    /// LBit -> owning cell.
    Cell,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Half(h) => write!(f, "{h}"),
            Step::Axis(a) => write!(f, "{a}"),
            Step::Other => f.write_str("other"),
            Step::Earlier => f.write_str("earlier"),
            Step::Later => f.write_str("later"),
            Step::Cell => f.write_str("dbit"),
        }
    }
}

impl Step {
    /// Takes this step from `node`.
    ///
    /// # Errors
    /// `MissingReference` if the link is unset, `InvalidStep` if the step does
    /// not apply to the node kind.
    pub fn apply<T>(self, arena: &NodeArena<T>, node: Node) -> Result<Node, LatticeError> {
        let missing = || LatticeError::MissingReference { at: node, step: self };
        match (node, self) {
            (Node::Cell(c), Step::Half(h)) => Ok(Node::LBit(arena.try_dbit(c)?.half(h))),
            (Node::LBit(t), Step::Axis(a)) => {
                arena.try_lbit(t)?.neighbour(a).map(Node::LBit).ok_or_else(missing)
            }
            (Node::LBit(t), Step::Other) => {
                arena.try_lbit(t)?.other().map(Node::LBit).ok_or_else(missing)
            }
            (Node::LBit(t), Step::Earlier) => {
                arena.try_lbit(t)?.earlier().map(Node::LBit).ok_or_else(missing)
            }
            (Node::LBit(t), Step::Later) => {
                arena.try_lbit(t)?.later().map(Node::LBit).ok_or_else(missing)
            }
            (Node::LBit(t), Step::Cell) => {
                arena.try_lbit(t)?.cell().map(Node::Cell).ok_or_else(missing)
            }
            _ => Err(LatticeError::InvalidStep { node, step: self }),
        }
    }
}

/// Evaluates `steps` from `start`, calling `visit` before every step.
///
/// Returns the node reached after the last step.
pub fn walk<T>(
    arena: &NodeArena<T>,
    start: Node,
    steps: &[Step],
    mut visit: impl FnMut(Node, Step),
) -> Result<Node, LatticeError> {
    steps.iter().try_fold(start, |at, &step| {
        visit(at, step);
        step.apply(arena, at)
    })
}

/// Renders a path as dotted step names, e.g. `lbit0.x.other.y.dbit`.
pub fn format_path(steps: &[Step]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::arena::Payload;
    use crate::topology::coord::Coord;

    #[test]
    fn cell_half_other_round_trip() {
        let mut a = NodeArena::<()>::new();
        let c = a.new_cell(Payload::Scaffold, Coord::new(0, 0, 0));
        let path = [Step::Half(Half::Value), Step::Other, Step::Other, Step::Cell];
        let end = walk(&a, Node::Cell(c), &path, |_, _| {}).unwrap();
        assert_eq!(end, Node::Cell(c));
        assert_eq!(format_path(&path), "lbit0.other.other.dbit");
    }

    #[test]
    fn absent_link_is_missing_reference() {
        let mut a = NodeArena::<()>::new();
        let c = a.new_cell(Payload::Scaffold, Coord::new(0, 0, 0));
        let err = walk(
            &a,
            Node::Cell(c),
            &[Step::Half(Half::Sentinel), Step::Axis(Axis::Y)],
            |_, _| {},
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::MissingReference { step: Step::Axis(Axis::Y), .. }
        ));
    }

    #[test]
    fn half_from_lbit_is_invalid() {
        let mut a = NodeArena::<()>::new();
        let c = a.new_cell(Payload::Scaffold, Coord::new(0, 0, 0));
        let err = walk(
            &a,
            Node::Cell(c),
            &[Step::Half(Half::Value), Step::Half(Half::Value)],
            |_, _| {},
        )
        .unwrap_err();
        assert!(matches!(err, LatticeError::InvalidStep { .. }));
    }

    #[test]
    fn visit_sees_every_intermediate_node() {
        let mut a = NodeArena::<()>::new();
        let c = a.new_cell(Payload::Scaffold, Coord::new(0, 0, 0));
        let mut seen = Vec::new();
        walk(
            &a,
            Node::Cell(c),
            &[Step::Half(Half::Value), Step::Other, Step::Cell],
            |n, s| seen.push((n, s)),
        )
        .unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (Node::Cell(c), Step::Half(Half::Value)));
    }
}
