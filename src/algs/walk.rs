//! Seeded random-walk workload.
//!
//! Each step starts from the previous insertion, picks a half and an axis at
//! random, and inserts at the coordinate of the cell that half links to along
//! that axis. When the link is absent the new revision goes to the same
//! coordinate instead. Insertion re-centres the head window on the new cell,
//! so the next step always starts from a fully linked neighbourhood.

use crate::lattice_error::LatticeError;
use crate::topology::arena::CellId;
use crate::topology::coord::{Axis, Coord, Half};
use crate::topology::lattice::Lattice;
use crate::topology::path::{Node, Step, walk};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::fmt;

/// Options for [`random_walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Number of insertions after the initial one at the start coordinate.
    pub steps: usize,
    /// Seed for the walk's `SmallRng`; equal seeds give equal walks.
    pub seed: u64,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { steps: 50, seed: 42 }
    }
}

/// Describes one step of a walk, passed to the payload factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep {
    /// 0 for the initial insertion.
    pub index: usize,
    pub from: Coord,
    pub to: Coord,
    /// Half and axis drawn for this step; `None` for the initial insertion.
    pub via: Option<(Half, Axis)>,
}

impl fmt::Display for WalkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.via {
            Some((half, axis)) => write!(f, "#{} {}.{half}.{axis} -> {}", self.index, self.from, self.to),
            None => write!(f, "#{} {}", self.index, self.to),
        }
    }
}

/// Result of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    /// Revisions inserted, in order.
    pub inserted: Vec<CellId>,
    /// Steps whose drawn link was absent and that re-inserted in place.
    pub in_place: usize,
    /// Distinct coordinates written to.
    pub visited: BTreeSet<Coord>,
}

impl WalkSummary {
    pub fn last(&self) -> Option<CellId> {
        self.inserted.last().copied()
    }
}

/// Runs a random walk of `options.steps` steps starting with an insertion
/// at `start`.
///
/// # Errors
/// Propagates any traversal error other than a missing link.
pub fn random_walk<T, F>(
    lattice: &mut Lattice<T>,
    start: Coord,
    options: WalkOptions,
    mut make_payload: F,
) -> Result<WalkSummary, LatticeError>
where
    T: fmt::Debug,
    F: FnMut(&WalkStep) -> T,
{
    let mut rng = SmallRng::seed_from_u64(options.seed);
    let mut summary = WalkSummary {
        inserted: Vec::with_capacity(options.steps + 1),
        in_place: 0,
        visited: BTreeSet::new(),
    };

    let first = WalkStep {
        index: 0,
        from: start,
        to: start,
        via: None,
    };
    let mut source = lattice.insert(make_payload(&first), start);
    summary.inserted.push(source);
    summary.visited.insert(start);

    for index in 1..=options.steps {
        let half = Half::BOTH[rng.gen_range(0..2)];
        let axis = Axis::ALL[rng.gen_range(0..3)];
        let from = lattice.coord(source);
        let path = [Step::Half(half), Step::Axis(axis), Step::Cell];
        let to = match walk(&lattice.arena, Node::Cell(source), &path, |_, _| {}) {
            Ok(Node::Cell(target)) => lattice.coord(target),
            Ok(node) => {
                return Err(LatticeError::InvalidStep {
                    node,
                    step: Step::Cell,
                });
            }
            Err(LatticeError::MissingReference { .. }) => {
                summary.in_place += 1;
                from
            }
            Err(e) => return Err(e),
        };

        let step = WalkStep {
            index,
            from,
            to,
            via: Some((half, axis)),
        };
        log::trace!("walk {step}");
        source = lattice.insert(make_payload(&step), to);
        summary.inserted.push(source);
        summary.visited.insert(to);
    }

    log::debug!(
        "walk from {start}: {} inserts over {} coordinates",
        summary.inserted.len(),
        summary.visited.len()
    );
    Ok(summary)
}
