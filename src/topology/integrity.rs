//! Reciprocity checker for the lattice graph.
//!
//! For every ordered pair of distinct axes `(a1, a2)` four closed test paths
//! are generated. Starting from a cell, each path hops through counterparts
//! and axis neighbours twice and then asks for the owning cell, which must be
//! the subject again:
//!
//! ```text
//! lbit0.a1.other.a2.a1.other.a2.dbit
//! lbit1.a1.other.a2.a1.other.a2.dbit
//! lbit0.a1.a2.other.a1.a2.dbit
//! lbit1.a1.a2.other.a1.a2.dbit
//! ```
//!
//! Two hops on each of two distinct axes is the shortest cycle that exposes a
//! link which is not reciprocated. A path that runs into an absent link (a
//! lattice edge) is skipped, not flagged.

use crate::lattice_error::LatticeError;
use crate::topology::arena::CellId;
use crate::topology::coord::{Axis, Coord, Half};
use crate::topology::lattice::Lattice;
use crate::topology::path::{Node, Step, format_path, walk};
use std::fmt;

/// Behavior when a test path resolves to the wrong cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationHandling {
    /// Stop and return the violation as `Err(DataIntegrity)`.
    #[default]
    Abort,
    /// Log a warning and keep scanning.
    Warn,
    /// Keep scanning silently; violations are only listed in the report.
    Collect,
}

/// Options for an integrity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrityOptions {
    pub on_violation: ViolationHandling,
}

impl IntegrityOptions {
    /// Scan everything and report all violations without failing.
    pub fn collect_all() -> Self {
        Self {
            on_violation: ViolationHandling::Collect,
        }
    }
}

/// One step of a failing path, with the payload label of the LBit it was
/// taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub label: String,
    pub step: Step,
}

/// A test path that resolved fully but did not return to its subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    pub subject: Coord,
    pub cell: CellId,
    pub path: Vec<Step>,
    pub landed_on: Node,
    pub landed_at: Option<Coord>,
    pub trace: Vec<TraceEntry>,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ended on {}", self.subject, format_path(&self.path), self.landed_on)?;
        if let Some(at) = self.landed_at {
            write!(f, " at {at}")?;
        }
        for entry in &self.trace {
            write!(f, "\n# {} {}", entry.label, entry.step)?;
        }
        Ok(())
    }
}

/// Summary of an integrity scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub cells_checked: usize,
    pub paths_resolved: usize,
    pub paths_skipped: usize,
    pub violations: Vec<IntegrityViolation>,
}

impl IntegrityReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// The 24 canonical reciprocity paths (6 ordered axis pairs x 4 shapes).
pub fn reciprocity_paths() -> Vec<Vec<Step>> {
    let mut paths = Vec::with_capacity(24);
    for a1 in Axis::ALL {
        for a2 in Axis::ALL {
            if a1 == a2 {
                continue;
            }
            let (s1, s2) = (Step::Axis(a1), Step::Axis(a2));
            for half in Half::BOTH {
                paths.push(vec![
                    Step::Half(half),
                    s1,
                    Step::Other,
                    s2,
                    s1,
                    Step::Other,
                    s2,
                    Step::Cell,
                ]);
            }
            for half in Half::BOTH {
                paths.push(vec![Step::Half(half), s1, s2, Step::Other, s1, s2, Step::Cell]);
            }
        }
    }
    paths
}

impl<T: fmt::Debug> Lattice<T> {
    /// Scans every current cell, aborting on the first violation.
    pub fn check_integrity(&self) -> Result<IntegrityReport, LatticeError> {
        self.check_integrity_with(IntegrityOptions::default())
    }

    /// Scans every current cell in coordinate order.
    pub fn check_integrity_with(
        &self,
        options: IntegrityOptions,
    ) -> Result<IntegrityReport, LatticeError> {
        let paths = reciprocity_paths();
        let mut report = IntegrityReport::default();
        for (_, cell) in self.current_cells() {
            self.check_subject(cell, &paths, options, &mut report)?;
        }
        log::debug!(
            "integrity: {} cells, {} paths resolved, {} skipped, {} violations",
            report.cells_checked,
            report.paths_resolved,
            report.paths_skipped,
            report.violations.len()
        );
        Ok(report)
    }

    /// Checks a single cell, aborting on the first violation.
    pub fn check_cell(&self, cell: CellId) -> Result<IntegrityReport, LatticeError> {
        self.check_cell_with(cell, IntegrityOptions::default())
    }

    pub fn check_cell_with(
        &self,
        cell: CellId,
        options: IntegrityOptions,
    ) -> Result<IntegrityReport, LatticeError> {
        self.arena.try_dbit(cell)?;
        let mut report = IntegrityReport::default();
        self.check_subject(cell, &reciprocity_paths(), options, &mut report)?;
        Ok(report)
    }

    fn check_subject(
        &self,
        cell: CellId,
        paths: &[Vec<Step>],
        options: IntegrityOptions,
        report: &mut IntegrityReport,
    ) -> Result<(), LatticeError> {
        report.cells_checked += 1;
        let start = Node::Cell(cell);
        for path in paths {
            let end = match walk(&self.arena, start, path, |_, _| {}) {
                Ok(end) => end,
                Err(LatticeError::MissingReference { .. }) => {
                    report.paths_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.paths_resolved += 1;
            if end == start {
                continue;
            }

            let violation = self.describe(cell, path, end)?;
            match options.on_violation {
                ViolationHandling::Abort => {
                    log::error!("integrity violation: {violation}");
                    return Err(LatticeError::DataIntegrity(Box::new(violation)));
                }
                ViolationHandling::Warn => {
                    log::warn!("integrity violation: {violation}");
                    report.violations.push(violation);
                }
                ViolationHandling::Collect => report.violations.push(violation),
            }
        }
        Ok(())
    }

    /// Re-walks a failing path collecting the payload of every LBit visited.
    fn describe(
        &self,
        cell: CellId,
        path: &[Step],
        end: Node,
    ) -> Result<IntegrityViolation, LatticeError> {
        let mut trace = Vec::with_capacity(path.len());
        walk(&self.arena, Node::Cell(cell), path, |at, step| {
            if let Node::LBit(tr) = at {
                trace.push(TraceEntry {
                    label: self.label(tr),
                    step,
                });
            }
        })?;
        let landed_at = match end {
            Node::Cell(c) => Some(self.coord(c)),
            Node::LBit(tr) => self.lbit(tr).cell().map(|c| self.coord(c)),
        };
        Ok(IntegrityViolation {
            subject: self.coord(cell),
            cell,
            path: path.to_vec(),
            landed_on: end,
            landed_at,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_lattice() -> Lattice<&'static str> {
        let mut l = Lattice::new();
        let a = l.retrieve(Coord::new(-1, 0, 0)).unwrap();
        let far = l.retrieve(Coord::new(1, 0, 0)).unwrap();
        // skip over (0,0,0): a's upper x link now points two cells away
        l.arena.link(a, far, Axis::X);
        l
    }

    #[test]
    fn twenty_four_paths() {
        let paths = reciprocity_paths();
        assert_eq!(paths.len(), 24);
        assert_eq!(format_path(&paths[0]), "lbit0.x.other.y.x.other.y.dbit");
        assert_eq!(format_path(&paths[3]), "lbit1.x.y.other.x.y.dbit");
        assert!(paths.iter().all(|p| p.last() == Some(&Step::Cell)));
    }

    #[test]
    fn fresh_window_is_clean() {
        let l = Lattice::<()>::new();
        let report = l.check_integrity().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.cells_checked, 27);
        assert!(report.paths_resolved > 0);
        assert!(report.paths_skipped > 0);
        assert_eq!(report.paths_resolved + report.paths_skipped, 27 * 24);
    }

    #[test]
    fn centre_cell_resolves_every_path() {
        let l = Lattice::<()>::new();
        let centre = l.retrieve(Coord::new(0, 0, 0)).unwrap();
        let report = l.check_cell(centre).unwrap();
        assert_eq!(report.paths_resolved, 24);
        assert_eq!(report.paths_skipped, 0);
    }

    #[test]
    fn inserts_keep_lattice_clean() {
        let mut l = Lattice::new();
        l.insert("origin", Coord::new(0, 0, 0));
        l.insert("one", Coord::new(1, 1, 1));
        l.insert("again", Coord::new(0, 0, 0));
        l.insert("far", Coord::new(-4, 2, 7));
        assert!(l.check_integrity().unwrap().is_clean());
    }

    #[test]
    fn misdirected_link_aborts_with_trace() {
        let l = broken_lattice();
        let err = l.check_integrity().unwrap_err();
        let LatticeError::DataIntegrity(v) = err else {
            panic!("expected DataIntegrity, got {err:?}");
        };
        assert_eq!(v.path.last(), Some(&Step::Cell));
        assert!(!v.trace.is_empty());
        assert_ne!(v.landed_at, Some(v.subject));
        let text = v.to_string();
        assert!(text.contains("dbit"), "{text}");
    }

    #[test]
    fn collect_keeps_scanning() {
        let l = broken_lattice();
        let report = l
            .check_integrity_with(IntegrityOptions::collect_all())
            .unwrap();
        assert!(report.violations.len() > 1);
        assert_eq!(report.cells_checked, 27);
        let subjects: std::collections::BTreeSet<Coord> =
            report.violations.iter().map(|v| v.subject).collect();
        assert!(subjects.contains(&Coord::new(-1, 0, 0)));
    }

    #[test]
    fn trace_uses_scaffold_labels() {
        let l = broken_lattice();
        let a = l.retrieve(Coord::new(-1, 0, 0)).unwrap();
        let report = l.check_cell_with(a, IntegrityOptions::collect_all()).unwrap();
        let v = &report.violations[0];
        assert!(v.trace.iter().any(|e| e.label.starts_with("3d")));
        assert!(v.trace.iter().any(|e| e.label == "time_root"));
    }

    #[test]
    fn unknown_cell_is_an_error() {
        let l = Lattice::<()>::new();
        let bogus = CellId(10_000);
        assert_eq!(l.check_cell(bogus).unwrap_err(), LatticeError::UnknownCell(bogus));
    }
}
