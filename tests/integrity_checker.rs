mod util;
use util::*;
use world_lattice::prelude::*;
use world_lattice::topology::integrity::reciprocity_paths;
use world_lattice::topology::path::{Step, format_path};

#[test]
fn fresh_window_has_no_violations() {
    let l = Lattice::<()>::new();
    let report = assert_clean(&l);
    assert_eq!(report.cells_checked, 27);
    // the centre resolves everything, the corners resolve some paths
    assert!(report.paths_resolved >= 24);
    assert!(report.paths_skipped > 0);
}

#[test]
fn path_set_covers_every_ordered_axis_pair() {
    let paths = reciprocity_paths();
    assert_eq!(paths.len(), 24);
    let mut pairs = std::collections::BTreeSet::new();
    for p in &paths {
        let axes: Vec<Axis> = p
            .iter()
            .filter_map(|s| match s {
                Step::Axis(a) => Some(*a),
                _ => None,
            })
            .collect();
        assert_eq!(axes.len(), 4, "{}", format_path(p));
        assert_ne!(axes[0], axes[1]);
        pairs.insert((axes[0], axes[1]));
    }
    assert_eq!(pairs.len(), 6);
    let rendered: Vec<String> = paths.iter().map(|p| format_path(p)).collect();
    assert!(rendered.contains(&"lbit1.z.other.y.z.other.y.dbit".to_string()));
    assert!(rendered.contains(&"lbit0.y.x.other.y.x.dbit".to_string()));
}

#[test]
fn every_policy_agrees_on_a_clean_lattice() {
    let l = lattice_from(&[("origin", (0, 0, 0)), ("one", (1, 1, 1)), ("two", (1, 1, 1))]);
    let abort = l.check_integrity().unwrap();
    let warn = l
        .check_integrity_with(IntegrityOptions {
            on_violation: ViolationHandling::Warn,
        })
        .unwrap();
    let collect = l.check_integrity_with(IntegrityOptions::collect_all()).unwrap();
    assert_eq!(abort, warn);
    assert_eq!(warn, collect);
    assert!(collect.is_clean());
    assert_eq!(collect.cells_checked, l.len());
}

#[test]
fn single_cell_check() {
    let mut l = Lattice::new();
    let cell = l.insert(1u8, c(5, 5, 5));
    let report = l.check_cell(cell).unwrap();
    assert_eq!(report.cells_checked, 1);
    assert_eq!(report.paths_resolved, 24);
    assert!(report.is_clean());
}

#[test]
fn superseded_cells_are_not_scanned() {
    let mut l = Lattice::new();
    let old = l.insert("old", c(0, 0, 0));
    l.insert("new", c(0, 0, 0));
    // the superseded revision has no axis links: every path is skipped
    let report = l.check_cell(old).unwrap();
    assert_eq!(report.paths_resolved, 0);
    assert_eq!(report.paths_skipped, 24);
}
