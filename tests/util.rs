#![allow(dead_code)]
use world_lattice::prelude::*;

pub fn c(x: i64, y: i64, z: i64) -> Coord {
    Coord::new(x, y, z)
}

/// Lattice with `(payload, coord)` pairs inserted in order.
pub fn lattice_from<T: std::fmt::Debug + Clone>(inserts: &[(T, (i64, i64, i64))]) -> Lattice<T> {
    let mut l = Lattice::new();
    for (p, at) in inserts {
        l.insert(p.clone(), Coord::from(*at));
    }
    l
}

/// Asserts a full integrity scan finds nothing and returns the report.
pub fn assert_clean<T: std::fmt::Debug>(l: &Lattice<T>) -> world_lattice::topology::IntegrityReport {
    let report = l
        .check_integrity_with(IntegrityOptions::collect_all())
        .expect("scan itself should not fail");
    assert!(
        report.is_clean(),
        "violations:\n{}",
        report
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
    report
}

/// Coordinate and payload of every current cell, in coordinate order.
pub fn contents<T: Clone>(l: &Lattice<T>) -> Vec<(Coord, Payload<T>)> {
    l.render_cells().map(|r| (r.coord, r.payload.clone())).collect()
}
