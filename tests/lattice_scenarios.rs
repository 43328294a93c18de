mod util;
use util::*;
use world_lattice::prelude::*;

#[test]
fn origin_and_one() {
    let l = lattice_from(&[("origin", (0, 0, 0)), ("one", (1, 1, 1))]);
    assert_eq!(l.value_at(c(0, 0, 0)), Some(&"origin"));
    assert_eq!(l.value_at(c(1, 1, 1)), Some(&"one"));

    let origin = l.retrieve(c(0, 0, 0)).unwrap();
    let right = l.step(origin, Move::XP).unwrap();
    assert_eq!(l.coord(right), c(1, 0, 0));
    assert_eq!(l.step(right, Move::XM).unwrap(), origin);
    assert_clean(&l);
}

#[test]
fn last_write_wins() {
    let l = lattice_from(&[(1, (3, 0, 0)), (2, (3, 0, 0)), (3, (-2, 5, 1)), (4, (3, 0, 0))]);
    assert_eq!(l.value_at(c(3, 0, 0)), Some(&4));
    assert_eq!(l.value_at(c(-2, 5, 1)), Some(&3));
    assert_eq!(l.values_at(c(3, 0, 0)), vec![&1, &2, &4]);
}

#[test]
fn temporal_chain_is_walkable_both_ways() {
    let mut l = Lattice::new();
    let first = l.insert("p1", c(4, 4, 4));
    let second = l.insert("p2", c(4, 4, 4));
    assert_eq!(l.step(second, Move::Earlier).unwrap(), first);
    assert_eq!(l.step(first, Move::Later).unwrap(), second);
    // the scaffold root terminates the chain
    let root = l.step(first, Move::Earlier).unwrap();
    assert_eq!(l.payload(root), &Payload::Scaffold);
    assert!(matches!(
        l.step(root, Move::Earlier),
        Err(LatticeError::MissingReference { .. })
    ));
    assert_eq!(l.chain_root(second), root);
}

#[test]
fn absolute_move_is_idempotent() {
    let mut l = Lattice::<()>::new();
    let a = l.move_absolute(c(7, -3, 2));
    let rebuilds = l.stats().window_rebuilds;
    let b = l.move_absolute(c(7, -3, 2));
    assert_eq!(a, b);
    assert_eq!(l.stats().window_rebuilds, rebuilds);
    assert_eq!(l.coord(a), c(8, -2, 3));
}

#[test]
fn insert_after_absolute_move_refreshes_landing() {
    let mut l = Lattice::new();
    let landed = l.move_absolute(c(0, 0, 0));
    let newer = l.insert('q', c(1, 1, 1));
    assert_ne!(landed, newer);
    // same origin as before: the cache must hand back the new revision
    assert_eq!(l.move_absolute(c(0, 0, 0)), newer);
    assert!(l.cached_moves() >= 1);
}

#[test]
fn retrieve_never_constructs() {
    let l = Lattice::<u8>::new();
    let before = l.arena().cell_count();
    assert_eq!(l.retrieve(c(100, 0, 0)), None);
    assert_eq!(
        l.try_retrieve(c(100, 0, 0)),
        Err(LatticeError::CoordinateNotFound(c(100, 0, 0)))
    );
    assert_eq!(l.arena().cell_count(), before);
}

#[test]
fn far_insert_materializes_the_path() {
    let mut l = Lattice::new();
    l.insert("far", c(6, 0, 0));
    for x in -1..=7 {
        assert!(l.retrieve(c(x, 0, 0)).is_some(), "x={x}");
    }
    assert_clean(&l);
}

#[test]
fn custom_window_dims() {
    let cfg = LatticeConfig {
        window: WindowDims::new(5, 5, 5),
        initial_origin: c(-2, -2, -2),
    };
    let mut l = Lattice::with_config(cfg).unwrap();
    assert_eq!(l.len(), 125);
    assert_eq!(l.coord(l.cursor()), c(0, 0, 0));
    let cell = l.insert(9u16, c(3, 0, 0));
    assert_eq!(l.cursor(), cell);
    assert_eq!(l.head().origin(), c(1, -2, -2));
    assert_clean(&l);
}

#[test]
fn invariants_hold_after_mixed_workload() {
    let mut l = Lattice::new();
    for i in 0..10i64 {
        l.insert(i, c(i % 3, -(i % 2), i / 4));
        l.move_relative(1, -1, 0);
    }
    l.validate_invariants().unwrap();
    l.debug_assert_invariants();
}

#[test]
fn history_cells_are_creation_ordered() {
    let l = lattice_from(&[("a", (0, 0, 0)), ("b", (0, 0, 0))]);
    let ids: Vec<CellId> = l.history_cells().map(|(id, _)| id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    let (last, dbit) = l.history_cells().last().unwrap();
    assert_eq!(l.value(last), Some(&"b"));
    assert_eq!(dbit.coord(), c(0, 0, 0));
}
