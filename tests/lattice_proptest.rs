mod util;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use util::*;
use world_lattice::prelude::*;

fn coord() -> impl Strategy<Value = (i64, i64, i64)> {
    (-4i64..=4, -4i64..=4, -4i64..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reads_see_the_latest_write(inserts in prop::collection::vec((any::<u16>(), coord()), 1..12)) {
        let l = lattice_from(&inserts);
        let mut expected = BTreeMap::new();
        for (p, at) in &inserts {
            expected.insert(Coord::from(*at), *p);
        }
        for (at, p) in &expected {
            prop_assert_eq!(l.value_at(*at), Some(p));
        }
    }

    #[test]
    fn history_is_append_only(inserts in prop::collection::vec((any::<u8>(), coord()), 1..10)) {
        let l = lattice_from(&inserts);
        let mut expected: BTreeMap<Coord, Vec<u8>> = BTreeMap::new();
        for (p, at) in &inserts {
            expected.entry(Coord::from(*at)).or_default().push(*p);
        }
        for (at, values) in &expected {
            let got: Vec<u8> = l.values_at(*at).into_iter().copied().collect();
            prop_assert_eq!(&got, values);
        }
    }

    #[test]
    fn inserts_keep_reciprocity(inserts in prop::collection::vec((any::<i8>(), coord()), 0..8)) {
        let l = lattice_from(&inserts);
        let report = l.check_integrity_with(IntegrityOptions::collect_all()).unwrap();
        prop_assert!(report.is_clean());
        prop_assert!(l.validate_invariants().is_ok());
    }

    #[test]
    fn time_roots_are_unique(inserts in prop::collection::vec((any::<u8>(), coord()), 0..8)) {
        let l = lattice_from(&inserts);
        let trs: BTreeSet<TimeRoot> = l.arena().lbits().map(|b| b.time_root()).collect();
        prop_assert_eq!(trs.len(), l.arena().lbit_count());
        prop_assert_eq!(l.arena().lbit_count(), 2 * l.arena().cell_count());
    }

    #[test]
    fn snapshot_reload_is_exact(inserts in prop::collection::vec((any::<u32>(), coord()), 0..6)) {
        let l = lattice_from(&inserts);
        let back = Lattice::from_snapshot(l.snapshot()).unwrap();
        prop_assert_eq!(back.snapshot(), l.snapshot());
    }

    #[test]
    fn random_walk_stays_clean(seed in any::<u64>(), steps in 0usize..30) {
        let mut l = Lattice::new();
        let summary = random_walk(&mut l, Coord::new(0, 0, 0), WalkOptions { steps, seed }, |s| s.index)
            .unwrap();
        prop_assert_eq!(summary.inserted.len(), steps + 1);
        prop_assert!(l.check_integrity().unwrap().is_clean());
    }
}
