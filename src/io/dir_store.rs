//! One-file-per-revision directory store.
//!
//! Layout under `root`:
//!
//! ```text
//! lattice.meta          JSON: version, window, head origin, cell count
//! dbits/<tr0>_<tr1>.dbit  bincode CellRecord, named after both halves
//! ```

use crate::io::snapshot::{CellRecord, LatticeSnapshot, SNAPSHOT_VERSION};
use crate::lattice_error::LatticeError;
use crate::topology::coord::{Coord, Half};
use crate::topology::lattice::{Lattice, WindowDims};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const META_FILE: &str = "lattice.meta";
const CELL_DIR: &str = "dbits";
const CELL_EXT: &str = "dbit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoreMeta {
    version: u32,
    window: WindowDims,
    head_origin: Coord,
    cells: usize,
}

/// A lattice persisted as a directory of cell files.
#[derive(Debug, Clone)]
pub struct CellDirStore {
    root: PathBuf,
}

impl CellDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cell_dir(&self) -> PathBuf {
        self.root.join(CELL_DIR)
    }

    fn cell_path<T>(&self, record: &CellRecord<T>) -> PathBuf {
        self.cell_dir().join(format!(
            "{}_{}.{CELL_EXT}",
            record.half(Half::Value).tr,
            record.half(Half::Sentinel).tr
        ))
    }

    /// Writes every revision of `lattice`, replacing any cell files already
    /// in the store. Returns the number of cell files written.
    pub fn save<T: Clone + Serialize>(&self, lattice: &Lattice<T>) -> Result<usize, LatticeError> {
        let dir = self.cell_dir();
        fs::create_dir_all(&dir)?;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == CELL_EXT) {
                fs::remove_file(path)?;
            }
        }

        let mut written = 0;
        for record in lattice.cells() {
            let mut out = BufWriter::new(File::create(self.cell_path(&record))?);
            bincode::serialize_into(&mut out, &record)?;
            out.flush()?;
            written += 1;
        }

        let meta = StoreMeta {
            version: SNAPSHOT_VERSION,
            window: lattice.config().window,
            head_origin: lattice.head().origin(),
            cells: written,
        };
        fs::write(self.root.join(META_FILE), serde_json::to_vec_pretty(&meta)?)?;
        log::debug!("saved {written} cells to {}", self.root.display());
        Ok(written)
    }

    /// Reads every cell file back and rebuilds the lattice.
    ///
    /// # Errors
    /// `SnapshotIo` for unreadable files, `Snapshot` when the cell count does
    /// not match the metadata or the reassembled graph fails validation.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Lattice<T>, LatticeError> {
        let meta: StoreMeta = serde_json::from_slice(&fs::read(self.root.join(META_FILE))?)?;

        let mut cells: Vec<CellRecord<T>> = Vec::with_capacity(meta.cells);
        for entry in fs::read_dir(self.cell_dir())? {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e == CELL_EXT) {
                continue;
            }
            let record = bincode::deserialize_from(BufReader::new(File::open(&path)?))?;
            cells.push(record);
        }
        if cells.len() != meta.cells {
            return Err(LatticeError::Snapshot(format!(
                "store lists {} cells but {} files were found",
                meta.cells,
                cells.len()
            )));
        }
        // creation order: each revision's value half was issued before the next
        cells.sort_by_key(|c| c.lbit0.tr);

        Lattice::from_snapshot(LatticeSnapshot {
            version: meta.version,
            window: meta.window,
            head_origin: meta.head_origin,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let store = CellDirStore::new(dir.path());
        let mut l = Lattice::new();
        l.insert("origin".to_string(), Coord::new(0, 0, 0));
        l.insert("again".to_string(), Coord::new(0, 0, 0));

        let n = store.save(&l).unwrap();
        assert_eq!(n, l.arena().cell_count());
        assert!(dir.path().join(META_FILE).exists());
        let back: Lattice<String> = store.load().unwrap();
        assert_eq!(back.snapshot(), l.snapshot());
    }

    #[test]
    fn file_names_follow_time_roots() {
        let dir = tempdir().unwrap();
        let store = CellDirStore::new(dir.path());
        let l = Lattice::<u8>::new();
        store.save(&l).unwrap();
        // the first cell owns tr_0 and tr_1
        assert!(dir.path().join(CELL_DIR).join("0_1.dbit").exists());
    }

    #[test]
    fn missing_cell_file_is_rejected() {
        let dir = tempdir().unwrap();
        let store = CellDirStore::new(dir.path());
        store.save(&Lattice::<u8>::new()).unwrap();
        fs::remove_file(dir.path().join(CELL_DIR).join("0_1.dbit")).unwrap();
        assert!(matches!(
            store.load::<u8>(),
            Err(LatticeError::Snapshot(_))
        ));
    }

    #[test]
    fn resave_replaces_old_files() {
        let dir = tempdir().unwrap();
        let store = CellDirStore::new(dir.path());
        let mut l = Lattice::<i32>::new();
        l.move_relative(3, 0, 0);
        store.save(&l).unwrap();
        let smaller = Lattice::<i32>::new();
        store.save(&smaller).unwrap();
        let back: Lattice<i32> = store.load().unwrap();
        assert_eq!(back.len(), 27);
    }
}
