//! Lattice persistence.
//!
//! This module provides trait-based readers and writers that move a
//! [`LatticeSnapshot`] through a byte stream, plus a directory store that
//! keeps one file per cell revision.

pub mod dir_store;
pub mod snapshot;

pub use dir_store::CellDirStore;
pub use snapshot::{CellRecord, LBitRecord, LatticeSnapshot, SNAPSHOT_VERSION};

use crate::lattice_error::LatticeError;
use crate::topology::lattice::Lattice;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Trait for codecs that serialize a snapshot.
pub trait SnapshotWriter {
    /// Encode `snapshot` into `writer`.
    fn write<T: Serialize, W: Write>(
        &self,
        snapshot: &LatticeSnapshot<T>,
        writer: W,
    ) -> Result<(), LatticeError>;
}

/// Trait for codecs that parse a snapshot.
pub trait SnapshotReader {
    /// Decode a snapshot from `reader`. The snapshot is not validated; pass
    /// it to [`Lattice::from_snapshot`] for that.
    fn read<T: DeserializeOwned, R: Read>(
        &self,
        reader: R,
    ) -> Result<LatticeSnapshot<T>, LatticeError>;
}

/// Human-readable JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl SnapshotWriter for JsonCodec {
    fn write<T: Serialize, W: Write>(
        &self,
        snapshot: &LatticeSnapshot<T>,
        writer: W,
    ) -> Result<(), LatticeError> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, snapshot)?;
        } else {
            serde_json::to_writer(writer, snapshot)?;
        }
        Ok(())
    }
}

impl SnapshotReader for JsonCodec {
    fn read<T: DeserializeOwned, R: Read>(
        &self,
        reader: R,
    ) -> Result<LatticeSnapshot<T>, LatticeError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Compact binary codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl SnapshotWriter for BincodeCodec {
    fn write<T: Serialize, W: Write>(
        &self,
        snapshot: &LatticeSnapshot<T>,
        writer: W,
    ) -> Result<(), LatticeError> {
        bincode::serialize_into(writer, snapshot)?;
        Ok(())
    }
}

impl SnapshotReader for BincodeCodec {
    fn read<T: DeserializeOwned, R: Read>(
        &self,
        reader: R,
    ) -> Result<LatticeSnapshot<T>, LatticeError> {
        Ok(bincode::deserialize_from(reader)?)
    }
}

impl<T: Clone + Serialize> Lattice<T> {
    /// Snapshots the lattice and encodes it with `codec`.
    pub fn save_with<C: SnapshotWriter, W: Write>(
        &self,
        codec: &C,
        writer: W,
    ) -> Result<(), LatticeError> {
        codec.write(&self.snapshot(), writer)
    }
}

impl<T: DeserializeOwned> Lattice<T> {
    /// Decodes a snapshot with `codec` and rebuilds the lattice from it.
    pub fn load_with<C: SnapshotReader, R: Read>(
        codec: &C,
        reader: R,
    ) -> Result<Self, LatticeError> {
        Lattice::from_snapshot(codec.read(reader)?)
    }
}
