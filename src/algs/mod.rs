//! Workloads driven over a lattice.

pub mod walk;

pub use walk::{WalkOptions, WalkStep, WalkSummary, random_walk};
