//! Lattice topology: the node graph and the engine that grows it.
//!
//! This module provides:
//! - [`TimeRoot`] identities and the [`NodeArena`] owning every half-cell
//!   ([`LBit`]) and cell revision ([`DBit`])
//! - Traversal [`Step`]s and the link-following [`Move`] walker
//! - The [`Lattice`] engine (index, head window, navigation, insertion)
//! - The reciprocity [integrity] checker
//!
//! Most users will only need [`Lattice`], [`Coord`] and [`Move`].

pub mod arena;
pub mod cache;
pub mod coord;
pub mod fast_map;
pub mod integrity;
pub mod lattice;
pub mod path;
pub mod time_root;
pub mod walker;

pub use arena::{CellId, DBit, LBit, NodeArena, Payload};
pub use cache::InvalidateCache;
pub use coord::{Axis, Coord, Half};
pub use integrity::{IntegrityOptions, IntegrityReport, IntegrityViolation, ViolationHandling};
pub use lattice::{HeadWindow, Lattice, LatticeConfig, NavStats, WindowDims};
pub use path::{Node, Step};
pub use time_root::{TimeRoot, TimeRootGen};
pub use walker::Move;
