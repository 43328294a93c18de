//! Map aliases for the coordinate index.
//!
//! Iteration order of these aliases is **not** relied upon for determinism;
//! every scan that reports results sorts coordinates first.

#[cfg(all(feature = "fast-hash", not(feature = "deterministic-order")))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(feature = "deterministic-order")]
pub type FastMap<K, V> = std::collections::BTreeMap<K, V>;

#[cfg(not(any(feature = "fast-hash", feature = "deterministic-order")))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
