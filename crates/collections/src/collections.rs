//! Collection aliases shared across termise crates.
//!
//! Keyfile groups and keys keep their file order, so the parser stores them
//! in an `IndexMap` hashed with FxHash.

pub use rustc_hash::FxBuildHasher;

/// Insertion-ordered hash map with FxHash.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;
