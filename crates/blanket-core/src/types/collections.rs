//! Fast hash collections used across the workspace.

pub use rustc_hash::{FxHashMap, FxHashSet};

/// Creates an empty `FxHashMap` with room for `capacity` entries.
pub fn fx_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, Default::default())
}

/// Creates an empty `FxHashSet` with room for `capacity` entries.
pub fn fx_set_with_capacity<T>(capacity: usize) -> FxHashSet<T> {
    FxHashSet::with_capacity_and_hasher(capacity, Default::default())
}
