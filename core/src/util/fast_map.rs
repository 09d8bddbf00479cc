//! Fx-hashed collections for variable names, label names and instruction orders.

use std::sync::Arc;

pub type FastHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

pub type FastHashSet<K> = rustc_hash::FxHashSet<K>;

/// Map keyed by a variable or label name.
pub type NameMap<V> = FastHashMap<Arc<str>, V>;

#[inline]
pub fn name_map_new<V>() -> NameMap<V> {
    NameMap::default()
}

#[inline]
pub fn fast_hash_set_with_capacity<K>(capacity: usize) -> FastHashSet<K> {
    FastHashSet::with_capacity_and_hasher(capacity, Default::default())
}
