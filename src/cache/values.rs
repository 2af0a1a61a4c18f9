//! Frame-granular memoization of computed property values.
//!
//! Entries are keyed by `(object, property)` and remember the exact time they were computed for.
//! A lookup at any other time recomputes. The owning movie clears the whole cache after each
//! render pass and after structural edits, so a miss is always safe.

use std::any::Any;
use std::collections::HashMap;

use crate::foundation::error::LaminaResult;
use crate::foundation::ids::ObjectId;

struct CachedValue {
    value: Box<dyn Any>,
    time_bits: u64,
}

/// Counters describing cache effectiveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Number of full clears.
    pub clears: u64,
}

/// Per-movie value cache.
#[derive(Default)]
pub struct ValueCache {
    entries: HashMap<ObjectId, HashMap<String, CachedValue>>,
    stats: CacheStats,
}

impl std::fmt::Debug for ValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCache")
            .field("entries", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl ValueCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `(target, property)` if it was computed for exactly `time`.
    pub fn get<T: Clone + 'static>(
        &self,
        target: impl Into<ObjectId>,
        property: &str,
        time: f64,
    ) -> Option<T> {
        let entry = self.entries.get(&target.into())?.get(property)?;
        if entry.time_bits != time.to_bits() {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Return the cached value for `time`, or compute, store and return it.
    pub fn get_or_compute<T, F>(
        &mut self,
        target: impl Into<ObjectId>,
        property: &str,
        time: f64,
        compute: F,
    ) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let target = target.into();
        if let Some(v) = self.get::<T>(target, property, time) {
            self.stats.hits += 1;
            return v;
        }
        self.stats.misses += 1;
        let value = compute();
        self.store(target, property, time, value.clone());
        value
    }

    /// Fallible variant of [`ValueCache::get_or_compute`]. Errors are returned and not cached.
    pub fn try_get_or_compute<T, F>(
        &mut self,
        target: impl Into<ObjectId>,
        property: &str,
        time: f64,
        compute: F,
    ) -> LaminaResult<T>
    where
        T: Clone + 'static,
        F: FnOnce() -> LaminaResult<T>,
    {
        let target = target.into();
        if let Some(v) = self.get::<T>(target, property, time) {
            self.stats.hits += 1;
            return Ok(v);
        }
        self.stats.misses += 1;
        let value = compute()?;
        self.store(target, property, time, value.clone());
        Ok(value)
    }

    fn store<T: 'static>(&mut self, target: ObjectId, property: &str, time: f64, value: T) {
        let slot = CachedValue {
            value: Box::new(value),
            time_bits: time.to_bits(),
        };
        let props = self.entries.entry(target).or_default();
        match props.get_mut(property) {
            Some(existing) => *existing = slot,
            None => {
                props.insert(property.to_owned(), slot);
            }
        }
    }

    /// Drop every entry of one object.
    pub fn invalidate(&mut self, target: impl Into<ObjectId>) {
        self.entries.remove(&target.into());
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.clears += 1;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Return `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/values.rs"]
mod tests;
