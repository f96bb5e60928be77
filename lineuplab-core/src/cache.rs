//! Key/value cache abstraction for expensive, deterministic results.
//!
//! Storage is pluggable: the in-memory cache here serves tests and
//! single-process reuse; the runner adds a directory-backed one.

use crate::fingerprint::CacheKey;
use std::collections::HashMap;
use std::sync::Mutex;

/// Best-effort cache. A failed read is a miss and a failed write is
/// dropped; callers always have the inputs to recompute.
pub trait KeyValueCache<V>: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<V>;
    fn put(&self, key: &CacheKey, value: &V);
}

#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: Mutex<HashMap<CacheKey, V>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send> KeyValueCache<V> for MemoryCache<V> {
    fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &CacheKey, value: &V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.clone(), value.clone());
        }
    }
}
