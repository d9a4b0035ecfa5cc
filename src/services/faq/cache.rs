use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Shared LRU of finished responses. A capacity of zero disables caching.
pub struct SearchCache<V> {
    inner: Option<Mutex<LruCache<String, Arc<V>>>>,
}

impl<V> SearchCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let Some(inner) = &self.inner else {
            return Arc::new(compute());
        };

        if let Some(hit) = inner.lock().get(key) {
            tracing::trace!(key, "search cache hit");
            return Arc::clone(hit);
        }

        // Computed outside the lock; a concurrent miss may compute twice.
        let value = Arc::new(compute());
        inner.lock().put(key.to_string(), Arc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
