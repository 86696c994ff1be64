//! Memoization store.
//!
//! A `Cache` maps string keys to values of any `Send + Sync` type. There is
//! no eviction, expiry or size bound: entries live until they are deleted or
//! the last clone of the cache is dropped.
//!
//! Clones share storage, so one cache can be handed to several components.
//! Plain reads and writes are synchronous; only
//! [`Cache::get_or_try_insert_with`] suspends, and only while waiting for
//! another caller that is already computing the same key.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use tracing::trace;

type Entry = Arc<dyn Any + Send + Sync>;
type Gate = Arc<tokio::sync::Mutex<()>>;

/// Shared, type-erased key/value memo table.
#[derive(Clone, Default)]
pub struct Cache {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: RwLock<HashMap<String, Entry>>,
    inflight: Mutex<HashMap<String, Gate>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn global() -> &'static Cache {
        static GLOBAL: OnceLock<Cache> = OnceLock::new();
        GLOBAL.get_or_init(Cache::new)
    }

    /// True iff a value was set for `key` and not deleted since.
    pub fn has(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// The value stored under `key`.
    ///
    /// Returns `None` if nothing is stored or if the stored value is not a `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.read().get(key).cloned()?;
        entry.downcast::<T>().ok()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.set_arc(key, Arc::new(value));
    }

    /// Store an already shared value under `key`.
    pub fn set_arc<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        self.write().insert(key.into(), value);
    }

    /// Remove the entry for `key`. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        self.write().remove(key);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Return the value under `key`, computing and storing it on a miss.
    ///
    /// Concurrent callers for the same key are serialized: only one runs
    /// `init` at a time and the others pick up the stored value. An `Err`
    /// from `init` is returned to its caller and nothing is stored, so the
    /// next caller runs its own `init`.
    pub async fn get_or_try_insert_with<T, E, F, Fut>(&self, key: &str, init: F) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key) {
            trace!(key, "cache hit");
            return Ok(value);
        }

        let gate = self.gate(key);
        let guard = gate.lock().await;

        let result = match self.get::<T>(key) {
            Some(value) => {
                trace!(key, "filled by concurrent caller");
                Ok(value)
            }
            None => {
                trace!(key, "cache miss");
                init().await.map(|value| {
                    let value = Arc::new(value);
                    self.set_arc(key, Arc::clone(&value));
                    value
                })
            }
        };

        drop(guard);
        self.release_gate(key, &gate);
        result
    }

    fn gate(&self, key: &str) -> Gate {
        let mut inflight = self.inner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(inflight.entry(key.to_string()).or_default())
    }

    /// Drop the gate once no other caller holds it.
    fn release_gate(&self, key: &str, gate: &Gate) {
        let mut inflight = self.inner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = inflight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, gate) && Arc::strong_count(gate) == 2);
        if idle {
            inflight.remove(key);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.inner.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.inner.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inner.inflight.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
