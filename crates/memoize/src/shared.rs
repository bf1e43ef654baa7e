//! SharedMemoized: a memoized callable usable from several threads

use std::hash::Hash;

use lrustore::Result;
use parking_lot::Mutex;

use crate::config::MemoConfig;
use crate::info::CacheInfo;
use crate::memo::Memoized;

/// Thread-safe wrapper around [`Memoized`]
///
/// One exclusive lock guards the store, its recency order and the counters,
/// and is held for the whole lookup, compute and insert sequence. A key is
/// therefore computed at most once while it stays cached, but calls are
/// serialized, including the wrapped computation.
///
/// The callable must not call back into the same `SharedMemoized`; that
/// would deadlock on the lock.
///
/// ```
/// use std::sync::Arc;
/// use memoize::SharedMemoized;
///
/// let cube = Arc::new(SharedMemoized::new(|n: &u64| n * n * n, 64).unwrap());
///
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         let cube = Arc::clone(&cube);
///         s.spawn(move || assert_eq!(cube.call(3), 27));
///     }
/// });
///
/// assert_eq!(cube.cache_info().misses, 1);
/// ```
pub struct SharedMemoized<K, V, F> {
    inner: Mutex<Memoized<K, V, F>>,
}

impl<K, V, F> SharedMemoized<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Wrap `func` with a cache of at most `maxsize` results
    pub fn new(func: F, maxsize: usize) -> Result<Self> {
        Memoized::new(func, maxsize).map(Self::from)
    }

    /// Wrap `func` using the given settings
    pub fn with_config(func: F, config: MemoConfig) -> Result<Self> {
        Memoized::with_config(func, config).map(Self::from)
    }

    /// Call through the cache
    pub fn call(&self, key: K) -> V
    where
        F: FnMut(&K) -> V,
    {
        self.inner.lock().call(key)
    }

    /// Call a fallible callable through the cache
    pub fn try_call<E>(&self, key: K) -> std::result::Result<V, E>
    where
        F: FnMut(&K) -> std::result::Result<V, E>,
    {
        self.inner.lock().try_call(key)
    }

    /// Snapshot of hits, misses, maximum size and current size
    pub fn cache_info(&self) -> CacheInfo {
        self.inner.lock().cache_info()
    }

    /// Number of cached results dropped to make room for new ones
    pub fn evictions(&self) -> u64 {
        self.inner.lock().evictions()
    }

    /// Drop every cached result and reset the counters
    pub fn cache_clear(&self) {
        self.inner.lock().cache_clear();
    }

    /// Unwrap the single-threaded memoizer
    pub fn into_inner(self) -> Memoized<K, V, F> {
        self.inner.into_inner()
    }
}

impl<K, V, F> From<Memoized<K, V, F>> for SharedMemoized<K, V, F> {
    fn from(memo: Memoized<K, V, F>) -> Self {
        Self {
            inner: Mutex::new(memo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_shared_basic() {
        let shared = SharedMemoized::new(|s: &String| s.to_uppercase(), 4).unwrap();

        assert_eq!(shared.call("abc".to_string()), "ABC");
        assert_eq!(shared.call("abc".to_string()), "ABC");

        let info = shared.cache_info();
        assert_eq!((info.hits, info.misses), (1, 1));
    }

    #[test]
    fn test_shared_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedMemoized<u64, String, fn(&u64) -> String>>();
    }

    #[test]
    fn test_shared_computes_each_key_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let shared = Arc::new(
            SharedMemoized::new(
                move |n: &u32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    u64::from(*n) * 3
                },
                32,
            )
            .unwrap(),
        );

        std::thread::scope(|s| {
            for _ in 0..4 {
                let shared = Arc::clone(&shared);
                s.spawn(move || {
                    for n in 0..16 {
                        assert_eq!(shared.call(n), u64::from(n) * 3);
                    }
                });
            }
        });

        assert_eq!(runs.load(Ordering::SeqCst), 16);
        let info = shared.cache_info();
        assert_eq!(info.misses, 16);
        assert_eq!(info.hits, 48);
        assert_eq!(info.currsize, 16);
    }

    #[test]
    fn test_shared_into_inner() {
        let shared = SharedMemoized::new(|n: &i8| n.abs(), 2).unwrap();
        shared.call(-3);
        shared.cache_clear();

        let memo = shared.into_inner();
        assert_eq!(memo.cache_info().currsize, 0);
    }
}
