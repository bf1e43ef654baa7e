//! Memoized: wraps a pure callable with a bounded LRU result cache

use std::hash::Hash;

use lrustore::{LruStore, Result};
use tracing::{debug, trace};

use crate::config::MemoConfig;
use crate::info::CacheInfo;

/// Result store plus the counters reported by `cache_info`
struct MemoCache<K, V> {
    store: LruStore<K, V>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn lookup(&mut self, key: &K) -> Option<V> {
        let value = self.store.get(key).cloned();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    fn record_miss(&mut self, key: K, value: V) {
        self.misses += 1;
        // The key was absent, so anything handed back was evicted
        if self.store.push(key, value).is_some() {
            self.evictions += 1;
        }
    }

    fn info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits,
            misses: self.misses,
            maxsize: self.store.capacity(),
            currsize: self.store.size(),
        }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }
}

/// A callable wrapped with an LRU cache of its results
///
/// The callable receives the key by reference and must be deterministic:
/// equal keys must always produce equal results. Multi-argument functions
/// use a tuple or a [`CallKey`](crate::CallKey) as the key.
///
/// ```
/// use memoize::memoize;
///
/// let mut area = memoize(|&(w, h): &(u32, u32)| w * h, 16).unwrap();
///
/// assert_eq!(area.call((3, 4)), 12); // miss
/// assert_eq!(area.call((3, 4)), 12); // hit
///
/// let info = area.cache_info();
/// assert_eq!((info.hits, info.misses, info.currsize), (1, 1, 1));
/// ```
pub struct Memoized<K, V, F> {
    func: F,
    cache: MemoCache<K, V>,
}

impl<K, V, F> Memoized<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Wrap `func` with a cache of at most `maxsize` results
    ///
    /// # Returns
    /// * `Err(Error::Configuration)` if `maxsize` is 0
    pub fn new(func: F, maxsize: usize) -> Result<Self> {
        Self::with_config(func, MemoConfig::new(maxsize))
    }

    /// Wrap `func` using the given settings
    pub fn with_config(func: F, config: MemoConfig) -> Result<Self> {
        let maxsize = config.validate()?;
        debug!(maxsize = maxsize.get(), "memoizing callable");

        Ok(Self {
            func,
            cache: MemoCache {
                store: LruStore::with_capacity(maxsize),
                hits: 0,
                misses: 0,
                evictions: 0,
            },
        })
    }

    /// Call through the cache
    ///
    /// On a hit the cached result is returned and `func` is not run. On a
    /// miss `func` runs once and its result is cached.
    pub fn call(&mut self, key: K) -> V
    where
        F: FnMut(&K) -> V,
    {
        if let Some(value) = self.cache.lookup(&key) {
            return value;
        }

        let value = (self.func)(&key);
        self.cache.record_miss(key, value.clone());
        value
    }

    /// Call a fallible callable through the cache
    ///
    /// An `Err` from `func` is returned unchanged. Failed calls are not
    /// cached and count as neither hit nor miss.
    pub fn try_call<E>(&mut self, key: K) -> std::result::Result<V, E>
    where
        F: FnMut(&K) -> std::result::Result<V, E>,
    {
        if let Some(value) = self.cache.lookup(&key) {
            return Ok(value);
        }

        match (self.func)(&key) {
            Ok(value) => {
                self.cache.record_miss(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                trace!("memoized call failed, result not cached");
                Err(err)
            }
        }
    }

    /// Snapshot of hits, misses, maximum size and current size
    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }

    /// Number of cached results dropped to make room for new ones
    pub fn evictions(&self) -> u64 {
        self.cache.evictions
    }

    /// Look at a cached result without counting a hit or changing its recency
    pub fn peek_cached(&self, key: &K) -> Option<&V> {
        self.cache.store.peek(key)
    }

    /// Drop every cached result and reset the counters
    pub fn cache_clear(&mut self) {
        debug!(
            currsize = self.cache.store.size(),
            "clearing memoized results"
        );
        self.cache.clear();
    }

    /// Unwrap the original callable, dropping the cache
    pub fn into_inner(self) -> F {
        self.func
    }
}

/// Wrap `func` with an LRU cache of at most `maxsize` results
///
/// Returns the wrapped callable; its [`cache_info`](Memoized::cache_info)
/// reports the statistics.
pub fn memoize<K, V, F>(func: F, maxsize: usize) -> Result<Memoized<K, V, F>>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: FnMut(&K) -> V,
{
    Memoized::new(func, maxsize)
}

/// Wrap a fallible `func`; call it with [`Memoized::try_call`]
pub fn try_memoize<K, V, E, F>(func: F, maxsize: usize) -> Result<Memoized<K, V, F>>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: FnMut(&K) -> std::result::Result<V, E>,
{
    Memoized::new(func, maxsize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrustore::Error;
    use std::cell::Cell;

    #[test]
    fn test_memo_basic() {
        let calls = Cell::new(0);
        let mut square = memoize(
            |n: &u64| {
                calls.set(calls.get() + 1);
                n * n
            },
            10,
        )
        .unwrap();

        assert_eq!(square.call(4), 16);
        assert_eq!(square.call(4), 16);
        assert_eq!(calls.get(), 1);

        let info = square.cache_info();
        assert_eq!(info.hits, 1);
        assert_eq!(info.misses, 1);
        assert_eq!(info.maxsize, 10);
        assert_eq!(info.currsize, 1);
    }

    #[test]
    fn test_memo_zero_maxsize_rejected() {
        let result = memoize(|n: &u32| *n, 0);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_memo_unbounded_maxsize() {
        let mut halve = memoize(|n: &u64| n / 2, usize::MAX).unwrap();

        assert_eq!(halve.call(10), 5);
        assert_eq!(halve.call(10), 5);
        let info = halve.cache_info();
        assert_eq!((info.hits, info.misses, info.maxsize), (1, 1, usize::MAX));
    }

    #[test]
    fn test_memo_eviction() {
        let calls = Cell::new(0);
        let mut double = memoize(
            |n: &i32| {
                calls.set(calls.get() + 1);
                n * 2
            },
            2,
        )
        .unwrap();

        double.call(1);
        double.call(2);
        double.call(3); // Should evict 1
        assert_eq!(double.evictions(), 1);
        assert_eq!(double.peek_cached(&1), None);

        double.call(1); // Recomputed
        assert_eq!(calls.get(), 4);

        let info = double.cache_info();
        assert_eq!(info.misses, 4);
        assert_eq!(info.hits, 0);
        assert_eq!(info.currsize, 2);
    }

    #[test]
    fn test_memo_hit_promotes() {
        let mut ident = memoize(|s: &&str| s.len(), 2).unwrap();

        ident.call("a");
        ident.call("bb");
        ident.call("a"); // hit, "a" becomes most recent
        ident.call("ccc"); // Should evict "bb"

        assert_eq!(ident.peek_cached(&"a"), Some(&1));
        assert_eq!(ident.peek_cached(&"bb"), None);
        assert_eq!(ident.cache_info().hits, 1);
    }

    #[test]
    fn test_memo_try_call_error_not_cached() {
        let calls = Cell::new(0);
        let mut parse = try_memoize(
            |s: &String| {
                calls.set(calls.get() + 1);
                s.parse::<i64>()
            },
            4,
        )
        .unwrap();

        assert!(parse.try_call("nope".to_string()).is_err());
        assert_eq!(parse.cache_info(), CacheInfo { hits: 0, misses: 0, maxsize: 4, currsize: 0 });

        assert!(parse.try_call("nope".to_string()).is_err());
        assert_eq!(calls.get(), 2);

        assert_eq!(parse.try_call("42".to_string()), Ok(42));
        assert_eq!(parse.try_call("42".to_string()), Ok(42));
        assert_eq!(calls.get(), 3);

        let info = parse.cache_info();
        assert_eq!((info.hits, info.misses, info.currsize), (1, 1, 1));
    }

    #[test]
    fn test_memo_error_passes_through_unchanged() {
        #[derive(Debug, PartialEq)]
        struct Refused(u8);

        let mut guarded = try_memoize(
            |n: &u8| if *n > 9 { Err(Refused(*n)) } else { Ok(*n) },
            4,
        )
        .unwrap();

        assert_eq!(guarded.try_call(12), Err(Refused(12)));
        assert_eq!(guarded.try_call(3), Ok(3));
    }

    #[test]
    fn test_memo_clear() {
        let mut negate = memoize(|n: &i64| -n, 4).unwrap();

        negate.call(1);
        negate.call(1);
        negate.cache_clear();

        assert_eq!(negate.cache_info(), CacheInfo { hits: 0, misses: 0, maxsize: 4, currsize: 0 });
        assert_eq!(negate.call(1), -1);
        assert_eq!(negate.cache_info().misses, 1);
    }

    #[test]
    fn test_memo_into_inner() {
        let mut inc = memoize(|n: &u8| n + 1, 2).unwrap();
        inc.call(1);

        let mut func = inc.into_inner();
        assert_eq!(func(&1), 2);
    }

    #[test]
    fn test_memo_with_config() {
        let config = MemoConfig::default();
        let memo: Memoized<u8, u8, _> = Memoized::with_config(|n: &u8| *n, config).unwrap();
        assert_eq!(memo.cache_info().maxsize, 128);
    }
}
