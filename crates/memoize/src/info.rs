//! Cache statistics snapshot

use std::fmt;

/// Point-in-time statistics of a memoized callable
///
/// `hits` and `misses` only grow between calls to `cache_clear`.
/// `currsize` is the store size as of the last completed call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheInfo {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls that ran the wrapped callable
    pub misses: u64,
    /// Maximum number of cached results
    pub maxsize: usize,
    /// Number of cached results
    pub currsize: usize,
}

impl CacheInfo {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheInfo(hits={}, misses={}, maxsize={}, currsize={})",
            self.hits, self.misses, self.maxsize, self.currsize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_hit_ratio() {
        let info = CacheInfo {
            hits: 2,
            misses: 1,
            maxsize: 8,
            currsize: 1,
        };
        assert_eq!(info.hit_ratio(), 2.0 / 3.0);
        assert_eq!(CacheInfo::default().hit_ratio(), 0.0);
    }

    #[test]
    fn test_info_display() {
        let info = CacheInfo {
            hits: 3,
            misses: 4,
            maxsize: 128,
            currsize: 4,
        };
        assert_eq!(
            info.to_string(),
            "CacheInfo(hits=3, misses=4, maxsize=128, currsize=4)"
        );
    }
}
