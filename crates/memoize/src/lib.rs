//! # memoize
//!
//! Memoization of pure functions behind a bounded LRU store.
//!
//! ## Architecture
//! - **Store**: [`lrustore::LruStore`] keeps at most `maxsize` results and
//!   evicts the least recently used one
//! - **Adapter**: [`Memoized`] owns the wrapped callable, the store and the
//!   hit/miss counters; [`Memoized::cache_info`] returns a [`CacheInfo`]
//! - **Keys**: any `Hash + Eq + Clone` type; [`CallKey`] covers mixed
//!   positional and named arguments
//! - **Sharing**: [`SharedMemoized`] puts the adapter behind one lock for use
//!   from several threads
//!
//! ## Example
//!
//! ```
//! use memoize::{memoize, CallKey};
//!
//! let mut distance = memoize(
//!     |key: &CallKey| key.positional().len() * 10,
//!     128,
//! )
//! .unwrap();
//!
//! let key = CallKey::new().arg(41.88).arg(-87.63).named("unit", "km");
//! distance.call(key.clone());
//! distance.call(key);
//!
//! assert_eq!(distance.cache_info().to_string(),
//!     "CacheInfo(hits=1, misses=1, maxsize=128, currsize=1)");
//! ```

#![warn(missing_docs)]

mod config;
mod info;
mod key;
mod memo;
mod shared;

pub use config::{MemoConfig, DEFAULT_MAXSIZE};
pub use info::CacheInfo;
pub use key::{Arg, CallKey};
pub use lrustore::{Error, LruStore, Result};
pub use memo::{memoize, try_memoize, Memoized};
pub use shared::SharedMemoized;
