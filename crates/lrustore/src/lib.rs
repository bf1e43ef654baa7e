//! # lrustore
//!
//! Fixed-capacity key-value store with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to arena slot (O(1) lookup)
//! - **Recency list**: doubly-linked list threaded through an arena of slots,
//!   bounded by head/tail sentinels (O(1) promote and evict)
//! - **Free list**: reclaimed slots are reused, so the arena never grows past
//!   `capacity + 3` slots
//!
//! ## Guarantees
//! - `size() <= capacity()` after every operation
//! - A successful `get` or `set` makes the key most recently used
//! - Inserting a new key into a full store evicts exactly one entry, the
//!   least recently used one
//! - Capacity is fixed at construction and must be positive

#![warn(missing_docs)]

mod error;
mod store;

pub use error::{Error, Result};
pub use store::{Iter, LruStore};
