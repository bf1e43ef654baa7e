//! Memoizer configuration

use std::num::NonZeroUsize;

use lrustore::{Error, Result};

/// Default number of cached results
pub const DEFAULT_MAXSIZE: usize = 128;

/// Settings for a memoized callable
///
/// With the `serde` feature this can be embedded in a host application's
/// config file; missing fields fall back to [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoConfig {
    /// Maximum number of cached results; must be positive
    pub maxsize: usize,
}

impl MemoConfig {
    /// Create a config with the given maximum size
    pub fn new(maxsize: usize) -> Self {
        Self { maxsize }
    }

    /// Check the settings, returning the maximum size as a non-zero count
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.maxsize)
            .ok_or_else(|| Error::Configuration("maxsize must be greater than 0".to_string()))
    }
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            maxsize: DEFAULT_MAXSIZE,
        }
    }
}
