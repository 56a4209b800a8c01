//! Construction parameters for dictionaries and sets.
//!
//! The bucket count is chosen once and fixed for the container's lifetime;
//! there is no resizing. The hasher decides both bucket routing and the
//! probing inside each bucket.

use crate::dictionary::Dictionary;
use crate::error::ConfigError;
use crate::set::Set;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Bucket count used when none is configured.
pub const DEFAULT_BUCKET_COUNT: usize = 25;

/// Validated construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    bucket_count: usize,
}

impl Config {
    pub fn new(bucket_count: usize) -> Result<Self, ConfigError> {
        if bucket_count == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(Self { bucket_count })
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
        }
    }
}

/// Builder for [`Dictionary`] and [`Set`].
///
/// ```
/// use striped_map::{Builder, Dictionary};
///
/// let dict: Dictionary<u32, u64> = Builder::new().bucket_count(8)?.build();
/// assert_eq!(dict.bucket_count(), 8);
///
/// assert!(Builder::new().bucket_count(0).is_err());
/// # Ok::<(), striped_map::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder<S = RandomState> {
    config: Config,
    hasher: S,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            hasher: RandomState::new(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Builder<S> {
    pub fn bucket_count(mut self, bucket_count: usize) -> Result<Self, ConfigError> {
        self.config = Config::new(bucket_count)?;
        Ok(self)
    }

    pub fn hasher<T>(self, hasher: T) -> Builder<T> {
        Builder {
            config: self.config,
            hasher,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn build<K, V>(self) -> Dictionary<K, V, S>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        Dictionary::from_config(self.config, self.hasher)
    }

    pub fn build_set<K>(self) -> Set<K, S>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        Set::from_dictionary(self.build())
    }
}
