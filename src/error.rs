//! Construction errors.
//!
//! Container operations themselves never fail: they report outcomes through
//! booleans and default values. Only building a container can be rejected.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Every key must route to some bucket.
    #[error("bucket count must be at least 1")]
    ZeroBuckets,
}
