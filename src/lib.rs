//! striped-map: a lock-striped concurrent map and set that many threads can
//! read, write and iterate at once without a structure-wide lock.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: bound contention by splitting the key space into a fixed number
//!   of buckets, each with its own lock, and keep every operation confined
//!   to exactly one bucket.
//! - Layers:
//!   - BucketTable<K, V>: single-threaded table (hashbrown index over
//!     slotmap entries) that stores each entry's precomputed hash and hands
//!     out stable slots, so compound operations find and then mutate without
//!     probing twice.
//!   - Bucket<K, V>: a BucketTable behind a `parking_lot::Mutex`, an atomic
//!     live-entry counter, and the index of the next bucket in the chain.
//!   - BucketChain<K, V>: the fixed, index-linked array of buckets.
//!   - Dictionary<K, V, S>: hashes each key once, routes it to bucket
//!     `hash mod bucket_count` and delegates. Set<K, S> is a
//!     `Dictionary<K, ()>` exposing membership only.
//!   - Iter / SetIter: two-level cursors (bucket, position in a private
//!     copy of that bucket).
//!
//! Constraints
//! - The bucket count is fixed at construction (default 25); there is no
//!   resizing and the key-to-bucket mapping never changes.
//! - No global lock anywhere. Operations on one key are totally ordered by
//!   its bucket's lock; operations on different buckets are unordered.
//! - `size()` sums per-bucket counters read without locking: exact only when
//!   no writer is active.
//! - Iteration is consistent per bucket only (see [`iter`]).
//!
//! Callbacks
//! - `add_or_update` and `conditional_remove` run caller closures while the
//!   bucket lock is held. They must not block and must not call back into
//!   the same container. In debug builds a callback entering its own bucket
//!   panics instead of deadlocking; in release builds it deadlocks.
//! - A panicking callback propagates unchanged. `parking_lot` locks do not
//!   poison, the guard releases the lock during unwinding, and the entry is
//!   left as it was.
//!
//! Hasher invariants
//! - Each key is hashed once per call by the container's `BuildHasher`. The
//!   value routes the key, and a fixed rotation of it probes the bucket's
//!   index so that keys sharing a bucket do not share index bits. `K: Hash` is
//!   never invoked inside a bucket, so the only user code run under a lock
//!   is `K: Eq`, `Clone` for snapshots, and the caller's callbacks.
//!
//! Notes and non-goals
//! - No persistence or replication.
//! - No global snapshot: a full pass may miss keys inserted into buckets it
//!   has not reached and may yield keys removed from buckets it already
//!   copied.

mod bucket;
#[cfg(feature = "bench_internal")]
pub mod bucket_table;
#[cfg(not(feature = "bench_internal"))]
mod bucket_table;
#[cfg(test)]
mod bucket_table_proptest;
mod chain;
pub mod config;
mod dictionary;
pub mod error;
pub mod iter;
mod reentrancy;
mod set;

// Public surface
pub use config::{Builder, Config, DEFAULT_BUCKET_COUNT};
pub use dictionary::{ConcurrentMap, Dictionary};
pub use error::ConfigError;
pub use iter::Iter;
pub use set::{Set, SetIter};
