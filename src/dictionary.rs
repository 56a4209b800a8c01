//! Dictionary: key routing over a fixed chain of independently locked buckets.

use crate::chain::BucketChain;
use crate::config::Config;
use crate::error::ConfigError;
use crate::iter::Iter;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use tracing::debug;

/// A concurrent map partitioned into a fixed number of buckets, each behind
/// its own lock.
///
/// All methods take `&self` and may be called from any number of threads.
/// Operations on one key are serialized by that key's bucket; operations on
/// keys in different buckets never contend. There is no structure-wide lock,
/// so [`size`](Self::size) and iteration are only exact while no writer is
/// active.
///
/// ```
/// use striped_map::Dictionary;
///
/// let hits: Dictionary<&str, u32> = Dictionary::new();
/// hits.add_or_update("a", |_| 1, |_, n| n + 1);
/// hits.add_or_update("a", |_| 1, |_, n| n + 1);
/// assert_eq!(hits.get_value_or_default("a"), 2);
/// assert_eq!(hits.get_value_or_default("b"), 0);
///
/// assert!(hits.conditional_remove("a", |_, n| *n == 2));
/// assert!(hits.is_empty());
/// ```
pub struct Dictionary<K, V, S = RandomState> {
    hasher: S,
    chain: BucketChain<K, V>,
}

/// Alternate name for [`Dictionary`].
pub type ConcurrentMap<K, V, S = RandomState> = Dictionary<K, V, S>;

impl<K, V> Dictionary<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_bucket_count(bucket_count: usize) -> Result<Self, ConfigError> {
        Ok(Self::from_config(
            Config::new(bucket_count)?,
            Default::default(),
        ))
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Dictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_config(Config::default(), hasher)
    }

    pub(crate) fn from_config(config: Config, hasher: S) -> Self {
        let bucket_count = config.bucket_count();
        debug!(bucket_count, "building striped dictionary");
        Self {
            hasher,
            chain: BucketChain::new(bucket_count),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Insert if absent. Returns `false`, leaving the stored value unchanged,
    /// when the key is already present.
    pub fn insert(&self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        self.chain.route(hash).insert(hash, key, value)
    }

    /// Remove if present; returns whether an entry was removed.
    pub fn remove<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.chain.route(hash).remove(hash, q)
    }

    /// Same as [`remove`](Self::remove).
    #[inline]
    pub fn erase<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(q)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.chain.route(hash).contains(hash, q)
    }

    /// A clone of the stored value, or `None` when absent.
    pub fn get<Q>(&self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let hash = self.make_hash(q);
        self.chain.route(hash).get(hash, q)
    }

    /// A clone of the stored value, or `V::default()` when absent.
    pub fn get_value_or_default<Q>(&self, q: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Default + Clone,
    {
        let hash = self.make_hash(q);
        self.chain.route(hash).get_value_or_default(hash, q)
    }

    /// Insert `add(&key)` if the key is absent, otherwise replace its value
    /// with `update(&key, &current)`.
    ///
    /// The presence check and the write happen under one acquisition of the
    /// key's bucket lock, so concurrent calls on one key never lose an
    /// update. Both callbacks run with that lock held: they must not block
    /// and must not call back into this dictionary. If a callback panics the
    /// panic propagates, the entry is left as it was and the lock is
    /// released.
    pub fn add_or_update<A, U>(&self, key: K, add: A, update: U)
    where
        A: FnOnce(&K) -> V,
        U: FnOnce(&K, &V) -> V,
    {
        let hash = self.make_hash(&key);
        self.chain.route(hash).add_or_update(hash, key, add, update)
    }

    /// Remove the entry iff it exists and `predicate(&key, &value)` returns
    /// true; returns whether it was removed.
    ///
    /// No other operation on the key can run between the predicate and the
    /// removal. The same callback rules as
    /// [`add_or_update`](Self::add_or_update) apply.
    pub fn conditional_remove<Q, P>(&self, q: &Q, predicate: P) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: FnOnce(&K, &V) -> bool,
    {
        let hash = self.make_hash(q);
        self.chain.route(hash).conditional_remove(hash, q, predicate)
    }

    /// Sum of the per-bucket entry counters.
    ///
    /// Each counter is read without locking, so with writers in flight the
    /// result is an approximation. It is exact once all writers are done.
    pub fn size(&self) -> usize {
        self.chain.size()
    }

    /// Same as [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// `size() == 0`, with the same caveat.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.chain.len()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Terminal cursor; every cursor equals it once exhausted.
    pub fn end(&self) -> Iter<'_, K, V> {
        Iter::end(&self.chain)
    }
}

impl<K, V, S> Dictionary<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Cursor on the first entry of the first non-empty bucket.
    ///
    /// Each bucket is copied when the cursor reaches it; see the
    /// [`iter`](crate::iter) module for the consistency contract.
    pub fn begin(&self) -> Iter<'_, K, V> {
        Iter::new(&self.chain, self.chain.head())
    }

    /// Same as [`begin`](Self::begin).
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.begin()
    }
}

impl<'a, K, V, S> IntoIterator for &'a Dictionary<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<K, V, S> fmt::Debug for Dictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("bucket_count", &self.bucket_count())
            .field("size", &self.size())
            .finish()
    }
}
