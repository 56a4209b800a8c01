//! Set: membership view over a `Dictionary<K, ()>`.

use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::error::ConfigError;
use crate::iter::Iter;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// A concurrent set; a key is a member iff the underlying dictionary holds it.
///
/// Shares the dictionary's locking and iteration contract.
///
/// ```
/// use striped_map::Set;
///
/// let live: Set<u64> = Set::new();
/// assert!(live.insert(7));
/// assert!(!live.insert(7));
/// assert!(live.contains(&7));
/// assert!(live.remove(&7));
/// assert_eq!(live.iter().count(), 0);
/// ```
pub struct Set<K, S = RandomState> {
    dict: Dictionary<K, (), S>,
}

impl<K> Set<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_bucket_count(bucket_count: usize) -> Result<Self, ConfigError> {
        Ok(Self::from_dictionary(Dictionary::from_config(
            Config::new(bucket_count)?,
            Default::default(),
        )))
    }
}

impl<K> Default for Set<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_dictionary(Dictionary::with_hasher(hasher))
    }

    pub(crate) fn from_dictionary(dict: Dictionary<K, (), S>) -> Self {
        Self { dict }
    }

    /// Add `key`; returns `false` if it was already a member.
    pub fn insert(&self, key: K) -> bool {
        self.dict.insert(key, ())
    }

    /// Remove `key`; returns `false` if it was not a member.
    pub fn remove<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.dict.remove(q)
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
        self.dict.contains(q)
    }

    /// Approximate while writers are active; see [`Dictionary::size`].
    pub fn size(&self) -> usize {
        self.dict.size()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.dict.bucket_count()
    }

    pub fn end(&self) -> SetIter<'_, K> {
        SetIter {
            inner: self.dict.end(),
        }
    }
}

impl<K, S> Set<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn begin(&self) -> SetIter<'_, K> {
        SetIter {
            inner: self.dict.begin(),
        }
    }

    pub fn iter(&self) -> SetIter<'_, K> {
        self.begin()
    }
}

impl<K, S> Extend<K> for Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, S> FromIterator<K> for Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<'a, K, S> IntoIterator for &'a Set<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<K, S> fmt::Debug for Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("bucket_count", &self.bucket_count())
            .field("size", &self.size())
            .finish()
    }
}

/// Key-only cursor over a [`Set`]; same contract as [`Iter`].
pub struct SetIter<'a, K> {
    inner: Iter<'a, K, ()>,
}

impl<'a, K> SetIter<'a, K> {
    pub fn current(&self) -> Option<&K> {
        self.inner.current().map(|(k, _)| k)
    }

    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }
}

impl<'a, K> SetIter<'a, K>
where
    K: Eq + Clone,
{
    pub fn advance(&mut self) {
        self.inner.advance()
    }
}

impl<'a, K> Clone for SetIter<'a, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K> PartialEq for SetIter<'a, K> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<'a, K> Eq for SetIter<'a, K> {}

impl<'a, K> Iterator for SetIter<'a, K>
where
    K: Eq + Clone,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K> FusedIterator for SetIter<'a, K> where K: Eq + Clone {}
