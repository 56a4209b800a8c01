//! BucketChain: the fixed set of buckets owned by a dictionary.

use crate::bucket::Bucket;

/// Buckets linked in index order; bucket `i` links to `i + 1` and the last
/// one links to nothing. The length and links never change after `new`.
pub(crate) struct BucketChain<K, V> {
    buckets: Box<[Bucket<K, V>]>,
}

impl<K, V> BucketChain<K, V>
where
    K: Eq,
{
    /// `count` must be non-zero; `Config` guarantees it.
    pub(crate) fn new(count: usize) -> Self {
        debug_assert!(count > 0, "a bucket chain needs at least one bucket");
        let buckets = (0..count)
            .map(|i| Bucket::new((i + 1 < count).then_some(i + 1)))
            .collect();
        Self { buckets }
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Index of the first bucket, where iteration starts.
    pub(crate) fn head(&self) -> Option<usize> {
        (!self.buckets.is_empty()).then_some(0)
    }

    pub(crate) fn bucket(&self, index: usize) -> &Bucket<K, V> {
        &self.buckets[index]
    }

    /// The bucket owning `hash`: `hash mod len`.
    pub(crate) fn route(&self, hash: u64) -> &Bucket<K, V> {
        let index = (hash % self.buckets.len() as u64) as usize;
        &self.buckets[index]
    }

    /// Sum of the per-bucket counters; exact only while no writer is active.
    pub(crate) fn size(&self) -> usize {
        self.buckets.iter().map(Bucket::size).sum()
    }
}
