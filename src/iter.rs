//! Snapshot iteration over a bucket chain.
//!
//! An [`Iter`] is a two-level cursor: the bucket it is on, and a position
//! inside a private copy of that bucket's entries. Buckets are copied one at
//! a time as the cursor reaches them, so:
//!
//! - the pairs yielded for one bucket are exactly its contents at the moment
//!   it was copied, with no duplicates or omissions;
//! - there is no single point in time across buckets. An entry added to a
//!   bucket that has not been reached yet may or may not show up, and an
//!   entry removed from a bucket already copied is still yielded.
//!
//! No lock is held between calls; each copy holds one bucket lock for the
//! duration of the copy only.

use crate::chain::BucketChain;
use core::iter::FusedIterator;
use std::sync::Arc;
use tracing::trace;

/// Forward-only cursor over a dictionary, created by `Dictionary::begin`,
/// `Dictionary::iter` or `Dictionary::end`.
///
/// Two cursors compare equal when they sit on the same bucket at the same
/// position; every terminal cursor equals `end()`. Cloning shares the
/// current snapshot.
pub struct Iter<'a, K, V> {
    chain: &'a BucketChain<K, V>,
    bucket: Option<usize>,
    snapshot: Option<Arc<[(K, V)]>>,
    cursor: usize,
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    /// Cursor on the first non-empty bucket at or after `start`.
    pub(crate) fn new(chain: &'a BucketChain<K, V>, start: Option<usize>) -> Self {
        let mut it = Self {
            chain,
            bucket: start,
            snapshot: None,
            cursor: 0,
        };
        it.settle();
        it
    }

    /// Walk forward from `self.bucket` until a bucket yields a non-empty
    /// copy, or fall off the end of the chain.
    fn settle(&mut self) {
        while let Some(index) = self.bucket {
            let bucket = self.chain.bucket(index);
            if bucket.size() > 0 {
                let pairs = bucket.copy_pairs();
                if !pairs.is_empty() {
                    self.snapshot = Some(pairs.into());
                    self.cursor = 0;
                    return;
                }
                // Emptied between the counter read and the copy.
                trace!(bucket = index, "skipping bucket drained before snapshot");
            }
            self.bucket = bucket.next();
        }
        self.snapshot = None;
        self.cursor = 0;
    }

    /// Move to the next pair. A terminal cursor stays terminal.
    pub fn advance(&mut self) {
        let Some(index) = self.bucket else {
            return;
        };
        let len = self.snapshot.as_ref().map_or(0, |s| s.len());
        if self.cursor + 1 < len {
            self.cursor += 1;
            return;
        }
        self.snapshot = None;
        self.bucket = self.chain.bucket(index).next();
        self.settle();
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Terminal cursor.
    pub(crate) fn end(chain: &'a BucketChain<K, V>) -> Self {
        Self {
            chain,
            bucket: None,
            snapshot: None,
            cursor: 0,
        }
    }

    /// The pair under the cursor, `None` once terminal.
    pub fn current(&self) -> Option<&(K, V)> {
        self.snapshot.as_ref()?.get(self.cursor)
    }

    pub fn is_end(&self) -> bool {
        self.bucket.is_none()
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            bucket: self.bucket,
            snapshot: self.snapshot.clone(),
            cursor: self.cursor,
        }
    }
}

impl<'a, K, V> PartialEq for Iter<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self.bucket, other.bucket) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                core::ptr::eq(self.chain, other.chain) && a == b && self.cursor == other.cursor
            }
            _ => false,
        }
    }
}

impl<'a, K, V> Eq for Iter<'a, K, V> {}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current().cloned()?;
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self
            .snapshot
            .as_ref()
            .map_or(0, |s| s.len().saturating_sub(self.cursor));
        (left, None)
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V>
where
    K: Eq + Clone,
    V: Clone,
{
}
