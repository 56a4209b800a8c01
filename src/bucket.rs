//! Bucket: one independently locked partition of a dictionary's key space.

use crate::bucket_table::BucketTable;
use crate::reentrancy::{DebugReentrancy, ReentrancyGuard};
use core::borrow::Borrow;
use core::ops::{Deref, DerefMut};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The hash a bucket's table probes with. Routing consumes `hash mod
/// bucket_count`, so every key in one bucket agrees on those low bits; the
/// table indexes on the other half instead.
#[inline]
pub(crate) fn table_hash(hash: u64) -> u64 {
    hash.rotate_left(32)
}

/// A locked partition. The table is only touched through `lock()`; the
/// counter is written under the lock and read without it.
///
/// Every method takes the key's hash as computed by the owning dictionary.
/// Callers must pass the same hash for equal keys.
pub(crate) struct Bucket<K, V> {
    table: Mutex<BucketTable<K, V>>,
    count: AtomicUsize,
    next: Option<usize>,
    reentrancy: DebugReentrancy,
}

/// Exclusive access to a bucket's table for the lifetime of the guard.
struct Locked<'a, K, V> {
    // Declared first so ownership is cleared before the mutex is released.
    _reentrancy: ReentrancyGuard<'a>,
    table: MutexGuard<'a, BucketTable<K, V>>,
}

impl<'a, K, V> Deref for Locked<'a, K, V> {
    type Target = BucketTable<K, V>;
    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl<'a, K, V> DerefMut for Locked<'a, K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.table
    }
}

impl<K, V> Bucket<K, V>
where
    K: Eq,
{
    pub(crate) fn new(next: Option<usize>) -> Self {
        Self {
            table: Mutex::new(BucketTable::new()),
            count: AtomicUsize::new(0),
            next,
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn lock(&self) -> Locked<'_, K, V> {
        self.reentrancy.check();
        let table = self.table.lock();
        Locked {
            _reentrancy: self.reentrancy.enter(),
            table,
        }
    }

    /// Index of the next bucket in the chain, `None` for the last one.
    pub(crate) fn next(&self) -> Option<usize> {
        self.next
    }

    /// Overwrite the counter without touching the table, to reproduce a
    /// reader that sees a count its copy no longer matches.
    #[cfg(test)]
    pub(crate) fn force_count(&self, count: usize) {
        self.count.store(count, Ordering::Release);
    }

    /// Live entry count, read without the lock. May briefly lag behind
    /// mutations in flight on other threads.
    pub(crate) fn size(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub(crate) fn get_value_or_default<Q>(&self, hash: u64, q: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        V: Default + Clone,
    {
        self.get(hash, q).unwrap_or_default()
    }

    pub(crate) fn get<Q>(&self, hash: u64, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        V: Clone,
    {
        let table = self.lock();
        let slot = table.find(table_hash(hash), q)?;
        table.value(slot).cloned()
    }

    pub(crate) fn insert(&self, hash: u64, key: K, value: V) -> bool {
        let mut table = self.lock();
        match table.insert(table_hash(hash), key, value) {
            Ok(_) => {
                self.count.fetch_add(1, Ordering::Release);
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn remove<Q>(&self, hash: u64, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut table = self.lock();
        match table.remove_key(table_hash(hash), q) {
            Some(_) => {
                self.count.fetch_sub(1, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains<Q>(&self, hash: u64, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.lock().contains_key(table_hash(hash), q)
    }

    /// Insert `add(&key)` when absent, otherwise replace the stored value with
    /// `update(&key, &current)`. Both callbacks run under the bucket lock and
    /// must not call back into this bucket.
    pub(crate) fn add_or_update<A, U>(&self, hash: u64, key: K, add: A, update: U)
    where
        A: FnOnce(&K) -> V,
        U: FnOnce(&K, &V) -> V,
    {
        let hash = table_hash(hash);
        let mut table = self.lock();
        match table.find(hash, &key) {
            Some(slot) => {
                let next = match table.entry(slot) {
                    Some((k, v)) => update(k, v),
                    None => return,
                };
                if let Some(v) = table.value_mut(slot) {
                    *v = next;
                }
            }
            None => {
                if table.insert_with(hash, key, add).is_ok() {
                    self.count.fetch_add(1, Ordering::Release);
                }
            }
        }
    }

    /// Remove the entry iff it exists and `predicate(&key, &value)` holds.
    /// The predicate runs under the bucket lock and must not call back into
    /// this bucket.
    pub(crate) fn conditional_remove<Q, P>(&self, hash: u64, q: &Q, predicate: P) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        P: FnOnce(&K, &V) -> bool,
    {
        let mut table = self.lock();
        let Some(slot) = table.find(table_hash(hash), q) else {
            return false;
        };
        let remove = match table.entry(slot) {
            Some((k, v)) => predicate(k, v),
            None => false,
        };
        if remove && table.remove(slot).is_some() {
            self.count.fetch_sub(1, Ordering::Release);
            return true;
        }
        false
    }

    /// Clone every entry into a fresh sequence. The lock is held only for
    /// the copy.
    pub(crate) fn copy_pairs(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let table = self.lock();
        let mut pairs = Vec::with_capacity(table.len());
        pairs.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}
