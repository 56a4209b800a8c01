//! BucketTable: the single-threaded table behind each bucket lock.
//!
//! Entries live in a `SlotMap` and are indexed by a `HashTable` of slot keys.
//! Every entry stores the hash it was inserted with, and every operation
//! takes a hash computed by the caller, so `K: Hash` is never invoked here.
//! The only user code this table runs is `K: Eq` during probing.

// Part of this surface is only reached from tests and the internal benches.
#![cfg_attr(not(feature = "bench_internal"), allow(dead_code))]

use core::borrow::Borrow;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};

/// Stable reference to a live entry, valid until that entry is removed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Slot(DefaultKey);

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

#[derive(Debug)]
pub enum InsertError {
    DuplicateKey,
}

pub struct BucketTable<K, V> {
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> Default for BucketTable<K, V>
where
    K: Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the entries of a `BucketTable`, in no particular order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> BucketTable<K, V>
where
    K: Eq,
{
    pub fn new() -> Self {
        Self {
            index: HashTable::new(),
            slots: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn find<Q>(&self, hash: u64, q: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Slot(k))
    }

    pub fn contains_key<Q>(&self, hash: u64, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.find(hash, q).is_some()
    }

    pub fn insert(&mut self, hash: u64, key: K, value: V) -> Result<Slot, InsertError> {
        self.insert_with(hash, key, |_| value)
    }

    /// Insert using a lazy value constructor; `make` only runs when the key
    /// is absent and receives the key that will be stored.
    pub fn insert_with<F>(&mut self, hash: u64, key: K, make: F) -> Result<Slot, InsertError>
    where
        F: FnOnce(&K) -> V,
    {
        match self.index.entry(
            hash,
            |&kk| self.slots.get(kk).map(|e| e.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            hashbrown::hash_table::Entry::Vacant(v) => {
                // If `make` panics the vacant entry is dropped unused and the
                // table is unchanged.
                let value = make(&key);
                let k = self.slots.insert(Entry { key, value, hash });
                let _ = v.insert(k);
                Ok(Slot(k))
            }
        }
    }

    pub fn remove(&mut self, slot: Slot) -> Option<(K, V)> {
        let k = slot.0;
        let entry = self.slots.remove(k)?;
        if let Ok(occupied) = self.index.find_entry(entry.hash, |&kk| kk == k) {
            let _ = occupied.remove();
        }
        Some((entry.key, entry.value))
    }

    pub fn remove_key<Q>(&mut self, hash: u64, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slot = self.find(hash, q)?;
        self.remove(slot)
    }

    pub fn value(&self, slot: Slot) -> Option<&V> {
        self.slots.get(slot.0).map(|e| &e.value)
    }

    pub fn value_mut(&mut self, slot: Slot) -> Option<&mut V> {
        self.slots.get_mut(slot.0).map(|e| &mut e.value)
    }

    /// Key and value of a live entry, borrowed together.
    pub fn entry(&self, slot: Slot) -> Option<(&K, &V)> {
        self.slots.get(slot.0).map(|e| (&e.key, &e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }
}
