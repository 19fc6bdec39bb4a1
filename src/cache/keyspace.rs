//! Keyspace Module
//!
//! The raw key → record mapping. Callers reach it only through the store's
//! lock guards, so shared access gives the read-only half of this API and
//! exclusive access gives all of it.

use std::collections::HashMap;

use crate::cache::Record;

// == Keyspace ==
/// Mapping from key to [`Record`].
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: HashMap<String, Record>,
}

impl Keyspace {
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    // == Exists ==
    /// Returns true if the key is present.
    ///
    /// Does not look at expiry. Call [`Keyspace::remove_expired_key`] first
    /// when the answer must reflect post-expiry state.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Remove Expired Key ==
    /// Deletes the key if its record has expired at `now`.
    ///
    /// Returns true if a record was removed. No-op for absent or live keys.
    pub fn remove_expired_key(&mut self, key: &str, now: u64) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|record| record.is_expired(now));

        if expired {
            self.entries.remove(key);
        }
        expired
    }

    // == Raw Accessors ==
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.entries.get_mut(key)
    }

    /// Replaces the record for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> Option<Record> {
        self.entries.insert(key.into(), record)
    }

    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.entries.remove(key)
    }

    // == Expired Keys ==
    /// Collects every key whose record has expired at `now`.
    pub fn expired_keys(&self, now: u64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Second sweep phase: removes those `candidates` that are still expired
    /// at `now`. Keys refreshed since they were collected are kept.
    ///
    /// Returns the number of keys removed.
    pub fn remove_expired_keys<I>(&mut self, candidates: I, now: u64) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        candidates
            .into_iter()
            .filter(|key| self.remove_expired_key(key, now))
            .count()
    }

    // == Length ==
    /// Number of keys, expired-but-unswept ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
