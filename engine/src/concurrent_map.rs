//! Lock-striped accumulator for the parallel scoring path.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

use crate::document::DocId;

/// A fixed-bucket-count map keyed by document id.
///
/// Keys are striped across buckets by `id mod bucket_count`; each bucket
/// has its own mutex, so workers touching different buckets never
/// contend and increments to the same key serialize on one bucket lock.
pub struct ConcurrentMap<V> {
    buckets: Vec<Mutex<BTreeMap<DocId, V>>>,
}

impl<V: Default> ConcurrentMap<V> {
    /// `bucket_count` must be non-zero.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        Self {
            buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    fn bucket_index(&self, key: DocId) -> usize {
        (key as i64).rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Lock the owning bucket and yield a mutable reference to the key's
    /// value, default-inserted if absent. The lock is held for the
    /// lifetime of the returned guard.
    pub fn access(&self, key: DocId) -> MappedMutexGuard<'_, V> {
        let guard = self.buckets[self.bucket_index(key)].lock();
        MutexGuard::map(guard, |bucket| bucket.entry(key).or_default())
    }

    /// Remove a key, locking only its owning bucket.
    pub fn erase(&self, key: DocId) {
        self.buckets[self.bucket_index(key)].lock().remove(&key);
    }
}

impl<V: Clone> ConcurrentMap<V> {
    /// Merge all buckets into one ordered map.
    ///
    /// Buckets are locked in index order, the one fixed global order, so
    /// concurrent snapshots cannot deadlock against each other.
    pub fn build_snapshot(&self) -> BTreeMap<DocId, V> {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let guard = bucket.lock();
            merged.extend(guard.iter().map(|(&key, value)| (key, value.clone())));
        }
        merged
    }
}
