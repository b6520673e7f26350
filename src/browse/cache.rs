//! In-memory page cache.

use std::collections::{HashMap, VecDeque};

use super::query::QueryKey;

/// Insertion-ordered map from query key to the last successful page.
///
/// Entries are write-once: a key is only ever replaced by clearing the whole
/// cache. The optional capacity evicts the oldest entry first.
#[derive(Debug, Clone)]
pub struct ResourceCache<V> {
  entries: HashMap<QueryKey, V>,
  order: VecDeque<QueryKey>,
  capacity: Option<usize>,
}

impl<V> ResourceCache<V> {
  pub fn new() -> Self {
    Self {
      entries: HashMap::new(),
      order: VecDeque::new(),
      capacity: None,
    }
  }

  /// Bound the number of entries. A capacity of zero is treated as unbounded.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      capacity: (capacity > 0).then_some(capacity),
      ..Self::new()
    }
  }

  pub fn get(&self, key: &QueryKey) -> Option<&V> {
    self.entries.get(key)
  }

  pub fn contains(&self, key: &QueryKey) -> bool {
    self.entries.contains_key(key)
  }

  /// Store a result. Returns `false` and leaves the cache untouched if the key
  /// is already present.
  pub fn set(&mut self, key: QueryKey, value: V) -> bool {
    if self.contains(&key) {
      return false;
    }

    if let Some(capacity) = self.capacity {
      while self.order.len() >= capacity {
        match self.order.pop_front() {
          Some(oldest) => {
            self.entries.remove(&oldest);
          }
          None => break,
        }
      }
    }

    self.order.push_back(key.clone());
    self.entries.insert(key, value);
    true
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.order.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Keys in insertion order
  #[cfg(test)]
  pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
    self.order.iter()
  }
}

impl<V> Default for ResourceCache<V> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::browse::query::Filters;

  fn key(page: u32) -> QueryKey {
    Filters::for_scope(Some("store-1".into()))
      .query_for(page)
      .unwrap()
      .key()
  }

  #[test]
  fn test_get_set() {
    let mut cache = ResourceCache::new();
    assert!(cache.get(&key(1)).is_none());

    assert!(cache.set(key(1), "page one"));
    assert_eq!(cache.get(&key(1)), Some(&"page one"));
    assert!(cache.contains(&key(1)));
    assert!(!cache.contains(&key(2)));
  }

  #[test]
  fn test_entries_are_write_once() {
    let mut cache = ResourceCache::new();
    assert!(cache.set(key(1), "first"));
    assert!(!cache.set(key(1), "second"));

    assert_eq!(cache.get(&key(1)), Some(&"first"));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn test_keys_keep_insertion_order() {
    let mut cache = ResourceCache::new();
    cache.set(key(3), ());
    cache.set(key(1), ());
    cache.set(key(2), ());

    let keys: Vec<_> = cache.keys().cloned().collect();
    assert_eq!(keys, vec![key(3), key(1), key(2)]);
  }

  #[test]
  fn test_clear() {
    let mut cache = ResourceCache::new();
    cache.set(key(1), 1);
    cache.set(key(2), 2);
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.keys().count(), 0);
    // Cleared keys may be written again
    assert!(cache.set(key(1), 10));
  }

  #[test]
  fn test_capacity_evicts_oldest() {
    let mut cache = ResourceCache::with_capacity(2);
    cache.set(key(1), 1);
    cache.set(key(2), 2);
    cache.set(key(3), 3);

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&key(1)));
    assert_eq!(cache.get(&key(3)), Some(&3));
  }

  #[test]
  fn test_zero_capacity_is_unbounded() {
    let mut cache = ResourceCache::with_capacity(0);
    for page in 1..=100 {
      cache.set(key(page), page);
    }
    assert_eq!(cache.len(), 100);
  }
}
