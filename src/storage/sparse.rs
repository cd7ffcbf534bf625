//! # Sparse store
//!
//! Keeps only records that differ from a default record, so memory is proportional to the number
//! of non-default entries rather than the logical size. Writing the default removes the entry.
//! Records are compared as bytes, which is why this store accepts variable-width codecs too.

use std::collections;

use crate::encoding::Codec;
use crate::error::{check_index, Result};
use crate::storage::{Duplicate, Store, StoreMut};

/// Records held in a hash map keyed by index.
#[derive(Debug, Clone)]
pub struct SparseStore<C> {
  codec: C,
  size: u64,
  default: Box<[u8]>,
  entries: collections::HashMap<u64, Box<[u8]>>,
}

impl<C: Codec> SparseStore<C> {
  /// A store whose unset entries read as the codec's [`Codec::default_record`].
  pub fn new(codec: C, size: u64) -> Self {
    let default = codec.default_record().into_boxed_slice();
    SparseStore { codec, size, default, entries: collections::HashMap::new() }
  }

  /// A store whose unset entries read as `default`.
  pub fn with_default(codec: C, size: u64, default: &C::Value) -> Result<Self> {
    let mut bytes = Vec::new();
    codec.encode(default, &mut bytes)?;
    Ok(SparseStore { codec, size, default: bytes.into_boxed_slice(), entries: collections::HashMap::new() })
  }

  pub fn codec(&self) -> &C {
    &self.codec
  }

  /// Number of entries currently held, i.e. indices whose value differs from the default.
  pub fn active_count(&self) -> usize {
    self.entries.len()
  }

  /// Indices holding a non-default value, in ascending order.
  pub fn active_indices(&self) -> Vec<u64> {
    let mut indices: Vec<u64> = self.entries.keys().copied().collect();
    indices.sort_unstable();
    indices
  }

  /// Resets every entry to the default.
  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<C: Codec> Store for SparseStore<C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size)?;
    let record = self.entries.get(&index).unwrap_or(&self.default);
    Ok(self.codec.decode(record)?)
  }
}

impl<C: Codec> StoreMut for SparseStore<C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size)?;
    let mut record = Vec::new();
    self.codec.encode(value, &mut record)?;
    if let Some(width) = self.codec.width() {
      crate::encoding::codec::expect_len(&record, width)?;
    }
    if *record == *self.default {
      self.entries.remove(&index);
    } else {
      self.entries.insert(index, record.into_boxed_slice());
    }
    Ok(())
  }
}

impl<C: Codec + Clone> Duplicate for SparseStore<C> {
  fn duplicate(&self) -> Result<Self> {
    Ok(self.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::{Pair, Primitive, Sequence};
  use crate::storage::testing;
  use crate::StoreError;

  #[test]
  fn test_round_trip() {
    let mut store = SparseStore::new(Primitive::<u64>::new(), 500);
    testing::check_round_trip(&mut store);
    testing::check_random_access(&mut store, 2000);
  }

  #[test]
  fn test_full_index_space() {
    let mut store = SparseStore::new(Primitive::<f64>::new(), u64::MAX);
    store.set(u64::MAX - 1, &2.5).unwrap();
    store.set(1 << 40, &-1.0).unwrap();
    assert_eq!(store.get(u64::MAX - 1).unwrap(), 2.5);
    assert_eq!(store.get(12345).unwrap(), 0.0);
    assert_eq!(store.active_indices(), vec![1 << 40, u64::MAX - 1]);
    assert!(matches!(store.get(u64::MAX), Err(StoreError::IndexOutOfBounds { .. })));
  }

  #[test]
  fn test_memory_tracks_non_default_entries() {
    for size in [1_000u64, 1_000_000, u64::MAX] {
      let mut store = SparseStore::new(Primitive::<u32>::new(), size);
      let touched: Vec<u64> = (0..1000).map(|i| i * (size / 1000)).collect();
      for &i in &touched {
        store.set(i, &7).unwrap();
      }
      assert_eq!(store.active_count(), 1000);
      // Reset all but five entries.
      for &i in &touched[5..] {
        store.set(i, &0).unwrap();
      }
      assert_eq!(store.active_count(), 5, "size {}", size);
      assert_eq!(store.active_indices(), touched[..5].to_vec());
    }
  }

  #[test]
  fn test_custom_default() {
    let mut store = SparseStore::with_default(Primitive::<i8>::new(), 10, &-1).unwrap();
    assert_eq!(store.get(3).unwrap(), -1);
    store.set(3, &0).unwrap();
    assert_eq!(store.active_count(), 1);
    store.set(3, &-1).unwrap();
    assert_eq!(store.active_count(), 0);
  }

  #[test]
  fn test_variable_width_values() {
    let mut store = SparseStore::new(Sequence::new(Primitive::<u16>::new()), 100);
    assert_eq!(store.get(50).unwrap(), Vec::<u16>::new());
    store.set(50, &vec![1, 2, 3]).unwrap();
    assert_eq!(store.get(50).unwrap(), vec![1, 2, 3]);
    store.set(50, &vec![]).unwrap();
    assert_eq!(store.active_count(), 0);
    store.set(51, &vec![4]).unwrap();
    let copy = store.duplicate().unwrap();
    store.clear();
    assert_eq!(store.active_count(), 0);
    assert_eq!(copy.active_count(), 1);
  }

  #[test]
  fn test_composite_variable_width_defaults() {
    let mut store = SparseStore::new(Pair::new(Sequence::new(Primitive::<u8>::new()), Primitive::<u16>::new()), 10);
    assert_eq!(store.get(0).unwrap(), (vec![], 0));
    store.set(9, &(vec![1, 2], 300)).unwrap();
    assert_eq!(store.get(9).unwrap(), (vec![1, 2], 300));
    store.set(9, &(vec![], 0)).unwrap();
    assert_eq!(store.active_count(), 0);

    let store = SparseStore::new(Pair::new(Primitive::<u16>::new(), Sequence::new(Primitive::<u8>::new())), 10);
    assert_eq!(store.get(3).unwrap(), (0, vec![]));
  }
}
