//! # Array store
//!
//! One contiguous, zero-filled buffer of `size * width` bytes. Access is plain offset arithmetic.

use std::io;
use std::ops;

use crate::config::StoreConfig;
use crate::encoding::Codec;
use crate::error::{check_index, Result, StoreError};
use crate::storage::{Duplicate, Store, StoreMut};

/// Fixed-width records in a single in-memory buffer.
#[derive(Debug, Clone)]
pub struct ArrayStore<C> {
  codec: C,
  width: usize,
  size: u64,
  bytes: Vec<u8>,
}

impl<C: Codec> ArrayStore<C> {
  /// Allocates `size` zeroed records with the default [`StoreConfig`].
  pub fn allocate(codec: C, size: u64) -> Result<Self> {
    Self::allocate_with(codec, size, &StoreConfig::default())
  }

  /// Allocates `size` zeroed records.
  ///
  /// Fails with [`StoreError::Capacity`] if `size` exceeds `config.max_array_records` or the
  /// buffer cannot be reserved in one piece, and with [`StoreError::UnboundedWidth`] for
  /// variable-width codecs.
  pub fn allocate_with(codec: C, size: u64, config: &StoreConfig) -> Result<Self> {
    let width = codec.width().ok_or(StoreError::UnboundedWidth)?;
    if width == 0 {
      return Err(StoreError::InvalidArgument("records must be at least one byte wide".into()));
    }
    let limit = config.max_array_records;
    if size > limit {
      return Err(StoreError::Capacity { requested: size, limit });
    }
    let len = size
      .checked_mul(width as u64)
      .and_then(|len| usize::try_from(len).ok())
      .filter(|&len| len <= isize::MAX as usize)
      .ok_or(StoreError::Capacity { requested: size, limit: isize::MAX as u64 / width as u64 })?;
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(len).map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
    bytes.resize(len, 0);
    tracing::debug!(size, width, "allocated array store");
    Ok(ArrayStore { codec, width, size, bytes })
  }

  /// Builds a store holding `values` in order, with the default [`StoreConfig`].
  pub fn from_values<'a, I>(codec: C, values: I) -> Result<Self>
  where
    C::Value: 'a,
    I: IntoIterator<Item = &'a C::Value>,
  {
    Self::from_values_with(codec, values, &StoreConfig::default())
  }

  /// Builds a store holding `values` in order. Fails with [`StoreError::Capacity`] once more than
  /// `config.max_array_records` values have been seen.
  pub fn from_values_with<'a, I>(codec: C, values: I, config: &StoreConfig) -> Result<Self>
  where
    C::Value: 'a,
    I: IntoIterator<Item = &'a C::Value>,
  {
    let width = codec.width().ok_or(StoreError::UnboundedWidth)?;
    let limit = config.max_array_records;
    let mut bytes = Vec::new();
    for (count, value) in (1u64..).zip(values) {
      if count > limit {
        return Err(StoreError::Capacity { requested: count, limit });
      }
      let start = bytes.len();
      codec.encode(value, &mut bytes)?;
      crate::encoding::codec::expect_len(&bytes[start..], width)?;
    }
    let size = (bytes.len() / width.max(1)) as u64;
    Ok(ArrayStore { codec, width, size, bytes })
  }

  pub fn codec(&self) -> &C {
    &self.codec
  }

  pub fn width(&self) -> usize {
    self.width
  }

  /// The raw records, in index order.
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  /// The raw record at `index`.
  pub fn record(&self, index: u64) -> Result<&[u8]> {
    check_index(index, self.size)?;
    Ok(&self.bytes[self.span(index)])
  }

  /// Splits the store into consecutive runs of at most `records` records, each tagged with the
  /// index of its first record. The runs are disjoint, so they can be handed to separate threads.
  pub fn runs_mut(&mut self, records: u64) -> Vec<(u64, RecordsMut<'_, C>)> {
    let run = usize::try_from(records.max(1)).unwrap_or(usize::MAX).saturating_mul(self.width).max(self.width);
    let (codec, width) = (&self.codec, self.width);
    self
      .bytes
      .chunks_mut(run)
      .enumerate()
      .map(|(k, bytes)| ((k * run / width) as u64, RecordsMut { codec, width, bytes }))
      .collect()
  }

  fn span(&self, index: u64) -> ops::Range<usize> {
    let start = index as usize * self.width;
    start..start + self.width
  }
}

impl<C: Codec> Store for ArrayStore<C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size)?;
    Ok(self.codec.decode(&self.bytes[self.span(index)])?)
  }
}

impl<C: Codec> StoreMut for ArrayStore<C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size)?;
    let span = self.span(index);
    Ok(self.codec.encode_into(value, &mut self.bytes[span])?)
  }
}

impl<C: Codec + Clone> Duplicate for ArrayStore<C> {
  fn duplicate(&self) -> Result<Self> {
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(self.bytes.len()).map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
    bytes.extend_from_slice(&self.bytes);
    Ok(ArrayStore { codec: self.codec.clone(), width: self.width, size: self.size, bytes })
  }
}

/// A mutable run of consecutive records borrowed from an [`ArrayStore`], indexed from zero.
#[derive(Debug)]
pub struct RecordsMut<'a, C> {
  codec: &'a C,
  width: usize,
  bytes: &'a mut [u8],
}

impl<C: Codec> Store for RecordsMut<'_, C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    (self.bytes.len() / self.width) as u64
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size())?;
    let start = index as usize * self.width;
    Ok(self.codec.decode(&self.bytes[start..start + self.width])?)
  }
}

impl<C: Codec> StoreMut for RecordsMut<'_, C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size())?;
    let start = index as usize * self.width;
    Ok(self.codec.encode_into(value, &mut self.bytes[start..start + self.width])?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::{Complex64, Primitive, Sequence, UnsignedBits};
  use crate::storage::testing;

  #[test]
  fn test_round_trip() {
    let mut store = ArrayStore::allocate(Primitive::<u64>::new(), 1000).unwrap();
    testing::check_round_trip(&mut store);
    testing::check_random_access(&mut store, 5000);
  }

  #[test]
  fn test_zero_initialized() {
    let store = ArrayStore::allocate(Complex64::default(), 10).unwrap();
    assert_eq!(store.as_bytes().len(), 160);
    for i in 0..10 {
      assert_eq!(store.get(i).unwrap(), (0.0, 0.0));
    }
  }

  #[test]
  fn test_capacity_checked_at_construction() {
    let config = StoreConfig::default().with_max_array_records(100);
    ArrayStore::allocate_with(Primitive::<u8>::new(), 100, &config).unwrap();
    let err = ArrayStore::allocate_with(Primitive::<u8>::new(), 101, &config).unwrap_err();
    assert!(matches!(err, StoreError::Capacity { requested: 101, limit: 100 }));
    let err = ArrayStore::allocate_with(Primitive::<u64>::new(), u64::MAX, &config.with_max_array_records(u64::MAX));
    assert!(matches!(err, Err(StoreError::Capacity { .. })));
  }

  #[test]
  fn test_from_values_respects_capacity() {
    let config = StoreConfig::default().with_max_array_records(2);
    let store = ArrayStore::from_values_with(Primitive::<u8>::new(), &[1, 2], &config).unwrap();
    assert_eq!(store.size(), 2);
    let err = ArrayStore::from_values_with(Primitive::<u8>::new(), &[1, 2, 3], &config).unwrap_err();
    assert!(matches!(err, StoreError::Capacity { requested: 3, limit: 2 }));
  }

  #[test]
  fn test_variable_width_rejected() {
    let err = ArrayStore::allocate(Sequence::new(Primitive::<u8>::new()), 4).unwrap_err();
    assert!(matches!(err, StoreError::UnboundedWidth));
  }

  #[test]
  fn test_failed_set_leaves_record() {
    let mut store = ArrayStore::allocate(UnsignedBits::new(4).unwrap(), 3).unwrap();
    store.set(1, &9).unwrap();
    assert!(matches!(store.set(1, &16), Err(StoreError::Codec(_))));
    assert_eq!(store.get(1).unwrap(), 9);
  }

  #[test]
  fn test_duplicate_is_deep() {
    let mut store = ArrayStore::from_values(Primitive::<i32>::new(), &[1, 2, 3]).unwrap();
    let copy = store.duplicate().unwrap();
    store.set(0, &100).unwrap();
    assert_eq!(copy.get(0).unwrap(), 1);
    assert_eq!(copy.size(), 3);
    assert_eq!(store.record(0).unwrap(), &100i32.to_le_bytes());
  }

  #[test]
  fn test_runs_cover_every_record() {
    let mut store = ArrayStore::allocate(Primitive::<u16>::new(), 10).unwrap();
    {
      let mut runs = store.runs_mut(4);
      let starts: Vec<u64> = runs.iter().map(|(start, _)| *start).collect();
      let sizes: Vec<u64> = runs.iter().map(|(_, run)| run.size()).collect();
      assert_eq!(starts, [0, 4, 8]);
      assert_eq!(sizes, [4, 4, 2]);
      for (start, run) in runs.iter_mut() {
        for i in 0..run.size() {
          run.set(i, &((*start + i) as u16 * 3)).unwrap();
        }
        assert!(run.get(run.size()).is_err());
      }
    }
    for i in 0..10 {
      assert_eq!(store.get(i).unwrap(), i as u16 * 3);
    }
  }
}
