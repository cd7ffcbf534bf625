//! # Big-list store
//!
//! A list of [`ArrayStore`] segments that together address more records than one contiguous
//! allocation may hold. Segments have a power-of-two length, so locating a record is a shift and a
//! mask rather than a division.

use std::io;

use crate::config::StoreConfig;
use crate::encoding::Codec;
use crate::error::{check_index, Result, StoreError};
use crate::storage::array::ArrayStore;
use crate::storage::{Duplicate, Store, StoreMut};

/// Fixed-width records spread over equally sized in-memory segments.
#[derive(Debug, Clone)]
pub struct BigListStore<C> {
  size: u64,
  shift: u32,
  mask: u64,
  segments: Vec<ArrayStore<C>>,
}

impl<C: Codec + Clone> BigListStore<C> {
  /// Allocates `size` zeroed records in segments of `config.segment_records`.
  pub fn allocate(codec: C, size: u64, config: &StoreConfig) -> Result<Self> {
    config.validate()?;
    if codec.width().is_none() {
      return Err(StoreError::UnboundedWidth);
    }
    let segment = config.segment_records;
    let count = size.div_ceil(segment);
    let count = usize::try_from(count).map_err(|_| StoreError::Capacity { requested: size, limit: usize::MAX as u64 })?;
    let mut segments = Vec::new();
    segments.try_reserve_exact(count).map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
    let mut remaining = size;
    while remaining > 0 {
      let len = remaining.min(segment);
      segments.push(ArrayStore::allocate_with(codec.clone(), len, config)?);
      remaining -= len;
    }
    tracing::debug!(size, segments = segments.len(), segment, "allocated big-list store");
    Ok(BigListStore { size, shift: segment.trailing_zeros(), mask: segment - 1, segments })
  }
}

impl<C: Codec> BigListStore<C> {
  /// Records per full segment.
  pub fn segment_records(&self) -> u64 {
    self.mask + 1
  }

  pub fn segments(&self) -> &[ArrayStore<C>] {
    &self.segments
  }

  pub fn segments_mut(&mut self) -> &mut [ArrayStore<C>] {
    &mut self.segments
  }

  fn locate(&self, index: u64) -> (usize, u64) {
    ((index >> self.shift) as usize, index & self.mask)
  }
}

impl<C: Codec> Store for BigListStore<C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size)?;
    let (segment, offset) = self.locate(index);
    self.segments[segment].get(offset)
  }
}

impl<C: Codec> StoreMut for BigListStore<C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size)?;
    let (segment, offset) = self.locate(index);
    self.segments[segment].set(offset, value)
  }
}

impl<C: Codec + Clone> Duplicate for BigListStore<C> {
  fn duplicate(&self) -> Result<Self> {
    let segments = self.segments.iter().map(Duplicate::duplicate).collect::<Result<Vec<_>>>()?;
    Ok(BigListStore { size: self.size, shift: self.shift, mask: self.mask, segments })
  }
}
