//! # Packed bit store
//!
//! Unsigned integers of 1 to 64 bits packed back to back into 64-bit words, so a 3-bit value
//! costs 3 bits. Values may straddle two words.

use std::io;

use crate::error::{check_index, CodecError, Result, StoreError};
use crate::storage::{Duplicate, Store, StoreMut};

/// Densely packed narrow unsigned integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedStore {
  bits: u32,
  size: u64,
  words: Vec<u64>,
}

impl PackedStore {
  /// Allocates `size` zeroed values of `bits` bits each.
  pub fn allocate(bits: u32, size: u64) -> Result<Self> {
    if !(1..=64).contains(&bits) {
      return Err(StoreError::InvalidArgument(format!("bit width must be within 1..=64, got {}", bits)));
    }
    let words = size
      .checked_mul(bits as u64)
      .map(|total| total.div_ceil(64))
      .and_then(|words| usize::try_from(words).ok())
      .ok_or(StoreError::Capacity { requested: size, limit: u64::MAX / bits as u64 })?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(words).map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
    buffer.resize(words, 0);
    tracing::debug!(size, bits, words, "allocated packed store");
    Ok(PackedStore { bits, size, words: buffer })
  }

  pub fn bits(&self) -> u32 {
    self.bits
  }

  /// Largest storable value.
  pub fn max(&self) -> u64 {
    u64::MAX >> (64 - self.bits)
  }

  /// The backing words.
  pub fn words(&self) -> &[u64] {
    &self.words
  }

  fn position(&self, index: u64) -> (usize, u32) {
    let bit = index * self.bits as u64;
    ((bit / 64) as usize, (bit % 64) as u32)
  }
}

impl Store for PackedStore {
  type Value = u64;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<u64> {
    check_index(index, self.size)?;
    let (word, offset) = self.position(index);
    let mut value = self.words[word] >> offset;
    if offset + self.bits > 64 {
      value |= self.words[word + 1] << (64 - offset);
    }
    Ok(value & self.max())
  }
}

impl StoreMut for PackedStore {
  fn set(&mut self, index: u64, value: &u64) -> Result<()> {
    check_index(index, self.size)?;
    let max = self.max();
    if *value > max {
      return Err(
        CodecError::OutOfRange { value: value.to_string(), reason: format!("exceeds {}-bit unsigned range", self.bits) }
          .into(),
      );
    }
    let (word, offset) = self.position(index);
    self.words[word] = (self.words[word] & !(max << offset)) | (value << offset);
    if offset + self.bits > 64 {
      let spill = 64 - offset;
      let high = max >> spill;
      self.words[word + 1] = (self.words[word + 1] & !high) | (value >> spill);
    }
    Ok(())
  }
}

impl Duplicate for PackedStore {
  fn duplicate(&self) -> Result<Self> {
    Ok(self.clone())
  }
}
