//! # Stores
//!
//! A store is a fixed-size sequence of values addressed by a 64-bit index. Reading goes through
//! [`Store`], writing through [`StoreMut`]; a view that only borrows its inner store immutably is
//! therefore read-only at compile time, while [`crate::view::ReadOnly`] gives the same guarantee
//! at run time.
//!
//! Backings:
//!
//! - [`array::ArrayStore`]: one contiguous byte buffer.
//! - [`big_list::BigListStore`]: a list of array segments, still fully in RAM.
//! - [`packed::PackedStore`]: narrow unsigned integers packed into 64-bit words.
//! - [`file::PagedFileStore`]: records on disk behind a small page window.
//! - [`sparse::SparseStore`]: only non-default records, in a hash map.
//! - [`table::TableStore`]: one SQLite row per non-default record.
//! - `Vec<T>` and `[T]`: plain values, for record types without a fixed width.

use crate::error::{check_index, Result};

pub mod any;
pub mod array;
pub mod big_list;
pub mod file;
pub mod packed;
pub mod paging;
pub mod sparse;
pub mod table;
pub mod vfs;

/// Read access to a fixed-size, 64-bit indexed collection.
///
/// For every valid `i`, `get(i)` returns the value most recently stored at `i` (or the default
/// the store was created with). The size never changes after construction.
pub trait Store {
  type Value;

  /// Number of addressable records.
  fn size(&self) -> u64;

  /// Returns the value at `index`, failing with [`crate::StoreError::IndexOutOfBounds`] if
  /// `index >= size()`.
  fn get(&self, index: u64) -> Result<Self::Value>;

  fn is_empty(&self) -> bool {
    self.size() == 0
  }

  /// Reads the value at `index` into `out`.
  fn get_into(&self, index: u64, out: &mut Self::Value) -> Result<()> {
    *out = self.get(index)?;
    Ok(())
  }
}

/// Write access to a store.
pub trait StoreMut: Store {
  /// Replaces the value at `index`. On error the store is left unchanged.
  fn set(&mut self, index: u64, value: &Self::Value) -> Result<()>;
}

/// Stores that can produce an independent deep copy of themselves.
pub trait Duplicate: Sized {
  fn duplicate(&self) -> Result<Self>;
}

impl<S: Store + ?Sized> Store for &S {
  type Value = S::Value;

  fn size(&self) -> u64 {
    (**self).size()
  }

  fn get(&self, index: u64) -> Result<Self::Value> {
    (**self).get(index)
  }
}

impl<S: Store + ?Sized> Store for &mut S {
  type Value = S::Value;

  fn size(&self) -> u64 {
    (**self).size()
  }

  fn get(&self, index: u64) -> Result<Self::Value> {
    (**self).get(index)
  }
}

impl<S: StoreMut + ?Sized> StoreMut for &mut S {
  fn set(&mut self, index: u64, value: &Self::Value) -> Result<()> {
    (**self).set(index, value)
  }
}

impl<S: Store + ?Sized> Store for Box<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    (**self).size()
  }

  fn get(&self, index: u64) -> Result<Self::Value> {
    (**self).get(index)
  }
}

impl<S: StoreMut + ?Sized> StoreMut for Box<S> {
  fn set(&mut self, index: u64, value: &Self::Value) -> Result<()> {
    (**self).set(index, value)
  }
}

impl<T: Clone> Store for [T] {
  type Value = T;

  fn size(&self) -> u64 {
    self.len() as u64
  }

  fn get(&self, index: u64) -> Result<T> {
    check_index(index, self.size())?;
    Ok(self[index as usize].clone())
  }
}

impl<T: Clone> StoreMut for [T] {
  fn set(&mut self, index: u64, value: &T) -> Result<()> {
    check_index(index, self.size())?;
    self[index as usize] = value.clone();
    Ok(())
  }
}

impl<T: Clone> Store for Vec<T> {
  type Value = T;

  fn size(&self) -> u64 {
    self.as_slice().size()
  }

  fn get(&self, index: u64) -> Result<T> {
    Store::get(self.as_slice(), index)
  }
}

impl<T: Clone> StoreMut for Vec<T> {
  fn set(&mut self, index: u64, value: &T) -> Result<()> {
    StoreMut::set(self.as_mut_slice(), index, value)
  }
}

impl<T: Clone> Duplicate for Vec<T> {
  fn duplicate(&self) -> Result<Self> {
    Ok(self.clone())
  }
}
