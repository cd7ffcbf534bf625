//! # Sequential bulk operations
//!
//! Whole-store helpers that walk indices in ascending order, which is the fast path for every
//! backing and the only sensible one for [`crate::storage::file::PagedFileStore`].

use crate::error::{Result, StoreError};
use crate::storage::{Store, StoreMut};

fn check_same_size(source: u64, target: u64) -> Result<()> {
  if source == target {
    Ok(())
  } else {
    Err(StoreError::InvalidArgument(format!("source holds {} records, target {}", source, target)))
  }
}

/// Sets every record to `value`.
pub fn fill<S: StoreMut + ?Sized>(store: &mut S, value: &S::Value) -> Result<()> {
  for index in 0..store.size() {
    store.set(index, value)?;
  }
  Ok(())
}

/// Sets every record to `f(index)`.
pub fn fill_with<S: StoreMut + ?Sized>(store: &mut S, mut f: impl FnMut(u64) -> S::Value) -> Result<()> {
  for index in 0..store.size() {
    store.set(index, &f(index))?;
  }
  Ok(())
}

/// Copies `source` into `target`, which must have the same size.
pub fn copy<A, B>(source: &A, target: &mut B) -> Result<()>
where
  A: Store + ?Sized,
  B: StoreMut<Value = A::Value> + ?Sized,
{
  map_into(source, target, |value| value)
}

/// Writes `f(source[i])` to `target[i]` for every index. Both stores must have the same size.
pub fn map_into<A, B>(source: &A, target: &mut B, mut f: impl FnMut(A::Value) -> B::Value) -> Result<()>
where
  A: Store + ?Sized,
  B: StoreMut + ?Sized,
{
  check_same_size(source.size(), target.size())?;
  for index in 0..source.size() {
    target.set(index, &f(source.get(index)?))?;
  }
  Ok(())
}

/// Iterator over the values of a store, in index order.
#[derive(Debug, Clone)]
pub struct Values<'a, S: ?Sized> {
  store: &'a S,
  next: u64,
  end: u64,
}

impl<S: Store + ?Sized> Iterator for Values<'_, S> {
  type Item = Result<S::Value>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.next == self.end {
      return None;
    }
    let value = self.store.get(self.next);
    self.next += 1;
    Some(value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let left = usize::try_from(self.end - self.next).ok();
    (left.unwrap_or(usize::MAX), left)
  }
}

/// Iterates over every value of `store`.
pub fn values<S: Store + ?Sized>(store: &S) -> Values<'_, S> {
  Values { store, next: 0, end: store.size() }
}

/// Reads the whole store into a `Vec`.
pub fn to_vec<S: Store + ?Sized>(store: &S) -> Result<Vec<S::Value>> {
  let len = usize::try_from(store.size()).map_err(|_| StoreError::Capacity { requested: store.size(), limit: usize::MAX as u64 })?;
  let mut out = Vec::new();
  out.try_reserve_exact(len).map_err(|_| std::io::Error::from(std::io::ErrorKind::OutOfMemory))?;
  for value in values(store) {
    out.push(value?);
  }
  Ok(out)
}
