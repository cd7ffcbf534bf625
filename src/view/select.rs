//! Views over a selected subset of another store's indices.
//!
//! Both views materialize the selected indices once, at construction, in ascending order. Later
//! writes to the wrapped store through other paths are not reflected in the selection until
//! [`Conditional::refresh`] is called.

use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};

fn collect_indices(size: u64, mut keep: impl FnMut(u64) -> Result<bool>) -> Result<Vec<u64>> {
  let mut indices = Vec::new();
  for index in 0..size {
    if keep(index)? {
      indices.push(index);
    }
  }
  Ok(indices)
}

/// The records of another store that satisfy a predicate.
///
/// Writes must satisfy the predicate too, so the selection stays valid.
pub struct Conditional<S, P> {
  inner: S,
  predicate: P,
  indices: Vec<u64>,
}

impl<S: Store, P: Fn(&S::Value) -> bool> Conditional<S, P> {
  /// Scans `inner` once and keeps the indices whose value satisfies `predicate`.
  pub fn new(inner: S, predicate: P) -> Result<Self> {
    let indices = collect_indices(inner.size(), |index| Ok(predicate(&inner.get(index)?)))?;
    tracing::debug!(selected = indices.len(), of = inner.size(), "materialized conditional view");
    Ok(Conditional { inner, predicate, indices })
  }

  /// Rescans the wrapped store.
  pub fn refresh(&mut self) -> Result<()> {
    let (inner, predicate) = (&self.inner, &self.predicate);
    self.indices = collect_indices(inner.size(), |index| Ok(predicate(&inner.get(index)?)))?;
    Ok(())
  }

  /// Positions in the wrapped store, in view order.
  pub fn indices(&self) -> &[u64] {
    &self.indices
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store, P: Fn(&S::Value) -> bool> Store for Conditional<S, P> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.indices.len() as u64
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    check_index(index, self.size())?;
    self.inner.get(self.indices[index as usize])
  }
}

impl<S: StoreMut, P: Fn(&S::Value) -> bool> StoreMut for Conditional<S, P> {
  /// Fails with [`StoreError::InvalidWrite`], leaving the store untouched, if `value` does not
  /// satisfy the predicate.
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    check_index(index, self.size())?;
    if !(self.predicate)(value) {
      return Err(StoreError::InvalidWrite { index });
    }
    self.inner.set(self.indices[index as usize], value)
  }
}

/// The records of another store whose entry in a boolean mask is `true`.
#[derive(Debug, Clone)]
pub struct Masked<S> {
  inner: S,
  indices: Vec<u64>,
}

impl<S: Store> Masked<S> {
  /// Fails with [`StoreError::InvalidArgument`] unless `mask` has the size of `inner`.
  pub fn new<M: Store<Value = bool>>(inner: S, mask: M) -> Result<Self> {
    if mask.size() != inner.size() {
      return Err(StoreError::InvalidArgument(format!(
        "mask of {} entries does not match a store of {}",
        mask.size(),
        inner.size()
      )));
    }
    let indices = collect_indices(mask.size(), |index| mask.get(index))?;
    tracing::debug!(selected = indices.len(), of = inner.size(), "materialized masked view");
    Ok(Masked { inner, indices })
  }

  pub fn indices(&self) -> &[u64] {
    &self.indices
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store> Store for Masked<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.indices.len() as u64
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    check_index(index, self.size())?;
    self.inner.get(self.indices[index as usize])
  }
}

impl<S: StoreMut> StoreMut for Masked<S> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    check_index(index, self.size())?;
    self.inner.set(self.indices[index as usize], value)
  }
}
