use crate::error::{Result, StoreError};
use crate::storage::{Store, StoreMut};

/// Passes reads through and refuses every write with [`StoreError::ReadOnlyViolation`].
///
/// Wrapping a shared reference already rules out writes at compile time; this view is for code
/// that is handed a [`StoreMut`] and must not be able to change it.
#[derive(Debug, Clone)]
pub struct ReadOnly<S> {
  inner: S,
}

impl<S: Store> ReadOnly<S> {
  pub fn new(inner: S) -> Self {
    ReadOnly { inner }
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store> Store for ReadOnly<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.inner.size()
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    self.inner.get(index)
  }
}

impl<S: Store> StoreMut for ReadOnly<S> {
  fn set(&mut self, _index: u64, _value: &S::Value) -> Result<()> {
    Err(StoreError::ReadOnlyViolation)
  }
}
