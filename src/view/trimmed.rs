use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};

/// A contiguous window `[offset, offset + len)` of another store.
#[derive(Debug, Clone)]
pub struct Trimmed<S> {
  inner: S,
  offset: u64,
  len: u64,
}

impl<S: Store> Trimmed<S> {
  /// Fails with [`StoreError::InvalidArgument`] unless the window lies inside `inner`.
  pub fn new(inner: S, offset: u64, len: u64) -> Result<Self> {
    match offset.checked_add(len) {
      Some(end) if end <= inner.size() => Ok(Trimmed { inner, offset, len }),
      _ => Err(StoreError::InvalidArgument(format!(
        "window of {} records at {} does not fit in a store of {}",
        len,
        offset,
        inner.size()
      ))),
    }
  }

  pub fn offset(&self) -> u64 {
    self.offset
  }

  pub fn inner(&self) -> &S {
    &self.inner
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store> Store for Trimmed<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.len
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    check_index(index, self.len)?;
    self.inner.get(self.offset + index)
  }
}

impl<S: StoreMut> StoreMut for Trimmed<S> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    check_index(index, self.len)?;
    self.inner.set(self.offset + index, value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_window() {
    let mut values: Vec<u32> = (0..100).collect();
    let mut view = Trimmed::new(&mut values, 10, 20).unwrap();
    assert_eq!(view.size(), 20);
    for i in 0..20 {
      assert_eq!(view.get(i).unwrap(), 10 + i as u32);
    }
    view.set(0, &1000).unwrap();
    assert!(matches!(view.get(20), Err(StoreError::IndexOutOfBounds { index: 20, size: 20 })));
    assert!(matches!(view.set(20, &0), Err(StoreError::IndexOutOfBounds { .. })));
    assert_eq!(values[10], 1000);
    assert_eq!(values[30], 30);
  }

  #[test]
  fn test_rejects_window_past_end() {
    let values = vec![0u8; 10];
    Trimmed::new(&values, 0, 10).unwrap();
    Trimmed::new(&values, 10, 0).unwrap();
    assert!(Trimmed::new(&values, 5, 6).is_err());
    assert!(Trimmed::new(&values, u64::MAX, 2).is_err());
  }
}
