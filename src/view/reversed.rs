use crate::error::{check_index, Result};
use crate::storage::{Store, StoreMut};

/// Another store back to front.
#[derive(Debug, Clone)]
pub struct Reversed<S> {
  inner: S,
}

impl<S: Store> Reversed<S> {
  pub fn new(inner: S) -> Self {
    Reversed { inner }
  }

  pub fn into_inner(self) -> S {
    self.inner
  }

  fn mirror(&self, index: u64) -> Result<u64> {
    let size = self.inner.size();
    check_index(index, size)?;
    Ok(size - 1 - index)
  }
}

impl<S: Store> Store for Reversed<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.inner.size()
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    self.inner.get(self.mirror(index)?)
  }
}

impl<S: StoreMut> StoreMut for Reversed<S> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    let index = self.mirror(index)?;
    self.inner.set(index, value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::StoreError;

  #[test]
  fn test_reverse() {
    let mut values = vec![1, 2, 3, 4];
    let mut view = Reversed::new(&mut values);
    assert_eq!(view.get(0).unwrap(), 4);
    view.set(3, &10).unwrap();
    assert!(matches!(view.get(4), Err(StoreError::IndexOutOfBounds { .. })));
    assert_eq!(values, vec![10, 2, 3, 4]);
  }

  #[test]
  fn test_twice_is_identity() {
    let values: Vec<u64> = (0..257).map(|i| i * i).collect();
    let view = Reversed::new(Reversed::new(&values));
    assert_eq!(view.size(), values.size());
    for i in 0..values.size() {
      assert_eq!(view.get(i).unwrap(), Store::get(&values, i).unwrap());
    }
  }

  #[test]
  fn test_empty() {
    let values: Vec<u8> = Vec::new();
    assert!(Reversed::new(&values).get(0).is_err());
  }
}
