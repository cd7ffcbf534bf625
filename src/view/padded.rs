use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};
use crate::view::oob::{Fill, OutOfBounds};

/// Another store extended (or cut) to a declared size, with positions past the end of the
/// wrapped store answered by an [`OutOfBounds`] policy.
///
/// Writes are only accepted inside the wrapped store.
#[derive(Debug, Clone)]
pub struct Padded<S, P> {
  inner: S,
  size: u64,
  policy: P,
}

impl<S: Store, P: OutOfBounds<S::Value>> Padded<S, P> {
  /// Fails with [`StoreError::InvalidArgument`] if `size` exceeds `i64::MAX`, the largest position
  /// a policy can be asked about.
  pub fn new(inner: S, size: u64, policy: P) -> Result<Self> {
    if size > i64::MAX as u64 {
      return Err(StoreError::InvalidArgument(format!("padded size {} exceeds i64::MAX", size)));
    }
    Ok(Padded { inner, size, policy })
  }

  /// Pads to the next power of two at or above the wrapped size. An empty store stays empty.
  pub fn to_power_of_two(inner: S, policy: P) -> Result<Self> {
    let size = match inner.size() {
      0 => 0,
      size => size
        .checked_next_power_of_two()
        .ok_or_else(|| StoreError::InvalidArgument(format!("no power of two at or above {}", size)))?,
    };
    Self::new(inner, size, policy)
  }

  pub fn policy(&self) -> &P {
    &self.policy
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S: Store, P: OutOfBounds<S::Value>> Store for Padded<S, P> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    check_index(index, self.size)?;
    let len = self.inner.size();
    if index < len {
      return self.inner.get(index);
    }
    match self.policy.axis(index as i64, len) {
      Fill::Remap(at) => self.inner.get(at),
      Fill::Value(value) => Ok(value),
    }
  }
}

impl<S: StoreMut, P: OutOfBounds<S::Value>> StoreMut for Padded<S, P> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    check_index(index, self.size)?;
    self.inner.set(index, value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::view::oob::{Constant, Cyclic, Edge, Mirror, Nan, Zero};

  #[test]
  fn test_zero_padding_to_power_of_two() {
    let values: Vec<f64> = (0..413).map(|i| i as f64 + 0.5).collect();
    let view = Padded::to_power_of_two(&values, Zero).unwrap();
    assert_eq!(view.size(), 512);
    for i in 0..413 {
      assert_eq!(view.get(i).unwrap(), values[i as usize]);
    }
    for i in 413..512 {
      assert_eq!(view.get(i).unwrap(), 0.0);
    }
    assert!(matches!(view.get(512), Err(StoreError::IndexOutOfBounds { .. })));
  }

  #[test]
  fn test_policies() {
    let values = vec![1i32, 2, 3];
    let read = |view: &dyn Store<Value = i32>| (0..view.size()).map(|i| view.get(i).unwrap()).collect::<Vec<_>>();
    assert_eq!(read(&Padded::new(&values, 7, Cyclic).unwrap()), vec![1, 2, 3, 1, 2, 3, 1]);
    assert_eq!(read(&Padded::new(&values, 5, Edge).unwrap()), vec![1, 2, 3, 3, 3]);
    assert_eq!(read(&Padded::new(&values, 6, Mirror).unwrap()), vec![1, 2, 3, 3, 2, 1]);
    assert_eq!(read(&Padded::new(&values, 4, Constant(-1)).unwrap()), vec![1, 2, 3, -1]);
    assert_eq!(read(&Padded::new(&values, 2, Zero).unwrap()), vec![1, 2]);
  }

  #[test]
  fn test_nan_padding() {
    let values = vec![1.0f32];
    let view = Padded::new(&values, 2, Nan).unwrap();
    assert!(view.get(1).unwrap().is_nan());
  }

  #[test]
  fn test_writes_stay_inside() {
    let mut values = vec![0u8; 3];
    let mut view = Padded::new(&mut values, 8, Zero).unwrap();
    view.set(2, &4).unwrap();
    assert!(matches!(view.set(3, &1), Err(StoreError::IndexOutOfBounds { index: 3, size: 3 })));
    assert!(matches!(view.set(8, &1), Err(StoreError::IndexOutOfBounds { index: 8, size: 8 })));
    assert_eq!(values, vec![0, 0, 4]);
  }

  #[test]
  fn test_rejects_oversized() {
    let values = vec![0u8];
    assert!(Padded::new(&values, u64::MAX, Zero).is_err());
    let empty: Vec<u8> = Vec::new();
    assert_eq!(Padded::to_power_of_two(&empty, Zero).unwrap().size(), 0);
    assert!(Padded::new(&empty, 1, Cyclic).unwrap().get(0).is_err());
  }
}
