use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};

/// Two stores one after the other.
#[derive(Debug, Clone)]
pub struct Concatenated<A, B> {
  first: A,
  second: B,
}

impl<A: Store, B: Store<Value = A::Value>> Concatenated<A, B> {
  /// Fails with [`StoreError::Capacity`] if the combined size does not fit in 64 bits.
  pub fn new(first: A, second: B) -> Result<Self> {
    if first.size().checked_add(second.size()).is_none() {
      return Err(StoreError::Capacity { requested: u64::MAX, limit: u64::MAX });
    }
    Ok(Concatenated { first, second })
  }

  pub fn into_parts(self) -> (A, B) {
    (self.first, self.second)
  }
}

impl<A: Store, B: Store<Value = A::Value>> Store for Concatenated<A, B> {
  type Value = A::Value;

  fn size(&self) -> u64 {
    self.first.size() + self.second.size()
  }

  fn get(&self, index: u64) -> Result<A::Value> {
    check_index(index, self.size())?;
    let split = self.first.size();
    if index < split {
      self.first.get(index)
    } else {
      self.second.get(index - split)
    }
  }
}

impl<A: StoreMut, B: StoreMut<Value = A::Value>> StoreMut for Concatenated<A, B> {
  fn set(&mut self, index: u64, value: &A::Value) -> Result<()> {
    check_index(index, self.size())?;
    let split = self.first.size();
    if index < split {
      self.first.set(index, value)
    } else {
      self.second.set(index - split, value)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::Primitive;
  use crate::storage::array::ArrayStore;

  #[test]
  fn test_routes_to_both_halves() {
    let mut first = vec![1i64, 2, 3];
    let mut second = ArrayStore::allocate(Primitive::<i64>::new(), 2).unwrap();
    let mut view = Concatenated::new(&mut first, &mut second).unwrap();
    assert_eq!(view.size(), 5);
    view.set(2, &30).unwrap();
    view.set(3, &40).unwrap();
    assert_eq!(view.get(0).unwrap(), 1);
    assert_eq!(view.get(4).unwrap(), 0);
    assert!(matches!(view.get(5), Err(StoreError::IndexOutOfBounds { index: 5, size: 5 })));
    assert_eq!(first, vec![1, 2, 30]);
    assert_eq!(second.get(0).unwrap(), 40);
  }

  #[test]
  fn test_empty_halves() {
    let empty: Vec<u8> = Vec::new();
    let full = vec![9u8];
    let view = Concatenated::new(&empty, &full).unwrap();
    assert_eq!(view.get(0).unwrap(), 9);
    let view = Concatenated::new(&full, &empty).unwrap();
    assert_eq!(view.get(0).unwrap(), 9);
    assert!(view.get(1).is_err());
  }
}
