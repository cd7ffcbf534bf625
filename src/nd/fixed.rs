//! Fixed-rank views: coordinates as separate arguments, strides precomputed, no per-call rank
//! dispatch.
//!
//! `get`/`set` skip component validation the same way [`NdData::get`] does; `safe_get`/`safe_set`
//! check every component against its axis.

use crate::error::{check_index, Result};
use crate::nd::data::NdData;
use crate::storage::{Store, StoreMut};

macro_rules! fixed_view {
  ($(#[$doc:meta])* $name:ident, $rank:literal, $view:ident, $view_mut:ident, $($x:ident: $k:tt),+) => {
    $(#[$doc])*
    #[derive(Debug, Clone)]
    pub struct $name<S> {
      store: S,
      dims: [u64; $rank],
      strides: [u64; $rank],
    }

    impl<S: Store> $name<S> {
      pub fn dims(&self) -> [u64; $rank] {
        self.dims
      }

      #[inline]
      pub fn get(&self, $($x: u64),+) -> Result<S::Value> {
        let index = 0u64 $(.wrapping_add($x.wrapping_mul(self.strides[$k])))+;
        self.store.get(index)
      }

      pub fn safe_get(&self, $($x: u64),+) -> Result<S::Value> {
        $(check_index($x, self.dims[$k])?;)+
        self.get($($x),+)
      }
    }

    impl<S: StoreMut> $name<S> {
      #[inline]
      pub fn set(&mut self, $($x: u64,)+ value: &S::Value) -> Result<()> {
        let index = 0u64 $(.wrapping_add($x.wrapping_mul(self.strides[$k])))+;
        self.store.set(index, value)
      }

      pub fn safe_set(&mut self, $($x: u64,)+ value: &S::Value) -> Result<()> {
        $(check_index($x, self.dims[$k])?;)+
        self.set($($x,)+ value)
      }
    }

    impl<S: Store> NdData<S> {
      /// Fails with [`crate::StoreError::InvalidArgument`] if the data has a different rank.
      pub fn $view(&self) -> Result<$name<&S>> {
        let (dims, strides) = self.fixed::<$rank>()?;
        Ok($name { store: self.store(), dims, strides })
      }

      /// Fails with [`crate::StoreError::InvalidArgument`] if the data has a different rank.
      pub fn $view_mut(&mut self) -> Result<$name<&mut S>> {
        let (dims, strides) = self.fixed::<$rank>()?;
        Ok($name { store: self.store_mut(), dims, strides })
      }
    }
  };
}

fixed_view!(
  /// Rank-1 access.
  View1, 1, view1, view1_mut, x0: 0
);
fixed_view!(
  /// Rank-2 access.
  View2, 2, view2, view2_mut, x0: 0, x1: 1
);
fixed_view!(
  /// Rank-3 access.
  View3, 3, view3, view3_mut, x0: 0, x1: 1, x2: 2
);
fixed_view!(
  /// Rank-4 access.
  View4, 4, view4, view4_mut, x0: 0, x1: 1, x2: 2, x3: 3
);
fixed_view!(
  /// Rank-5 access.
  View5, 5, view5, view5_mut, x0: 0, x1: 1, x2: 2, x3: 3, x4: 4
);
fixed_view!(
  /// Rank-6 access.
  View6, 6, view6, view6_mut, x0: 0, x1: 1, x2: 2, x3: 3, x4: 4, x5: 5
);

#[cfg(test)]
mod tests {
  use crate::error::StoreError;
  use crate::nd::data::NdData;
  use crate::nd::shape::Order;

  #[test]
  fn test_view2_matches_general_access() {
    let mut data = NdData::new(vec![0i32; 20], &[4, 5]).unwrap();
    {
      let mut view = data.view2_mut().unwrap();
      for x in 0..4 {
        for y in 0..5 {
          view.safe_set(x, y, &((x * 10 + y) as i32)).unwrap();
        }
      }
    }
    let view = data.view2().unwrap();
    assert_eq!(view.dims(), [4, 5]);
    assert_eq!(view.get(3, 4).unwrap(), 34);
    assert_eq!(data.safe_get(&[2, 1]).unwrap(), view.get(2, 1).unwrap());
    assert!(matches!(view.safe_get(0, 5), Err(StoreError::IndexOutOfBounds { index: 5, size: 5 })));
    // The unchecked form wraps into the next row.
    assert_eq!(view.get(0, 5).unwrap(), 10);
  }

  #[test]
  fn test_rank_must_match() {
    let data = NdData::new(vec![0u8; 8], &[2, 2, 2]).unwrap();
    assert!(data.view3().is_ok());
    assert!(matches!(data.view2(), Err(StoreError::InvalidArgument(_))));
    assert!(data.view4().is_err());
  }

  #[test]
  fn test_higher_ranks() {
    let mut data = NdData::with_order(vec![0u16; 64], &[2, 2, 2, 2, 2, 2], Order::ColumnMajor).unwrap();
    data.view6_mut().unwrap().set(1, 0, 0, 0, 0, 1, &7).unwrap();
    assert_eq!(data.store()[33], 7);
    assert_eq!(data.safe_get(&[1, 0, 0, 0, 0, 1]).unwrap(), 7);

    let data = NdData::new(vec![1u8; 32], &[2, 2, 2, 2, 2]).unwrap();
    assert_eq!(data.view5().unwrap().safe_get(1, 1, 1, 1, 1).unwrap(), 1);
    let data = NdData::new(vec![1u8; 16], &[2, 2, 2, 2]).unwrap();
    assert!(data.view4().unwrap().safe_get(2, 0, 0, 0).is_err());
    let mut data = NdData::new(vec![0u8; 3], &[3]).unwrap();
    data.view1_mut().unwrap().safe_set(2, &9).unwrap();
    assert_eq!(data.view1().unwrap().get(2).unwrap(), 9);
  }
}
