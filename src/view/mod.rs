//! # Views
//!
//! A view is a [`Store`] defined entirely in terms of one or two other stores plus a little state
//! of its own. Views never copy records. They hold their wrapped store by value, and thanks to
//! the blanket impls in [`crate::storage`] that value may be a `&S`, a `&mut S` or a `Box<S>`, so
//! the borrow checker ensures the wrapped store outlives the view.
//!
//! Index validity is always judged against the view's own `size()`. Every 1-D entry point is
//! checked.
//!
//! [`ViewExt`] offers every view as a method, so views chain like iterator adaptors:
//!
//! ```
//! use bulkstore::{Store, ViewExt};
//!
//! let values: Vec<u32> = (0..10).collect();
//! let view = (&values).trimmed(2, 6).unwrap().reversed().strided(0, 2).unwrap();
//! assert_eq!(view.get(1).unwrap(), 5);
//! ```

use crate::error::Result;
use crate::storage::Store;

mod concat;
mod notify;
pub mod oob;
mod padded;
mod read_only;
mod reversed;
mod select;
mod sequenced;
mod transformed;
mod trimmed;

pub use concat::Concatenated;
pub use notify::{ListenerId, Notifying};
pub use padded::Padded;
pub use read_only::ReadOnly;
pub use reversed::Reversed;
pub use select::{Conditional, Masked};
pub use sequenced::Sequenced;
pub use transformed::Transformed;
pub use trimmed::Trimmed;

/// Builds views by method call on any store.
pub trait ViewExt: Store + Sized {
  fn trimmed(self, offset: u64, len: u64) -> Result<Trimmed<Self>> {
    Trimmed::new(self, offset, len)
  }

  fn reversed(self) -> Reversed<Self> {
    Reversed::new(self)
  }

  fn concatenated<B: Store<Value = Self::Value>>(self, other: B) -> Result<Concatenated<Self, B>> {
    Concatenated::new(self, other)
  }

  /// All records reachable from `start` with the given stride.
  fn strided(self, start: u64, stride: u64) -> Result<Sequenced<Self>> {
    Sequenced::fit(self, start, stride)
  }

  fn filtered<P: Fn(&Self::Value) -> bool>(self, predicate: P) -> Result<Conditional<Self, P>> {
    Conditional::new(self, predicate)
  }

  fn masked<M: Store<Value = bool>>(self, mask: M) -> Result<Masked<Self>> {
    Masked::new(self, mask)
  }

  fn transformed<T, To, Back>(self, to: To, from: Back) -> Transformed<Self, T, To, Back>
  where
    To: Fn(Self::Value) -> T,
    Back: Fn(&T) -> Self::Value,
  {
    Transformed::new(self, to, from)
  }

  fn read_only(self) -> ReadOnly<Self> {
    ReadOnly::new(self)
  }

  fn notifying(self) -> Notifying<Self> {
    Notifying::new(self)
  }

  fn padded<P: oob::OutOfBounds<Self::Value>>(self, size: u64, policy: P) -> Result<Padded<Self, P>> {
    Padded::new(self, size, policy)
  }
}

impl<S: Store> ViewExt for S {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::Primitive;
  use crate::error::StoreError;
  use crate::storage::array::ArrayStore;
  use crate::storage::StoreMut;

  #[test]
  fn test_chained_views() {
    let values: Vec<u32> = (0..10).collect();
    let view = (&values).trimmed(2, 6).unwrap().reversed().strided(0, 2).unwrap();
    assert_eq!(view.size(), 3);
    assert_eq!(view.get(0).unwrap(), 7);
    assert_eq!(view.get(1).unwrap(), 5);
    assert_eq!(view.get(2).unwrap(), 3);
  }

  #[test]
  fn test_write_through_nested_views() {
    let mut store = ArrayStore::allocate(Primitive::<i64>::new(), 8).unwrap();
    {
      let mut view =
        (&mut store).reversed().concatenated(vec![0i64; 2]).unwrap().transformed(|v| v * 10, |v: &i64| v / 10);
      for i in 0..view.size() {
        view.set(i, &(i as i64 * 10)).unwrap();
      }
      assert_eq!(view.get(9).unwrap(), 90);
    }
    assert_eq!(store.get(0).unwrap(), 7);
    assert_eq!(store.get(7).unwrap(), 0);
  }

  #[test]
  fn test_read_only_over_filter() {
    let mut values = vec![5, -1, 7, -3];
    let mut view = (&mut values).filtered(|v: &i32| *v > 0).unwrap().read_only();
    assert_eq!(view.size(), 2);
    assert!(matches!(view.set(0, &9), Err(StoreError::ReadOnlyViolation)));
    assert_eq!(values, vec![5, -1, 7, -3]);
  }

  #[test]
  fn test_boxed_views_mix() {
    let values = vec![1u8, 2, 3];
    let views: Vec<Box<dyn Store<Value = u8> + '_>> = vec![
      Box::new((&values).reversed()),
      Box::new((&values).masked(vec![false, true, true]).unwrap()),
      Box::new((&values).padded(4, oob::Edge).unwrap()),
    ];
    let last: Vec<u8> = views.iter().map(|view| view.get(view.size() - 1).unwrap()).collect();
    assert_eq!(last, vec![1, 3, 3]);
  }
}
