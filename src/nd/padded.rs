use smallvec::SmallVec;

use crate::error::{Result, StoreError};
use crate::nd::data::NdData;
use crate::nd::grid::Rect;
use crate::nd::shape::AxisVec;
use crate::storage::Store;
use crate::view::oob::OutOfBounds;

/// N-dimensional data readable at any signed coordinate, with coordinates outside the shape
/// answered by an [`OutOfBounds`] policy.
pub struct NdPadded<'a, S, P> {
  data: &'a NdData<S>,
  policy: P,
}

impl<'a, S: Store, P: OutOfBounds<S::Value>> NdPadded<'a, S, P> {
  pub fn new(data: &'a NdData<S>, policy: P) -> Self {
    NdPadded { data, policy }
  }

  pub fn data(&self) -> &NdData<S> {
    self.data
  }

  /// Reads at `coord`. Fails with [`StoreError::InvalidArgument`] on a rank mismatch, and with
  /// [`StoreError::IndexOutOfBounds`] if a remapping policy meets an empty axis.
  pub fn get(&self, coord: &[i64]) -> Result<S::Value> {
    let dims = self.data.dims();
    if coord.len() != dims.len() {
      return Err(StoreError::InvalidArgument(format!("expected {} coordinates, got {}", dims.len(), coord.len())));
    }
    let mut inside: AxisVec<u64> = SmallVec::from_elem(0, dims.len());
    let in_range = coord.iter().zip(dims).zip(inside.iter_mut()).all(|((&x, &dim), slot)| {
      *slot = x as u64;
      x >= 0 && (x as u64) < dim
    });
    if !in_range {
      if let Some(value) = self.policy.resolve(coord, dims, &mut inside) {
        return Ok(value);
      }
    }
    self.data.safe_get(&inside)
  }

  /// Reads every coordinate of `rect` in lexicographic order.
  pub fn read_rect(&self, rect: &Rect) -> Result<Vec<S::Value>> {
    use crate::nd::grid::{IterOrder, Region};
    rect.coords(IterOrder::Lexicographic).map(|coord| self.get(&coord)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::view::oob::{Constant, Cyclic, Edge, FromFn, Mirror, Zero};

  fn data() -> NdData<Vec<i32>> {
    // 0 1 2
    // 3 4 5
    NdData::new((0..6).collect(), &[2, 3]).unwrap()
  }

  #[test]
  fn test_inside_passes_through() {
    let data = data();
    let padded = NdPadded::new(&data, Zero);
    assert_eq!(padded.get(&[1, 2]).unwrap(), 5);
    assert_eq!(padded.get(&[0, 0]).unwrap(), 0);
  }

  #[test]
  fn test_per_axis_policies() {
    let data = data();
    assert_eq!(NdPadded::new(&data, Zero).get(&[-1, 1]).unwrap(), 0);
    assert_eq!(NdPadded::new(&data, Constant(-9)).get(&[0, 3]).unwrap(), -9);
    assert_eq!(NdPadded::new(&data, Edge).get(&[-4, 10]).unwrap(), 2);
    assert_eq!(NdPadded::new(&data, Cyclic).get(&[2, -1]).unwrap(), 2);
    assert_eq!(NdPadded::new(&data, Mirror).get(&[-1, 3]).unwrap(), 2);
  }

  #[test]
  fn test_coordinate_function() {
    let data = data();
    let padded = NdPadded::new(&data, FromFn(|c: &[i64]| (c[0] * 100 + c[1]) as i32));
    assert_eq!(padded.get(&[5, -2]).unwrap(), 498);
    assert_eq!(padded.get(&[1, 1]).unwrap(), 4);
  }

  #[test]
  fn test_read_rect_around_data() {
    let data = data();
    let padded = NdPadded::new(&data, Edge);
    let rect = Rect::new(&[-1, -1], &[3, 4]).unwrap();
    let values = padded.read_rect(&rect).unwrap();
    assert_eq!(values.len(), 4 * 5);
    assert_eq!(&values[..5], &[0, 0, 1, 2, 2]);
    assert_eq!(&values[5..10], &[0, 0, 1, 2, 2]);
    assert_eq!(&values[15..], &[3, 3, 4, 5, 5]);
  }

  #[test]
  fn test_errors() {
    let data = data();
    assert!(matches!(NdPadded::new(&data, Zero).get(&[0]), Err(StoreError::InvalidArgument(_))));
    let empty = NdData::new(Vec::<i32>::new(), &[0, 3]).unwrap();
    assert!(matches!(NdPadded::new(&empty, Cyclic).get(&[0, 0]), Err(StoreError::IndexOutOfBounds { .. })));
    assert_eq!(NdPadded::new(&empty, Constant(1)).get(&[0, 0]).unwrap(), 1);
  }
}
