//! Flat index <-> coordinate arithmetic.

use smallvec::SmallVec;

use crate::error::{check_index, Result, StoreError};

/// Inline capacity for per-axis buffers; higher ranks spill to the heap.
pub(crate) const INLINE_RANK: usize = 6;

pub(crate) type AxisVec<T> = SmallVec<[T; INLINE_RANK]>;

/// Which axis varies fastest in the flat store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
  /// The last axis is contiguous.
  #[default]
  RowMajor,
  /// The first axis is contiguous.
  ColumnMajor,
}

/// Dimension sizes plus the strides that map coordinates to flat indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
  dims: AxisVec<u64>,
  strides: AxisVec<u64>,
  order: Order,
  len: u64,
}

impl Shape {
  /// A row-major shape.
  pub fn new(dims: &[u64]) -> Result<Self> {
    Self::with_order(dims, Order::RowMajor)
  }

  /// Fails with [`StoreError::InvalidArgument`] for rank zero and with [`StoreError::Capacity`]
  /// if the element count overflows 64 bits.
  pub fn with_order(dims: &[u64], order: Order) -> Result<Self> {
    if dims.is_empty() {
      return Err(StoreError::InvalidArgument("shape needs at least one axis".into()));
    }
    let mut strides: AxisVec<u64> = SmallVec::from_elem(0, dims.len());
    let mut len = 1u64;
    let mut place = |axis: usize| -> Result<()> {
      strides[axis] = len;
      len = len.checked_mul(dims[axis]).ok_or(StoreError::Capacity { requested: u64::MAX, limit: u64::MAX })?;
      Ok(())
    };
    match order {
      Order::RowMajor => (0..dims.len()).rev().try_for_each(&mut place)?,
      Order::ColumnMajor => (0..dims.len()).try_for_each(&mut place)?,
    }
    Ok(Shape { dims: SmallVec::from_slice(dims), strides, order, len })
  }

  pub fn dims(&self) -> &[u64] {
    &self.dims
  }

  pub fn strides(&self) -> &[u64] {
    &self.strides
  }

  pub fn order(&self) -> Order {
    self.order
  }

  pub fn rank(&self) -> usize {
    self.dims.len()
  }

  /// Total number of elements.
  pub fn len(&self) -> u64 {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn check_rank(&self, rank: usize) -> Result<()> {
    if rank == self.rank() {
      Ok(())
    } else {
      Err(StoreError::InvalidArgument(format!("expected {} coordinates, got {}", self.rank(), rank)))
    }
  }

  /// Flat index of `coord`, validating every component.
  pub fn index_of(&self, coord: &[u64]) -> Result<u64> {
    self.check_rank(coord.len())?;
    for (&x, &dim) in coord.iter().zip(&self.dims) {
      check_index(x, dim)?;
    }
    Ok(self.index_of_unchecked(coord))
  }

  /// Flat index of `coord` without validation. Out-of-range components produce some other
  /// index (wrapping on overflow), never a panic.
  #[inline]
  pub fn index_of_unchecked(&self, coord: &[u64]) -> u64 {
    coord.iter().zip(&self.strides).fold(0u64, |index, (&x, &stride)| index.wrapping_add(x.wrapping_mul(stride)))
  }

  /// Writes the coordinate of flat `index` into `coord`.
  pub fn coord_of(&self, index: u64, coord: &mut [u64]) -> Result<()> {
    self.check_rank(coord.len())?;
    check_index(index, self.len)?;
    for axis in 0..self.rank() {
      coord[axis] = index / self.strides[axis] % self.dims[axis];
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_major() {
    let shape = Shape::new(&[2, 3, 4]).unwrap();
    assert_eq!(shape.strides(), &[12, 4, 1]);
    assert_eq!(shape.len(), 24);
    assert_eq!(shape.index_of(&[1, 2, 3]).unwrap(), 23);
    assert_eq!(shape.index_of(&[0, 1, 0]).unwrap(), 4);
  }

  #[test]
  fn test_column_major() {
    let shape = Shape::with_order(&[2, 3, 4], Order::ColumnMajor).unwrap();
    assert_eq!(shape.strides(), &[1, 2, 6]);
    assert_eq!(shape.index_of(&[1, 0, 0]).unwrap(), 1);
    assert_eq!(shape.index_of(&[1, 2, 3]).unwrap(), 23);
  }

  #[test]
  fn test_coord_round_trip() {
    for order in [Order::RowMajor, Order::ColumnMajor] {
      let shape = Shape::with_order(&[3, 1, 5, 2], order).unwrap();
      let mut coord = [0u64; 4];
      for index in 0..shape.len() {
        shape.coord_of(index, &mut coord).unwrap();
        assert_eq!(shape.index_of(&coord).unwrap(), index);
      }
      assert!(shape.coord_of(shape.len(), &mut coord).is_err());
    }
  }

  #[test]
  fn test_checked_and_unchecked() {
    let shape = Shape::new(&[4, 4]).unwrap();
    assert!(matches!(shape.index_of(&[0, 4]), Err(StoreError::IndexOutOfBounds { index: 4, size: 4 })));
    assert!(matches!(shape.index_of(&[0]), Err(StoreError::InvalidArgument(_))));
    // Unchecked access aliases another element instead of failing.
    assert_eq!(shape.index_of_unchecked(&[0, 4]), shape.index_of(&[1, 0]).unwrap());
    assert_eq!(shape.index_of_unchecked(&[u64::MAX, 0]), u64::MAX.wrapping_mul(4));
  }

  #[test]
  fn test_rejects_bad_shapes() {
    assert!(Shape::new(&[]).is_err());
    assert!(matches!(Shape::new(&[u64::MAX, 2]), Err(StoreError::Capacity { .. })));
    let empty = Shape::new(&[3, 0]).unwrap();
    assert!(empty.is_empty());
  }
}
