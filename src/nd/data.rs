use crate::error::{Result, StoreError};
use crate::nd::axis::Axis;
use crate::nd::grid::Rect;
use crate::nd::meta::Metadata;
use crate::nd::shape::{Order, Shape};
use crate::storage::{Store, StoreMut};

/// A flat store seen as an N-dimensional array, with per-axis calibration and metadata.
#[derive(Debug)]
pub struct NdData<S> {
  store: S,
  shape: Shape,
  axes: Vec<Axis>,
  metadata: Metadata,
}

impl<S: Store> NdData<S> {
  /// Wraps `store` with a row-major shape.
  pub fn new(store: S, dims: &[u64]) -> Result<Self> {
    Self::with_order(store, dims, Order::RowMajor)
  }

  /// Fails with [`StoreError::InvalidArgument`] unless the shape covers exactly `store.size()`
  /// elements.
  pub fn with_order(store: S, dims: &[u64], order: Order) -> Result<Self> {
    let shape = Shape::with_order(dims, order)?;
    if shape.len() != store.size() {
      return Err(StoreError::InvalidArgument(format!(
        "shape {:?} holds {} elements, store holds {}",
        dims,
        shape.len(),
        store.size()
      )));
    }
    let axes = vec![Axis::default(); shape.rank()];
    Ok(NdData { store, shape, axes, metadata: Metadata::default() })
  }

  pub fn shape(&self) -> &Shape {
    &self.shape
  }

  pub fn dims(&self) -> &[u64] {
    self.shape.dims()
  }

  pub fn rank(&self) -> usize {
    self.shape.rank()
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut S {
    &mut self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  /// The whole coordinate space as a region.
  pub fn region(&self) -> Result<Rect> {
    Rect::from_dims(self.dims())
  }

  pub fn axes(&self) -> &[Axis] {
    &self.axes
  }

  pub fn axis(&self, axis: usize) -> Result<&Axis> {
    let rank = self.rank();
    self.axes.as_slice().get(axis).ok_or(StoreError::IndexOutOfBounds { index: axis as u64, size: rank as u64 })
  }

  pub fn axis_mut(&mut self, axis: usize) -> Result<&mut Axis> {
    let rank = self.rank();
    self.axes.as_mut_slice().get_mut(axis).ok_or(StoreError::IndexOutOfBounds { index: axis as u64, size: rank as u64 })
  }

  /// Replaces the label, unit and calibration of `axis`.
  pub fn set_axis(&mut self, axis: usize, value: Axis) -> Result<()> {
    *self.axis_mut(axis)? = value;
    Ok(())
  }

  /// Calibrated value of `coord` along `axis`.
  pub fn calibrate(&self, axis: usize, coord: i64) -> Result<f64> {
    Ok(self.axis(axis)?.calibrate(coord))
  }

  pub fn metadata(&self) -> &Metadata {
    &self.metadata
  }

  pub fn metadata_mut(&mut self) -> &mut Metadata {
    &mut self.metadata
  }

  /// Reads at `coord`, validating every component.
  pub fn safe_get(&self, coord: &[u64]) -> Result<S::Value> {
    self.store.get(self.shape.index_of(coord)?)
  }

  /// Reads at `coord` without validating components.
  ///
  /// A component past its axis reads some other element, or fails if the resulting flat index
  /// falls outside the store. It never touches memory outside the store.
  pub fn get(&self, coord: &[u64]) -> Result<S::Value> {
    self.store.get(self.shape.index_of_unchecked(coord))
  }

  /// Dimensions and strides as arrays, for the fixed-rank views.
  pub(crate) fn fixed<const N: usize>(&self) -> Result<([u64; N], [u64; N])> {
    let mismatch = || StoreError::InvalidArgument(format!("data has rank {}, view expects {}", self.rank(), N));
    let dims = <[u64; N]>::try_from(self.shape.dims()).map_err(|_| mismatch())?;
    let strides = <[u64; N]>::try_from(self.shape.strides()).map_err(|_| mismatch())?;
    Ok((dims, strides))
  }
}

impl<S: StoreMut> NdData<S> {
  /// Writes at `coord`, validating every component.
  pub fn safe_set(&mut self, coord: &[u64], value: &S::Value) -> Result<()> {
    let index = self.shape.index_of(coord)?;
    self.store.set(index, value)
  }

  /// Writes at `coord` without validating components; see [`NdData::get`].
  pub fn set(&mut self, coord: &[u64], value: &S::Value) -> Result<()> {
    let index = self.shape.index_of_unchecked(coord);
    self.store.set(index, value)
  }
}
