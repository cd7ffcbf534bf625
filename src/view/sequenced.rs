use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};

/// Every `stride`-th record of another store, starting at `start`.
#[derive(Debug, Clone)]
pub struct Sequenced<S> {
  inner: S,
  start: u64,
  stride: u64,
  count: u64,
}

impl<S: Store> Sequenced<S> {
  /// Fails with [`StoreError::InvalidArgument`] unless all `count` positions lie inside `inner`.
  pub fn new(inner: S, start: u64, stride: u64, count: u64) -> Result<Self> {
    let last = match count {
      0 => None,
      _ => Some((count - 1).checked_mul(stride).and_then(|span| span.checked_add(start))),
    };
    match last {
      Some(Some(last)) if last < inner.size() => {}
      None => {}
      _ => {
        return Err(StoreError::InvalidArgument(format!(
          "{} records from {} with stride {} do not fit in a store of {}",
          count,
          start,
          stride,
          inner.size()
        )))
      }
    }
    Ok(Sequenced { inner, start, stride, count })
  }

  /// As many records as fit from `start` with the given non-zero `stride`.
  pub fn fit(inner: S, start: u64, stride: u64) -> Result<Self> {
    if stride == 0 {
      return Err(StoreError::InvalidArgument("stride must be positive".into()));
    }
    let size = inner.size();
    let count = if start >= size { 0 } else { (size - 1 - start) / stride + 1 };
    Ok(Sequenced { inner, start, stride, count })
  }

  pub fn stride(&self) -> u64 {
    self.stride
  }

  pub fn into_inner(self) -> S {
    self.inner
  }

  fn position(&self, index: u64) -> Result<u64> {
    check_index(index, self.count)?;
    Ok(self.start + index * self.stride)
  }
}

impl<S: Store> Store for Sequenced<S> {
  type Value = S::Value;

  fn size(&self) -> u64 {
    self.count
  }

  fn get(&self, index: u64) -> Result<S::Value> {
    self.inner.get(self.position(index)?)
  }
}

impl<S: StoreMut> StoreMut for Sequenced<S> {
  fn set(&mut self, index: u64, value: &S::Value) -> Result<()> {
    let position = self.position(index)?;
    self.inner.set(position, value)
  }
}
