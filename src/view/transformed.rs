use std::marker;

use crate::error::Result;
use crate::storage::{Store, StoreMut};

/// Another store seen through a pair of conversions, exposing values of type `T`.
///
/// `to` runs on every read and `from` on every write; neither is cached.
pub struct Transformed<S, T, To, Back> {
  inner: S,
  to: To,
  from: Back,
  _value: marker::PhantomData<fn() -> T>,
}

impl<S, T, To, Back> Transformed<S, T, To, Back>
where
  S: Store,
  To: Fn(S::Value) -> T,
  Back: Fn(&T) -> S::Value,
{
  pub fn new(inner: S, to: To, from: Back) -> Self {
    Transformed { inner, to, from, _value: marker::PhantomData }
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

impl<S, T, To, Back> Store for Transformed<S, T, To, Back>
where
  S: Store,
  To: Fn(S::Value) -> T,
  Back: Fn(&T) -> S::Value,
{
  type Value = T;

  fn size(&self) -> u64 {
    self.inner.size()
  }

  fn get(&self, index: u64) -> Result<T> {
    Ok((self.to)(self.inner.get(index)?))
  }
}

impl<S, T, To, Back> StoreMut for Transformed<S, T, To, Back>
where
  S: StoreMut,
  To: Fn(S::Value) -> T,
  Back: Fn(&T) -> S::Value,
{
  fn set(&mut self, index: u64, value: &T) -> Result<()> {
    let converted = (self.from)(value);
    self.inner.set(index, &converted)
  }
}
