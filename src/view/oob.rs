//! # Out-of-bounds policies
//!
//! A policy supplies values for positions outside a store, either by naming an in-range position
//! to read instead ([`Fill::Remap`]) or by producing the value directly ([`Fill::Value`]).
//! Positions are signed so the same policies serve N-dimensional padding, where coordinates may
//! run off either end of an axis.
//!
//! Remapping policies on an empty axis return `Remap(0)`, which the padded view then reports as
//! out of bounds of the wrapped store.

/// Outcome of an out-of-bounds lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill<V> {
  /// Read this in-range position instead.
  Remap(u64),
  /// Use this value.
  Value(V),
}

/// Supplies values for positions outside `[0, len)`.
pub trait OutOfBounds<V> {
  /// Resolves position `pos` on an axis of length `len`. Only called with `pos` outside the axis.
  fn axis(&self, pos: i64, len: u64) -> Fill<V>;

  /// Resolves an N-dimensional coordinate, at least one component of which is outside `dims`.
  ///
  /// Returns `Some(value)`, or `None` after writing an in-range coordinate into `remapped`. The
  /// default applies [`OutOfBounds::axis`] to every offending axis, stopping at the first one that
  /// produces a value.
  fn resolve(&self, coord: &[i64], dims: &[u64], remapped: &mut [u64]) -> Option<V> {
    for (axis, (&pos, &len)) in coord.iter().zip(dims).enumerate() {
      if pos >= 0 && (pos as u64) < len {
        remapped[axis] = pos as u64;
        continue;
      }
      match self.axis(pos, len) {
        Fill::Remap(pos) => remapped[axis] = pos,
        Fill::Value(value) => return Some(value),
      }
    }
    None
  }
}

/// The type's default value, zero for numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl<V: Default> OutOfBounds<V> for Zero {
  fn axis(&self, _pos: i64, _len: u64) -> Fill<V> {
    Fill::Value(V::default())
  }
}

/// A fixed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Constant<V>(pub V);

impl<V: Clone> OutOfBounds<V> for Constant<V> {
  fn axis(&self, _pos: i64, _len: u64) -> Fill<V> {
    Fill::Value(self.0.clone())
  }
}

/// Floating-point types with a NaN.
pub trait NanValue {
  fn nan() -> Self;
}

impl NanValue for f32 {
  fn nan() -> Self {
    f32::NAN
  }
}

impl NanValue for f64 {
  fn nan() -> Self {
    f64::NAN
  }
}

/// Not-a-number.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nan;

impl<V: NanValue> OutOfBounds<V> for Nan {
  fn axis(&self, _pos: i64, _len: u64) -> Fill<V> {
    Fill::Value(V::nan())
  }
}

/// Periodic continuation: position `len` reads position 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cyclic;

impl<V> OutOfBounds<V> for Cyclic {
  fn axis(&self, pos: i64, len: u64) -> Fill<V> {
    if len == 0 {
      return Fill::Remap(0);
    }
    Fill::Remap((pos as i128).rem_euclid(len as i128) as u64)
  }
}

/// Repeats the nearest edge value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Edge;

impl<V> OutOfBounds<V> for Edge {
  fn axis(&self, pos: i64, len: u64) -> Fill<V> {
    if pos < 0 || len == 0 {
      Fill::Remap(0)
    } else {
      Fill::Remap((pos as u64).min(len - 1))
    }
  }
}

/// Reflection that repeats the edge: `.. 1 0 | 0 1 .. n-1 | n-1 n-2 ..`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mirror;

impl<V> OutOfBounds<V> for Mirror {
  fn axis(&self, pos: i64, len: u64) -> Fill<V> {
    if len == 0 {
      return Fill::Remap(0);
    }
    let len = len as i128;
    let p = (pos as i128).rem_euclid(2 * len);
    Fill::Remap(if p < len { p } else { 2 * len - 1 - p } as u64)
  }
}

/// Reflection about the edge without repeating it: `.. 2 1 | 0 1 .. n-1 | n-2 n-3 ..`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorSingle;

impl<V> OutOfBounds<V> for MirrorSingle {
  fn axis(&self, pos: i64, len: u64) -> Fill<V> {
    if len <= 1 {
      return Fill::Remap(0);
    }
    let period = 2 * (len as i128 - 1);
    let p = (pos as i128).rem_euclid(period);
    Fill::Remap(if p < len as i128 { p } else { period - p } as u64)
  }
}

/// Values computed from the full (possibly N-dimensional) position.
pub struct FromFn<F>(pub F);

impl<V, F: Fn(&[i64]) -> V> OutOfBounds<V> for FromFn<F> {
  fn axis(&self, pos: i64, _len: u64) -> Fill<V> {
    Fill::Value((self.0)(&[pos]))
  }

  fn resolve(&self, coord: &[i64], _dims: &[u64], _remapped: &mut [u64]) -> Option<V> {
    Some((self.0)(coord))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn remaps<P: OutOfBounds<u8>>(policy: &P, len: u64, positions: impl IntoIterator<Item = i64>) -> Vec<u64> {
    positions
      .into_iter()
      .map(|pos| match policy.axis(pos, len) {
        Fill::Remap(at) => at,
        Fill::Value(_) => panic!("expected a remap at {}", pos),
      })
      .collect()
  }

  #[test]
  fn test_cyclic() {
    assert_eq!(remaps(&Cyclic, 4, [-5, -1, 4, 5, 9]), vec![3, 3, 0, 1, 1]);
  }

  #[test]
  fn test_edge() {
    assert_eq!(remaps(&Edge, 4, [-100, -1, 4, 1000]), vec![0, 0, 3, 3]);
  }

  #[test]
  fn test_mirror() {
    assert_eq!(remaps(&Mirror, 3, [-4, -3, -2, -1, 3, 4, 5, 6]), vec![2, 2, 1, 0, 2, 1, 0, 0]);
    assert_eq!(remaps(&MirrorSingle, 3, [-4, -3, -2, -1, 3, 4, 5, 6]), vec![0, 1, 2, 1, 1, 0, 1, 2]);
    assert_eq!(remaps(&MirrorSingle, 1, [-7, 7]), vec![0, 0]);
  }

  #[test]
  fn test_empty_axis() {
    for policy in [&Cyclic as &dyn OutOfBounds<u8>, &Edge, &Mirror, &MirrorSingle] {
      assert_eq!(policy.axis(3, 0), Fill::Remap(0));
    }
  }

  #[test]
  fn test_value_policies() {
    assert_eq!(OutOfBounds::<i32>::axis(&Zero, 10, 3), Fill::Value(0));
    assert_eq!(Constant(7u16).axis(-1, 3), Fill::Value(7));
    match OutOfBounds::<f64>::axis(&Nan, 5, 2) {
      Fill::Value(v) => assert!(v.is_nan()),
      Fill::Remap(_) => panic!("expected a value"),
    }
    let policy = FromFn(|coord: &[i64]| coord.iter().sum::<i64>());
    assert_eq!(policy.axis(-3, 2), Fill::Value(-3));
    assert_eq!(policy.resolve(&[1, -5], &[2, 2], &mut [0, 0]), Some(-4));
  }

  #[test]
  fn test_resolve_per_axis() {
    let mut out = [0u64; 3];
    assert_eq!(OutOfBounds::<u8>::resolve(&Edge, &[-1, 1, 9], &[4, 4, 4], &mut out), None);
    assert_eq!(out, [0, 1, 3]);
    assert_eq!(Constant(5u8).resolve(&[0, 7], &[4, 4], &mut [0, 0]), Some(5));
  }
}
