//! # Coordinate regions
//!
//! A [`Region`] is a set of integer coordinates with a rectangular bounding box. [`Rect`] is the
//! basic region; the others combine two regions with set algebra or narrow one with a predicate.
//! [`Coords`] walks a region lazily, visiting its bounding box in a fixed order and yielding only
//! the coordinates the region contains. Calling [`Region::coords`] again, or
//! [`Coords::restart`], starts over.

use smallvec::SmallVec;

use crate::error::{Result, StoreError};
use crate::nd::shape::AxisVec;

/// A coordinate yielded by [`Coords`].
pub type Coord = AxisVec<i64>;

/// Order in which [`Coords`] visits the bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IterOrder {
  /// The last axis varies fastest, so coordinates come out sorted.
  #[default]
  Lexicographic,
  /// The first axis varies fastest.
  FirstAxisFastest,
}

/// A set of coordinates.
pub trait Region {
  fn rank(&self) -> usize;

  fn contains(&self, coord: &[i64]) -> bool;

  /// A rectangle containing every coordinate of the region.
  fn bounds(&self) -> Rect;

  fn coords(&self, order: IterOrder) -> Coords<'_, Self>
  where
    Self: Sized,
  {
    Coords::new(self, order)
  }

  fn union<B: Region>(self, other: B) -> Result<Union<Self, B>>
  where
    Self: Sized,
  {
    check_ranks(&self, &other)?;
    Ok(Union(self, other))
  }

  fn intersection<B: Region>(self, other: B) -> Result<Intersection<Self, B>>
  where
    Self: Sized,
  {
    check_ranks(&self, &other)?;
    Ok(Intersection(self, other))
  }

  /// Coordinates of `self` that are not in `other`.
  fn difference<B: Region>(self, other: B) -> Result<Difference<Self, B>>
  where
    Self: Sized,
  {
    check_ranks(&self, &other)?;
    Ok(Difference(self, other))
  }

  fn symmetric_difference<B: Region>(self, other: B) -> Result<SymmetricDifference<Self, B>>
  where
    Self: Sized,
  {
    check_ranks(&self, &other)?;
    Ok(SymmetricDifference(self, other))
  }

  /// Coordinates of `within` that are not in `self`.
  fn complement(self, within: Rect) -> Result<Complement<Self>>
  where
    Self: Sized,
  {
    check_ranks(&self, &within)?;
    Ok(Complement { inner: self, within })
  }

  fn filtered<F: Fn(&[i64]) -> bool>(self, predicate: F) -> Filtered<Self, F>
  where
    Self: Sized,
  {
    Filtered { inner: self, predicate }
  }
}

fn check_ranks<A: Region, B: Region>(a: &A, b: &B) -> Result<()> {
  if a.rank() == b.rank() {
    Ok(())
  } else {
    Err(StoreError::InvalidArgument(format!("cannot combine regions of rank {} and {}", a.rank(), b.rank())))
  }
}

/// The half-open box `[min, max)` on every axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rect {
  min: Coord,
  max: Coord,
}

impl Rect {
  /// Fails with [`StoreError::InvalidArgument`] for rank zero, mismatched ranks or `min > max`.
  pub fn new(min: &[i64], max: &[i64]) -> Result<Self> {
    if min.is_empty() || min.len() != max.len() {
      return Err(StoreError::InvalidArgument(format!("bad rectangle ranks {} and {}", min.len(), max.len())));
    }
    if min.iter().zip(max).any(|(lo, hi)| lo > hi) {
      return Err(StoreError::InvalidArgument(format!("rectangle min {:?} exceeds max {:?}", min, max)));
    }
    Ok(Rect { min: SmallVec::from_slice(min), max: SmallVec::from_slice(max) })
  }

  /// `[0, dims)`.
  pub fn from_dims(dims: &[u64]) -> Result<Self> {
    let max = dims
      .iter()
      .map(|&dim| i64::try_from(dim).map_err(|_| StoreError::InvalidArgument(format!("dimension {} exceeds i64", dim))))
      .collect::<Result<Coord>>()?;
    Self::new(&Coord::from_elem(0, dims.len()), &max)
  }

  pub fn min(&self) -> &[i64] {
    &self.min
  }

  pub fn max(&self) -> &[i64] {
    &self.max
  }

  /// Whether the box holds no coordinates.
  pub fn is_empty(&self) -> bool {
    self.min.iter().zip(&self.max).any(|(lo, hi)| lo == hi)
  }

  /// Number of coordinates, saturating at `u64::MAX`.
  pub fn count(&self) -> u64 {
    self.min.iter().zip(&self.max).fold(1u64, |n, (lo, hi)| n.saturating_mul(hi.abs_diff(*lo)))
  }

  /// The smallest box containing both.
  pub fn hull(&self, other: &Rect) -> Rect {
    if self.is_empty() {
      return other.clone();
    }
    if other.is_empty() {
      return self.clone();
    }
    Rect {
      min: self.min.iter().zip(&other.min).map(|(a, b)| *a.min(b)).collect(),
      max: self.max.iter().zip(&other.max).map(|(a, b)| *a.max(b)).collect(),
    }
  }

  /// The overlap of both, possibly empty.
  pub fn overlap(&self, other: &Rect) -> Rect {
    let min: Coord = self.min.iter().zip(&other.min).map(|(a, b)| *a.max(b)).collect();
    let max = self.max.iter().zip(&other.max).zip(&min).map(|((a, b), lo)| *a.min(b).max(lo)).collect();
    Rect { min, max }
  }
}

impl Region for Rect {
  fn rank(&self) -> usize {
    self.min.len()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    coord.len() == self.rank() && coord.iter().zip(self.min.iter().zip(&self.max)).all(|(x, (lo, hi))| lo <= x && x < hi)
  }

  fn bounds(&self) -> Rect {
    self.clone()
  }
}

impl<R: Region + ?Sized> Region for &R {
  fn rank(&self) -> usize {
    (**self).rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    (**self).contains(coord)
  }

  fn bounds(&self) -> Rect {
    (**self).bounds()
  }
}

/// Coordinates in either region.
#[derive(Debug, Clone)]
pub struct Union<A, B>(A, B);

impl<A: Region, B: Region> Region for Union<A, B> {
  fn rank(&self) -> usize {
    self.0.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.0.contains(coord) || self.1.contains(coord)
  }

  fn bounds(&self) -> Rect {
    self.0.bounds().hull(&self.1.bounds())
  }
}

/// Coordinates in both regions.
#[derive(Debug, Clone)]
pub struct Intersection<A, B>(A, B);

impl<A: Region, B: Region> Region for Intersection<A, B> {
  fn rank(&self) -> usize {
    self.0.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.0.contains(coord) && self.1.contains(coord)
  }

  fn bounds(&self) -> Rect {
    self.0.bounds().overlap(&self.1.bounds())
  }
}

/// Coordinates in the first region but not the second.
#[derive(Debug, Clone)]
pub struct Difference<A, B>(A, B);

impl<A: Region, B: Region> Region for Difference<A, B> {
  fn rank(&self) -> usize {
    self.0.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.0.contains(coord) && !self.1.contains(coord)
  }

  fn bounds(&self) -> Rect {
    self.0.bounds()
  }
}

/// Coordinates in exactly one of the regions.
#[derive(Debug, Clone)]
pub struct SymmetricDifference<A, B>(A, B);

impl<A: Region, B: Region> Region for SymmetricDifference<A, B> {
  fn rank(&self) -> usize {
    self.0.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.0.contains(coord) != self.1.contains(coord)
  }

  fn bounds(&self) -> Rect {
    self.0.bounds().hull(&self.1.bounds())
  }
}

/// Coordinates of a rectangle not in a region.
#[derive(Debug, Clone)]
pub struct Complement<A> {
  inner: A,
  within: Rect,
}

impl<A: Region> Region for Complement<A> {
  fn rank(&self) -> usize {
    self.within.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.within.contains(coord) && !self.inner.contains(coord)
  }

  fn bounds(&self) -> Rect {
    self.within.clone()
  }
}

/// Coordinates of a region that satisfy a predicate.
pub struct Filtered<A, F> {
  inner: A,
  predicate: F,
}

impl<A: Region, F: Fn(&[i64]) -> bool> Region for Filtered<A, F> {
  fn rank(&self) -> usize {
    self.inner.rank()
  }

  fn contains(&self, coord: &[i64]) -> bool {
    self.inner.contains(coord) && (self.predicate)(coord)
  }

  fn bounds(&self) -> Rect {
    self.inner.bounds()
  }
}

/// Lazy walk over the coordinates of a region.
pub struct Coords<'a, R> {
  region: &'a R,
  bounds: Rect,
  order: IterOrder,
  cursor: Option<Coord>,
}

impl<'a, R: Region> Coords<'a, R> {
  pub fn new(region: &'a R, order: IterOrder) -> Self {
    let bounds = region.bounds();
    let mut coords = Coords { region, bounds, order, cursor: None };
    coords.restart();
    coords
  }

  /// Goes back to the first coordinate.
  pub fn restart(&mut self) {
    self.cursor = if self.bounds.is_empty() { None } else { Some(self.bounds.min.clone()) };
  }

  /// Moves the cursor one step in visiting order, or clears it past the last coordinate.
  fn advance(&mut self) {
    let Some(cursor) = self.cursor.as_mut() else {
      return;
    };
    let rank = cursor.len();
    let step = |axis: usize, cursor: &mut Coord| -> bool {
      cursor[axis] += 1;
      if cursor[axis] < self.bounds.max[axis] {
        return true;
      }
      cursor[axis] = self.bounds.min[axis];
      false
    };
    let carried_out = match self.order {
      IterOrder::Lexicographic => !(0..rank).rev().any(|axis| step(axis, cursor)),
      IterOrder::FirstAxisFastest => !(0..rank).any(|axis| step(axis, cursor)),
    };
    if carried_out {
      self.cursor = None;
    }
  }
}

impl<'a, R: Region> Iterator for Coords<'a, R> {
  type Item = Coord;

  fn next(&mut self) -> Option<Coord> {
    loop {
      let current = self.cursor.clone()?;
      self.advance();
      if self.region.contains(&current) {
        return Some(current);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn collect<R: Region>(region: &R, order: IterOrder) -> Vec<Vec<i64>> {
    region.coords(order).map(|coord| coord.to_vec()).collect()
  }

  #[test]
  fn test_rect_orders() {
    let rect = Rect::new(&[0, 10], &[2, 13]).unwrap();
    assert_eq!(rect.count(), 6);
    assert_eq!(
      collect(&rect, IterOrder::Lexicographic),
      vec![vec![0, 10], vec![0, 11], vec![0, 12], vec![1, 10], vec![1, 11], vec![1, 12]]
    );
    assert_eq!(
      collect(&rect, IterOrder::FirstAxisFastest),
      vec![vec![0, 10], vec![1, 10], vec![0, 11], vec![1, 11], vec![0, 12], vec![1, 12]]
    );
  }

  #[test]
  fn test_restartable() {
    let rect = Rect::from_dims(&[3, 3]).unwrap();
    let mut coords = rect.coords(IterOrder::Lexicographic);
    assert_eq!(coords.by_ref().take(4).count(), 4);
    coords.restart();
    assert_eq!(coords.count(), 9);
    assert_eq!(rect.coords(IterOrder::default()).count(), 9);
  }

  #[test]
  fn test_empty_and_degenerate() {
    let empty = Rect::new(&[0, 0], &[3, 0]).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.coords(IterOrder::Lexicographic).next(), None);
    assert!(Rect::new(&[1], &[0]).is_err());
    assert!(Rect::new(&[], &[]).is_err());
    assert!(Rect::new(&[0], &[1, 2]).is_err());
    let point = Rect::new(&[-5], &[-4]).unwrap();
    assert_eq!(collect(&point, IterOrder::Lexicographic), vec![vec![-5]]);
  }

  #[test]
  fn test_set_algebra() {
    let a = Rect::new(&[0, 0], &[3, 3]).unwrap();
    let b = Rect::new(&[2, 2], &[4, 4]).unwrap();
    assert_eq!(a.clone().union(b.clone()).unwrap().coords(IterOrder::Lexicographic).count(), 9 + 4 - 1);
    let both = a.clone().intersection(b.clone()).unwrap();
    assert_eq!(collect(&both, IterOrder::Lexicographic), vec![vec![2, 2]]);
    assert_eq!(both.bounds(), Rect::new(&[2, 2], &[3, 3]).unwrap());
    assert_eq!(a.clone().difference(b.clone()).unwrap().coords(IterOrder::Lexicographic).count(), 8);
    assert_eq!(a.clone().symmetric_difference(b.clone()).unwrap().coords(IterOrder::Lexicographic).count(), 8 + 3);
    let outside = a.clone().complement(Rect::from_dims(&[4, 4]).unwrap()).unwrap();
    assert_eq!(outside.coords(IterOrder::Lexicographic).count(), 16 - 9);
    assert!(!outside.contains(&[1, 1]));
    assert!(a.clone().union(Rect::from_dims(&[2]).unwrap()).is_err());
  }

  #[test]
  fn test_disjoint_intersection_is_empty() {
    let a = Rect::new(&[0, 0], &[2, 2]).unwrap();
    let b = Rect::new(&[5, 5], &[6, 6]).unwrap();
    let both = (&a).intersection(&b).unwrap();
    assert!(both.bounds().is_empty());
    assert_eq!(both.coords(IterOrder::Lexicographic).count(), 0);
  }

  #[test]
  fn test_filtered() {
    let diagonal = Rect::from_dims(&[4, 4]).unwrap().filtered(|c: &[i64]| c[0] == c[1]);
    assert_eq!(collect(&diagonal, IterOrder::FirstAxisFastest), vec![vec![0, 0], vec![1, 1], vec![2, 2], vec![3, 3]]);
    let nested = diagonal.difference(Rect::new(&[1, 1], &[3, 3]).unwrap()).unwrap();
    assert_eq!(collect(&nested, IterOrder::Lexicographic), vec![vec![0, 0], vec![3, 3]]);
  }
}
