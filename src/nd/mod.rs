//! # N-dimensional data
//!
//! [`NdData`] puts a [`Shape`] on top of any flat [`crate::Store`]. Coordinates map to flat
//! indices through per-axis strides, in row-major order unless [`Order::ColumnMajor`] is asked
//! for. Each axis carries a label, a unit and a [`Calibration`] from integer coordinate to
//! physical value; the data as a whole carries string-keyed [`Metadata`].
//!
//! Access comes in two flavours. `safe_get`/`safe_set` validate every coordinate component.
//! `get`/`set` skip that validation for hot loops: a component past its axis silently reads or
//! writes some other element, but the resulting flat index still goes through the store's own
//! bounds check, so nothing outside the store is ever touched.
//!
//! Fixed-rank views ([`View1`] to [`View6`]) take coordinates as plain arguments with strides
//! computed once. [`NdPadded`] reads at any signed coordinate through an out-of-bounds policy,
//! and [`grid`] provides coordinate regions and lazy iteration over them.

pub mod axis;
mod data;
mod fixed;
pub mod grid;
pub mod meta;
mod padded;
mod shape;

pub use axis::{Axis, Calibration, FnCalibration, Identity, Linear};
pub use data::NdData;
pub use fixed::{View1, View2, View3, View4, View5, View6};
pub use grid::{Coord, Coords, IterOrder, Rect, Region};
pub use meta::{MetaValue, Metadata};
pub use padded::NdPadded;
pub use shape::{Order, Shape};

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::Primitive;
  use crate::storage::file::PagedFileStore;
  use crate::storage::Store;
  use crate::StoreConfig;

  #[test]
  fn test_region_walk_over_paged_data() {
    let config = StoreConfig::default().with_page_bytes(64).with_window_pages(2);
    let store = PagedFileStore::allocate(Primitive::<f32>::new(), 8 * 8, &config).unwrap();
    let mut data = NdData::new(store, &[8, 8]).unwrap();
    data.set_axis(0, Axis::new("row", "px").with_equation(Linear::new(0.0, 0.5))).unwrap();

    let all = data.region().unwrap();
    let coords: Vec<Coord> = all.coords(IterOrder::Lexicographic).collect();
    for coord in &coords {
      let value = data.calibrate(0, coord[0]).unwrap() + coord[1] as f64;
      data.safe_set(&[coord[0] as u64, coord[1] as u64], &(value as f32)).unwrap();
    }

    let border = all.clone().complement(all.clone()).unwrap();
    assert_eq!(border.coords(IterOrder::Lexicographic).count(), 0);
    let inner = Rect::new(&[1, 1], &[7, 7]).unwrap();
    let ring = all.difference(inner).unwrap();
    let mut sum = 0.0;
    for coord in ring.coords(IterOrder::FirstAxisFastest) {
      sum += data.safe_get(&[coord[0] as u64, coord[1] as u64]).unwrap();
    }
    assert_eq!(ring.coords(IterOrder::Lexicographic).count(), 64 - 36);
    // Rows 0 and 7 (all columns) plus columns 0 and 7 of rows 1..7.
    let expected: f32 = (0..8).map(|c| 0.0 + c as f32 + 3.5 + c as f32).sum::<f32>()
      + (1..7).map(|r| r as f32 * 0.5 + r as f32 * 0.5 + 7.0).sum::<f32>();
    assert_eq!(sum, expected);
    assert_eq!(data.store().size(), 64);
  }
}
