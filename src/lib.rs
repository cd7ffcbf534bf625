//! # bulkstore
//!
//! Large fixed-size collections of fixed-width records with 64-bit indices, behind one
//! read/write contract ([`Store`], [`StoreMut`]) that every backing implements: contiguous RAM,
//! segmented RAM, packed bits, a paged file with a bounded page window, a sparse map and a SQLite
//! table. Views compose over any store without copying ([`view`]), and [`nd`] adds shapes,
//! calibrated axes and regions on top.
//!
//! ```
//! use bulkstore::encoding::Primitive;
//! use bulkstore::{allocate, ops, Store, StoreConfig, StoreMut, ViewExt};
//!
//! let config = StoreConfig::default();
//! let mut store = allocate(Primitive::<i32>::new(), 10, &config).unwrap();
//! ops::fill_with(&mut store, |i| i as i32).unwrap();
//! store.set(0, &-1).unwrap();
//! let tail = store.reversed().trimmed(0, 3).unwrap();
//! assert_eq!(ops::to_vec(&tail).unwrap(), vec![9, 8, 7]);
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod nd;
pub mod ops;
pub mod parallel;
pub mod storage;
pub mod view;

pub use config::StoreConfig;
pub use encoding::Codec;
pub use error::{CodecError, Result, StoreError};
pub use nd::NdData;
pub use storage::any::{allocate, allocate_kind, AnyStore, StoreKind};
pub use storage::array::ArrayStore;
pub use storage::big_list::BigListStore;
pub use storage::file::PagedFileStore;
pub use storage::packed::PackedStore;
pub use storage::sparse::SparseStore;
pub use storage::table::TableStore;
pub use storage::{Duplicate, Store, StoreMut};
pub use view::ViewExt;
