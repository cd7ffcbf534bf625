//! # Backend selection
//!
//! [`allocate`] picks the cheapest backing that can hold a store, so callers that only care about
//! the [`Store`] contract never name a backend:
//!
//! 1. variable-width records go to a [`SparseStore`], the only one of these that holds them;
//! 2. stores whose bytes exceed `config.ram_budget_bytes` go to a [`PagedFileStore`];
//! 3. stores of at most `config.max_array_records` records go to an [`ArrayStore`];
//! 4. everything else goes to a [`BigListStore`].

use crate::config::StoreConfig;
use crate::encoding::Codec;
use crate::error::{Result, StoreError};
use crate::storage::array::ArrayStore;
use crate::storage::big_list::BigListStore;
use crate::storage::file::PagedFileStore;
use crate::storage::sparse::SparseStore;
use crate::storage::{Duplicate, Store, StoreMut};

/// Names a backing, for [`allocate_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
  Array,
  BigList,
  Paged,
  Sparse,
}

/// A store of any of the general-purpose backings.
#[derive(Debug)]
pub enum AnyStore<C> {
  Array(ArrayStore<C>),
  BigList(BigListStore<C>),
  Paged(PagedFileStore<C>),
  Sparse(SparseStore<C>),
}

/// The kind [`allocate`] would choose for `size` records of `codec`.
pub fn choose_kind<C: Codec>(codec: &C, size: u64, config: &StoreConfig) -> StoreKind {
  let Some(width) = codec.width() else {
    return StoreKind::Sparse;
  };
  let bytes = size.saturating_mul(width as u64);
  if bytes > config.ram_budget_bytes {
    StoreKind::Paged
  } else if size <= config.max_array_records {
    StoreKind::Array
  } else {
    StoreKind::BigList
  }
}

/// Allocates `size` zeroed records in the backing chosen by [`choose_kind`].
pub fn allocate<C: Codec + Clone>(codec: C, size: u64, config: &StoreConfig) -> Result<AnyStore<C>> {
  config.validate()?;
  let kind = choose_kind(&codec, size, config);
  tracing::debug!(size, ?kind, "selected store backing");
  allocate_kind(kind, codec, size, config)
}

/// Allocates `size` zeroed records in the given backing.
pub fn allocate_kind<C: Codec + Clone>(kind: StoreKind, codec: C, size: u64, config: &StoreConfig) -> Result<AnyStore<C>> {
  Ok(match kind {
    StoreKind::Array => AnyStore::Array(ArrayStore::allocate_with(codec, size, config)?),
    StoreKind::BigList => AnyStore::BigList(BigListStore::allocate(codec, size, config)?),
    StoreKind::Paged => AnyStore::Paged(PagedFileStore::allocate(codec, size, config)?),
    StoreKind::Sparse => AnyStore::Sparse(SparseStore::new(codec, size)),
  })
}

impl<C> AnyStore<C> {
  pub fn kind(&self) -> StoreKind {
    match self {
      AnyStore::Array(_) => StoreKind::Array,
      AnyStore::BigList(_) => StoreKind::BigList,
      AnyStore::Paged(_) => StoreKind::Paged,
      AnyStore::Sparse(_) => StoreKind::Sparse,
    }
  }
}

impl<C: Codec> Store for AnyStore<C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    match self {
      AnyStore::Array(store) => store.size(),
      AnyStore::BigList(store) => store.size(),
      AnyStore::Paged(store) => store.size(),
      AnyStore::Sparse(store) => store.size(),
    }
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    match self {
      AnyStore::Array(store) => store.get(index),
      AnyStore::BigList(store) => store.get(index),
      AnyStore::Paged(store) => store.get(index),
      AnyStore::Sparse(store) => store.get(index),
    }
  }
}

impl<C: Codec> StoreMut for AnyStore<C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    match self {
      AnyStore::Array(store) => store.set(index, value),
      AnyStore::BigList(store) => store.set(index, value),
      AnyStore::Paged(store) => store.set(index, value),
      AnyStore::Sparse(store) => store.set(index, value),
    }
  }
}

impl<C: Codec + Clone> Duplicate for AnyStore<C> {
  fn duplicate(&self) -> Result<Self> {
    Ok(match self {
      AnyStore::Array(store) => AnyStore::Array(store.duplicate()?),
      AnyStore::BigList(store) => AnyStore::BigList(store.duplicate()?),
      AnyStore::Paged(store) => AnyStore::Paged(store.duplicate()?),
      AnyStore::Sparse(store) => AnyStore::Sparse(store.duplicate()?),
    })
  }
}

impl<C> TryFrom<AnyStore<C>> for ArrayStore<C> {
  type Error = StoreError;

  fn try_from(store: AnyStore<C>) -> Result<Self> {
    match store {
      AnyStore::Array(store) => Ok(store),
      other => Err(StoreError::InvalidArgument(format!("expected an array store, found {:?}", other.kind()))),
    }
  }
}
