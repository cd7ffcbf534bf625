//! # Parallel bulk operations
//!
//! The index range of the destination is split into disjoint contiguous runs and each run is
//! handed to one `rayon` worker. Workers never share an index, so no locking is involved; the
//! split is what makes this sound, not the stores.
//!
//! Only in-memory backings can be split ([`Partition`]). Sources are read through `&S`, which
//! requires `S: Sync`. [`crate::storage::file::PagedFileStore`] keeps its page window in a
//! `RefCell` and is not `Sync`, so handing it to these functions does not compile:
//!
//! ```compile_fail
//! use bulkstore::encoding::Primitive;
//! use bulkstore::{parallel, PagedFileStore, StoreConfig};
//!
//! let config = StoreConfig::default();
//! let source = PagedFileStore::allocate(Primitive::<u32>::new(), 100, &config).unwrap();
//! let mut target = vec![0u32; 100];
//! parallel::par_map(&source, &mut target, |v| v, &config).unwrap();
//! ```
//!
//! Paged stores are meant to be walked sequentially with [`crate::ops`].

use std::ops;

use rayon::prelude::*;

use crate::config::StoreConfig;
use crate::encoding::Codec;
use crate::error::{Result, StoreError};
use crate::storage::array::{ArrayStore, RecordsMut};
use crate::storage::big_list::BigListStore;
use crate::storage::{Store, StoreMut};

/// Splits `[0, size)` into consecutive ranges of at most `chunk` indices.
pub fn chunks(size: u64, chunk: u64) -> Vec<ops::Range<u64>> {
  let chunk = chunk.max(1);
  (0..size.div_ceil(chunk))
    .map(|k| {
      let start = k * chunk;
      start..start.saturating_add(chunk).min(size)
    })
    .collect()
}

/// A store that can lend out disjoint mutable runs of itself.
pub trait Partition: StoreMut {
  type Run<'a>: StoreMut<Value = Self::Value> + Send
  where
    Self: 'a;

  /// Returns runs of at most `records` records covering the whole store in order, each tagged
  /// with the index of its first record.
  fn runs(&mut self, records: u64) -> Vec<(u64, Self::Run<'_>)>;
}

impl<C: Codec + Sync> Partition for ArrayStore<C> {
  type Run<'a> = RecordsMut<'a, C> where Self: 'a;

  fn runs(&mut self, records: u64) -> Vec<(u64, RecordsMut<'_, C>)> {
    self.runs_mut(records)
  }
}

impl<C: Codec + Sync> Partition for BigListStore<C> {
  type Run<'a> = RecordsMut<'a, C> where Self: 'a;

  fn runs(&mut self, records: u64) -> Vec<(u64, RecordsMut<'_, C>)> {
    let segment = self.segment_records();
    self
      .segments_mut()
      .iter_mut()
      .enumerate()
      .flat_map(|(k, array)| {
        let base = k as u64 * segment;
        array.runs_mut(records).into_iter().map(move |(start, run)| (base + start, run))
      })
      .collect()
  }
}

impl<T: Clone + Send> Partition for Vec<T> {
  type Run<'a> = &'a mut [T] where Self: 'a;

  fn runs(&mut self, records: u64) -> Vec<(u64, &mut [T])> {
    let run = usize::try_from(records.max(1)).unwrap_or(usize::MAX);
    self.chunks_mut(run).enumerate().map(|(k, slice)| ((k * run) as u64, slice)).collect()
  }
}

/// Sets every record of `store` to `value`.
pub fn par_fill<P>(store: &mut P, value: &P::Value, config: &StoreConfig) -> Result<()>
where
  P: Partition,
  P::Value: Sync,
{
  config.validate()?;
  let size = store.size();
  let runs = store.runs(config.chunk_records);
  tracing::debug!(size, runs = runs.len(), "parallel fill");
  runs.into_par_iter().try_for_each(|(_, mut run)| crate::ops::fill(&mut run, value))
}

/// Sets every record of `store` to `f(index)`.
pub fn par_fill_with<P, F>(store: &mut P, f: F, config: &StoreConfig) -> Result<()>
where
  P: Partition,
  F: Fn(u64) -> P::Value + Sync + Send,
{
  config.validate()?;
  let runs = store.runs(config.chunk_records);
  runs.into_par_iter().try_for_each(|(start, mut run)| crate::ops::fill_with(&mut run, |i| f(start + i)))
}

/// Writes `f(source[i])` to `target[i]` for every index. Both stores must have the same size.
pub fn par_map<S, P, F>(source: &S, target: &mut P, f: F, config: &StoreConfig) -> Result<()>
where
  S: Store + Sync + ?Sized,
  P: Partition,
  F: Fn(S::Value) -> P::Value + Sync + Send,
{
  config.validate()?;
  if source.size() != target.size() {
    return Err(StoreError::InvalidArgument(format!(
      "source holds {} records, target {}",
      source.size(),
      target.size()
    )));
  }
  let runs = target.runs(config.chunk_records);
  tracing::debug!(size = source.size(), runs = runs.len(), "parallel map");
  runs.into_par_iter().try_for_each(|(start, mut run)| {
    for i in 0..run.size() {
      run.set(i, &f(source.get(start + i)?))?;
    }
    Ok(())
  })
}

/// Calls `f(index, value)` for every record of `source`, from several threads at once. Stops at
/// the first error, though other workers may already have visited later indices.
pub fn par_for_each<S, F>(source: &S, f: F, config: &StoreConfig) -> Result<()>
where
  S: Store + Sync + ?Sized,
  F: Fn(u64, S::Value) -> Result<()> + Sync + Send,
{
  config.validate()?;
  chunks(source.size(), config.chunk_records).into_par_iter().try_for_each(|range| {
    for i in range {
      f(i, source.get(i)?)?;
    }
    Ok(())
  })
}
