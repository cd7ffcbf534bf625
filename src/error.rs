//! # Errors
//!
//! Every fallible operation in this crate returns [`StoreError`]. Record-level encoding problems
//! are reported as [`CodecError`] and wrapped when they surface through a store.

use std::io;

/// Failure while turning a value into a record or back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
  /// The byte slice handed to a fixed-width codec has the wrong length.
  #[error("expected a {expected}-byte record, found {actual} bytes")]
  Length { expected: usize, actual: usize },

  /// The value cannot be represented in the codec's record format.
  #[error("value {value} cannot be represented: {reason}")]
  OutOfRange { value: String, reason: String },

  /// The bytes do not form a valid record.
  #[error("malformed record: {0}")]
  Malformed(String),
}

/// Errors returned by stores, views and the N-dimensional layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// A checked accessor was called with an index outside `[0, size)`.
  #[error("index {index} out of bounds for size {size}")]
  IndexOutOfBounds { index: u64, size: u64 },

  /// A filtered view refused a value that fails its predicate. Nothing was written.
  #[error("value written at index {index} does not satisfy the view's predicate")]
  InvalidWrite { index: u64 },

  /// A write was attempted through a read-only view.
  #[error("store is read-only")]
  ReadOnlyViolation,

  #[error("codec error: {0}")]
  Codec(#[from] CodecError),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("table error: {0}")]
  Table(#[from] rusqlite::Error),

  /// The requested allocation exceeds what the backing can hold in one piece.
  #[error("cannot allocate {requested} records, limit is {limit}")]
  Capacity { requested: u64, limit: u64 },

  /// Variable-width records can only live in stores that keep whole values in memory.
  #[error("codec has no fixed record width")]
  UnboundedWidth,

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A persisted store does not match the format or the codec it is opened with.
  #[error("bad store format: {0}")]
  Format(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Fails with [`StoreError::IndexOutOfBounds`] unless `index < size`.
#[inline]
pub fn check_index(index: u64, size: u64) -> Result<()> {
  if index < size {
    Ok(())
  } else {
    Err(StoreError::IndexOutOfBounds { index, size })
  }
}
