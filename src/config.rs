//! # Store configuration
//!
//! All tunables are carried in an explicit [`StoreConfig`] passed at construction time. There is
//! no process-wide state; two stores built from different configs never influence each other.

use std::path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Construction-time parameters shared by all backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Largest number of records a single contiguous array store may hold.
  pub max_array_records: u64,

  /// Records per big-list segment. Must be a power of two.
  pub segment_records: u64,

  /// Target size of one page of a paged file store, in bytes.
  pub page_bytes: usize,

  /// Number of pages a paged file store keeps resident.
  pub window_pages: usize,

  /// Upper bound on bytes [`crate::storage::any::allocate`] will keep in RAM before choosing disk.
  pub ram_budget_bytes: u64,

  /// Fractional digits kept by [`crate::encoding::decimal::DecimalCodec`].
  pub decimal_places: u32,

  /// Directory for anonymous paged file stores. `None` uses the system temp directory.
  pub temp_dir: Option<path::PathBuf>,

  /// Minimum number of records handed to one parallel worker.
  pub chunk_records: u64,
}

impl Default for StoreConfig {
  fn default() -> Self {
    StoreConfig {
      max_array_records: i32::MAX as u64,
      segment_records: 1 << 20,
      page_bytes: 1024,
      window_pages: 4,
      ram_budget_bytes: 1 << 30,
      decimal_places: 20,
      temp_dir: None,
      chunk_records: 1 << 14,
    }
  }
}

impl StoreConfig {
  pub fn with_max_array_records(mut self, records: u64) -> Self {
    self.max_array_records = records;
    self
  }

  pub fn with_segment_records(mut self, records: u64) -> Self {
    self.segment_records = records;
    self
  }

  pub fn with_page_bytes(mut self, bytes: usize) -> Self {
    self.page_bytes = bytes;
    self
  }

  pub fn with_window_pages(mut self, pages: usize) -> Self {
    self.window_pages = pages;
    self
  }

  pub fn with_ram_budget_bytes(mut self, bytes: u64) -> Self {
    self.ram_budget_bytes = bytes;
    self
  }

  pub fn with_decimal_places(mut self, places: u32) -> Self {
    self.decimal_places = places;
    self
  }

  pub fn with_temp_dir(mut self, dir: impl Into<path::PathBuf>) -> Self {
    self.temp_dir = Some(dir.into());
    self
  }

  pub fn with_chunk_records(mut self, records: u64) -> Self {
    self.chunk_records = records;
    self
  }

  /// Checks that the values can actually be used to build stores.
  pub fn validate(&self) -> Result<()> {
    if self.max_array_records == 0 {
      return Err(StoreError::InvalidArgument("max_array_records must be positive".into()));
    }
    if !self.segment_records.is_power_of_two() {
      return Err(StoreError::InvalidArgument(format!(
        "segment_records must be a power of two, got {}",
        self.segment_records
      )));
    }
    if self.segment_records > self.max_array_records {
      return Err(StoreError::InvalidArgument("segment_records exceeds max_array_records".into()));
    }
    if self.page_bytes == 0 || self.window_pages == 0 {
      return Err(StoreError::InvalidArgument("page window must hold at least one non-empty page".into()));
    }
    // 10^38 is the largest power of ten an i128 mantissa can hold.
    if self.decimal_places > 38 {
      return Err(StoreError::InvalidArgument(format!(
        "decimal_places must be at most 38, got {}",
        self.decimal_places
      )));
    }
    if self.chunk_records == 0 {
      return Err(StoreError::InvalidArgument("chunk_records must be positive".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_valid() {
    StoreConfig::default().validate().unwrap();
  }

  #[test]
  fn test_validate_rejects() {
    let bad = [
      StoreConfig::default().with_segment_records(1000),
      StoreConfig::default().with_page_bytes(0),
      StoreConfig::default().with_window_pages(0),
      StoreConfig::default().with_decimal_places(39),
      StoreConfig::default().with_max_array_records(16).with_segment_records(32),
      StoreConfig::default().with_chunk_records(0),
    ];
    for config in bad {
      assert!(matches!(config.validate(), Err(StoreError::InvalidArgument(_))), "{:?}", config);
    }
  }

  #[test]
  fn test_partial_json() {
    let config: StoreConfig = serde_json::from_str(r#"{ "page_bytes": 256, "window_pages": 2 }"#).unwrap();
    assert_eq!(config.page_bytes, 256);
    assert_eq!(config.window_pages, 2);
    assert_eq!(config.segment_records, StoreConfig::default().segment_records);
    config.validate().unwrap();
  }
}
