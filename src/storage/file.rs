//! # Paged file store
//!
//! Records live in a file; only a small [`PageWindow`] of recently used pages is held in memory.
//! Sequential traversal is the fast path. Random access works but degrades towards one disk
//! read (and possibly one write-back) per access once the working set exceeds the window.
//!
//! The store keeps its window in a `RefCell`, so it is not `Sync`: it cannot be shared between
//! threads, and the parallel helpers in [`crate::parallel`] refuse it at compile time.
//!
//! ## File format
//!
//! ```text
//! offset  size          content
//! 0       8             record width in bytes, little-endian u64
//! 8       8             record count, little-endian u64
//! 16      count*width   records in index order
//! ```
//!
//! There is no version field; a different layout is a different format.

use std::cell;
use std::io;
use std::path;

use super::paging::{PageWindow, WindowStats};
use super::vfs::{self, File as _, FileSystem};
use crate::config::StoreConfig;
use crate::encoding::Codec;
use crate::error::{check_index, Result, StoreError};
use crate::storage::{Duplicate, Store, StoreMut};

/// Length of the file header in bytes.
pub const HEADER_BYTES: u64 = 16;

const COPY_BUFFER_BYTES: usize = 64 * 1024;

/// Fixed-width records in a file behind an LRU page window.
#[derive(Debug)]
pub struct PagedFileStore<C, F: vfs::File = vfs::StandardFile> {
  codec: C,
  width: usize,
  size: u64,
  records_per_page: u64,
  config: StoreConfig,
  window: cell::RefCell<PageWindow<F>>,
  locked: bool,
  // Declared after `window` so the file is closed before the temporary path is removed.
  temp: Option<tempfile::TempPath>,
}

fn data_bytes(size: u64, width: usize) -> Result<u64> {
  size
    .checked_mul(width as u64)
    .and_then(|bytes| bytes.checked_add(HEADER_BYTES))
    .map(|total| total - HEADER_BYTES)
    .ok_or(StoreError::Capacity { requested: size, limit: (u64::MAX - HEADER_BYTES) / width as u64 })
}

fn record_width<C: Codec>(codec: &C) -> Result<usize> {
  match codec.width() {
    None => Err(StoreError::UnboundedWidth),
    Some(0) => Err(StoreError::InvalidArgument("records must be at least one byte wide".into())),
    Some(width) => Ok(width),
  }
}

impl<C: Codec, F: vfs::File> PagedFileStore<C, F> {
  /// Formats `file` as a new store of `size` zeroed records. Existing contents are discarded.
  pub fn from_file(mut file: F, codec: C, size: u64, config: &StoreConfig) -> Result<Self> {
    config.validate()?;
    let width = record_width(&codec)?;
    let data = data_bytes(size, width)?;
    file.truncate(0)?;
    file.truncate(HEADER_BYTES + data)?;
    let mut header = [0u8; HEADER_BYTES as usize];
    header[..8].copy_from_slice(&(width as u64).to_le_bytes());
    header[8..].copy_from_slice(&size.to_le_bytes());
    file.write_at(0, &header)?;
    tracing::debug!(size, width, "created paged file store");
    Ok(Self::with_window(file, codec, width, size, config))
  }

  /// Attaches to a store previously written by [`PagedFileStore::from_file`].
  ///
  /// Fails with [`StoreError::Format`] if the header does not match the codec or the file length.
  pub fn open_file(mut file: F, codec: C, config: &StoreConfig) -> Result<Self> {
    config.validate()?;
    let width = record_width(&codec)?;
    let actual = file.size()?;
    if actual < HEADER_BYTES {
      return Err(StoreError::Format(format!("file of {} bytes has no header", actual)));
    }
    let mut header = [0u8; HEADER_BYTES as usize];
    file.read_at(0, &mut header)?;
    let mut field = [0u8; 8];
    field.copy_from_slice(&header[..8]);
    let stored_width = u64::from_le_bytes(field);
    field.copy_from_slice(&header[8..]);
    let size = u64::from_le_bytes(field);
    if stored_width != width as u64 {
      return Err(StoreError::Format(format!("records are {} bytes wide, codec expects {}", stored_width, width)));
    }
    let data = data_bytes(size, width)?;
    if actual != HEADER_BYTES + data {
      return Err(StoreError::Format(format!(
        "header promises {} records ({} bytes) but file holds {} bytes",
        size,
        HEADER_BYTES + data,
        actual
      )));
    }
    tracing::debug!(size, width, "opened paged file store");
    Ok(Self::with_window(file, codec, width, size, config))
  }

  fn with_window(file: F, codec: C, width: usize, size: u64, config: &StoreConfig) -> Self {
    let records_per_page = (config.page_bytes / width).max(1) as u64;
    let page_bytes = records_per_page as usize * width;
    let window = PageWindow::new(file, HEADER_BYTES, size * width as u64, page_bytes, config.window_pages);
    PagedFileStore {
      codec,
      width,
      size,
      records_per_page,
      config: config.clone(),
      window: cell::RefCell::new(window),
      locked: false,
      temp: None,
    }
  }

  pub fn codec(&self) -> &C {
    &self.codec
  }

  pub fn records_per_page(&self) -> u64 {
    self.records_per_page
  }

  pub fn stats(&self) -> WindowStats {
    self.window.borrow().stats()
  }

  /// Writes all dirty pages to the file and syncs it.
  pub fn flush(&self) -> Result<()> {
    Ok(self.window.borrow_mut().flush()?)
  }

  fn locate(&self, index: u64) -> (u64, usize) {
    let page = index / self.records_per_page;
    let offset = (index % self.records_per_page) as usize * self.width;
    (page, offset)
  }
}

impl<C: Codec> PagedFileStore<C, vfs::StandardFile> {
  /// Allocates `size` zeroed records in an anonymous temporary file, removed when the store is
  /// dropped.
  pub fn allocate(codec: C, size: u64, config: &StoreConfig) -> Result<Self> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("bulkstore-");
    let named = match &config.temp_dir {
      Some(dir) => builder.tempfile_in(dir)?,
      None => builder.tempfile()?,
    };
    let (file, temp) = named.into_parts();
    let mut store = Self::from_file(vfs::StandardFile::from(file), codec, size, config)?;
    store.temp = Some(temp);
    Ok(store)
  }

  /// Creates (or overwrites) a store at `path`, holding an exclusive lock on it while alive.
  pub fn create(path: impl AsRef<path::Path>, codec: C, size: u64, config: &StoreConfig) -> Result<Self> {
    let mut file = vfs::StandardFileSystem.open(path.as_ref())?;
    vfs::File::try_lock(&mut file)?;
    let mut store = Self::from_file(file, codec, size, config)?;
    store.locked = true;
    Ok(store)
  }

  /// Opens the store at `path`, holding an exclusive lock on it while alive.
  pub fn open(path: impl AsRef<path::Path>, codec: C, config: &StoreConfig) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(io::Error::new(io::ErrorKind::NotFound, format!("no store at {}", path.display())).into());
    }
    let mut file = vfs::StandardFileSystem.open(path)?;
    vfs::File::try_lock(&mut file)?;
    let mut store = Self::open_file(file, codec, config)?;
    store.locked = true;
    Ok(store)
  }
}

impl<C: Codec, F: vfs::File> Store for PagedFileStore<C, F> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size)?;
    let (page, offset) = self.locate(index);
    let width = self.width;
    let decoded = self.window.borrow_mut().with_page(page, |data| self.codec.decode(&data[offset..offset + width]))?;
    Ok(decoded?)
  }
}

impl<C: Codec, F: vfs::File> StoreMut for PagedFileStore<C, F> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size)?;
    let mut record = Vec::with_capacity(self.width);
    self.codec.encode(value, &mut record)?;
    crate::encoding::codec::expect_len(&record, self.width)?;
    let (page, offset) = self.locate(index);
    self.window.get_mut().with_page_mut(page, |data| data[offset..offset + record.len()].copy_from_slice(&record))?;
    Ok(())
  }
}

impl<C: Codec + Clone> Duplicate for PagedFileStore<C, vfs::StandardFile> {
  /// Copies every record into a new anonymous temporary file.
  fn duplicate(&self) -> Result<Self> {
    self.flush()?;
    let copy = Self::allocate(self.codec.clone(), self.size, &self.config)?;
    {
      let mut source = self.window.borrow_mut();
      let mut target = copy.window.borrow_mut();
      let total = self.size * self.width as u64;
      let mut buffer = vec![0u8; COPY_BUFFER_BYTES];
      let mut done = 0;
      while done < total {
        let len = (total - done).min(COPY_BUFFER_BYTES as u64) as usize;
        source.file_mut().read_at(HEADER_BYTES + done, &mut buffer[..len])?;
        target.file_mut().write_at(HEADER_BYTES + done, &buffer[..len])?;
        done += len as u64;
      }
    }
    Ok(copy)
  }
}

impl<C, F: vfs::File> Drop for PagedFileStore<C, F> {
  fn drop(&mut self) {
    let window = self.window.get_mut();
    if let Err(err) = window.flush() {
      tracing::warn!(error = %err, dirty = window.dirty(), "failed to flush paged file store on drop");
    }
    if self.locked {
      if let Err(err) = window.file_mut().unlock() {
        tracing::warn!(error = %err, "failed to unlock paged file store");
      }
    }
  }
}
