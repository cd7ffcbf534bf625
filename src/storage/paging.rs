//! # Page window
//!
//! A fixed set of page buffers ("slots") over a [`vfs::File`], with a page table mapping resident
//! page numbers to slots. A miss evicts the least recently used slot, writing it back first if
//! it is dirty, and then reads the wanted page into it.
//!
//! Failure handling keeps the file and the window consistent:
//!
//! - If writing back a dirty victim fails, the victim stays resident and dirty, and nothing else
//!   changes. The error is returned; retrying is the caller's decision.
//! - If reading the wanted page fails after a clean eviction, the slot is left empty. The victim's
//!   contents are already on disk, so nothing is lost.
//!
//! Page `n` covers bytes `[base + n * page_bytes, base + (n + 1) * page_bytes)` of the file, cut
//! short at `base + data_bytes` for the last page.

use std::collections;
use std::io;

use super::vfs;

/// Counters describing how the window has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
  pub hits: u64,
  pub misses: u64,
  pub evictions: u64,
  pub write_backs: u64,
}

#[derive(Debug)]
struct Slot {
  page: Option<u64>,
  dirty: bool,
  last_used: u64,
  data: Box<[u8]>,
}

/// Bounded LRU cache of file pages.
#[derive(Debug)]
pub struct PageWindow<F> {
  file: F,
  base: u64,
  data_bytes: u64,
  page_bytes: usize,
  slots: Vec<Slot>,
  table: collections::HashMap<u64, usize>,
  clock: u64,
  stats: WindowStats,
}

impl<F: vfs::File> PageWindow<F> {
  /// Creates an empty window of `capacity` pages of `page_bytes` bytes over the `data_bytes`
  /// bytes starting at `base`. Both counts are raised to at least one.
  pub fn new(file: F, base: u64, data_bytes: u64, page_bytes: usize, capacity: usize) -> Self {
    let page_bytes = page_bytes.max(1);
    let capacity = capacity.max(1);
    let slots = (0..capacity)
      .map(|_| Slot { page: None, dirty: false, last_used: 0, data: vec![0; page_bytes].into_boxed_slice() })
      .collect();
    PageWindow {
      file,
      base,
      data_bytes,
      page_bytes,
      slots,
      table: collections::HashMap::with_capacity(capacity),
      clock: 0,
      stats: WindowStats::default(),
    }
  }

  pub fn page_bytes(&self) -> usize {
    self.page_bytes
  }

  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  pub fn stats(&self) -> WindowStats {
    self.stats
  }

  /// Number of pages currently resident.
  pub fn resident(&self) -> usize {
    self.table.len()
  }

  /// Number of resident pages with unwritten changes.
  pub fn dirty(&self) -> usize {
    self.slots.iter().filter(|slot| slot.page.is_some() && slot.dirty).count()
  }

  pub fn file_mut(&mut self) -> &mut F {
    &mut self.file
  }

  /// Runs `f` over the resident bytes of `page`.
  pub fn with_page<R>(&mut self, page: u64, f: impl FnOnce(&[u8]) -> R) -> io::Result<R> {
    let slot = self.fault(page)?;
    let len = self.page_len(page);
    Ok(f(&self.slots[slot].data[..len]))
  }

  /// Runs `f` over the resident bytes of `page` and marks the page dirty.
  pub fn with_page_mut<R>(&mut self, page: u64, f: impl FnOnce(&mut [u8]) -> R) -> io::Result<R> {
    let slot = self.fault(page)?;
    let len = self.page_len(page);
    let slot = &mut self.slots[slot];
    slot.dirty = true;
    Ok(f(&mut slot.data[..len]))
  }

  /// Writes every dirty page back and syncs the file. Stops at the first failure; pages not yet
  /// written stay dirty.
  pub fn flush(&mut self) -> io::Result<()> {
    let mut written = 0;
    for slot in 0..self.slots.len() {
      if self.slots[slot].dirty {
        self.write_back(slot)?;
        written += 1;
      }
    }
    self.file.sync()?;
    tracing::debug!(written, "flushed page window");
    Ok(())
  }

  fn page_len(&self, page: u64) -> usize {
    let start = page * self.page_bytes as u64;
    (self.data_bytes - start).min(self.page_bytes as u64) as usize
  }

  fn page_offset(&self, page: u64) -> u64 {
    self.base + page * self.page_bytes as u64
  }

  fn tick(&mut self) -> u64 {
    self.clock += 1;
    self.clock
  }

  fn write_back(&mut self, slot: usize) -> io::Result<()> {
    let Some(page) = self.slots[slot].page else {
      self.slots[slot].dirty = false;
      return Ok(());
    };
    let offset = self.page_offset(page);
    let len = self.page_len(page);
    self.file.write_at(offset, &self.slots[slot].data[..len])?;
    self.slots[slot].dirty = false;
    self.stats.write_backs += 1;
    Ok(())
  }

  /// Makes `page` resident and returns its slot.
  fn fault(&mut self, page: u64) -> io::Result<usize> {
    if page * (self.page_bytes as u64) >= self.data_bytes {
      return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("page {} is past the end of the data", page)));
    }
    let now = self.tick();
    if let Some(&slot) = self.table.get(&page) {
      self.stats.hits += 1;
      self.slots[slot].last_used = now;
      return Ok(slot);
    }
    self.stats.misses += 1;

    let victim = match self.slots.iter().position(|slot| slot.page.is_none()) {
      Some(free) => free,
      None => {
        let victim = (0..self.slots.len()).min_by_key(|&slot| self.slots[slot].last_used).unwrap_or(0);
        if self.slots[victim].dirty {
          self.write_back(victim)?;
        }
        if let Some(old) = self.slots[victim].page.take() {
          self.table.remove(&old);
          self.stats.evictions += 1;
          tracing::trace!(page = old, slot = victim, "evicted page");
        }
        victim
      }
    };

    let offset = self.page_offset(page);
    let len = self.page_len(page);
    self.file.read_at(offset, &mut self.slots[victim].data[..len])?;
    let slot = &mut self.slots[victim];
    slot.page = Some(page);
    slot.dirty = false;
    slot.last_used = now;
    self.table.insert(page, victim);
    tracing::trace!(page, slot = victim, "loaded page");
    Ok(victim)
  }
}
