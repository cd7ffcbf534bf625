//! # File abstraction
//!
//! The paged file store talks to disk only through [`File`], so the same paging code runs over a
//! real file or an in-memory one. Extending a file always fills the new bytes with zeros; stores
//! rely on this to start out zero-initialized without writing every record.

use std::cell;
use std::collections;
use std::fs;
use std::io;
use std::path;
use std::rc;

/// Opens and deletes files.
pub trait FileSystem {
  /// The type of paths that this file system uses.
  type Path: ?Sized;

  /// The type of files that this file system uses.
  type File: File;

  /// Opens a file at the given `path`, creating it if it does not exist.
  fn open(&mut self, path: &Self::Path) -> io::Result<Self::File>;

  /// Deletes the file at the given `path`.
  fn delete(&mut self, path: &Self::Path) -> io::Result<()>;
}

/// Positional byte access to one file.
pub trait File {
  /// Returns the size of the file in bytes.
  fn size(&mut self) -> io::Result<u64>;

  /// Sets the size of the file in bytes. Bytes added at the end read as zero.
  fn truncate(&mut self, size: u64) -> io::Result<()>;

  /// Fills `buf` from the file starting at `offset`. Reading past the end is an error.
  fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

  /// Writes all of `buf` at `offset`, growing the file if needed.
  fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()>;

  /// Flushes written data to durable storage.
  fn sync(&mut self) -> io::Result<()>;

  /// Takes an exclusive lock, failing immediately if another handle holds one.
  fn try_lock(&mut self) -> io::Result<()>;

  /// Releases the lock taken by [`File::try_lock`].
  fn unlock(&mut self) -> io::Result<()>;
}

/// [`FileSystem`] backed by [`std::fs`].
#[derive(Debug, Default)]
pub struct StandardFileSystem;

impl FileSystem for StandardFileSystem {
  type Path = path::Path;
  type File = StandardFile;

  fn open(&mut self, path: &Self::Path) -> io::Result<Self::File> {
    let file = fs::OpenOptions::new().read(true).write(true).create(true).truncate(false).open(path)?;
    Ok(Self::File::from(file))
  }

  fn delete(&mut self, path: &Self::Path) -> io::Result<()> {
    fs::remove_file(path)
  }
}

/// [`File`] backed by [`std::fs::File`], locked through `fs2`.
#[derive(Debug)]
pub struct StandardFile(fs::File);

impl From<fs::File> for StandardFile {
  fn from(file: fs::File) -> Self {
    Self(file)
  }
}

impl File for StandardFile {
  fn size(&mut self) -> io::Result<u64> {
    let StandardFile(inner) = self;
    Ok(inner.metadata()?.len())
  }

  fn truncate(&mut self, size: u64) -> io::Result<()> {
    let StandardFile(inner) = self;
    inner.set_len(size)
  }

  fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    let StandardFile(inner) = self;
    io::Seek::seek(inner, io::SeekFrom::Start(offset))?;
    io::Read::read_exact(inner, buf)
  }

  fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
    let StandardFile(inner) = self;
    io::Seek::seek(inner, io::SeekFrom::Start(offset))?;
    io::Write::write_all(inner, buf)
  }

  fn sync(&mut self) -> io::Result<()> {
    let StandardFile(inner) = self;
    inner.sync_all()
  }

  fn try_lock(&mut self) -> io::Result<()> {
    let StandardFile(inner) = self;
    fs2::FileExt::try_lock_exclusive(inner)
  }

  fn unlock(&mut self) -> io::Result<()> {
    let StandardFile(inner) = self;
    fs2::FileExt::unlock(inner)
  }
}

#[derive(Debug, Default)]
struct MemoryFileData {
  data: Vec<u8>,
  locked: bool,
}

/// In-memory [`FileSystem`]. Files opened under the same name share their contents.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  files: collections::HashMap<String, rc::Rc<cell::RefCell<MemoryFileData>>>,
}

impl FileSystem for MemoryFileSystem {
  type Path = str;
  type File = MemoryFile;

  fn open(&mut self, path: &Self::Path) -> io::Result<Self::File> {
    let file = self.files.entry(path.to_string()).or_default();
    Ok(MemoryFile { file: file.clone(), holds_lock: false })
  }

  fn delete(&mut self, path: &Self::Path) -> io::Result<()> {
    self
      .files
      .remove(path)
      .map(|_| ())
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no file named {:?}", path)))
  }
}

/// Handle to a file of [`MemoryFileSystem`], or a standalone scratch file from [`MemoryFile::new`].
#[derive(Debug, Default)]
pub struct MemoryFile {
  file: rc::Rc<cell::RefCell<MemoryFileData>>,
  holds_lock: bool,
}

impl MemoryFile {
  pub fn new() -> Self {
    Self::default()
  }
}

fn to_usize(value: u64) -> io::Result<usize> {
  usize::try_from(value).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

impl File for MemoryFile {
  fn size(&mut self) -> io::Result<u64> {
    Ok(self.file.borrow().data.len() as u64)
  }

  fn truncate(&mut self, size: u64) -> io::Result<()> {
    let size = to_usize(size)?;
    self.file.borrow_mut().data.resize(size, 0);
    Ok(())
  }

  fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    let offset = to_usize(offset)?;
    let file = self.file.borrow();
    let end = offset.checked_add(buf.len()).filter(|&end| end <= file.data.len());
    let end = end.ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of file"))?;
    buf.copy_from_slice(&file.data[offset..end]);
    Ok(())
  }

  fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
    let offset = to_usize(offset)?;
    let end = offset + buf.len();
    let mut file = self.file.borrow_mut();
    if end > file.data.len() {
      file.data.resize(end, 0);
    }
    file.data[offset..end].copy_from_slice(buf);
    Ok(())
  }

  fn sync(&mut self) -> io::Result<()> {
    Ok(())
  }

  fn try_lock(&mut self) -> io::Result<()> {
    let mut file = self.file.borrow_mut();
    if file.locked {
      return Err(io::Error::new(io::ErrorKind::WouldBlock, "file is locked"));
    }
    file.locked = true;
    self.holds_lock = true;
    Ok(())
  }

  fn unlock(&mut self) -> io::Result<()> {
    if !self.holds_lock {
      return Err(io::Error::new(io::ErrorKind::InvalidInput, "handle does not hold the lock"));
    }
    self.file.borrow_mut().locked = false;
    self.holds_lock = false;
    Ok(())
  }
}
