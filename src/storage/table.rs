//! # Tabular store
//!
//! A store kept in an SQLite table, one row per index whose record differs from the default:
//!
//! ```text
//! CREATE TABLE <name>      (idx INTEGER PRIMARY KEY, record BLOB NOT NULL)
//! CREATE TABLE <name>_meta (key TEXT PRIMARY KEY, value INTEGER NOT NULL)  -- 'size', 'width'
//! ```
//!
//! Missing rows read as the codec's default record. Writing that record deletes the row, so the table
//! stays as small as a [`super::sparse::SparseStore`] would. Indices are SQLite integers, which
//! limits the size to `i64::MAX`.

use rusqlite::{params, Connection, OptionalExtension};

use crate::encoding::Codec;
use crate::error::{check_index, Result, StoreError};
use crate::storage::{Store, StoreMut};

/// Records stored as rows of an SQLite table.
pub struct TableStore<C> {
  codec: C,
  size: u64,
  default: Box<[u8]>,
  conn: Connection,
  table: String,
  select: String,
  upsert: String,
  delete: String,
}

fn check_name(table: &str) -> Result<()> {
  let mut chars = table.chars();
  let valid = match chars.next() {
    Some(first) => {
      (first.is_ascii_alphabetic() || first == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    None => false,
  };
  if valid {
    Ok(())
  } else {
    Err(StoreError::InvalidArgument(format!("'{}' is not a valid table name", table)))
  }
}

/// The `width` recorded in the meta table; `-1` marks variable-width records.
fn width_tag<C: Codec>(codec: &C) -> i64 {
  codec.width().map_or(-1, |width| width as i64)
}

impl<C: Codec> TableStore<C> {
  /// Creates the table `table` in `conn` holding `size` zeroed records, replacing any previous
  /// table of that name.
  pub fn allocate(mut conn: Connection, table: &str, codec: C, size: u64) -> Result<Self> {
    check_name(table)?;
    if size > i64::MAX as u64 {
      return Err(StoreError::Capacity { requested: size, limit: i64::MAX as u64 });
    }
    // An early return drops `tx`, which rolls the setup back.
    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
      "
      DROP TABLE IF EXISTS \"{table}\";
      DROP TABLE IF EXISTS \"{table}_meta\";
      CREATE TABLE \"{table}\" (
        idx INTEGER PRIMARY KEY,
        record BLOB NOT NULL
      );
      CREATE TABLE \"{table}_meta\" (
        key TEXT PRIMARY KEY,
        value INTEGER NOT NULL
      );
      "
    ))?;
    tx.execute(
      &format!("INSERT INTO \"{table}_meta\" (key, value) VALUES ('size', ?1), ('width', ?2)"),
      params![size as i64, width_tag(&codec)],
    )?;
    tx.commit()?;
    tracing::debug!(table, size, "created table store");
    Ok(Self::with_connection(conn, table, codec, size))
  }

  /// Allocates in a private in-memory database.
  pub fn in_memory(codec: C, size: u64) -> Result<Self> {
    Self::allocate(Connection::open_in_memory()?, "records", codec, size)
  }

  /// Attaches to a table created by [`TableStore::allocate`].
  ///
  /// Fails with [`StoreError::Format`] if the stored width does not match the codec.
  pub fn open(conn: Connection, table: &str, codec: C) -> Result<Self> {
    check_name(table)?;
    let read = |key: &str| -> Result<Option<i64>> {
      let value = conn
        .query_row(&format!("SELECT value FROM \"{table}_meta\" WHERE key = ?1"), params![key], |row| row.get(0))
        .optional()?;
      Ok(value)
    };
    let size = read("size")?.ok_or_else(|| StoreError::Format(format!("table '{}' has no size", table)))?;
    let width = read("width")?.ok_or_else(|| StoreError::Format(format!("table '{}' has no width", table)))?;
    if width != width_tag(&codec) {
      return Err(StoreError::Format(format!(
        "table '{}' holds {}-byte records, codec expects {}",
        table,
        width,
        width_tag(&codec)
      )));
    }
    let size = u64::try_from(size).map_err(|_| StoreError::Format(format!("table '{}' has negative size", table)))?;
    tracing::debug!(table, size, "opened table store");
    Ok(Self::with_connection(conn, table, codec, size))
  }

  fn with_connection(conn: Connection, table: &str, codec: C, size: u64) -> Self {
    let default = codec.default_record().into_boxed_slice();
    TableStore {
      codec,
      size,
      default,
      conn,
      table: table.to_owned(),
      select: format!("SELECT record FROM \"{table}\" WHERE idx = ?1"),
      upsert: format!("INSERT OR REPLACE INTO \"{table}\" (idx, record) VALUES (?1, ?2)"),
      delete: format!("DELETE FROM \"{table}\" WHERE idx = ?1"),
    }
  }

  pub fn codec(&self) -> &C {
    &self.codec
  }

  pub fn table(&self) -> &str {
    &self.table
  }

  pub fn connection(&self) -> &Connection {
    &self.conn
  }

  /// Gives the connection back, e.g. to reopen the table later.
  pub fn into_connection(self) -> Connection {
    self.conn
  }

  /// Number of rows, i.e. indices holding a non-default record.
  pub fn active_count(&self) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", self.table);
    let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
  }
}

impl<C: Codec> Store for TableStore<C> {
  type Value = C::Value;

  fn size(&self) -> u64 {
    self.size
  }

  fn get(&self, index: u64) -> Result<C::Value> {
    check_index(index, self.size)?;
    let mut statement = self.conn.prepare_cached(&self.select)?;
    let record: Option<Vec<u8>> = statement.query_row(params![index as i64], |row| row.get(0)).optional()?;
    match record {
      Some(record) => Ok(self.codec.decode(&record)?),
      None => Ok(self.codec.decode(&self.default)?),
    }
  }
}

impl<C: Codec> StoreMut for TableStore<C> {
  fn set(&mut self, index: u64, value: &C::Value) -> Result<()> {
    check_index(index, self.size)?;
    let mut record = Vec::new();
    self.codec.encode(value, &mut record)?;
    if let Some(width) = self.codec.width() {
      crate::encoding::codec::expect_len(&record, width)?;
    }
    if *record == *self.default {
      self.conn.prepare_cached(&self.delete)?.execute(params![index as i64])?;
    } else {
      self.conn.prepare_cached(&self.upsert)?.execute(params![index as i64, record])?;
    }
    Ok(())
  }
}
