//! Free-form, string-keyed metadata attached to N-dimensional data.

use std::collections;

use serde::{Deserialize, Serialize};

/// One metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
  Text(String),
  Integer(i64),
  Float(f64),
  Bytes(Vec<u8>),
}

impl From<&str> for MetaValue {
  fn from(value: &str) -> Self {
    MetaValue::Text(value.to_owned())
  }
}

impl From<String> for MetaValue {
  fn from(value: String) -> Self {
    MetaValue::Text(value)
  }
}

impl From<i64> for MetaValue {
  fn from(value: i64) -> Self {
    MetaValue::Integer(value)
  }
}

impl From<f64> for MetaValue {
  fn from(value: f64) -> Self {
    MetaValue::Float(value)
  }
}

impl From<Vec<u8>> for MetaValue {
  fn from(value: Vec<u8>) -> Self {
    MetaValue::Bytes(value)
  }
}

/// Key-ordered metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
  entries: collections::BTreeMap<String, MetaValue>,
}

impl Metadata {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets `key`, returning the previous value.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
    self.entries.insert(key.into(), value.into())
  }

  pub fn get(&self, key: &str) -> Option<&MetaValue> {
    self.entries.get(key)
  }

  pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
    self.entries.remove(key)
  }

  pub fn text(&self, key: &str) -> Option<&str> {
    match self.entries.get(key)? {
      MetaValue::Text(text) => Some(text),
      _ => None,
    }
  }

  pub fn integer(&self, key: &str) -> Option<i64> {
    match self.entries.get(key)? {
      MetaValue::Integer(value) => Some(*value),
      _ => None,
    }
  }

  /// Floats, and integers converted to floats.
  pub fn float(&self, key: &str) -> Option<f64> {
    match self.entries.get(key)? {
      MetaValue::Float(value) => Some(*value),
      MetaValue::Integer(value) => Some(*value as f64),
      _ => None,
    }
  }

  pub fn bytes(&self, key: &str) -> Option<&[u8]> {
    match self.entries.get(key)? {
      MetaValue::Bytes(bytes) => Some(bytes),
      _ => None,
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
    self.entries.iter().map(|(key, value)| (key.as_str(), value))
  }
}
