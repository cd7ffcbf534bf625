//! # Composite codecs
//!
//! [`Pair`] joins two codecs into one record; [`Sequence`] stores a variable number of values.
//! When every part has a fixed width the parts are simply concatenated. Otherwise each part is
//! framed with a prefix-varint length so the record can be split again.

use super::codec::{expect_len, Codec, Primitive};
use super::prefix_varint;
use crate::error::CodecError;

/// Complex numbers as `(re, im)` pairs.
pub type Complex64 = Pair<Primitive<f64>, Primitive<f64>>;

/// Two values stored side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pair<A, B> {
  first: A,
  second: B,
}

impl<A, B> Pair<A, B> {
  pub fn new(first: A, second: B) -> Self {
    Pair { first, second }
  }
}

impl<A: Codec, B: Codec> Codec for Pair<A, B> {
  type Value = (A::Value, B::Value);

  fn width(&self) -> Option<usize> {
    Some(self.first.width()? + self.second.width()?)
  }

  fn encode(&self, value: &Self::Value, output: &mut Vec<u8>) -> Result<(), CodecError> {
    match self.first.width() {
      Some(_) => self.first.encode(&value.0, output)?,
      None => {
        let mut part = Vec::new();
        self.first.encode(&value.0, &mut part)?;
        prefix_varint::encode(part.len() as u64, output);
        output.extend_from_slice(&part);
      }
    }
    self.second.encode(&value.1, output)
  }

  fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
    if let Some(width) = self.width() {
      expect_len(bytes, width)?;
    }
    let (head, tail) = match self.first.width() {
      Some(width) if bytes.len() >= width => bytes.split_at(width),
      Some(width) => return Err(CodecError::Length { expected: width, actual: bytes.len() }),
      None => {
        let mut cursor = bytes;
        let len = prefix_varint::read(&mut cursor)?;
        let len = usize::try_from(len).map_err(|_| CodecError::Malformed("part length overflows".into()))?;
        if cursor.len() < len {
          return Err(CodecError::Malformed(format!("part needs {} bytes, found {}", len, cursor.len())));
        }
        cursor.split_at(len)
      }
    };
    Ok((self.first.decode(head)?, self.second.decode(tail)?))
  }

  fn default_record(&self) -> Vec<u8> {
    let first = self.first.default_record();
    let mut output = Vec::new();
    if self.first.width().is_none() {
      prefix_varint::encode(first.len() as u64, &mut output);
    }
    output.extend_from_slice(&first);
    output.extend_from_slice(&self.second.default_record());
    output
  }
}

/// A variable-length list of values, framed as `count` followed by the elements.
///
/// Records have no fixed width, so sequences can only be held by in-memory stores such as
/// [`crate::storage::sparse::SparseStore`] or a plain `Vec`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequence<C> {
  element: C,
}

impl<C> Sequence<C> {
  pub fn new(element: C) -> Self {
    Sequence { element }
  }
}

impl<C: Codec> Codec for Sequence<C> {
  type Value = Vec<C::Value>;

  fn width(&self) -> Option<usize> {
    None
  }

  fn encode(&self, value: &Self::Value, output: &mut Vec<u8>) -> Result<(), CodecError> {
    prefix_varint::encode(value.len() as u64, output);
    let fixed = self.element.width().is_some();
    let mut part = Vec::new();
    for element in value {
      if fixed {
        self.element.encode(element, output)?;
      } else {
        part.clear();
        self.element.encode(element, &mut part)?;
        prefix_varint::encode(part.len() as u64, output);
        output.extend_from_slice(&part);
      }
    }
    Ok(())
  }

  /// The empty record decodes to the empty sequence, so zeroed or missing records read as `[]`.
  fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
    if bytes.is_empty() {
      return Ok(Vec::new());
    }
    let mut cursor = bytes;
    let count = prefix_varint::read(&mut cursor)?;
    let mut values = Vec::with_capacity(count.min(cursor.len() as u64) as usize);
    for _ in 0..count {
      let len = match self.element.width() {
        Some(width) => width,
        None => usize::try_from(prefix_varint::read(&mut cursor)?)
          .map_err(|_| CodecError::Malformed("element length overflows".into()))?,
      };
      if cursor.len() < len {
        return Err(CodecError::Malformed(format!("element needs {} bytes, found {}", len, cursor.len())));
      }
      let (element, rest) = cursor.split_at(len);
      values.push(self.element.decode(element)?);
      cursor = rest;
    }
    if !cursor.is_empty() {
      return Err(CodecError::Malformed(format!("{} trailing bytes", cursor.len())));
    }
    Ok(values)
  }

  /// The empty sequence.
  fn default_record(&self) -> Vec<u8> {
    let mut output = Vec::new();
    prefix_varint::encode(0, &mut output);
    output
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::bits::UnsignedBits;

  #[test]
  fn test_complex() {
    let codec = Complex64::default();
    assert_eq!(codec.width(), Some(16));
    let mut bytes = Vec::new();
    codec.encode(&(1.5, -2.25), &mut bytes).unwrap();
    assert_eq!(&bytes[..8], &1.5f64.to_le_bytes());
    assert_eq!(codec.decode(&bytes).unwrap(), (1.5, -2.25));
    codec.decode(&bytes[..15]).unwrap_err();
  }

  #[test]
  fn test_mixed_pair() {
    let codec = Pair::new(UnsignedBits::new(12).unwrap(), Primitive::<i8>::new());
    assert_eq!(codec.width(), Some(3));
    let mut bytes = Vec::new();
    codec.encode(&(4095, -3), &mut bytes).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), (4095, -3));
    codec.encode(&(4096, 0), &mut Vec::new()).unwrap_err();
  }

  #[test]
  fn test_sequence() {
    let codec = Sequence::new(Primitive::<u16>::new());
    assert_eq!(codec.width(), None);
    let mut bytes = Vec::new();
    codec.encode(&vec![1, 2, 65535], &mut bytes).unwrap();
    assert_eq!(bytes.len(), 1 + 6);
    assert_eq!(codec.decode(&bytes).unwrap(), vec![1, 2, 65535]);
    assert_eq!(codec.decode(&[]).unwrap(), Vec::<u16>::new());
    codec.decode(&bytes[..6]).unwrap_err();
    bytes.push(0);
    codec.decode(&bytes).unwrap_err();
  }

  #[test]
  fn test_nested_variable_width() {
    let codec = Pair::new(Sequence::new(Primitive::<u8>::new()), Sequence::new(Sequence::new(Primitive::<u8>::new())));
    let value = (vec![1, 2, 3], vec![vec![], vec![9; 300]]);
    let mut bytes = Vec::new();
    codec.encode(&value, &mut bytes).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), value);
  }

  #[test]
  fn test_default_records_decode() {
    let codec = Pair::new(Sequence::new(Primitive::<u8>::new()), Primitive::<u16>::new());
    assert_eq!(codec.decode(&codec.default_record()).unwrap(), (vec![], 0));
    let codec = Pair::new(Primitive::<u16>::new(), Sequence::new(Primitive::<u8>::new()));
    assert_eq!(codec.decode(&codec.default_record()).unwrap(), (0, vec![]));
    let codec = Pair::new(Sequence::new(Primitive::<u8>::new()), Sequence::new(Primitive::<i64>::new()));
    assert_eq!(codec.decode(&codec.default_record()).unwrap(), (vec![], vec![]));

    // The default record is what the default value encodes to.
    let mut bytes = Vec::new();
    codec.encode(&(vec![], vec![]), &mut bytes).unwrap();
    assert_eq!(bytes, codec.default_record());
    assert_eq!(Complex64::default().default_record(), vec![0; 16]);
  }
}
