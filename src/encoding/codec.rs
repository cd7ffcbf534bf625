//! # Record codecs
//!
//! A [`Codec`] fixes how one logical value maps to a record of bytes. Stores hold records, never
//! values, so the same codec works whether the record ends up in a `Vec<u8>`, a disk page or a
//! database row.

use std::fmt;
use std::marker;
use std::sync;

use crate::error::CodecError;

/// Converts values of one type to and from byte records.
///
/// Implementations must be deterministic and round-trip exact: `decode(encode(v)) == v` for every
/// value the codec accepts. Values that cannot be represented are rejected with
/// [`CodecError::OutOfRange`], never truncated.
pub trait Codec {
  /// The logical value type.
  type Value;

  /// Record width in bytes, or `None` if records vary in length.
  ///
  /// Variable-width records can only be held by stores that keep whole records in memory.
  fn width(&self) -> Option<usize>;

  /// Appends the record for `value` to `output`.
  fn encode(&self, value: &Self::Value, output: &mut Vec<u8>) -> Result<(), CodecError>;

  /// Reads a value back from exactly one record.
  fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError>;

  /// The record unset entries read as in stores that only keep non-default records. Fixed-width
  /// codecs use all zeros; variable-width codecs must return a record `decode` accepts.
  fn default_record(&self) -> Vec<u8> {
    vec![0; self.width().unwrap_or(0)]
  }

  /// Encodes `value` into a slot that must be exactly one record wide.
  fn encode_into(&self, value: &Self::Value, slot: &mut [u8]) -> Result<(), CodecError> {
    let mut buffer = Vec::with_capacity(slot.len());
    self.encode(value, &mut buffer)?;
    expect_len(&buffer, slot.len())?;
    slot.copy_from_slice(&buffer);
    Ok(())
  }
}

/// Fails with [`CodecError::Length`] unless `bytes` is exactly `expected` long.
#[inline]
pub fn expect_len(bytes: &[u8], expected: usize) -> Result<(), CodecError> {
  if bytes.len() == expected {
    Ok(())
  } else {
    Err(CodecError::Length { expected, actual: bytes.len() })
  }
}

impl<C: Codec + ?Sized> Codec for &C {
  type Value = C::Value;

  fn width(&self) -> Option<usize> {
    (**self).width()
  }

  fn encode(&self, value: &Self::Value, output: &mut Vec<u8>) -> Result<(), CodecError> {
    (**self).encode(value, output)
  }

  fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
    (**self).decode(bytes)
  }

  fn default_record(&self) -> Vec<u8> {
    (**self).default_record()
  }

  fn encode_into(&self, value: &Self::Value, slot: &mut [u8]) -> Result<(), CodecError> {
    (**self).encode_into(value, slot)
  }
}

impl<C: Codec + ?Sized> Codec for sync::Arc<C> {
  type Value = C::Value;

  fn width(&self) -> Option<usize> {
    (**self).width()
  }

  fn encode(&self, value: &Self::Value, output: &mut Vec<u8>) -> Result<(), CodecError> {
    (**self).encode(value, output)
  }

  fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
    (**self).decode(bytes)
  }

  fn default_record(&self) -> Vec<u8> {
    (**self).default_record()
  }

  fn encode_into(&self, value: &Self::Value, slot: &mut [u8]) -> Result<(), CodecError> {
    (**self).encode_into(value, slot)
  }
}

/// # Little-endian primitive codec
///
/// `Primitive::<T>::new()` stores `T` as its `to_le_bytes` representation. Implemented for the
/// fixed-size integers, `f32`, `f64` and `bool` (one byte, `0` or `1`).
pub struct Primitive<T>(marker::PhantomData<fn() -> T>);

impl<T> Primitive<T> {
  pub const fn new() -> Self {
    Primitive(marker::PhantomData)
  }
}

impl<T> Clone for Primitive<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Primitive<T> {}

impl<T> Default for Primitive<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for Primitive<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Primitive<{}>", std::any::type_name::<T>())
  }
}

macro_rules! primitive_codec {
  ($($ty:ty),*) => {
    $(
      impl Codec for Primitive<$ty> {
        type Value = $ty;

        fn width(&self) -> Option<usize> {
          Some(std::mem::size_of::<$ty>())
        }

        fn encode(&self, value: &$ty, output: &mut Vec<u8>) -> Result<(), CodecError> {
          output.extend_from_slice(&value.to_le_bytes());
          Ok(())
        }

        fn decode(&self, bytes: &[u8]) -> Result<$ty, CodecError> {
          let array = <[u8; std::mem::size_of::<$ty>()]>::try_from(bytes)
            .map_err(|_| CodecError::Length { expected: std::mem::size_of::<$ty>(), actual: bytes.len() })?;
          Ok(<$ty>::from_le_bytes(array))
        }

        fn encode_into(&self, value: &$ty, slot: &mut [u8]) -> Result<(), CodecError> {
          expect_len(slot, std::mem::size_of::<$ty>())?;
          slot.copy_from_slice(&value.to_le_bytes());
          Ok(())
        }
      }
    )*
  };
}

primitive_codec!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl Codec for Primitive<bool> {
  type Value = bool;

  fn width(&self) -> Option<usize> {
    Some(1)
  }

  fn encode(&self, value: &bool, output: &mut Vec<u8>) -> Result<(), CodecError> {
    output.push(u8::from(*value));
    Ok(())
  }

  fn decode(&self, bytes: &[u8]) -> Result<bool, CodecError> {
    expect_len(bytes, 1)?;
    match bytes[0] {
      0 => Ok(false),
      1 => Ok(true),
      other => Err(CodecError::Malformed(format!("boolean byte {:#04x}", other))),
    }
  }

  fn encode_into(&self, value: &bool, slot: &mut [u8]) -> Result<(), CodecError> {
    expect_len(slot, 1)?;
    slot[0] = u8::from(*value);
    Ok(())
  }
}
