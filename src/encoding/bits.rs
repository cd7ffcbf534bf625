//! # Narrow integer codecs
//!
//! Integers of 1 to 64 bits stored in the fewest whole bytes that hold them. Encoding rejects
//! values outside the declared range and decoding rejects records with stray high bits, so every
//! accepted value survives a round trip. For dense sub-byte storage see
//! [`crate::storage::packed::PackedStore`].

use super::codec::{expect_len, Codec};
use crate::error::CodecError;

fn check_bits(bits: u32) -> Result<(), CodecError> {
  if (1..=64).contains(&bits) {
    Ok(())
  } else {
    Err(CodecError::OutOfRange { value: bits.to_string(), reason: "bit width must be within 1..=64".into() })
  }
}

fn bytes_for(bits: u32) -> usize {
  bits.div_ceil(8) as usize
}

fn load(bytes: &[u8]) -> u64 {
  let mut array = [0u8; 8];
  array[..bytes.len()].copy_from_slice(bytes);
  u64::from_le_bytes(array)
}

/// Unsigned integers in `[0, 2^bits)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsignedBits {
  bits: u32,
}

impl UnsignedBits {
  pub fn new(bits: u32) -> Result<Self, CodecError> {
    check_bits(bits)?;
    Ok(UnsignedBits { bits })
  }

  pub fn bits(&self) -> u32 {
    self.bits
  }

  /// Largest representable value.
  pub fn max(&self) -> u64 {
    u64::MAX >> (64 - self.bits)
  }
}

impl Codec for UnsignedBits {
  type Value = u64;

  fn width(&self) -> Option<usize> {
    Some(bytes_for(self.bits))
  }

  fn encode(&self, value: &u64, output: &mut Vec<u8>) -> Result<(), CodecError> {
    if *value > self.max() {
      return Err(CodecError::OutOfRange {
        value: value.to_string(),
        reason: format!("exceeds {}-bit unsigned range", self.bits),
      });
    }
    output.extend_from_slice(&value.to_le_bytes()[..bytes_for(self.bits)]);
    Ok(())
  }

  fn decode(&self, bytes: &[u8]) -> Result<u64, CodecError> {
    expect_len(bytes, bytes_for(self.bits))?;
    let value = load(bytes);
    if value > self.max() {
      return Err(CodecError::Malformed(format!("bits set above bit {}", self.bits)));
    }
    Ok(value)
  }
}

/// Two's-complement integers in `[-2^(bits-1), 2^(bits-1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedBits {
  bits: u32,
}

impl SignedBits {
  pub fn new(bits: u32) -> Result<Self, CodecError> {
    check_bits(bits)?;
    Ok(SignedBits { bits })
  }

  pub fn bits(&self) -> u32 {
    self.bits
  }

  pub fn min(&self) -> i64 {
    i64::MIN >> (64 - self.bits)
  }

  pub fn max(&self) -> i64 {
    i64::MAX >> (64 - self.bits)
  }
}

impl Codec for SignedBits {
  type Value = i64;

  fn width(&self) -> Option<usize> {
    Some(bytes_for(self.bits))
  }

  fn encode(&self, value: &i64, output: &mut Vec<u8>) -> Result<(), CodecError> {
    if *value < self.min() || *value > self.max() {
      return Err(CodecError::OutOfRange {
        value: value.to_string(),
        reason: format!("outside {}-bit signed range", self.bits),
      });
    }
    let width = bytes_for(self.bits);
    let raw = (*value as u64) & (u64::MAX >> (64 - self.bits));
    output.extend_from_slice(&raw.to_le_bytes()[..width]);
    Ok(())
  }

  fn decode(&self, bytes: &[u8]) -> Result<i64, CodecError> {
    expect_len(bytes, bytes_for(self.bits))?;
    let raw = load(bytes);
    if raw > u64::MAX >> (64 - self.bits) {
      return Err(CodecError::Malformed(format!("bits set above bit {}", self.bits)));
    }
    let unused = 64 - self.bits;
    Ok(((raw << unused) as i64) >> unused)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_widths() {
    assert_eq!(UnsignedBits::new(1).unwrap().width(), Some(1));
    assert_eq!(UnsignedBits::new(9).unwrap().width(), Some(2));
    assert_eq!(SignedBits::new(64).unwrap().width(), Some(8));
    UnsignedBits::new(0).unwrap_err();
    SignedBits::new(65).unwrap_err();
  }

  #[test]
  fn test_unsigned_every_value_up_to_16_bits() {
    for bits in 1..=16 {
      let codec = UnsignedBits::new(bits).unwrap();
      for value in 0..=codec.max() {
        let mut bytes = Vec::new();
        codec.encode(&value, &mut bytes).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value, "{} bits", bits);
      }
      let mut bytes = Vec::new();
      codec.encode(&(codec.max() + 1), &mut bytes).unwrap_err();
    }
  }

  #[test]
  fn test_signed_every_value_up_to_16_bits() {
    for bits in 1..=16 {
      let codec = SignedBits::new(bits).unwrap();
      for value in codec.min()..=codec.max() {
        let mut bytes = Vec::new();
        codec.encode(&value, &mut bytes).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value, "{} bits", bits);
      }
      codec.encode(&(codec.min() - 1), &mut Vec::new()).unwrap_err();
      codec.encode(&(codec.max() + 1), &mut Vec::new()).unwrap_err();
    }
  }

  #[test]
  fn test_one_bit_signed() {
    let codec = SignedBits::new(1).unwrap();
    assert_eq!((codec.min(), codec.max()), (-1, 0));
    assert_eq!(codec.decode(&[1]).unwrap(), -1);
  }

  #[test]
  fn test_stray_bits_rejected() {
    let codec = UnsignedBits::new(12).unwrap();
    assert!(matches!(codec.decode(&[0xFF, 0x1F]), Err(CodecError::Malformed(_))));
    assert!(matches!(codec.decode(&[0xFF]), Err(CodecError::Length { expected: 2, actual: 1 })));
  }

  #[test]
  fn test_full_width() {
    let codec = SignedBits::new(64).unwrap();
    for value in [i64::MIN, -1, 0, i64::MAX] {
      let mut bytes = Vec::new();
      codec.encode(&value, &mut bytes).unwrap();
      assert_eq!(codec.decode(&bytes).unwrap(), value);
    }
  }
}
