//! # Fixed-point decimals
//!
//! [`Decimal`] is an exact base-10 number `mantissa * 10^-scale`. [`DecimalCodec`] stores it as a
//! 16-byte mantissa at a fixed number of fractional digits taken from
//! [`StoreConfig::decimal_places`]. Values that would lose digits are rejected.

use std::cmp;
use std::fmt;

use super::codec::{expect_len, Codec};
use crate::config::StoreConfig;
use crate::error::CodecError;

const MAX_SCALE: u32 = 38;

fn pow10(exp: u32) -> Option<i128> {
  10i128.checked_pow(exp)
}

/// An exact decimal number.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decimal {
  mantissa: i128,
  scale: u32,
}

impl Decimal {
  pub const ZERO: Decimal = Decimal { mantissa: 0, scale: 0 };

  /// `mantissa * 10^-scale`.
  pub fn new(mantissa: i128, scale: u32) -> Self {
    Decimal { mantissa, scale }
  }

  pub fn mantissa(&self) -> i128 {
    self.mantissa
  }

  pub fn scale(&self) -> u32 {
    self.scale
  }

  /// The same number with trailing fractional zeros removed.
  pub fn normalized(&self) -> Self {
    let mut result = *self;
    while result.scale > 0 && result.mantissa % 10 == 0 {
      result.mantissa /= 10;
      result.scale -= 1;
    }
    result
  }

  /// The same number expressed with exactly `scale` fractional digits, if that is lossless and fits.
  pub fn rescale(&self, scale: u32) -> Option<Self> {
    match scale.cmp(&self.scale) {
      cmp::Ordering::Equal => Some(*self),
      cmp::Ordering::Greater => {
        let mantissa = self.mantissa.checked_mul(pow10(scale - self.scale)?)?;
        Some(Decimal { mantissa, scale })
      }
      cmp::Ordering::Less => {
        let factor = pow10(self.scale - scale)?;
        (self.mantissa % factor == 0).then(|| Decimal { mantissa: self.mantissa / factor, scale })
      }
    }
  }

  /// Nearest `f64`. Scales beyond the `f64` exponent range give zero.
  pub fn to_f64(&self) -> f64 {
    let scale = i32::try_from(self.scale).unwrap_or(i32::MAX);
    self.mantissa as f64 / 10f64.powi(scale)
  }
}

impl PartialEq for Decimal {
  fn eq(&self, other: &Self) -> bool {
    let a = self.normalized();
    let b = other.normalized();
    a.mantissa == b.mantissa && a.scale == b.scale
  }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let digits = self.mantissa.unsigned_abs().to_string();
    let sign = if self.mantissa < 0 { "-" } else { "" };
    let scale = self.scale as usize;
    if scale == 0 {
      write!(f, "{}{}", sign, digits)
    } else if digits.len() > scale {
      let (int, frac) = digits.split_at(digits.len() - scale);
      write!(f, "{}{}.{}", sign, int, frac)
    } else {
      write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
    }
  }
}

/// Stores [`Decimal`]s with a fixed number of fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalCodec {
  places: u32,
}

impl DecimalCodec {
  pub fn new(places: u32) -> Result<Self, CodecError> {
    if places > MAX_SCALE {
      return Err(CodecError::OutOfRange {
        value: places.to_string(),
        reason: format!("at most {} decimal places fit in a 128-bit mantissa", MAX_SCALE),
      });
    }
    Ok(DecimalCodec { places })
  }

  /// Uses the precision configured in `config`.
  pub fn from_config(config: &StoreConfig) -> Result<Self, CodecError> {
    Self::new(config.decimal_places)
  }

  pub fn places(&self) -> u32 {
    self.places
  }
}

impl Codec for DecimalCodec {
  type Value = Decimal;

  fn width(&self) -> Option<usize> {
    Some(16)
  }

  fn encode(&self, value: &Decimal, output: &mut Vec<u8>) -> Result<(), CodecError> {
    let scaled = value.rescale(self.places).ok_or_else(|| CodecError::OutOfRange {
      value: value.to_string(),
      reason: format!("not representable with {} decimal places", self.places),
    })?;
    output.extend_from_slice(&scaled.mantissa.to_le_bytes());
    Ok(())
  }

  fn decode(&self, bytes: &[u8]) -> Result<Decimal, CodecError> {
    expect_len(bytes, 16)?;
    let mut array = [0u8; 16];
    array.copy_from_slice(bytes);
    Ok(Decimal::new(i128::from_le_bytes(array), self.places))
  }
}
