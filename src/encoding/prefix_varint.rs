//! # Prefix-varint framing
//!
//! Length and count prefixes inside variable-width records use the prefix-varint format:
//! <https://github.com/WebAssembly/design/issues/601#issuecomment-196022303>
//!
//! The number of trailing zero bits in the first byte gives the total length (1 to 9 bytes), so a
//! reader knows how far to advance after looking at a single byte.

use crate::error::CodecError;

fn unaligned_load_u64(p: &[u8]) -> u64 {
  let mut array = [0u8; 8];
  let len = p.len().min(8);
  array[..len].copy_from_slice(&p[..len]);
  u64::from_le_bytes(array)
}

fn length(initial: u8) -> usize {
  1 + (initial as u32 | 0x100).trailing_zeros() as usize
}

/// Number of bytes [`encode`] emits for `x`.
pub fn encoded_len(x: u64) -> usize {
  let bits = 64 - (x | 1).leading_zeros() as usize;
  if bits > 56 {
    9
  } else {
    1 + (bits - 1) / 7
  }
}

/// Decodes one integer from the front of `p`, returning it with the number of bytes consumed.
pub fn decode(p: &[u8]) -> Result<(u64, usize), CodecError> {
  let initial = *p.first().ok_or_else(|| CodecError::Malformed("empty varint".into()))?;
  let length = length(initial);
  if p.len() < length {
    return Err(CodecError::Malformed(format!("varint needs {} bytes, found {}", length, p.len())));
  }
  let value = if length < 9 {
    let unused = 64 - 8 * length as u32;
    unaligned_load_u64(&p[..length]) << unused >> (unused + length as u32)
  } else {
    unaligned_load_u64(&p[1..9])
  };
  Ok((value, length))
}

/// Decodes one integer and advances `cursor` past it.
pub fn read(cursor: &mut &[u8]) -> Result<u64, CodecError> {
  let (value, used) = decode(cursor)?;
  *cursor = &cursor[used..];
  Ok(value)
}

/// Appends the encoding of `x` to `output`.
pub fn encode(x: u64, output: &mut Vec<u8>) {
  let bits = 64 - (x | 1).leading_zeros();
  let mut bytes = 1 + (bits - 1) / 7;
  let mut x = x;
  if bits > 56 {
    output.push(0);
    bytes = 8;
  } else {
    x = (x << bytes) | (1 << (bytes - 1));
  }
  for _ in 0..bytes {
    output.push((x & 0xff) as u8);
    x >>= 8;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::Rng;

  const KNOWN: [(u64, &[u8]); 8] = [
    (0, &[0x01]),
    (127, &[0xFF]),
    (128, &[0x02, 0x02]),
    (255, &[0xFE, 0x03]),
    (16383, &[0xFE, 0xFF]),
    (16384, &[0x04, 0x00, 0x02]),
    (1 << 56, &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]),
    (u64::MAX, &[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
  ];

  #[test]
  fn test_length() {
    assert_eq!(length(0b00000001), 1);
    assert_eq!(length(0b01000000), 7);
    assert_eq!(length(0b10000000), 8);
    assert_eq!(length(0b00000000), 9);
  }

  #[test]
  fn test_known_encodings() {
    for (value, bytes) in KNOWN {
      let mut output = Vec::new();
      encode(value, &mut output);
      assert_eq!(output, bytes, "encoding {}", value);
      assert_eq!(encoded_len(value), bytes.len(), "length of {}", value);
      assert_eq!(decode(bytes).unwrap(), (value, bytes.len()), "decoding {:?}", bytes);
    }
  }

  #[test]
  fn test_decode_ignores_trailing_bytes() {
    assert_eq!(decode(&[0x02, 0x02, 0xAA, 0xBB]).unwrap(), (128, 2));
  }

  #[test]
  fn test_decode_truncated() {
    decode(&[]).unwrap_err();
    decode(&[0x04, 0x00]).unwrap_err();
    decode(&[0x00, 0xFF, 0xFF]).unwrap_err();
  }

  #[test]
  fn test_read_advances_cursor() {
    let mut bytes = Vec::new();
    let values: Vec<u64> = {
      let mut rng = rand::thread_rng();
      (0..200).map(|i| rng.gen::<u64>() >> (i % 64)).collect()
    };
    for &value in &values {
      encode(value, &mut bytes);
    }
    let mut cursor = bytes.as_slice();
    for &value in &values {
      assert_eq!(read(&mut cursor).unwrap(), value);
    }
    assert!(cursor.is_empty());
  }
}
