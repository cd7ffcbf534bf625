//! # Record encoding
//!
//! Codecs that turn logical values into byte records. Nothing in here knows about stores.

pub mod bits;
pub mod codec;
pub mod composite;
pub mod decimal;
pub mod prefix_varint;

pub use bits::{SignedBits, UnsignedBits};
pub use codec::{Codec, Primitive};
pub use composite::{Complex64, Pair, Sequence};
pub use decimal::{Decimal, DecimalCodec};
