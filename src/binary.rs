//! The fixed binary backend.
//!
//! A mechanical implementation of the contract: no delimiters, no mode
//! switching, every element written in declared order. Because nothing in
//! the byte stream is self-describing, the size element that text
//! backends suppress is written here, and decode runs in
//! [`NextElement::All`](crate::de::NextElement::All) order, reading the
//! size and then exactly that many items.
//!
//! ## Wire format
//!
//! - numerics: fixed-width big-endian (`to_be_bytes`)
//! - `bool`: one byte, `1`/`0`
//! - `char`: the Unicode scalar value as a big-endian `u32`
//! - strings: `u32` byte length, then UTF-8 bytes
//! - enums: the variant name as a string
//! - nullable slots: one mark byte (`1` present, `0` null) before the
//!   value
//!
//! A short read fails with
//! [`Error::UnexpectedEof`](crate::Error::UnexpectedEof); unread trailing
//! bytes fail with [`Error::TrailingData`](crate::Error::TrailingData).
//!
//! ## Examples
//!
//! ```rust
//! use multiform::serializers::I32Serializer;
//! use multiform::binary;
//!
//! let bytes = binary::to_bytes(&I32Serializer, &1).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 1]);
//! assert_eq!(binary::from_slice(&I32Serializer, &bytes).unwrap(), 1);
//! ```

use crate::de::Decoder;
use crate::error::{Error, Result};
use crate::ser::Encoder;
use crate::serializers::ValueSerializer;

/// Encodes a value to its binary representation.
pub fn to_bytes<S: ValueSerializer>(serializer: &S, value: &S::Value) -> Result<Vec<u8>> {
    let mut encoder = BinaryEncoder::new();
    serializer.encode(&mut encoder, value)?;
    Ok(encoder.into_inner())
}

/// Decodes a value from its binary representation, failing with
/// [`Error::TrailingData`](crate::Error::TrailingData) if bytes remain.
pub fn from_slice<S: ValueSerializer>(serializer: &S, input: &[u8]) -> Result<S::Value> {
    let mut decoder = BinaryDecoder::new(input);
    let value = serializer.decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

/// Appends each value's fixed-width encoding to a byte buffer. All
/// structural hooks keep their defaults: everything is positional.
pub struct BinaryEncoder {
    out: Vec<u8>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        BinaryEncoder {
            out: Vec::with_capacity(64),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for BinaryEncoder {
    fn encode_not_null_mark(&mut self) -> Result<()> {
        self.out.push(1);
        Ok(())
    }

    fn encode_null(&mut self) -> Result<()> {
        self.out.push(0);
        Ok(())
    }

    fn encode_bool(&mut self, v: bool) -> Result<()> {
        self.out.push(u8::from(v));
        Ok(())
    }

    fn encode_i8(&mut self, v: i8) -> Result<()> {
        self.out.push(v as u8);
        Ok(())
    }

    fn encode_i16(&mut self, v: i16) -> Result<()> {
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn encode_i32(&mut self, v: i32) -> Result<()> {
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn encode_i64(&mut self, v: i64) -> Result<()> {
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn encode_f32(&mut self, v: f32) -> Result<()> {
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn encode_f64(&mut self, v: f64) -> Result<()> {
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn encode_char(&mut self, v: char) -> Result<()> {
        self.out.extend_from_slice(&(v as u32).to_be_bytes());
        Ok(())
    }

    fn encode_str(&mut self, v: &str) -> Result<()> {
        let len = u32::try_from(v.len())
            .map_err(|_| Error::custom("string exceeds the 4 GiB wire limit"))?;
        self.out.extend_from_slice(&len.to_be_bytes());
        self.out.extend_from_slice(v.as_bytes());
        Ok(())
    }
}

/// Positional reader over an in-memory byte slice.
pub struct BinaryDecoder<'de> {
    input: &'de [u8],
    pos: usize,
}

impl<'de> BinaryDecoder<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        BinaryDecoder { input, pos: 0 }
    }

    /// Fails with [`Error::TrailingData`](crate::Error::TrailingData)
    /// unless every byte was consumed.
    pub fn finish(&self) -> Result<()> {
        let left = self.input.len() - self.pos;
        if left == 0 {
            Ok(())
        } else {
            Err(Error::trailing_data(format!("{left} unread bytes")))
        }
    }

    fn take(&mut self, n: usize) -> Result<&'de [u8]> {
        let end = self.pos.checked_add(n).filter(|end| *end <= self.input.len());
        match end {
            Some(end) => {
                let bytes = &self.input[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(Error::unexpected_eof(format!("{n} more bytes"))),
        }
    }

    fn take_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
}

impl Decoder for BinaryDecoder<'_> {
    fn peek_is_null(&mut self) -> Result<bool> {
        // The presence mark is the encoding of the nullable slot, so
        // consuming it here is the mirror of encode.
        Ok(self.take_byte()? == 0)
    }

    fn decode_bool(&mut self) -> Result<bool> {
        Ok(self.take_byte()? != 0)
    }

    fn decode_i8(&mut self) -> Result<i8> {
        Ok(self.take_byte()? as i8)
    }

    fn decode_i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn decode_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn decode_i64(&mut self) -> Result<i64> {
        let b = self.take(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn decode_f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn decode_f64(&mut self) -> Result<f64> {
        let b = self.take(8)?;
        Ok(f64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn decode_char(&mut self) -> Result<char> {
        let b = self.take(4)?;
        let scalar = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        char::from_u32(scalar).ok_or_else(|| Error::malformed("char", scalar.to_string()))
    }

    fn decode_str(&mut self) -> Result<String> {
        let len = self.decode_i32()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::malformed("a string length", len.to_string()))?;
        let bytes = self.take(len)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::malformed("UTF-8 string bytes", format!("{bytes:?}")))?;
        Ok(text.to_string())
    }
}
