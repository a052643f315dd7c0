//! The key-value text backend.
//!
//! A deliberately simple text rendering: every composite, collections
//! included, is written as `{name:value, name:value}` using the
//! descriptor's element names, so a list appears as
//! `{size:2, 0:…, 1:…}`. There is no mode machine; decode is directed
//! entirely by the written names through
//! [`Descriptor::element_index`](crate::schema::Descriptor::element_index).
//!
//! Known limitations, kept from the format's simplicity rather than
//! fixed here:
//!
//! - strings are quoted but **not** escaped, so a string containing `"`
//!   does not round-trip;
//! - null detection peeks one character, so an unquoted token starting
//!   with a lowercase `n` in a nullable slot would be taken for `null`.
//!   Only `null` itself and enum variant names can appear unquoted, so
//!   this matters only for lowercase variant names.
//!
//! ## Examples
//!
//! ```rust
//! use multiform::serializers::{I32Serializer, ListSerializer};
//! use multiform::keyvalue;
//!
//! let text = keyvalue::to_string(&ListSerializer(I32Serializer), &vec![4, 5]).unwrap();
//! assert_eq!(text, "{size:2, 0:4, 1:5}");
//! ```

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::de::{Decoder, NextElement};
use crate::error::{Error, Result};
use crate::schema::Descriptor;
use crate::ser::Encoder;
use crate::serializers::ValueSerializer;

/// Encodes a value as key-value text.
pub fn to_string<S: ValueSerializer>(serializer: &S, value: &S::Value) -> Result<String> {
    let mut encoder = KeyValueEncoder::new();
    serializer.encode(&mut encoder, value)?;
    Ok(encoder.into_inner())
}

/// Decodes a value from key-value text, failing with
/// [`Error::TrailingData`](crate::Error::TrailingData) if non-whitespace
/// input remains.
pub fn from_str<S: ValueSerializer>(serializer: &S, input: &str) -> Result<S::Value> {
    let mut decoder = KeyValueDecoder::new(input);
    let value = serializer.decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

/// Writes `{name:value, …}` groups for every composite.
pub struct KeyValueEncoder {
    out: String,
}

impl KeyValueEncoder {
    pub fn new() -> Self {
        KeyValueEncoder {
            out: String::with_capacity(128),
        }
    }

    pub fn into_inner(self) -> String {
        self.out
    }
}

impl Default for KeyValueEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for KeyValueEncoder {
    fn begin_composite(&mut self, _desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        self.out.push('{');
        Ok(())
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        self.out.push('}');
        Ok(())
    }

    fn begin_element(&mut self, desc: &Descriptor, index: usize) -> Result<bool> {
        if index > 0 {
            self.out.push_str(", ");
        }
        let name = desc.element_name(index).ok_or_else(|| {
            Error::custom(format!(
                "element index {index} out of range for {}",
                desc.name()
            ))
        })?;
        self.out.push_str(&name);
        self.out.push(':');
        Ok(true)
    }

    fn encode_null(&mut self) -> Result<()> {
        self.out.push_str("null");
        Ok(())
    }

    fn encode_bool(&mut self, v: bool) -> Result<()> {
        self.out.push_str(if v { "true" } else { "false" });
        Ok(())
    }

    fn encode_i8(&mut self, v: i8) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_i16(&mut self, v: i16) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_i32(&mut self, v: i32) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_i64(&mut self, v: i64) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_f32(&mut self, v: f32) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_f64(&mut self, v: f64) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn encode_char(&mut self, v: char) -> Result<()> {
        self.out.push('"');
        self.out.push(v);
        self.out.push('"');
        Ok(())
    }

    fn encode_str(&mut self, v: &str) -> Result<()> {
        // Quoted but not escaped; see the module documentation.
        self.out.push('"');
        self.out.push_str(v);
        self.out.push('"');
        Ok(())
    }

    fn encode_enum(&mut self, desc: &Descriptor, variant: usize) -> Result<()> {
        let name = desc.element_name(variant).ok_or_else(|| {
            Error::custom(format!(
                "variant index {variant} out of range for {}",
                desc.name()
            ))
        })?;
        self.out.push_str(&name);
        Ok(())
    }
}

/// Name-directed reader over key-value text.
pub struct KeyValueDecoder<'de> {
    chars: Peekable<Chars<'de>>,
}

impl<'de> KeyValueDecoder<'de> {
    pub fn new(input: &'de str) -> Self {
        KeyValueDecoder {
            chars: input.chars().peekable(),
        }
    }

    /// Fails with [`Error::TrailingData`](crate::Error::TrailingData)
    /// unless only whitespace remains.
    pub fn finish(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(()),
            Some(c) => Err(Error::trailing_data(format!("`{c}`"))),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Skips whitespace and at most one separating comma.
    fn skip_separator(&mut self) {
        self.skip_whitespace();
        if self.chars.peek() == Some(&',') {
            self.chars.next();
            self.skip_whitespace();
        }
    }

    fn take_until(&mut self, stops: &[char]) -> String {
        let mut text = String::new();
        while let Some(c) = self.chars.peek() {
            if stops.contains(c) {
                break;
            }
            text.push(*c);
            self.chars.next();
        }
        text
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.chars.next() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(Error::unexpected_token(format!("`{want}`"), format!("`{c}`"))),
            None => Err(Error::unexpected_eof(format!("`{want}`"))),
        }
    }

    /// Reads one unquoted value token.
    fn token(&mut self) -> Result<String> {
        self.skip_whitespace();
        let text = self.take_until(&[' ', ',', '}']);
        if text.is_empty() {
            match self.chars.peek() {
                None => Err(Error::unexpected_eof("a value")),
                Some(c) => Err(Error::unexpected_token("a value", format!("`{c}`"))),
            }
        } else {
            Ok(text)
        }
    }

    fn parse_token<T: FromStr>(&mut self, expected: &str) -> Result<T> {
        let text = self.token()?;
        text.parse().map_err(|_| Error::malformed(expected, text))
    }
}

impl Decoder for KeyValueDecoder<'_> {
    fn begin_composite(&mut self, _desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        self.skip_whitespace();
        self.expect('{')
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        self.skip_whitespace();
        self.expect('}')
    }

    fn next_element(&mut self, desc: &Descriptor) -> Result<NextElement> {
        self.skip_separator();
        let name = self.take_until(&[':', '}']);
        let name = name.trim();
        if name.is_empty() {
            return Ok(NextElement::Done);
        }
        self.expect(':')?;
        match desc.element_index(name) {
            Some(index) => Ok(NextElement::Index(index)),
            None => Err(Error::unknown_field(desc.name(), name)),
        }
    }

    fn peek_is_null(&mut self) -> Result<bool> {
        self.skip_whitespace();
        Ok(self.chars.peek() == Some(&'n'))
    }

    fn decode_null(&mut self) -> Result<()> {
        let text = self.token()?;
        if text == "null" {
            Ok(())
        } else {
            Err(Error::unexpected_token("`null`", text))
        }
    }

    fn decode_bool(&mut self) -> Result<bool> {
        self.parse_token("bool")
    }

    fn decode_i8(&mut self) -> Result<i8> {
        self.parse_token("i8")
    }

    fn decode_i16(&mut self) -> Result<i16> {
        self.parse_token("i16")
    }

    fn decode_i32(&mut self) -> Result<i32> {
        self.parse_token("i32")
    }

    fn decode_i64(&mut self) -> Result<i64> {
        self.parse_token("i64")
    }

    fn decode_f32(&mut self) -> Result<f32> {
        self.parse_token("f32")
    }

    fn decode_f64(&mut self) -> Result<f64> {
        self.parse_token("f64")
    }

    fn decode_char(&mut self) -> Result<char> {
        let text = self.decode_str()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::malformed("char", text)),
        }
    }

    fn decode_str(&mut self) -> Result<String> {
        self.skip_whitespace();
        self.expect('"')?;
        let text = self.take_until(&['"']);
        self.expect('"')?;
        Ok(text)
    }

    fn decode_enum(&mut self, desc: &Descriptor) -> Result<usize> {
        let name = self.token()?;
        desc.element_index(&name)
            .ok_or_else(|| Error::malformed(desc.name(), name))
    }
}
