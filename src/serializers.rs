//! Per-type serialization logic and reusable combinators.
//!
//! A [`ValueSerializer`] pairs a value type with the code that walks it
//! through the encode/decode contract. Serializers are explicit,
//! statically-known objects: the caller passes one alongside the value,
//! and nothing is discovered at runtime.
//!
//! This module supplies the library pieces: zero-sized serializers for
//! every primitive kind, and combinators for nullable slots
//! ([`OptionSerializer`]), sequences ([`ListSerializer`],
//! [`SetSerializer`]), and key/value collections ([`MapSerializer`]).
//! Application types write their own `ValueSerializer` impl against a
//! static [`Descriptor`], emitting each element in declared order and
//! reconstructing from the decode loop.
//!
//! ## Examples
//!
//! ```rust
//! use multiform::serializers::{I32Serializer, ListSerializer, ValueSerializer};
//! use multiform::json;
//!
//! let numbers = vec![1, 2, 3];
//! let text = json::to_string(&ListSerializer(I32Serializer), &numbers).unwrap();
//! assert_eq!(text, "[1,2,3]");
//! ```

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::de::{Decoder, NextElement};
use crate::error::{Error, Result};
use crate::schema::{self, Descriptor};
use crate::ser::Encoder;

/// The per-type contract: how one value type encodes and decodes.
pub trait ValueSerializer {
    type Value;

    /// The static schema this serializer walks.
    fn descriptor(&self) -> &'static Descriptor;

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Self::Value) -> Result<()>;

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Self::Value>;
}

macro_rules! primitive_serializer {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $desc:ident, $enc:ident, $dec:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ValueSerializer for $name {
            type Value = $ty;

            fn descriptor(&self) -> &'static Descriptor {
                &schema::$desc
            }

            fn encode<E: Encoder>(&self, encoder: &mut E, value: &$ty) -> Result<()> {
                encoder.$enc(*value)
            }

            fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<$ty> {
                decoder.$dec()
            }
        }
    };
}

primitive_serializer!(BoolSerializer, bool, BOOL, encode_bool, decode_bool);
primitive_serializer!(I8Serializer, i8, INT8, encode_i8, decode_i8);
primitive_serializer!(I16Serializer, i16, INT16, encode_i16, decode_i16);
primitive_serializer!(I32Serializer, i32, INT32, encode_i32, decode_i32);
primitive_serializer!(I64Serializer, i64, INT64, encode_i64, decode_i64);
primitive_serializer!(F32Serializer, f32, FLOAT32, encode_f32, decode_f32);
primitive_serializer!(F64Serializer, f64, FLOAT64, encode_f64, decode_f64);
primitive_serializer!(CharSerializer, char, CHAR, encode_char, decode_char);

/// Serializer for owned strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl ValueSerializer for StringSerializer {
    type Value = String;

    fn descriptor(&self) -> &'static Descriptor {
        &schema::STRING
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &String) -> Result<()> {
        encoder.encode_str(value)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<String> {
        decoder.decode_str()
    }
}

/// Makes any serializer's value nullable.
///
/// Encode writes the not-null mark before a present value, or the null
/// value for an absent one; decode probes with
/// [`Decoder::peek_is_null`] before descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionSerializer<S>(pub S);

impl<S: ValueSerializer> ValueSerializer for OptionSerializer<S> {
    type Value = Option<S::Value>;

    fn descriptor(&self) -> &'static Descriptor {
        self.0.descriptor()
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Self::Value) -> Result<()> {
        match value {
            Some(inner) => {
                encoder.encode_not_null_mark()?;
                self.0.encode(encoder, inner)
            }
            None => encoder.encode_null(),
        }
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Self::Value> {
        if decoder.peek_is_null()? {
            decoder.decode_null()?;
            Ok(None)
        } else {
            self.0.decode(decoder).map(Some)
        }
    }
}

fn decode_size<D: Decoder>(decoder: &mut D) -> Result<usize> {
    let size = decoder.decode_i32()?;
    usize::try_from(size).map_err(|_| Error::custom(format!("negative collection size {size}")))
}

/// Serializer for `Vec<T>`, element 0 being the collection size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSerializer<S>(pub S);

impl<S: ValueSerializer> ValueSerializer for ListSerializer<S> {
    type Value = Vec<S::Value>;

    fn descriptor(&self) -> &'static Descriptor {
        &schema::LIST
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Self::Value) -> Result<()> {
        let desc = &schema::LIST;
        let args = [self.0.descriptor()];
        encoder.begin_composite(desc, &args)?;
        if encoder.begin_element(desc, 0)? {
            encoder.encode_i32(value.len() as i32)?;
        }
        for (i, item) in value.iter().enumerate() {
            if encoder.begin_element(desc, i + 1)? {
                self.0.encode(encoder, item)?;
            }
        }
        encoder.end_composite(desc)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Self::Value> {
        let desc = &schema::LIST;
        let args = [self.0.descriptor()];
        decoder.begin_composite(desc, &args)?;
        let mut items = Vec::new();
        loop {
            match decoder.next_element(desc)? {
                NextElement::All => {
                    let size = decode_size(decoder)?;
                    items.reserve(size);
                    for _ in 0..size {
                        items.push(self.0.decode(decoder)?);
                    }
                    break;
                }
                NextElement::Index(0) => {
                    decode_size(decoder)?;
                }
                NextElement::Index(_) => items.push(self.0.decode(decoder)?),
                NextElement::Done => break,
            }
        }
        decoder.end_composite(desc)?;
        Ok(items)
    }
}

/// Serializer for `IndexSet<T>`; the wire shape is identical to a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetSerializer<S>(pub S);

impl<S: ValueSerializer> ValueSerializer for SetSerializer<S>
where
    S::Value: Hash + Eq,
{
    type Value = IndexSet<S::Value>;

    fn descriptor(&self) -> &'static Descriptor {
        &schema::SET
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Self::Value) -> Result<()> {
        let desc = &schema::SET;
        let args = [self.0.descriptor()];
        encoder.begin_composite(desc, &args)?;
        if encoder.begin_element(desc, 0)? {
            encoder.encode_i32(value.len() as i32)?;
        }
        for (i, item) in value.iter().enumerate() {
            if encoder.begin_element(desc, i + 1)? {
                self.0.encode(encoder, item)?;
            }
        }
        encoder.end_composite(desc)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Self::Value> {
        let desc = &schema::SET;
        let args = [self.0.descriptor()];
        decoder.begin_composite(desc, &args)?;
        let mut items = IndexSet::new();
        loop {
            match decoder.next_element(desc)? {
                NextElement::All => {
                    let size = decode_size(decoder)?;
                    for _ in 0..size {
                        items.insert(self.0.decode(decoder)?);
                    }
                    break;
                }
                NextElement::Index(0) => {
                    decode_size(decoder)?;
                }
                NextElement::Index(_) => {
                    items.insert(self.0.decode(decoder)?);
                }
                NextElement::Done => break,
            }
        }
        decoder.end_composite(desc)?;
        Ok(items)
    }
}

/// Serializer for `IndexMap<K, V>`.
///
/// Entries are themselves composites with the [`schema::MAP_ENTRY`]
/// descriptor, so a backend may render a map either keyed (when the key
/// type can be stringified losslessly) or as a sequence of two-element
/// entries. Insertion order is preserved, which keeps re-encoding
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapSerializer<K, V>(pub K, pub V);

impl<K: ValueSerializer, V: ValueSerializer> MapSerializer<K, V>
where
    K::Value: Hash + Eq,
{
    fn decode_entry<D: Decoder>(
        &self,
        decoder: &mut D,
        args: &[&Descriptor],
    ) -> Result<(K::Value, V::Value)> {
        let entry = &schema::MAP_ENTRY;
        decoder.begin_composite(entry, args)?;
        let mut key = None;
        let mut value = None;
        loop {
            match decoder.next_element(entry)? {
                NextElement::All => {
                    key = Some(self.0.decode(decoder)?);
                    value = Some(self.1.decode(decoder)?);
                    break;
                }
                NextElement::Index(0) => key = Some(self.0.decode(decoder)?),
                NextElement::Index(1) => value = Some(self.1.decode(decoder)?),
                NextElement::Index(i) => {
                    return Err(Error::custom(format!(
                        "map entry has exactly two elements, got index {i}"
                    )))
                }
                NextElement::Done => break,
            }
        }
        decoder.end_composite(entry)?;
        Ok((
            key.ok_or_else(|| Error::custom("map entry missing key"))?,
            value.ok_or_else(|| Error::custom("map entry missing value"))?,
        ))
    }
}

impl<K: ValueSerializer, V: ValueSerializer> ValueSerializer for MapSerializer<K, V>
where
    K::Value: Hash + Eq,
{
    type Value = IndexMap<K::Value, V::Value>;

    fn descriptor(&self) -> &'static Descriptor {
        &schema::MAP
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Self::Value) -> Result<()> {
        let desc = &schema::MAP;
        let entry = &schema::MAP_ENTRY;
        let args = [self.0.descriptor(), self.1.descriptor()];
        encoder.begin_composite(desc, &args)?;
        if encoder.begin_element(desc, 0)? {
            encoder.encode_i32(value.len() as i32)?;
        }
        for (i, (k, v)) in value.iter().enumerate() {
            if encoder.begin_element(desc, i + 1)? {
                encoder.begin_composite(entry, &args)?;
                if encoder.begin_element(entry, 0)? {
                    self.0.encode(encoder, k)?;
                }
                if encoder.begin_element(entry, 1)? {
                    self.1.encode(encoder, v)?;
                }
                encoder.end_composite(entry)?;
            }
        }
        encoder.end_composite(desc)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Self::Value> {
        let desc = &schema::MAP;
        let args = [self.0.descriptor(), self.1.descriptor()];
        decoder.begin_composite(desc, &args)?;
        let mut map = IndexMap::new();
        loop {
            match decoder.next_element(desc)? {
                NextElement::All => {
                    let size = decode_size(decoder)?;
                    for _ in 0..size {
                        let (k, v) = self.decode_entry(decoder, &args)?;
                        map.insert(k, v);
                    }
                    break;
                }
                NextElement::Index(0) => {
                    decode_size(decoder)?;
                }
                NextElement::Index(_) => {
                    let (k, v) = self.decode_entry(decoder, &args)?;
                    map.insert(k, v);
                }
                NextElement::Done => break,
            }
        }
        decoder.end_composite(desc)?;
        Ok(map)
    }
}
